//! Property-based invariant tests for geometry primitives (Rect, Extent).
//!
//! 1. Right/bottom edges are consistent with x+width, y+height.
//! 2. A non-empty rect contains its own origin and never its right/bottom edge.
//! 3. Extent projection keeps left and width.

use gloss_core::geometry::{Extent, Rect};
use proptest::prelude::*;

fn rect_strategy() -> impl Strategy<Value = Rect> {
    (-2000i32..=2000, -2000i32..=2000, 0i32..=2000, 0i32..=2000)
        .prop_map(|(x, y, w, h)| Rect::new(x as f64, y as f64, w as f64, h as f64))
}

proptest! {
    #[test]
    fn edges_consistent(r in rect_strategy()) {
        prop_assert_eq!(r.right(), r.x + r.width);
        prop_assert_eq!(r.bottom(), r.y + r.height);
    }

    #[test]
    fn contains_origin_but_not_far_edges(r in rect_strategy()) {
        if r.is_empty() {
            prop_assert!(!r.contains(r.x, r.y));
        } else {
            prop_assert!(r.contains(r.x, r.y));
            prop_assert!(!r.contains(r.right(), r.y));
            prop_assert!(!r.contains(r.x, r.bottom()));
        }
    }

    #[test]
    fn extent_projection(r in rect_strategy()) {
        let e = Extent::from(r);
        prop_assert_eq!(e.left, r.x);
        prop_assert_eq!(e.width, r.width);
        prop_assert_eq!(e.right(), r.right());
    }
}
