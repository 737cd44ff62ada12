#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! Coordinates are CSS-pixel-like `f64` values in viewport space
//! (origin at top-left, x grows to the right).

/// A measured box: the bounding rectangle of a rendered element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge (inclusive).
    pub x: f64,
    /// Top edge (inclusive).
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Left edge. Alias for `self.x`.
    #[inline]
    pub const fn left(&self) -> f64 {
        self.x
    }

    /// Top edge. Alias for `self.y`.
    #[inline]
    pub const fn top(&self) -> f64 {
        self.y
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if the rectangle has zero (or negative) area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if a point is inside the rectangle.
    #[inline]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Horizontal projection of this rectangle.
    #[inline]
    pub const fn extent(&self) -> Extent {
        Extent::new(self.x, self.width)
    }
}

/// Horizontal geometry of a region: where it starts and how wide it is.
///
/// This is everything placement needs from a measured box; vertical
/// placement belongs to the styling layer.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    pub left: f64,
    pub width: f64,
}

impl Extent {
    #[inline]
    pub const fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

impl From<Rect> for Extent {
    fn from(rect: Rect) -> Self {
        rect.extent()
    }
}

/// Size of the visible area.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Create a new viewport.
    #[inline]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 5.0);
        assert_eq!(r.left(), 10.0);
        assert_eq!(r.top(), 20.0);
        assert_eq!(r.right(), 40.0);
        assert_eq!(r.bottom(), 25.0);
    }

    #[test]
    fn rect_contains_boundary_conditions() {
        let r = Rect::new(0.0, 0.0, 5.0, 5.0);
        assert!(r.contains(0.0, 0.0));
        assert!(r.contains(4.5, 4.5));
        // Right and bottom edges are exclusive
        assert!(!r.contains(5.0, 0.0));
        assert!(!r.contains(0.0, 5.0));
    }

    #[test]
    fn rect_contains_empty_rect() {
        let r = Rect::new(5.0, 5.0, 0.0, 0.0);
        assert!(r.is_empty());
        assert!(!r.contains(5.0, 5.0));
    }

    #[test]
    fn extent_from_rect() {
        let e: Extent = Rect::new(400.0, 12.0, 100.0, 20.0).into();
        assert_eq!(e, Extent::new(400.0, 100.0));
        assert_eq!(e.right(), 500.0);
    }
}
