#![forbid(unsafe_code)]

//! Horizontal placement of a tooltip hanging below its anchor.
//!
//! # Invariants
//!
//! 1. The tooltip starts centred on the anchor.
//! 2. If its right edge would pass `viewport_width - margin`, it is moved left
//!    so the right edge sits exactly there.
//! 3. If its left edge would then be before `margin`, it is moved right so the
//!    left edge sits exactly at `margin`. This runs last and wins, so a
//!    tooltip wider than `viewport_width - 2 * margin` may still overflow on
//!    the right.
//!
//! The returned offset is relative to the anchor's left edge, ready to be
//! used as the tooltip's local `left`.

use gloss_core::geometry::Extent;

/// Gap kept between a tooltip and either viewport edge.
pub const DEFAULT_MARGIN: f64 = 16.0;

/// Placement configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementConfig {
    /// Minimum distance from the viewport edges (default: 16).
    pub margin: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
        }
    }
}

impl PlacementConfig {
    /// Set the edge margin.
    #[must_use]
    pub fn margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// [`compute_offset`] with this config's margin.
    #[must_use]
    pub fn offset(&self, anchor: Extent, tooltip: Extent, viewport_width: f64) -> f64 {
        compute_offset(anchor, tooltip, viewport_width, self.margin)
    }
}

/// Offset of the tooltip's left edge from the anchor's left edge.
///
/// Only the tooltip's width is used; its current position is irrelevant.
#[must_use]
pub fn compute_offset(anchor: Extent, tooltip: Extent, viewport_width: f64, margin: f64) -> f64 {
    let span = gloss_core::trace_span!(
        "compute_offset",
        anchor_left = anchor.left,
        anchor_width = anchor.width,
        tooltip_width = tooltip.width,
        viewport_width,
        margin
    );
    let _guard = span.enter();

    let mut offset = (anchor.width - tooltip.width) / 2.0;

    if anchor.left + offset + tooltip.width > viewport_width - margin {
        offset = viewport_width - anchor.left - tooltip.width - margin;
    }

    if anchor.left + offset < margin {
        offset = margin - anchor.left;
    }

    gloss_core::trace!(offset, "tooltip offset computed");
    offset
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset(anchor_left: f64, anchor_width: f64, tooltip_width: f64, viewport: f64) -> f64 {
        compute_offset(
            Extent::new(anchor_left, anchor_width),
            Extent::new(0.0, tooltip_width),
            viewport,
            DEFAULT_MARGIN,
        )
    }

    #[test]
    fn centred_when_it_fits() {
        assert_eq!(offset(400.0, 100.0, 40.0, 1000.0), 30.0);
    }

    #[test]
    fn wider_tooltip_centres_with_negative_offset() {
        assert_eq!(offset(400.0, 40.0, 100.0, 1000.0), -30.0);
    }

    #[test]
    fn clamps_to_right_margin() {
        assert_eq!(offset(960.0, 100.0, 200.0, 1000.0), -176.0);
    }

    #[test]
    fn clamps_to_left_margin() {
        assert_eq!(offset(5.0, 20.0, 20.0, 1000.0), 11.0);
    }

    #[test]
    fn left_margin_wins_for_oversized_tooltip() {
        let got = offset(100.0, 50.0, 400.0, 300.0);
        assert_eq!(100.0 + got, DEFAULT_MARGIN);
        assert!(100.0 + got + 400.0 > 300.0 - DEFAULT_MARGIN);
    }

    #[test]
    fn right_edge_exactly_at_limit_is_untouched() {
        // 884 + (100 - 100) / 2 + 100 == 984
        assert_eq!(offset(884.0, 100.0, 100.0, 1000.0), 0.0);
    }

    #[test]
    fn tooltip_position_is_ignored() {
        let a = compute_offset(
            Extent::new(400.0, 100.0),
            Extent::new(0.0, 40.0),
            1000.0,
            16.0,
        );
        let b = compute_offset(
            Extent::new(400.0, 100.0),
            Extent::new(-250.0, 40.0),
            1000.0,
            16.0,
        );
        assert_eq!(a, b);
    }

    #[test]
    fn config_uses_its_margin() {
        let config = PlacementConfig::default().margin(0.0);
        assert_eq!(PlacementConfig::default().margin, DEFAULT_MARGIN);
        assert_eq!(
            config.offset(Extent::new(5.0, 20.0), Extent::new(0.0, 20.0), 1000.0),
            0.0
        );
    }
}
