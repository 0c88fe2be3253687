// SPDX-License-Identifier: MIT OR Apache-2.0

//! Flip-on-overflow placement of menu panels.
//!
//! Positions are the values handed to [Host::set_position](cascade_core::host::Host::set_position),
//! so they exclude the panel's own margin. A panel never flips more than once
//! per axis, and a flipped panel that still overflows is clamped to the
//! top-left edge of the bounds.

use kurbo::{Insets, Rect};
use nalgebra::Vector2;

/// Where a panel goes and whether it had to flip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Position of the panel (root: world space, sub-panel: relative to its parent panel).
    pub position: Vector2<f64>,
    /// The panel overflowed on the right and was moved to the left of its anchor.
    pub flipped_x: bool,
    /// The panel overflowed at the bottom and was moved above its anchor.
    pub flipped_y: bool,
}

/// Place the root panel below the `anchor` rectangle, in world space.
///
/// On overflow the panel's right edge is aligned with the anchor's right edge,
/// and/or its bottom edge with the anchor's top edge.
pub fn place_root(anchor: Rect, size: Vector2<f64>, margin: Insets, bounds: Rect) -> Placement {
    let offset = Vector2::new(margin.x0, margin.y0);
    let mut position = Vector2::new(anchor.x0, anchor.y1);
    let max = position + offset + size;

    let flipped_x = max.x > bounds.x1;
    if flipped_x {
        position.x = (anchor.x1 - size.x - offset.x).max(bounds.x0);
    }

    let flipped_y = max.y > bounds.y1;
    if flipped_y {
        position.y = (anchor.y0 - size.y - offset.y).max(bounds.y0);
    }

    Placement {
        position,
        flipped_x,
        flipped_y,
    }
}

/// Place a sub-panel next to the row that expands it.
///
/// `parent_origin` is the world position of the parent panel, `row` the
/// expanding row relative to it. The returned position is relative to the
/// parent panel.
pub fn place_sub_panel(
    parent_origin: Vector2<f64>,
    row: Rect,
    size: Vector2<f64>,
    margin: Insets,
    bounds: Rect,
) -> Placement {
    let offset = Vector2::new(margin.x0, margin.y0);
    let mut anchor = Vector2::new(row.x1, row.y0);
    let max = parent_origin + anchor + offset + size;

    let flipped_x = max.x > bounds.x1;
    if flipped_x {
        anchor.x = row.x0 - size.x - offset.x;

        if parent_origin.x + anchor.x < bounds.x0 {
            anchor.x = bounds.x0 - parent_origin.x;
        }
    }

    let flipped_y = max.y > bounds.y1;
    if flipped_y {
        anchor.y = row.y1 - size.y - offset.y;

        if parent_origin.y + anchor.y < bounds.y0 {
            anchor.y = bounds.y0 - parent_origin.y;
        }
    }

    Placement {
        position: anchor,
        flipped_x,
        flipped_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Rect = Rect::new(0.0, 0.0, 400.0, 300.0);

    #[test]
    fn test_sub_panel_opens_right_of_row() {
        let placement = place_sub_panel(
            Vector2::new(10.0, 10.0),
            Rect::new(0.0, 20.0, 80.0, 40.0),
            Vector2::new(100.0, 60.0),
            Insets::ZERO,
            BOUNDS,
        );
        assert_eq!(placement.position, Vector2::new(80.0, 20.0));
        assert!(!placement.flipped_x && !placement.flipped_y);
    }

    #[test]
    fn test_sub_panel_flips_left_on_overflow() {
        let placement = place_sub_panel(
            Vector2::new(300.0, 0.0),
            Rect::new(0.0, 0.0, 80.0, 20.0),
            Vector2::new(100.0, 60.0),
            Insets::ZERO,
            BOUNDS,
        );
        assert!(placement.flipped_x);
        assert_eq!(placement.position.x, -100.0);
        assert_eq!(300.0 + placement.position.x, 200.0);
    }

    #[test]
    fn test_flipped_sub_panel_clamps_to_left_edge() {
        let placement = place_sub_panel(
            Vector2::new(50.0, 0.0),
            Rect::new(0.0, 0.0, 300.0, 20.0),
            Vector2::new(100.0, 60.0),
            Insets::ZERO,
            BOUNDS,
        );
        assert!(placement.flipped_x);
        assert_eq!(50.0 + placement.position.x, 0.0);
    }

    #[test]
    fn test_sub_panel_flips_up_with_margin() {
        let placement = place_sub_panel(
            Vector2::new(0.0, 250.0),
            Rect::new(0.0, 20.0, 80.0, 40.0),
            Vector2::new(100.0, 60.0),
            Insets::new(4.0, 2.0, 0.0, 0.0),
            BOUNDS,
        );
        assert!(placement.flipped_y);
        assert!(!placement.flipped_x);
        // the panel's bottom edge lines up with the row's bottom edge
        assert_eq!(placement.position.y + 2.0 + 60.0, 40.0);
    }

    #[test]
    fn test_root_below_anchor() {
        let placement = place_root(
            Rect::new(10.0, 10.0, 90.0, 30.0),
            Vector2::new(120.0, 80.0),
            Insets::ZERO,
            BOUNDS,
        );
        assert_eq!(placement.position, Vector2::new(10.0, 30.0));
        assert!(!placement.flipped_x && !placement.flipped_y);
    }

    #[test]
    fn test_root_aligns_to_anchor_on_overflow() {
        let placement = place_root(
            Rect::new(350.0, 260.0, 390.0, 280.0),
            Vector2::new(120.0, 80.0),
            Insets::ZERO,
            BOUNDS,
        );
        assert!(placement.flipped_x && placement.flipped_y);
        assert_eq!(placement.position, Vector2::new(270.0, 180.0));
    }

    #[test]
    fn test_oversized_root_is_clamped() {
        let placement = place_root(
            Rect::new(10.0, 10.0, 30.0, 30.0),
            Vector2::new(500.0, 400.0),
            Insets::ZERO,
            BOUNDS,
        );
        assert_eq!(placement.position, Vector2::new(0.0, 0.0));
    }
}
