// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlay geometry.
//!
//! How large the reveal circle must be for a few anchors on a phone-sized screen, and how
//! far it collapses for a given snapshot.
//!
//! Run:
//! - `cargo run -p reveal_demos --example overlay_geometry`

use kurbo::{Point, Size};
use reveal_geometry::{collapsed_scale, covers, overlay_bounds, reach};

fn main() {
    let screen = Size::new(390.0, 844.0);
    let anchors = [
        ("center", Point::new(195.0, 422.0)),
        ("avatar", Point::new(48.0, 152.0)),
        ("close control", Point::new(195.0, 790.0)),
        ("corner", Point::new(0.0, 0.0)),
        ("off screen", Point::new(-40.0, 900.0)),
    ];

    for (name, anchor) in anchors {
        let bounds = overlay_bounds(screen, anchor);
        let r = reach(screen, anchor);
        let d = bounds.width();
        println!(
            "{name:>13}: reach ({:6.1}, {:6.1}), diameter {d:7.1}, covers {}",
            r.x,
            r.y,
            covers(screen, anchor, d)
        );
        assert!(covers(screen, anchor, d));
    }

    let overlay = overlay_bounds(screen, Point::new(48.0, 152.0)).size();
    for hint in [None, Some(Size::new(66.0, 66.0)), Some(Size::new(4000.0, 10.0))] {
        println!(
            "snapshot {hint:?}: collapsed scale {:.4}",
            collapsed_scale(hint, overlay)
        );
    }
}
