// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reveal Geometry: sizing for circular reveal transitions.
//!
//! A circular reveal grows a circle from an anchor point until it covers some content
//! rectangle, or shrinks it back into an anchor. This crate answers the two geometric
//! questions such a transition asks:
//!
//! - How large must the circle be? [`overlay_bounds`] returns the square bounds of the
//!   smallest circle, centered on the anchor, that covers the whole content rectangle.
//! - How small should it start (or end)? [`collapsed_scale`] derives a uniform scale
//!   from an optional snapshot of the element that triggered the transition, falling
//!   back to [`MIN_COLLAPSED_SCALE`].
//!
//! The anchor may lie anywhere, including outside the content. The returned bounds sit
//! at the origin; centering them on the anchor is up to the caller.
//!
//! ```
//! use kurbo::{Point, Size};
//! use reveal_geometry::{covers, overlay_bounds};
//!
//! let content = Size::new(300.0, 400.0);
//! let anchor = Point::new(150.0, 200.0);
//! let bounds = overlay_bounds(content, anchor);
//!
//! // Anchored at the center, the diameter is the content diagonal.
//! assert!((bounds.width() - 500.0).abs() < 1e-9);
//! assert!(covers(content, anchor, bounds.width()));
//! ```
//!
//! This crate is `no_std`.

#![no_std]

use kurbo::{Point, Rect, Size, Vec2};

/// Scale used for the collapsed circle when no snapshot hint is available.
///
/// Small enough to read as a point, large enough to keep the transform invertible.
pub const MIN_COLLAPSED_SCALE: f64 = 0.001;

/// Farthest horizontal and vertical distances from `anchor` to the edges of `content`.
///
/// For each axis this is `max(anchor, extent - anchor)`, so the result reaches the
/// content corner farthest from the anchor.
pub fn reach(content: Size, anchor: Point) -> Vec2 {
    Vec2::new(
        anchor.x.max(content.width - anchor.x),
        anchor.y.max(content.height - anchor.y),
    )
}

/// Square bounds of the smallest anchor-centered circle that covers `content`.
///
/// The side is twice the length of [`reach`]. The rect's origin is `(0, 0)`; callers
/// center it on `anchor` themselves. Zero-size content anchored at its origin yields a
/// zero-size rect.
pub fn overlay_bounds(content: Size, anchor: Point) -> Rect {
    let diameter = reach(content, anchor).hypot() * 2.0;
    Rect::from_origin_size(Point::ZERO, Size::new(diameter, diameter))
}

/// Returns `true` when a circle of `diameter` centered on `anchor` contains every corner
/// of the content rectangle `(0, 0)..content`.
pub fn covers(content: Size, anchor: Point, diameter: f64) -> bool {
    let radius = diameter / 2.0;
    [
        Point::ZERO,
        Point::new(content.width, 0.0),
        Point::new(0.0, content.height),
        Point::new(content.width, content.height),
    ]
    .into_iter()
    .all(|corner| (corner - anchor).hypot() <= radius)
}

/// Uniform scale that shrinks an overlay of size `overlay` down to a snapshot `hint`.
///
/// With a hint, the scale is the hint's larger side over the overlay's width, clamped to
/// `MIN_COLLAPSED_SCALE..=1.0`. Without one, or when the ratio is not finite (for example
/// a zero-size overlay), [`MIN_COLLAPSED_SCALE`] is used.
pub fn collapsed_scale(hint: Option<Size>, overlay: Size) -> f64 {
    match hint {
        Some(hint) => {
            let scale = hint.width.max(hint.height) / overlay.width;
            if scale.is_finite() {
                scale.clamp(MIN_COLLAPSED_SCALE, 1.0)
            } else {
                MIN_COLLAPSED_SCALE
            }
        }
        None => MIN_COLLAPSED_SCALE,
    }
}
