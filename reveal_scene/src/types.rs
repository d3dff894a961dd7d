// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the scene: view identifiers, flags, shapes, and local view state.

use kurbo::{Affine, Point, Rect, RoundedRect, Size};
use peniko::Color;

/// Identifier for a view in the scene.
///
/// This is a small, copyable handle that stays stable across updates but becomes
/// invalid when the underlying slot is reused.
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `ViewId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `ViewId`.
///
/// Use [`Scene::is_alive`](crate::Scene::is_alive) to check whether a `ViewId` still refers to a
/// live view. Stale handles never alias a different live view because the generation must match.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ViewId(pub(crate) u32, pub(crate) u32);

impl ViewId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// View flags controlling visibility, picking, and clipping.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct ViewFlags: u8 {
        /// View is visible (it and its subtree are painted and hit-tested).
        const VISIBLE        = 0b0000_0001;
        /// View is pickable (participates in hit testing).
        const PICKABLE       = 0b0000_0010;
        /// Descendants are clipped to this view's [outline](crate::Scene::outline).
        const CLIPS_CHILDREN = 0b0000_0100;
    }
}

impl Default for ViewFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::PICKABLE
    }
}

/// Outline of a view's bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ViewShape {
    /// Plain rectangle.
    #[default]
    Rect,
    /// Fully rounded: the corner radius is always half the shorter side of the current size.
    Circle,
}

impl ViewShape {
    /// Corner radius for a view of `size` with this shape.
    pub fn corner_radius(self, size: Size) -> f64 {
        match self {
            Self::Rect => 0.0,
            Self::Circle => size.width.min(size.height) / 2.0,
        }
    }

    /// Outline of `bounds` with this shape.
    pub fn outline(self, bounds: Rect) -> RoundedRect {
        RoundedRect::from_rect(bounds, self.corner_radius(bounds.size()))
    }
}

/// Local state for a view.
///
/// A view's local space has its origin at the top-left corner of its bounds
/// (`(0, 0)..size`). It is placed in its parent's local space by
/// `translate(center) * transform * translate(-size / 2)`, so `transform` acts
/// around the view's center.
#[derive(Clone, Debug)]
pub struct LocalView {
    /// Size of the view's bounds.
    pub size: Size,
    /// Position of the bounds' center in the parent's local space.
    pub center: Point,
    /// Transform applied around the center, relative to the parent.
    pub transform: Affine,
    /// Opacity in `0.0..=1.0`; multiplied down the tree when painting.
    pub opacity: f64,
    /// Outline of the bounds.
    pub shape: ViewShape,
    /// Optional fill painted inside the outline.
    pub fill: Option<Color>,
    /// Z-order within the parent. Higher is drawn on top; ties keep insertion order.
    pub z_index: i32,
    /// Visibility, picking, and clipping flags.
    pub flags: ViewFlags,
}

impl LocalView {
    /// An untransformed view occupying `frame` in its parent's local space.
    pub fn with_frame(frame: Rect) -> Self {
        Self {
            size: frame.size(),
            center: frame.center(),
            ..Default::default()
        }
    }

    /// Bounds in the view's own local space.
    pub fn bounds(&self) -> Rect {
        Rect::from_origin_size(Point::ZERO, self.size)
    }

    /// Transform from this view's local space into its parent's local space.
    pub fn placement(&self) -> Affine {
        Affine::translate(self.center.to_vec2())
            * self.transform
            * Affine::translate(-self.size.to_vec2() / 2.0)
    }
}

impl Default for LocalView {
    fn default() -> Self {
        Self {
            size: Size::ZERO,
            center: Point::ZERO,
            transform: Affine::IDENTITY,
            opacity: 1.0,
            shape: ViewShape::Rect,
            fill: None,
            z_index: 0,
            flags: ViewFlags::default(),
        }
    }
}
