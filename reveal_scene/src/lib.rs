// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reveal Scene: a Kurbo-native retained view tree.
//!
//! Reveal Scene is the container that screen transitions mount their transient views into.
//!
//! - Represents a hierarchy of views with sizes, centers, transforms applied around the
//!   center, opacity, fills, circle or rectangle outlines, z-order, and flags.
//! - Derives a circle's corner radius from its live size on every query, so a circle
//!   stays a circle at every scale and after every resize.
//! - Converts points between the local spaces of any two views.
//! - Provides hit testing against outlines, honoring child clipping.
//! - Supports batched updates with a [`Scene::commit`] step that yields coarse damage regions.
//!
//! ## Not a layout engine or renderer
//!
//! This crate does not measure or arrange views, and it does not paint.
//! Upstream code positions views with whatever layout system it likes and paints from
//! [`Scene::paint_order`], [`Scene::outline`], [`Scene::world_transform`], and
//! [`Scene::effective_opacity`].
//!
//! ## API overview
//!
//! - [`Scene`]: container managing views and their hierarchy.
//! - [`LocalView`]: per-view local data (size, center, transform, opacity, shape, fill, z, flags).
//! - [`ViewFlags`]: visibility, picking, and child clipping.
//! - [`ViewShape`]: rectangle or circle outline.
//! - [`ViewId`]: generational handle of a view.
//!
//! Key operations:
//! - [`Scene::insert`] → [`ViewId`]
//! - [`Scene::mount`] / [`Scene::reparent`] / [`Scene::detach`] / [`Scene::remove`]
//! - [`Scene::frame`], [`Scene::convert_point`], [`Scene::hit_test_point`]
//! - [`Scene::commit`] → damage summary.
//!
//! ### Minimal usage
//!
//! ```
//! use kurbo::{Affine, Point, Rect};
//! use reveal_scene::{LocalView, QueryFilter, Scene, ViewShape};
//!
//! let mut scene = Scene::new();
//! let window = scene.insert(None, LocalView::with_frame(Rect::new(0.0, 0.0, 390.0, 844.0)));
//! let avatar = scene.insert(
//!     Some(window),
//!     LocalView {
//!         shape: ViewShape::Circle,
//!         ..LocalView::with_frame(Rect::new(16.0, 120.0, 80.0, 184.0))
//!     },
//! );
//!
//! // Where is the avatar's center in window coordinates?
//! let center = scene.convert_point(Point::new(32.0, 32.0), avatar, window).unwrap();
//! assert_eq!(center, Point::new(48.0, 152.0));
//!
//! // Shrink it around its center; the radius follows the size, not the transform.
//! scene.set_transform(avatar, Affine::scale(0.5));
//! assert_eq!(scene.corner_radius(avatar), Some(32.0));
//!
//! let _damage = scene.commit();
//! let hit = scene.hit_test_point(center, QueryFilter::default()).unwrap();
//! assert_eq!(hit.view, avatar);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod damage;
mod scene;
mod types;

pub use damage::Damage;
pub use scene::{Hit, QueryFilter, Scene};
pub use types::{LocalView, ViewFlags, ViewId, ViewShape};
