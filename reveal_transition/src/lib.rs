// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reveal Transition: a circular reveal for modal screens.
//!
//! Presenting grows a filled circle from an anchor point (typically the center of the
//! control that was tapped) until it covers the incoming view, while that view fades in
//! inside it. Dismissing reverses it: the outgoing view fades out while the circle shrinks
//! into a possibly different anchor, after which the circle is removed.
//!
//! The controller does not own a clock. The host configures a phase, calls
//! [`CircularReveal::animate`] once, then calls [`CircularReveal::tick`] from its frame
//! loop. All scene mutations happen in `animate` and on completion; ticks only write
//! interpolated transform and opacity values.
//!
//! ## API overview
//!
//! - [`CircularReveal`]: the two-phase controller.
//! - [`RevealStyle`]: duration, overlay fill, and optional [`SnapshotHint`].
//! - [`TransitionContext`]: what the host lends to a phase. [`SceneContext`] is a ready-made
//!   implementation over an owned [`Scene`](reveal_scene::Scene).
//! - [`TransitionMode`], [`TransitionState`], [`TransitionError`].
//!
//! The overlay geometry comes from [`reveal_geometry`]; the views live in a
//! [`reveal_scene::Scene`].
//!
//! ### Present and dismiss
//!
//! ```
//! use core::time::Duration;
//! use kurbo::{Point, Rect};
//! use reveal_scene::{LocalView, Scene};
//! use reveal_transition::{
//!     CircularReveal, RevealStyle, SceneContext, TransitionMode, TransitionState, ViewKey,
//! };
//!
//! let mut scene = Scene::new();
//! let window = scene.insert(None, LocalView::with_frame(Rect::new(0.0, 0.0, 390.0, 844.0)));
//! let story = scene.insert(None, LocalView::with_frame(Rect::new(0.0, 0.0, 390.0, 844.0)));
//! let mut ctx = SceneContext::new(scene, window).with_view(ViewKey::To, story);
//! let mut reveal = CircularReveal::new(RevealStyle::new(Duration::from_millis(200)));
//!
//! reveal.configure(TransitionMode::Present, Point::new(48.0, 152.0));
//! reveal.animate(&mut ctx);
//! while reveal.tick(&mut ctx, Duration::from_millis(16)) {}
//! assert_eq!(reveal.state(), TransitionState::Presented);
//!
//! ctx.set_view(ViewKey::To, None);
//! ctx.set_view(ViewKey::From, Some(story));
//! reveal.configure(TransitionMode::Dismiss, Point::new(195.0, 790.0));
//! reveal.animate(&mut ctx);
//! while reveal.tick(&mut ctx, Duration::from_millis(16)) {}
//!
//! assert_eq!(ctx.completions(), &[true, true]);
//! assert_eq!(reveal.overlay(), None);
//! ```
//!
//! ## Features
//!
//! - `std` (default): forwards to `kurbo`/`peniko`.
//! - `libm`: floating-point support for `no_std` targets.
//! - `tracing`: structured events when phases start, complete, are interrupted, or fail.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod context;
mod controller;
mod error;
mod tween;

pub use config::{DEFAULT_DURATION, RevealStyle, SnapshotHint};
pub use context::{SceneContext, TransitionContext, ViewKey};
pub use controller::{CircularReveal, TransitionConfig, TransitionMode, TransitionState};
pub use error::TransitionError;

pub use reveal_geometry;
pub use reveal_scene;
