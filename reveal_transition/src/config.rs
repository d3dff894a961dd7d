// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Construction parameters for [`CircularReveal`](crate::CircularReveal).

use core::time::Duration;

use kurbo::Size;
use peniko::Color;
use peniko::color::palette;
use reveal_scene::{Scene, ViewId};

/// Duration used by [`RevealStyle::default`].
pub const DEFAULT_DURATION: Duration = Duration::from_secs(1);

/// Captured visual of the element that triggered the transition.
///
/// Only its size is used: it sets how far the overlay collapses. The controller reads it
/// and never owns or mutates it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SnapshotHint {
    /// A host-owned view; its current frame size is read at the start of every phase.
    View(ViewId),
    /// A fixed size.
    Size(Size),
}

impl SnapshotHint {
    /// Size of the snapshot, or `None` if it refers to a view that is no longer alive.
    pub fn resolve(&self, scene: &Scene) -> Option<Size> {
        match *self {
            Self::View(id) => scene.frame(id).map(|frame| frame.size()),
            Self::Size(size) => Some(size),
        }
    }
}

/// Fixed parameters of a reveal transition.
///
/// ```
/// use core::time::Duration;
/// use kurbo::Size;
/// use peniko::color::palette;
/// use reveal_transition::{RevealStyle, SnapshotHint};
///
/// let style = RevealStyle::new(Duration::from_millis(400))
///     .with_fill(palette::css::YELLOW)
///     .with_snapshot(SnapshotHint::Size(Size::new(64.0, 64.0)));
/// assert_eq!(style.duration, Duration::from_millis(400));
/// ```
#[derive(Clone, Debug)]
pub struct RevealStyle {
    /// Length of each phase.
    pub duration: Duration,
    /// Fill of the overlay circle.
    pub fill: Color,
    /// Optional snapshot that sets the collapsed scale.
    pub snapshot: Option<SnapshotHint>,
}

impl RevealStyle {
    /// A style with the given duration, a white fill, and no snapshot.
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            fill: palette::css::WHITE,
            snapshot: None,
        }
    }

    /// Set the phase duration.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the overlay fill.
    #[must_use]
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.fill = fill;
        self
    }

    /// Set the snapshot hint.
    #[must_use]
    pub fn with_snapshot(mut self, snapshot: SnapshotHint) -> Self {
        self.snapshot = Some(snapshot);
        self
    }
}

impl Default for RevealStyle {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION)
    }
}
