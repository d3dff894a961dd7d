// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Linear interpolation between values captured when a phase starts.

use core::time::Duration;

use kurbo::Affine;

/// Animated values of one phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Keyframe {
    pub(crate) overlay_transform: Affine,
    pub(crate) content_opacity: f64,
}

impl Keyframe {
    pub(crate) fn lerp(self, to: Self, t: f64) -> Self {
        let a = self.overlay_transform.as_coeffs();
        let b = to.overlay_transform.as_coeffs();
        Self {
            overlay_transform: Affine::new(core::array::from_fn(|i| lerp(a[i], b[i], t))),
            content_opacity: lerp(self.content_opacity, to.content_opacity, t),
        }
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    if t >= 1.0 { b } else { a + (b - a) * t }
}

/// Elapsed time of a phase against its duration.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Clock {
    duration: Duration,
    elapsed: Duration,
    ticked: bool,
}

impl Clock {
    pub(crate) fn new(duration: Duration) -> Self {
        Self {
            duration,
            elapsed: Duration::ZERO,
            ticked: false,
        }
    }

    /// Advance by `dt` and return the new progress.
    pub(crate) fn advance(&mut self, dt: Duration) -> f64 {
        self.elapsed = self.elapsed.saturating_add(dt);
        self.ticked = true;
        self.progress()
    }

    /// Progress in `0.0..=1.0`. A zero duration is complete as soon as it is ticked.
    pub(crate) fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return if self.ticked { 1.0 } else { 0.0 };
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0)
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.progress() >= 1.0
    }
}
