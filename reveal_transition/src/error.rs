// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reasons a phase can fail to start.

use crate::context::ViewKey;
use crate::controller::{TransitionMode, TransitionState};

/// Why [`CircularReveal::animate`](crate::CircularReveal::animate) did not start a phase.
///
/// These never escape `animate`: each one is reported through
/// [`TransitionContext::transition_failed`](crate::TransitionContext::transition_failed)
/// followed by a single failed completion, and nothing in the scene is mutated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// `animate` ran without a preceding `configure`, or with [`TransitionMode::None`].
    #[error("animate called without a configured transition mode")]
    Unconfigured,
    /// The context's container handle is stale.
    #[error("transition container is not a live view")]
    MissingContainer,
    /// The context could not supply the view for the phase.
    #[error("transition context has no live `{0}` view")]
    MissingView(ViewKey),
    /// The view for the phase is the container or one of its ancestors.
    #[error("`{0}` view contains the transition container")]
    ContentContainsContainer(ViewKey),
    /// Dismiss was requested but the overlay is gone.
    #[error("no overlay to dismiss")]
    MissingOverlay,
    /// The requested phase does not follow from the current state.
    #[error("cannot {mode:?} while {state:?}")]
    InvalidState {
        /// Requested mode.
        mode: TransitionMode,
        /// State the controller was in.
        state: TransitionState,
    },
}
