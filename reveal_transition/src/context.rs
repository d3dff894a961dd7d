// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The hosting layer's side of a transition.
//!
//! A [`TransitionContext`] hands the controller the scene it works in, the container to
//! mount transient views into, the views being shown or hidden, and a way to report
//! completion. [`SceneContext`] is a ready-made implementation that owns a [`Scene`] and
//! records every completion, which is what tests, demos and simple hosts need.

use alloc::vec::Vec;
use core::fmt;

use reveal_scene::{Scene, ViewId};

use crate::error::TransitionError;

/// Which side of the transition a view belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewKey {
    /// The view being hidden (used by dismiss).
    From,
    /// The view being shown (used by present).
    To,
}

impl fmt::Display for ViewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::From => "from",
            Self::To => "to",
        })
    }
}

/// Capabilities the hosting layer lends to a transition.
///
/// Handles returned by [`view`](Self::view) are borrowed for one phase; the controller
/// drops them when it reports completion.
pub trait TransitionContext {
    /// The scene holding the container and the views.
    fn scene(&self) -> &Scene;

    /// Mutable access to the scene.
    fn scene_mut(&mut self) -> &mut Scene;

    /// View that transient views are mounted into. Anchor points live in its local space.
    fn container(&self) -> ViewId;

    /// The view for one side of the transition, if the host has one.
    fn view(&self, key: ViewKey) -> Option<ViewId>;

    /// Called exactly once per `animate` call. `finished` is `false` when the phase failed
    /// to start or was interrupted.
    fn complete_transition(&mut self, finished: bool);

    /// Called just before a failed completion caused by `error`.
    fn transition_failed(&mut self, error: &TransitionError) {
        let _ = error;
    }
}

/// A [`TransitionContext`] that owns its scene and records completions.
#[derive(Debug)]
pub struct SceneContext {
    scene: Scene,
    container: ViewId,
    from: Option<ViewId>,
    to: Option<ViewId>,
    completions: Vec<bool>,
    failures: Vec<TransitionError>,
}

impl SceneContext {
    /// Wrap `scene`, mounting transient views into `container`.
    pub fn new(scene: Scene, container: ViewId) -> Self {
        Self {
            scene,
            container,
            from: None,
            to: None,
            completions: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Set (or clear) the view for one side of the transition.
    pub fn set_view(&mut self, key: ViewKey, view: Option<ViewId>) {
        match key {
            ViewKey::From => self.from = view,
            ViewKey::To => self.to = view,
        }
    }

    /// Builder form of [`set_view`](Self::set_view).
    #[must_use]
    pub fn with_view(mut self, key: ViewKey, view: ViewId) -> Self {
        self.set_view(key, Some(view));
        self
    }

    /// Every completion reported so far, oldest first.
    pub fn completions(&self) -> &[bool] {
        &self.completions
    }

    /// Every failure reported so far, oldest first.
    pub fn failures(&self) -> &[TransitionError] {
        &self.failures
    }

    /// Drain recorded completions.
    pub fn take_completions(&mut self) -> Vec<bool> {
        core::mem::take(&mut self.completions)
    }

    /// Give the scene back.
    pub fn into_scene(self) -> Scene {
        self.scene
    }
}

impl TransitionContext for SceneContext {
    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    fn container(&self) -> ViewId {
        self.container
    }

    fn view(&self, key: ViewKey) -> Option<ViewId> {
        match key {
            ViewKey::From => self.from,
            ViewKey::To => self.to,
        }
    }

    fn complete_transition(&mut self, finished: bool) {
        self.completions.push(finished);
    }

    fn transition_failed(&mut self, error: &TransitionError) {
        self.failures.push(*error);
    }
}
