// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interrupting a reveal.
//!
//! A host with its own [`TransitionContext`] that logs every completion and failure.
//! It dismisses while the present is still running, tries to dismiss twice, and then
//! starts a fresh lifecycle after [`CircularReveal::reset`].
//!
//! Run:
//! - `cargo run -p reveal_demos --example reveal_interrupted`

use std::time::Duration;

use kurbo::{Point, Rect};
use reveal_scene::{LocalView, Scene, ViewId};
use reveal_transition::{
    CircularReveal, RevealStyle, TransitionContext, TransitionError, TransitionMode, ViewKey,
};

/// A host that keeps its own modal stack and prints what the transition tells it.
struct LoggingHost {
    scene: Scene,
    window: ViewId,
    presenting: Option<ViewId>,
    dismissing: Option<ViewId>,
    log: Vec<String>,
}

impl TransitionContext for LoggingHost {
    fn scene(&self) -> &Scene {
        &self.scene
    }

    fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    fn container(&self) -> ViewId {
        self.window
    }

    fn view(&self, key: ViewKey) -> Option<ViewId> {
        match key {
            ViewKey::From => self.dismissing,
            ViewKey::To => self.presenting,
        }
    }

    fn complete_transition(&mut self, finished: bool) {
        self.log.push(format!("complete_transition({finished})"));
    }

    fn transition_failed(&mut self, error: &TransitionError) {
        self.log.push(format!("failed: {error}"));
    }
}

fn main() {
    let mut scene = Scene::new();
    let window = scene.insert(None, LocalView::with_frame(Rect::new(0.0, 0.0, 390.0, 844.0)));
    let sheet = scene.insert(None, LocalView::with_frame(Rect::new(0.0, 0.0, 390.0, 844.0)));
    let mut host = LoggingHost {
        scene,
        window,
        presenting: Some(sheet),
        dismissing: None,
        log: Vec::new(),
    };

    let mut reveal = CircularReveal::new(RevealStyle::new(Duration::from_millis(400)));
    let frame = Duration::from_millis(16);

    reveal.configure(TransitionMode::Present, Point::new(340.0, 60.0));
    reveal.animate(&mut host);
    for _ in 0..10 {
        reveal.tick(&mut host, frame);
    }
    println!(
        "present at {:.0}% when the user backs out",
        reveal.progress().unwrap_or(0.0) * 100.0
    );

    // Animating again cuts the present short; its completion reports `false`.
    host.presenting = None;
    host.dismissing = Some(sheet);
    reveal.configure(TransitionMode::Dismiss, Point::new(340.0, 60.0));
    reveal.animate(&mut host);
    while reveal.tick(&mut host, frame) {}
    println!("after dismiss: {:?}, overlay {:?}", reveal.state(), reveal.overlay());

    // Nothing left to dismiss.
    reveal.configure(TransitionMode::Dismiss, Point::new(195.0, 790.0));
    reveal.animate(&mut host);

    // A fresh lifecycle.
    reveal.reset(&mut host);
    host.presenting = Some(sheet);
    host.dismissing = None;
    reveal.configure(TransitionMode::Present, Point::new(195.0, 422.0));
    reveal.animate(&mut host);
    reveal.tick(&mut host, frame);
    reveal.interrupt(&mut host);
    println!("interrupted present leaves {:?}", reveal.state());

    for line in &host.log {
        println!("  {line}");
    }
    assert_eq!(
        host.log,
        [
            "complete_transition(false)",
            "complete_transition(true)",
            "failed: cannot Dismiss while Done",
            "complete_transition(false)",
            "complete_transition(false)",
        ]
    );
}
