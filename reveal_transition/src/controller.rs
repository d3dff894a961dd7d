// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The circular reveal controller.

use alloc::vec::Vec;
use core::time::Duration;

use kurbo::{Affine, Point, Size};
use reveal_geometry::{collapsed_scale, overlay_bounds};
use reveal_scene::{LocalView, Scene, ViewFlags, ViewId, ViewShape};

use crate::config::RevealStyle;
use crate::context::{TransitionContext, ViewKey};
use crate::error::TransitionError;
use crate::tween::{Clock, Keyframe};

/// Which phase the next [`CircularReveal::animate`] call runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransitionMode {
    /// Grow the overlay from the anchor and fade the incoming view in.
    Present,
    /// Fade the outgoing view out and shrink the overlay into the anchor.
    Dismiss,
    /// Not configured. `animate` fails immediately.
    #[default]
    None,
}

/// Mode and anchor for one phase. The anchor is in the container's local space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TransitionConfig {
    /// Phase to run.
    pub mode: TransitionMode,
    /// Point the overlay grows from or shrinks into.
    pub anchor: Point,
}

/// Lifecycle of a [`CircularReveal`].
///
/// `Idle → Presenting → Presented → Dismissing → Done`. An interrupted present still
/// lands in `Presented`; an interrupted dismiss still lands in `Done`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TransitionState {
    /// No overlay exists yet.
    #[default]
    Idle,
    /// A present phase is in flight.
    Presenting,
    /// The overlay is mounted and holds the presented view.
    Presented,
    /// A dismiss phase is in flight.
    Dismissing,
    /// The overlay has been removed. Call [`CircularReveal::reset`] or present again.
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Present,
    Dismiss,
}

/// A request that passed validation.
#[derive(Clone, Copy, Debug)]
struct Target {
    phase: Phase,
    container: ViewId,
    content: ViewId,
    overlay: Option<ViewId>,
}

/// A phase between its setup and its completion.
#[derive(Clone, Copy, Debug)]
struct InFlight {
    phase: Phase,
    content: ViewId,
    clock: Clock,
    from: Keyframe,
    to: Keyframe,
}

/// Two-phase circular reveal transition.
///
/// One controller serves a whole modal lifecycle: configure and animate a present phase,
/// then configure and animate a dismiss phase. Each [`animate`](Self::animate) consumes
/// the configuration set by the preceding [`configure`](Self::configure), performs all
/// scene mutations up front, and then only interpolates as the host calls
/// [`tick`](Self::tick). Completion is reported through the context exactly once per
/// `animate` call.
///
/// ```
/// use core::time::Duration;
/// use kurbo::{Point, Rect};
/// use reveal_scene::{LocalView, Scene};
/// use reveal_transition::{
///     CircularReveal, RevealStyle, SceneContext, TransitionMode, ViewKey,
/// };
///
/// let mut scene = Scene::new();
/// let window = scene.insert(None, LocalView::with_frame(Rect::new(0.0, 0.0, 390.0, 844.0)));
/// let story = scene.insert(None, LocalView::with_frame(Rect::new(0.0, 0.0, 390.0, 844.0)));
/// let mut ctx = SceneContext::new(scene, window).with_view(ViewKey::To, story);
///
/// let mut reveal = CircularReveal::new(RevealStyle::new(Duration::from_millis(300)));
/// reveal.configure(TransitionMode::Present, Point::new(48.0, 152.0));
/// reveal.animate(&mut ctx);
/// assert!(reveal.overlay().is_some());
///
/// while reveal.tick(&mut ctx, Duration::from_millis(16)) {}
/// assert_eq!(ctx.completions(), &[true]);
/// ```
#[derive(Clone, Debug)]
pub struct CircularReveal {
    style: RevealStyle,
    pending: TransitionConfig,
    state: TransitionState,
    overlay: Option<ViewId>,
    in_flight: Option<InFlight>,
}

impl CircularReveal {
    /// Create a controller in [`TransitionState::Idle`].
    pub fn new(style: RevealStyle) -> Self {
        Self {
            style,
            pending: TransitionConfig::default(),
            state: TransitionState::Idle,
            overlay: None,
            in_flight: None,
        }
    }

    /// The construction parameters.
    pub fn style(&self) -> &RevealStyle {
        &self.style
    }

    /// Set the mode and anchor for the next [`animate`](Self::animate) call.
    ///
    /// The anchor is in the container's local space. Calling this again before
    /// `animate` replaces the previous values.
    pub fn configure(&mut self, mode: TransitionMode, anchor: Point) {
        self.pending = TransitionConfig { mode, anchor };
    }

    /// Configuration the next `animate` call will consume.
    pub fn pending(&self) -> TransitionConfig {
        self.pending
    }

    /// Length of each phase, whatever the mode.
    pub fn transition_duration(&self) -> Duration {
        self.style.duration
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TransitionState {
        self.state
    }

    /// Handle of the overlay circle while one exists.
    pub fn overlay(&self) -> Option<ViewId> {
        self.overlay
    }

    /// Returns `true` while a phase is in flight.
    pub fn is_animating(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Progress of the in-flight phase in `0.0..=1.0`.
    pub fn progress(&self) -> Option<f64> {
        self.in_flight.map(|f| f.clock.progress())
    }

    /// Start the configured phase.
    ///
    /// The request is validated first. If the new phase cannot start, the context receives
    /// [`transition_failed`](TransitionContext::transition_failed) and a single
    /// `complete_transition(false)`, nothing is mutated, and a phase already in flight
    /// keeps running. Otherwise a phase in flight is interrupted (its completion reports
    /// `false`) before the new one starts.
    pub fn animate<C: TransitionContext + ?Sized>(&mut self, ctx: &mut C) {
        let config = core::mem::take(&mut self.pending);
        let mut checked = self.check(ctx, config.mode);
        if checked.is_ok() && self.in_flight.is_some() {
            self.interrupt(ctx);
            checked = self.check(ctx, config.mode);
        }
        match checked {
            Ok(target) => {
                let in_flight = match target.phase {
                    Phase::Present => self.begin_present(ctx.scene_mut(), target, config.anchor),
                    Phase::Dismiss => self.begin_dismiss(ctx.scene_mut(), target, config.anchor),
                };
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    phase = ?in_flight.phase,
                    anchor_x = config.anchor.x,
                    anchor_y = config.anchor.y,
                    duration = ?self.style.duration,
                    "reveal phase started"
                );
                self.state = match in_flight.phase {
                    Phase::Present => TransitionState::Presenting,
                    Phase::Dismiss => TransitionState::Dismissing,
                };
                self.in_flight = Some(in_flight);
            }
            Err(error) => {
                #[cfg(feature = "tracing")]
                tracing::warn!(%error, state = ?self.state, "reveal phase failed to start");
                ctx.transition_failed(&error);
                ctx.complete_transition(false);
            }
        }
    }

    /// Advance the in-flight phase by `dt` and write the interpolated values.
    ///
    /// Returns `true` while the phase is still running. When it reaches its end the
    /// phase completes with `finished = true`. Does nothing when no phase is in flight.
    pub fn tick<C: TransitionContext + ?Sized>(&mut self, ctx: &mut C, dt: Duration) -> bool {
        let Some(in_flight) = self.in_flight.as_mut() else {
            return false;
        };
        let t = in_flight.clock.advance(dt);
        let values = in_flight.from.lerp(in_flight.to, t);
        let content = in_flight.content;
        let done = in_flight.clock.is_finished();
        self.apply(ctx.scene_mut(), content, values);
        if done {
            self.finish(ctx, true);
        }
        !done
    }

    /// Stop the in-flight phase where it is and complete it with `finished = false`.
    ///
    /// Interpolated values are left as they are. A dismiss phase still detaches the
    /// outgoing view and removes the overlay.
    pub fn interrupt<C: TransitionContext + ?Sized>(&mut self, ctx: &mut C) {
        if self.in_flight.is_some() {
            #[cfg(feature = "tracing")]
            tracing::debug!(progress = ?self.progress(), "reveal phase interrupted");
            self.finish(ctx, false);
        }
    }

    /// Return to [`TransitionState::Idle`] for a new lifecycle.
    ///
    /// Interrupts a phase in flight, removes a lingering overlay (its children are
    /// detached, not destroyed), and clears the pending configuration.
    pub fn reset<C: TransitionContext + ?Sized>(&mut self, ctx: &mut C) {
        self.interrupt(ctx);
        if let Some(overlay) = self.overlay.take() {
            remove_overlay(ctx.scene_mut(), overlay);
        }
        self.pending = TransitionConfig::default();
        self.state = TransitionState::Idle;
    }

    /// Validate a request against the state the controller would be in once the phase
    /// in flight (if any) is interrupted. Reads only.
    fn check<C: TransitionContext + ?Sized>(
        &self,
        ctx: &C,
        mode: TransitionMode,
    ) -> Result<Target, TransitionError> {
        let settled = match self.in_flight.map(|f| f.phase) {
            Some(Phase::Present) => TransitionState::Presented,
            Some(Phase::Dismiss) => TransitionState::Done,
            None => self.state,
        };
        let (phase, key) = match mode {
            TransitionMode::None => return Err(TransitionError::Unconfigured),
            TransitionMode::Present
                if matches!(settled, TransitionState::Idle | TransitionState::Done) =>
            {
                (Phase::Present, ViewKey::To)
            }
            TransitionMode::Dismiss if settled == TransitionState::Presented => {
                (Phase::Dismiss, ViewKey::From)
            }
            TransitionMode::Present | TransitionMode::Dismiss => {
                return Err(TransitionError::InvalidState {
                    mode,
                    state: self.state,
                });
            }
        };
        let container = live_container(ctx)?;
        let content = live_view(ctx, key)?;
        // Moving such a view under the overlay would make the container its own descendant.
        if ctx.scene().is_ancestor_or_self(content, container) {
            return Err(TransitionError::ContentContainsContainer(key));
        }
        let overlay = match phase {
            Phase::Present => None,
            Phase::Dismiss => Some(
                self.overlay
                    .filter(|o| ctx.scene().is_alive(*o))
                    .ok_or(TransitionError::MissingOverlay)?,
            ),
        };
        Ok(Target {
            phase,
            container,
            content,
            overlay,
        })
    }

    fn begin_present(&mut self, scene: &mut Scene, target: Target, anchor: Point) -> InFlight {
        let Target {
            container, content, ..
        } = target;
        let content_size = content_size(scene, content);
        let content_center = natural_center(scene, content, container);
        let bounds = overlay_bounds(content_size, anchor);
        let collapsed = Affine::scale(self.collapsed_scale(scene, bounds.size()));

        let overlay = scene.insert(
            Some(container),
            LocalView {
                size: bounds.size(),
                center: anchor,
                transform: collapsed,
                shape: ViewShape::Circle,
                fill: Some(self.style.fill),
                flags: ViewFlags::default() | ViewFlags::CLIPS_CHILDREN,
                ..Default::default()
            },
        );
        // Inside the overlay, offset from its center as far as the content's center is
        // from the anchor: at identity scale the content sits exactly where it belongs.
        scene.reparent(content, Some(overlay));
        scene.set_center(content, bounds.center() + (content_center - anchor));
        scene.set_opacity(content, 0.0);
        self.overlay = Some(overlay);

        InFlight {
            phase: Phase::Present,
            content,
            clock: Clock::new(self.style.duration),
            from: Keyframe {
                overlay_transform: collapsed,
                content_opacity: 0.0,
            },
            to: Keyframe {
                overlay_transform: Affine::IDENTITY,
                content_opacity: 1.0,
            },
        }
    }

    fn begin_dismiss(&mut self, scene: &mut Scene, target: Target, anchor: Point) -> InFlight {
        let Target {
            container,
            content,
            overlay,
            ..
        } = target;
        let content_size = content_size(scene, content);
        let bounds = overlay_bounds(content_size, anchor);
        let collapsed = Affine::scale(self.collapsed_scale(scene, bounds.size()));
        let from = Keyframe {
            overlay_transform: overlay
                .and_then(|o| scene.local(o))
                .map_or(Affine::IDENTITY, |o| o.transform),
            content_opacity: scene.local(content).map_or(1.0, |c| c.opacity),
        };

        // Lift the content out first so it keeps its place while the overlay moves.
        scene.mount(content, container);
        if let Some(overlay) = overlay {
            scene.set_size(overlay, bounds.size());
            scene.set_center(overlay, anchor);
        }

        InFlight {
            phase: Phase::Dismiss,
            content,
            clock: Clock::new(self.style.duration),
            from,
            to: Keyframe {
                overlay_transform: collapsed,
                content_opacity: 0.0,
            },
        }
    }

    fn collapsed_scale(&self, scene: &Scene, overlay: Size) -> f64 {
        let hint = match &self.style.snapshot {
            Some(snapshot) => snapshot.resolve(scene),
            None => None,
        };
        collapsed_scale(hint, overlay)
    }

    fn apply(&self, scene: &mut Scene, content: ViewId, values: Keyframe) {
        if let Some(overlay) = self.overlay {
            scene.set_transform(overlay, values.overlay_transform);
        }
        scene.set_opacity(content, values.content_opacity);
    }

    fn finish<C: TransitionContext + ?Sized>(&mut self, ctx: &mut C, finished: bool) {
        let Some(in_flight) = self.in_flight.take() else {
            return;
        };
        match in_flight.phase {
            Phase::Present => self.state = TransitionState::Presented,
            Phase::Dismiss => {
                let scene = ctx.scene_mut();
                scene.detach(in_flight.content);
                if let Some(overlay) = self.overlay.take() {
                    remove_overlay(scene, overlay);
                }
                self.state = TransitionState::Done;
            }
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(phase = ?in_flight.phase, finished, "reveal phase completed");
        ctx.complete_transition(finished);
    }
}

fn live_container<C: TransitionContext + ?Sized>(ctx: &C) -> Result<ViewId, TransitionError> {
    let container = ctx.container();
    if ctx.scene().is_alive(container) {
        Ok(container)
    } else {
        Err(TransitionError::MissingContainer)
    }
}

fn live_view<C: TransitionContext + ?Sized>(
    ctx: &C,
    key: ViewKey,
) -> Result<ViewId, TransitionError> {
    ctx.view(key)
        .filter(|v| ctx.scene().is_alive(*v))
        .ok_or(TransitionError::MissingView(key))
}

fn content_size(scene: &Scene, content: ViewId) -> Size {
    scene.local(content).map_or(Size::ZERO, |local| local.size)
}

/// Center of `content` in the container's space. A view with no parent is taken to be
/// positioned in the container's space already.
fn natural_center(scene: &Scene, content: ViewId, container: ViewId) -> Point {
    let center = scene.local(content).map_or(Point::ZERO, |local| local.center);
    match scene.parent(content) {
        Some(parent) if parent != container => scene
            .convert_point(center, parent, container)
            .unwrap_or(center),
        _ => center,
    }
}

fn remove_overlay(scene: &mut Scene, overlay: ViewId) {
    let children: Vec<ViewId> = scene.children(overlay).to_vec();
    for child in children {
        scene.detach(child);
    }
    scene.remove(overlay);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SnapshotHint;
    use crate::context::SceneContext;
    use kurbo::Rect;

    const FRAME: Duration = Duration::from_millis(250);
    const PHONE: Size = Size::new(390.0, 844.0);
    const AVATAR: Point = Point::new(48.0, 152.0);
    const CLOSE_BUTTON: Point = Point::new(195.0, 790.0);

    struct Fixture {
        ctx: SceneContext,
        window: ViewId,
        avatar: ViewId,
        story: ViewId,
    }

    fn fixture() -> Fixture {
        let mut scene = Scene::new();
        let window = scene.insert(None, LocalView::with_frame(PHONE.to_rect()));
        let avatar = scene.insert(
            Some(window),
            LocalView {
                shape: ViewShape::Circle,
                ..LocalView::with_frame(Rect::new(16.0, 120.0, 80.0, 184.0))
            },
        );
        let story = scene.insert(None, LocalView::with_frame(PHONE.to_rect()));
        let ctx = SceneContext::new(scene, window).with_view(ViewKey::To, story);
        Fixture {
            ctx,
            window,
            avatar,
            story,
        }
    }

    fn reveal() -> CircularReveal {
        CircularReveal::new(RevealStyle::new(Duration::from_secs(1)))
    }

    fn run_to_end(reveal: &mut CircularReveal, ctx: &mut SceneContext) {
        let mut frames = 0;
        while reveal.tick(ctx, FRAME) {
            frames += 1;
            assert!(frames < 100, "phase never finished");
        }
    }

    fn presented(reveal: &mut CircularReveal, f: &mut Fixture) -> ViewId {
        reveal.configure(TransitionMode::Present, AVATAR);
        reveal.animate(&mut f.ctx);
        run_to_end(reveal, &mut f.ctx);
        f.ctx.set_view(ViewKey::To, None);
        f.ctx.set_view(ViewKey::From, Some(f.story));
        reveal.overlay().expect("present leaves the overlay mounted")
    }

    fn world_center(ctx: &SceneContext, view: ViewId) -> Point {
        let size = ctx.scene().local(view).unwrap().size;
        ctx.scene().world_transform(view).unwrap() * size.to_rect().center()
    }

    fn near(a: Point, b: Point) -> bool {
        let d = a - b;
        d.x * d.x + d.y * d.y < 1e-12
    }

    #[test]
    fn present_mounts_collapsed_overlay_at_anchor() {
        let mut f = fixture();
        let mut reveal = reveal();
        reveal.configure(TransitionMode::Present, AVATAR);
        reveal.animate(&mut f.ctx);

        assert_eq!(reveal.state(), TransitionState::Presenting);
        assert!(f.ctx.completions().is_empty(), "completion waits for the animation");
        let overlay = reveal.overlay().unwrap();
        let scene = f.ctx.scene();
        let local = scene.local(overlay).unwrap();
        assert_eq!(local.center, AVATAR);
        assert_eq!(local.size, overlay_bounds(PHONE, AVATAR).size());
        assert_eq!(local.transform, Affine::scale(reveal_geometry::MIN_COLLAPSED_SCALE));
        assert!(local.fill.is_some());
        assert!(local.flags.contains(ViewFlags::CLIPS_CHILDREN));
        assert_eq!(scene.corner_radius(overlay), Some(local.size.width / 2.0));
        assert_eq!(scene.parent(overlay), Some(f.window));
        assert_eq!(scene.parent(f.story), Some(overlay));
        assert_eq!(scene.local(f.story).unwrap().opacity, 0.0);
    }

    #[test]
    fn full_lifecycle() {
        let mut f = fixture();
        let views_before = f.ctx.scene().len();
        let mut reveal = reveal();
        let overlay = presented(&mut reveal, &mut f);

        assert_eq!(f.ctx.completions(), &[true]);
        assert_eq!(reveal.state(), TransitionState::Presented);
        assert!(!reveal.is_animating());
        assert_eq!(f.ctx.scene().local(overlay).unwrap().transform, Affine::IDENTITY);
        assert_eq!(f.ctx.scene().local(f.story).unwrap().opacity, 1.0);
        assert!(
            near(world_center(&f.ctx, f.story), Point::new(195.0, 422.0)),
            "fully grown overlay shows the story where it was laid out"
        );

        reveal.configure(TransitionMode::Dismiss, CLOSE_BUTTON);
        reveal.animate(&mut f.ctx);
        assert_eq!(reveal.state(), TransitionState::Dismissing);
        assert_eq!(reveal.overlay(), Some(overlay), "dismiss reuses the overlay");
        let scene = f.ctx.scene();
        assert_eq!(scene.parent(f.story), Some(f.window));
        assert_eq!(scene.children(f.window).last(), Some(&f.story), "story on top");
        assert!(near(world_center(&f.ctx, f.story), Point::new(195.0, 422.0)));
        let local = scene.local(overlay).unwrap();
        assert_eq!(local.center, CLOSE_BUTTON);
        assert_eq!(local.size, overlay_bounds(PHONE, CLOSE_BUTTON).size());
        assert_eq!(scene.corner_radius(overlay), Some(local.size.width / 2.0));

        run_to_end(&mut reveal, &mut f.ctx);
        assert_eq!(f.ctx.completions(), &[true, true]);
        assert_eq!(reveal.state(), TransitionState::Done);
        assert_eq!(reveal.overlay(), None);
        let scene = f.ctx.scene();
        assert!(!scene.is_alive(overlay));
        assert!(scene.is_alive(f.story), "the host owns the story view");
        assert_eq!(scene.parent(f.story), None);
        assert_eq!(scene.local(f.story).unwrap().opacity, 0.0);
        assert_eq!(scene.len(), views_before);
    }

    #[test]
    fn halfway_values_are_interpolated() {
        let mut f = fixture();
        let mut reveal = reveal();
        reveal.configure(TransitionMode::Present, AVATAR);
        reveal.animate(&mut f.ctx);
        assert!(reveal.tick(&mut f.ctx, Duration::from_millis(500)));
        assert_eq!(reveal.progress(), Some(0.5));
        let overlay = reveal.overlay().unwrap();
        let scale = f.ctx.scene().local(overlay).unwrap().transform.as_coeffs()[0];
        assert!(scale > 0.5 && scale < 0.501);
        assert_eq!(f.ctx.scene().local(f.story).unwrap().opacity, 0.5);
    }

    #[test]
    fn unconfigured_animate_fails_without_mutation() {
        let mut f = fixture();
        let views_before = f.ctx.scene().len();
        let mut reveal = reveal();
        reveal.animate(&mut f.ctx);

        assert_eq!(f.ctx.completions(), &[false]);
        assert_eq!(f.ctx.failures(), &[TransitionError::Unconfigured]);
        assert_eq!(reveal.state(), TransitionState::Idle);
        assert_eq!(reveal.overlay(), None);
        assert_eq!(f.ctx.scene().len(), views_before);
        assert_eq!(f.ctx.scene().parent(f.story), None);
        assert_eq!(f.ctx.scene().local(f.story).unwrap().opacity, 1.0);

        reveal.configure(TransitionMode::None, AVATAR);
        reveal.animate(&mut f.ctx);
        assert_eq!(f.ctx.completions(), &[false, false]);
    }

    #[test]
    fn animate_consumes_the_configuration() {
        let mut f = fixture();
        let mut reveal = reveal();
        reveal.configure(TransitionMode::Present, AVATAR);
        assert_eq!(reveal.pending().mode, TransitionMode::Present);
        reveal.animate(&mut f.ctx);
        assert_eq!(reveal.pending(), TransitionConfig::default());
        run_to_end(&mut reveal, &mut f.ctx);

        reveal.animate(&mut f.ctx);
        assert_eq!(f.ctx.completions(), &[true, false]);
        assert_eq!(f.ctx.failures(), &[TransitionError::Unconfigured]);
        assert_eq!(reveal.state(), TransitionState::Presented);
    }

    #[test]
    fn reconfigure_replaces_pending_values() {
        let mut reveal = reveal();
        reveal.configure(TransitionMode::Present, AVATAR);
        reveal.configure(TransitionMode::Dismiss, CLOSE_BUTTON);
        assert_eq!(
            reveal.pending(),
            TransitionConfig {
                mode: TransitionMode::Dismiss,
                anchor: CLOSE_BUTTON,
            }
        );
    }

    #[test]
    fn duration_is_the_same_for_every_mode() {
        let mut reveal = reveal();
        let idle = reveal.transition_duration();
        reveal.configure(TransitionMode::Present, AVATAR);
        assert_eq!(reveal.transition_duration(), idle);
        reveal.configure(TransitionMode::Dismiss, AVATAR);
        assert_eq!(reveal.transition_duration(), idle);
        assert_eq!(idle, Duration::from_secs(1));
    }

    #[test]
    fn missing_incoming_view_fails_without_mutation() {
        let mut f = fixture();
        f.ctx.set_view(ViewKey::To, None);
        let views_before = f.ctx.scene().len();
        let mut reveal = reveal();
        reveal.configure(TransitionMode::Present, AVATAR);
        reveal.animate(&mut f.ctx);

        assert_eq!(f.ctx.completions(), &[false]);
        assert_eq!(f.ctx.failures(), &[TransitionError::MissingView(ViewKey::To)]);
        assert_eq!(reveal.overlay(), None);
        assert_eq!(f.ctx.scene().len(), views_before);
    }

    #[test]
    fn stale_handles_are_reported() {
        let mut f = fixture();
        f.ctx.scene_mut().remove(f.story);
        let mut reveal = reveal();
        reveal.configure(TransitionMode::Present, AVATAR);
        reveal.animate(&mut f.ctx);
        assert_eq!(f.ctx.failures(), &[TransitionError::MissingView(ViewKey::To)]);

        let mut g = fixture();
        g.ctx.scene_mut().remove(g.window);
        reveal.configure(TransitionMode::Present, AVATAR);
        reveal.animate(&mut g.ctx);
        assert_eq!(g.ctx.failures(), &[TransitionError::MissingContainer]);
        assert_eq!(g.ctx.completions(), &[false]);
    }

    #[test]
    fn dismiss_requires_a_presented_overlay() {
        let mut f = fixture();
        f.ctx.set_view(ViewKey::From, Some(f.story));
        let mut reveal = reveal();
        reveal.configure(TransitionMode::Dismiss, CLOSE_BUTTON);
        reveal.animate(&mut f.ctx);
        assert_eq!(
            f.ctx.failures(),
            &[TransitionError::InvalidState {
                mode: TransitionMode::Dismiss,
                state: TransitionState::Idle,
            }]
        );
        assert_eq!(f.ctx.completions(), &[false]);
        assert_eq!(f.ctx.scene().parent(f.story), None);
    }

    #[test]
    fn dismiss_without_outgoing_view_keeps_the_overlay() {
        let mut f = fixture();
        let mut reveal = reveal();
        let overlay = presented(&mut reveal, &mut f);
        f.ctx.set_view(ViewKey::From, None);
        reveal.configure(TransitionMode::Dismiss, CLOSE_BUTTON);
        reveal.animate(&mut f.ctx);

        assert_eq!(f.ctx.failures(), &[TransitionError::MissingView(ViewKey::From)]);
        assert_eq!(f.ctx.completions(), &[true, false]);
        assert_eq!(reveal.state(), TransitionState::Presented);
        assert_eq!(reveal.overlay(), Some(overlay));
        assert_eq!(f.ctx.scene().local(overlay).unwrap().center, AVATAR);
    }

    #[test]
    fn removed_overlay_cannot_be_dismissed() {
        let mut f = fixture();
        let mut reveal = reveal();
        let overlay = presented(&mut reveal, &mut f);
        f.ctx.scene_mut().detach(f.story);
        f.ctx.scene_mut().remove(overlay);
        reveal.configure(TransitionMode::Dismiss, CLOSE_BUTTON);
        reveal.animate(&mut f.ctx);
        assert_eq!(f.ctx.failures(), &[TransitionError::MissingOverlay]);
    }

    #[test]
    fn present_twice_is_rejected() {
        let mut f = fixture();
        let mut reveal = reveal();
        let overlay = presented(&mut reveal, &mut f);
        let views_before = f.ctx.scene().len();
        f.ctx.set_view(ViewKey::To, Some(f.story));
        reveal.configure(TransitionMode::Present, CLOSE_BUTTON);
        reveal.animate(&mut f.ctx);

        assert_eq!(
            f.ctx.failures(),
            &[TransitionError::InvalidState {
                mode: TransitionMode::Present,
                state: TransitionState::Presented,
            }]
        );
        assert_eq!(reveal.overlay(), Some(overlay));
        assert_eq!(f.ctx.scene().len(), views_before);
    }

    #[test]
    fn interrupted_present_still_allows_dismiss() {
        let mut f = fixture();
        let mut reveal = reveal();
        reveal.configure(TransitionMode::Present, AVATAR);
        reveal.animate(&mut f.ctx);
        assert!(reveal.tick(&mut f.ctx, Duration::from_millis(500)));
        reveal.interrupt(&mut f.ctx);

        assert_eq!(f.ctx.completions(), &[false]);
        assert_eq!(reveal.state(), TransitionState::Presented);
        let overlay = reveal.overlay().unwrap();
        let half = f.ctx.scene().local(overlay).unwrap().transform;
        assert_ne!(half, Affine::IDENTITY, "interrupt leaves values where they are");
        assert_eq!(f.ctx.scene().local(f.story).unwrap().opacity, 0.5);

        reveal.interrupt(&mut f.ctx);
        assert_eq!(f.ctx.completions(), &[false], "nothing left to interrupt");

        f.ctx.set_view(ViewKey::From, Some(f.story));
        reveal.configure(TransitionMode::Dismiss, CLOSE_BUTTON);
        reveal.animate(&mut f.ctx);
        assert_eq!(
            f.ctx.scene().local(overlay).unwrap().transform,
            half,
            "dismiss starts from the current scale"
        );
        run_to_end(&mut reveal, &mut f.ctx);
        assert_eq!(f.ctx.completions(), &[false, true]);
        assert_eq!(reveal.overlay(), None);
    }

    #[test]
    fn interrupted_dismiss_still_tears_down() {
        let mut f = fixture();
        let mut reveal = reveal();
        let overlay = presented(&mut reveal, &mut f);
        reveal.configure(TransitionMode::Dismiss, CLOSE_BUTTON);
        reveal.animate(&mut f.ctx);
        assert!(reveal.tick(&mut f.ctx, FRAME));
        reveal.interrupt(&mut f.ctx);

        assert_eq!(f.ctx.completions(), &[true, false]);
        assert_eq!(reveal.state(), TransitionState::Done);
        assert!(!f.ctx.scene().is_alive(overlay));
        assert_eq!(f.ctx.scene().parent(f.story), None);
        assert_eq!(f.ctx.scene().local(f.story).unwrap().opacity, 0.75);
    }

    #[test]
    fn animate_while_in_flight_interrupts_first() {
        let mut f = fixture();
        let mut reveal = reveal();
        reveal.configure(TransitionMode::Present, AVATAR);
        reveal.animate(&mut f.ctx);
        assert!(reveal.tick(&mut f.ctx, FRAME));

        f.ctx.set_view(ViewKey::From, Some(f.story));
        reveal.configure(TransitionMode::Dismiss, CLOSE_BUTTON);
        reveal.animate(&mut f.ctx);
        assert_eq!(f.ctx.completions(), &[false]);
        assert_eq!(reveal.state(), TransitionState::Dismissing);
        run_to_end(&mut reveal, &mut f.ctx);
        assert_eq!(f.ctx.completions(), &[false, true]);
    }

    #[test]
    fn tick_without_a_phase_does_nothing() {
        let mut f = fixture();
        let mut reveal = reveal();
        assert!(!reveal.tick(&mut f.ctx, FRAME));
        assert!(f.ctx.completions().is_empty());
        assert_eq!(reveal.progress(), None);
    }

    #[test]
    fn zero_duration_completes_on_first_tick() {
        let mut f = fixture();
        let mut reveal = CircularReveal::new(RevealStyle::new(Duration::ZERO));
        reveal.configure(TransitionMode::Present, AVATAR);
        reveal.animate(&mut f.ctx);
        assert!(f.ctx.completions().is_empty());
        assert!(!reveal.tick(&mut f.ctx, Duration::ZERO));
        assert_eq!(f.ctx.completions(), &[true]);
        let overlay = reveal.overlay().unwrap();
        assert_eq!(f.ctx.scene().local(overlay).unwrap().transform, Affine::IDENTITY);
    }

    #[test]
    fn snapshot_view_sets_collapsed_scale() {
        let mut f = fixture();
        let style = RevealStyle::default().with_snapshot(SnapshotHint::View(f.avatar));
        let mut reveal = CircularReveal::new(style);
        reveal.configure(TransitionMode::Present, AVATAR);
        reveal.animate(&mut f.ctx);

        let overlay = reveal.overlay().unwrap();
        let bounds = overlay_bounds(PHONE, AVATAR);
        let expected = collapsed_scale(Some(Size::new(64.0, 64.0)), bounds.size());
        assert!(expected > reveal_geometry::MIN_COLLAPSED_SCALE);
        assert_eq!(
            f.ctx.scene().local(overlay).unwrap().transform,
            Affine::scale(expected)
        );
    }

    #[test]
    fn snapshot_size_sets_collapsed_scale_for_dismiss() {
        let mut f = fixture();
        let hint = Size::new(40.0, 40.0);
        let style = RevealStyle::default().with_snapshot(SnapshotHint::Size(hint));
        let mut reveal = CircularReveal::new(style);
        let overlay = presented(&mut reveal, &mut f);
        reveal.configure(TransitionMode::Dismiss, CLOSE_BUTTON);
        reveal.animate(&mut f.ctx);
        // One frame short of the end the overlay is still there to inspect.
        assert!(reveal.tick(&mut f.ctx, Duration::from_millis(999)));
        let expected = collapsed_scale(Some(hint), overlay_bounds(PHONE, CLOSE_BUTTON).size());
        let scale = f.ctx.scene().local(overlay).unwrap().transform.as_coeffs()[0];
        assert!(scale - expected < 1e-3 && expected - scale < 1e-3);
    }

    #[test]
    fn dead_snapshot_falls_back_to_minimum() {
        let mut f = fixture();
        let style = RevealStyle::default().with_snapshot(SnapshotHint::View(f.avatar));
        f.ctx.scene_mut().remove(f.avatar);
        let mut reveal = CircularReveal::new(style);
        reveal.configure(TransitionMode::Present, AVATAR);
        reveal.animate(&mut f.ctx);
        let overlay = reveal.overlay().unwrap();
        assert_eq!(
            f.ctx.scene().local(overlay).unwrap().transform,
            Affine::scale(reveal_geometry::MIN_COLLAPSED_SCALE)
        );
    }

    #[test]
    fn nested_content_keeps_its_place() {
        let mut f = fixture();
        let sheet = f.ctx.scene_mut().insert(
            Some(f.window),
            LocalView::with_frame(Rect::new(0.0, 100.0, 390.0, 844.0)),
        );
        let card = f
            .ctx
            .scene_mut()
            .insert(Some(sheet), LocalView::with_frame(Rect::new(20.0, 20.0, 120.0, 220.0)));
        f.ctx.set_view(ViewKey::To, Some(card));
        let before = world_center(&f.ctx, card);

        let mut reveal = reveal();
        reveal.configure(TransitionMode::Present, AVATAR);
        reveal.animate(&mut f.ctx);
        run_to_end(&mut reveal, &mut f.ctx);
        assert!(near(world_center(&f.ctx, card), before));
        assert_eq!(before, Point::new(70.0, 220.0));
    }

    #[test]
    fn reset_starts_a_new_lifecycle() {
        let mut f = fixture();
        let mut reveal = reveal();
        let overlay = presented(&mut reveal, &mut f);
        reveal.configure(TransitionMode::Dismiss, CLOSE_BUTTON);
        reveal.reset(&mut f.ctx);

        assert_eq!(reveal.state(), TransitionState::Idle);
        assert_eq!(reveal.pending(), TransitionConfig::default());
        assert!(!f.ctx.scene().is_alive(overlay));
        assert!(f.ctx.scene().is_alive(f.story));
        assert_eq!(f.ctx.scene().parent(f.story), None);
        assert_eq!(f.ctx.completions(), &[true], "reset of a settled phase reports nothing");

        f.ctx.set_view(ViewKey::To, Some(f.story));
        reveal.configure(TransitionMode::Present, CLOSE_BUTTON);
        reveal.animate(&mut f.ctx);
        assert_eq!(reveal.state(), TransitionState::Presenting);
        assert_ne!(reveal.overlay(), Some(overlay));
    }

    #[test]
    fn present_again_after_done() {
        let mut f = fixture();
        let mut reveal = reveal();
        presented(&mut reveal, &mut f);
        reveal.configure(TransitionMode::Dismiss, CLOSE_BUTTON);
        reveal.animate(&mut f.ctx);
        run_to_end(&mut reveal, &mut f.ctx);

        f.ctx.set_view(ViewKey::To, Some(f.story));
        reveal.configure(TransitionMode::Present, AVATAR);
        reveal.animate(&mut f.ctx);
        run_to_end(&mut reveal, &mut f.ctx);
        assert_eq!(f.ctx.completions(), &[true, true, true]);
        assert_eq!(f.ctx.scene().local(f.story).unwrap().opacity, 1.0);
    }

    #[test]
    fn unconfigured_animate_leaves_running_phase_alone() {
        let mut f = fixture();
        let mut reveal = reveal();
        let overlay = presented(&mut reveal, &mut f);
        reveal.configure(TransitionMode::Dismiss, CLOSE_BUTTON);
        reveal.animate(&mut f.ctx);
        assert!(reveal.tick(&mut f.ctx, FRAME));
        let views_before = f.ctx.scene().len();

        reveal.animate(&mut f.ctx);
        assert_eq!(f.ctx.completions(), &[true, false], "one failed completion only");
        assert_eq!(f.ctx.failures(), &[TransitionError::Unconfigured]);
        assert_eq!(reveal.state(), TransitionState::Dismissing);
        assert!(reveal.is_animating());
        assert_eq!(reveal.overlay(), Some(overlay));
        assert!(f.ctx.scene().is_alive(overlay));
        assert_eq!(f.ctx.scene().parent(f.story), Some(f.window));
        assert_eq!(f.ctx.scene().len(), views_before);

        run_to_end(&mut reveal, &mut f.ctx);
        assert_eq!(f.ctx.completions(), &[true, false, true]);
        assert_eq!(reveal.overlay(), None);
    }

    #[test]
    fn rejected_request_does_not_interrupt() {
        let mut f = fixture();
        let mut reveal = reveal();
        reveal.configure(TransitionMode::Present, AVATAR);
        reveal.animate(&mut f.ctx);
        assert!(reveal.tick(&mut f.ctx, FRAME));

        reveal.configure(TransitionMode::Present, CLOSE_BUTTON);
        reveal.animate(&mut f.ctx);
        assert_eq!(
            f.ctx.failures(),
            &[TransitionError::InvalidState {
                mode: TransitionMode::Present,
                state: TransitionState::Presenting,
            }]
        );
        assert_eq!(f.ctx.completions(), &[false]);
        assert_eq!(reveal.progress(), Some(0.25), "present keeps its progress");
        assert_eq!(f.ctx.scene().local(f.story).unwrap().opacity, 0.25);

        // Dismiss with no outgoing view fails before the present is cut short.
        reveal.configure(TransitionMode::Dismiss, CLOSE_BUTTON);
        reveal.animate(&mut f.ctx);
        assert_eq!(f.ctx.completions(), &[false, false]);
        assert_eq!(reveal.state(), TransitionState::Presenting);

        run_to_end(&mut reveal, &mut f.ctx);
        assert_eq!(f.ctx.completions(), &[false, false, true]);
        assert_eq!(reveal.state(), TransitionState::Presented);
    }

    #[test]
    fn present_while_dismissing_restarts() {
        let mut f = fixture();
        let mut reveal = reveal();
        let old = presented(&mut reveal, &mut f);
        reveal.configure(TransitionMode::Dismiss, CLOSE_BUTTON);
        reveal.animate(&mut f.ctx);
        assert!(reveal.tick(&mut f.ctx, FRAME));

        f.ctx.set_view(ViewKey::To, Some(f.story));
        reveal.configure(TransitionMode::Present, AVATAR);
        reveal.animate(&mut f.ctx);
        assert_eq!(f.ctx.completions(), &[true, false]);
        assert_eq!(reveal.state(), TransitionState::Presenting);
        assert!(!f.ctx.scene().is_alive(old));
        let overlay = reveal.overlay().unwrap();
        assert_eq!(f.ctx.scene().parent(f.story), Some(overlay));
    }

    #[test]
    fn container_cannot_be_presented() {
        let mut f = fixture();
        let views_before = f.ctx.scene().len();
        let window_center = f.ctx.scene().local(f.window).unwrap().center;
        f.ctx.set_view(ViewKey::To, Some(f.window));
        let mut reveal = reveal();
        reveal.configure(TransitionMode::Present, AVATAR);
        reveal.animate(&mut f.ctx);

        assert_eq!(f.ctx.completions(), &[false]);
        assert_eq!(
            f.ctx.failures(),
            &[TransitionError::ContentContainsContainer(ViewKey::To)]
        );
        assert_eq!(reveal.state(), TransitionState::Idle);
        assert_eq!(reveal.overlay(), None);
        let scene = f.ctx.scene();
        assert_eq!(scene.len(), views_before);
        assert_eq!(scene.local(f.window).unwrap().center, window_center);
        assert_eq!(scene.local(f.window).unwrap().opacity, 1.0);
    }

    #[test]
    fn ancestor_of_container_cannot_be_presented() {
        let f = fixture();
        let scene = f.ctx.into_scene();
        let mut ctx = SceneContext::new(scene, f.avatar).with_view(ViewKey::To, f.window);
        let mut reveal = reveal();
        reveal.configure(TransitionMode::Present, Point::new(32.0, 32.0));
        reveal.animate(&mut ctx);

        assert_eq!(ctx.failures(), &[TransitionError::ContentContainsContainer(ViewKey::To)]);
        assert_eq!(ctx.completions(), &[false]);
        assert!(ctx.scene().children(f.avatar).is_empty(), "no overlay inserted");
    }

    #[test]
    fn container_cannot_be_dismissed() {
        let mut f = fixture();
        let mut reveal = reveal();
        let overlay = presented(&mut reveal, &mut f);
        f.ctx.set_view(ViewKey::From, Some(f.window));
        reveal.configure(TransitionMode::Dismiss, CLOSE_BUTTON);
        reveal.animate(&mut f.ctx);

        assert_eq!(
            f.ctx.failures(),
            &[TransitionError::ContentContainsContainer(ViewKey::From)]
        );
        assert_eq!(f.ctx.completions(), &[true, false]);
        assert_eq!(reveal.state(), TransitionState::Presented);
        assert_eq!(f.ctx.scene().local(overlay).unwrap().center, AVATAR);
    }
}
