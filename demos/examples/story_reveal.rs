// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Story reveal.
//!
//! A profile screen with a header, a horizontally scrolling row of story avatars, and a
//! grid of posts. Tapping an avatar presents its story behind a circle that grows out of
//! the avatar. Tapping the story's close control shrinks the circle back into the avatar,
//! after which the avatar is drawn as watched.
//!
//! Run:
//! - `cargo run -p reveal_demos --example story_reveal`
//! - `RUST_LOG=reveal_transition=debug cargo run -p reveal_demos --example story_reveal`

use std::collections::HashSet;
use std::time::Duration;

use kurbo::{Point, Rect, Size};
use peniko::Color;
use peniko::color::palette;
use reveal_scene::{LocalView, QueryFilter, Scene, ViewFlags, ViewId, ViewShape};
use reveal_transition::{
    CircularReveal, RevealStyle, SceneContext, SnapshotHint, TransitionContext, TransitionMode,
    ViewKey,
};
use tracing_subscriber::EnvFilter;

const SCREEN: Size = Size::new(390.0, 844.0);
// Status bar plus navigation bar.
const TOP_BAR: f64 = 91.0;
const BOTTOM_SAFE_AREA: f64 = 34.0;

const PROFILE_HEIGHT: f64 = 300.0;
const STORY_COUNT: usize = 9;
const AVATAR_SIDE: f64 = 74.0;
const AVATAR_SPACING: f64 = 8.0;
const ROW_INSET: f64 = 16.0;
const ROW_HEIGHT: f64 = 90.0;
// Gap between an avatar's border and its picture.
const PICTURE_INSET: f64 = 4.0;

const POST_COUNT: usize = 10;
const POSTS_PER_ROW: usize = 3;
const POST_SPACING: f64 = 2.0;

const CLOSE_SIDE: f64 = 40.0;
const FRAME: Duration = Duration::from_millis(16);

const STORY_BACKGROUND: Color = palette::css::YELLOW;

/// One avatar in the stories row.
struct Avatar {
    /// Outer circle, filled with the border color.
    ring: ViewId,
    /// Background circle inset by the border width.
    gap: ViewId,
    /// The picture, inset from the ring.
    picture: ViewId,
}

/// Host side of the demo: the profile screen and its bookkeeping.
struct ProfileScreen {
    ctx: SceneContext,
    strip: ViewId,
    strip_width: f64,
    avatars: Vec<Avatar>,
    watched: HashSet<usize>,
    scroll_x: f64,
}

/// A story screen presented over the profile.
struct StoryScreen {
    root: ViewId,
    close: ViewId,
}

impl ProfileScreen {
    fn build() -> Self {
        let mut scene = Scene::new();
        let window = scene.insert(None, LocalView::with_frame(SCREEN.to_rect()));
        let content = scene.insert(
            Some(window),
            LocalView {
                fill: Some(palette::css::WHITE),
                ..LocalView::with_frame(Rect::new(0.0, TOP_BAR, SCREEN.width, SCREEN.height))
            },
        );

        scene.insert(
            Some(content),
            LocalView {
                fill: Some(palette::css::RED),
                ..LocalView::with_frame(Rect::new(0.0, 0.0, SCREEN.width, PROFILE_HEIGHT))
            },
        );

        // The row clips; the strip inside it is wider than the screen and scrolls.
        let row = scene.insert(
            Some(content),
            LocalView {
                flags: ViewFlags::default() | ViewFlags::CLIPS_CHILDREN,
                ..LocalView::with_frame(Rect::new(
                    0.0,
                    PROFILE_HEIGHT,
                    SCREEN.width,
                    PROFILE_HEIGHT + ROW_HEIGHT,
                ))
            },
        );
        let strip_width = AVATAR_SIDE * STORY_COUNT as f64
            + AVATAR_SPACING * (STORY_COUNT - 1) as f64
            + ROW_INSET * 2.0;
        let strip = scene.insert(
            Some(row),
            LocalView::with_frame(Rect::new(0.0, 0.0, strip_width, ROW_HEIGHT)),
        );

        let avatars = (0..STORY_COUNT)
            .map(|i| {
                let x = ROW_INSET + i as f64 * (AVATAR_SIDE + AVATAR_SPACING);
                let y = (ROW_HEIGHT - AVATAR_SIDE) / 2.0;
                let frame = Rect::new(x, y, x + AVATAR_SIDE, y + AVATAR_SIDE);
                let ring = scene.insert(Some(strip), circle(frame, palette::css::RED));
                let gap = scene.insert(
                    Some(ring),
                    circle(avatar_rect(border_width(false)), palette::css::WHITE),
                );
                let picture = scene.insert(
                    Some(ring),
                    circle(avatar_rect(PICTURE_INSET), palette::css::RED),
                );
                Avatar { ring, gap, picture }
            })
            .collect();

        let side =
            (SCREEN.width - POST_SPACING * (POSTS_PER_ROW - 1) as f64) / POSTS_PER_ROW as f64;
        for i in 0..POST_COUNT {
            let (row_index, column) = (i / POSTS_PER_ROW, i % POSTS_PER_ROW);
            let origin = Point::new(
                column as f64 * (side + POST_SPACING),
                PROFILE_HEIGHT + ROW_HEIGHT + row_index as f64 * (side + POST_SPACING),
            );
            scene.insert(
                Some(content),
                LocalView {
                    fill: Some(palette::css::RED),
                    ..LocalView::with_frame(Rect::from_origin_size(origin, (side, side)))
                },
            );
        }
        let _ = scene.commit();

        Self {
            ctx: SceneContext::new(scene, window),
            strip,
            strip_width,
            avatars,
            watched: HashSet::new(),
            scroll_x: 0.0,
        }
    }

    fn scene(&mut self) -> &mut Scene {
        self.ctx.scene_mut()
    }

    /// Scroll the stories row by `dx`, clamped to the strip.
    fn scroll_stories(&mut self, dx: f64) {
        let max = (self.strip_width - SCREEN.width).max(0.0);
        self.scroll_x = (self.scroll_x + dx).clamp(0.0, max);
        let center = Point::new(self.strip_width / 2.0 - self.scroll_x, ROW_HEIGHT / 2.0);
        let strip = self.strip;
        self.scene().set_center(strip, center);
    }

    /// Center of an avatar in window coordinates, wherever the row is scrolled to.
    fn avatar_anchor(&self, index: usize) -> Option<Point> {
        let ring = self.avatars.get(index)?.ring;
        let center = Point::new(AVATAR_SIDE / 2.0, AVATAR_SIDE / 2.0);
        self.ctx
            .scene()
            .convert_point(center, ring, self.ctx.container())
    }

    /// Index of the avatar under a window point.
    fn avatar_at(&self, pt: Point) -> Option<usize> {
        let filter = QueryFilter {
            visible_only: true,
            pickable_only: true,
        };
        let hit = self.ctx.scene().hit_test_point(pt, filter)?;
        self.avatars
            .iter()
            .position(|avatar| hit.path.contains(&avatar.ring))
    }

    /// Redraw an avatar as watched: thin gray border, dimmed.
    fn mark_watched(&mut self, index: usize) {
        self.watched.insert(index);
        let Some(avatar) = self.avatars.get(index) else {
            return;
        };
        let (ring, gap) = (avatar.ring, avatar.gap);
        let border = border_width(true);
        let scene = self.scene();
        scene.set_fill(ring, Some(palette::css::GRAY));
        scene.set_opacity(ring, 0.75);
        let inner = avatar_rect(border);
        scene.set_size(gap, inner.size());
        scene.set_center(gap, inner.center());
    }

    /// Build the story screen as a detached view, ready to be presented.
    fn build_story(&mut self) -> StoryScreen {
        let scene = self.scene();
        let root = scene.insert(
            None,
            LocalView {
                fill: Some(STORY_BACKGROUND),
                ..LocalView::with_frame(SCREEN.to_rect())
            },
        );
        let bottom = SCREEN.height - BOTTOM_SAFE_AREA;
        let close = scene.insert(
            Some(root),
            circle(
                Rect::new(
                    (SCREEN.width - CLOSE_SIDE) / 2.0,
                    bottom - CLOSE_SIDE,
                    (SCREEN.width + CLOSE_SIDE) / 2.0,
                    bottom,
                ),
                palette::css::RED,
            ),
        );
        StoryScreen { root, close }
    }
}

fn border_width(watched: bool) -> f64 {
    if watched { 1.0 } else { 2.0 }
}

fn avatar_rect(inset: f64) -> Rect {
    Rect::new(0.0, 0.0, AVATAR_SIDE, AVATAR_SIDE).inset(-inset)
}

fn circle(frame: Rect, fill: Color) -> LocalView {
    LocalView {
        shape: ViewShape::Circle,
        fill: Some(fill),
        ..LocalView::with_frame(frame)
    }
}

/// Tick until the phase completes, reporting progress now and then.
fn run_phase(reveal: &mut CircularReveal, ctx: &mut SceneContext, label: &str) -> bool {
    let mut frames = 0_u32;
    while reveal.tick(ctx, FRAME) {
        frames += 1;
        let damage = ctx.scene_mut().commit();
        if frames.is_multiple_of(15) {
            println!(
                "{label}: frame {frames:>3}, progress {:.2}, {} dirty rects",
                reveal.progress().unwrap_or(1.0),
                damage.dirty_rects.len()
            );
        }
    }
    let _ = ctx.scene_mut().commit();
    let finished = ctx.take_completions();
    println!("{label}: completed after {} frames: {finished:?}", frames + 1);
    finished == [true]
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut screen = ProfileScreen::build();
    screen.scroll_stories(120.0);

    // The user taps the fourth avatar.
    let selected = 3;
    let tap = screen.avatar_anchor(selected).expect("avatar is in the scene");
    let index = screen.avatar_at(tap).expect("tap lands on an avatar");
    assert_eq!(index, selected);
    println!(
        "tapped story {index} at {tap:?} (border {} pt)",
        border_width(screen.watched.contains(&index))
    );

    let story = screen.build_story();
    let picture = screen.avatars[index].picture;
    let style = RevealStyle::new(Duration::from_secs(1))
        .with_fill(STORY_BACKGROUND)
        .with_snapshot(SnapshotHint::View(picture));
    let mut reveal = CircularReveal::new(style);

    screen.ctx.set_view(ViewKey::To, Some(story.root));
    reveal.configure(TransitionMode::Present, tap);
    println!("transition lasts {:?}", reveal.transition_duration());
    reveal.animate(&mut screen.ctx);
    assert!(run_phase(&mut reveal, &mut screen.ctx, "present"));

    // The close control sits at the bottom center of the story.
    let scene = screen.ctx.scene();
    let close_center = scene
        .convert_point(
            Point::new(CLOSE_SIDE / 2.0, CLOSE_SIDE / 2.0),
            story.close,
            screen.ctx.container(),
        )
        .expect("close control is in the scene");
    let hit = scene
        .hit_test_point(close_center, QueryFilter::default())
        .expect("story covers the screen");
    assert_eq!(hit.view, story.close);
    println!("tapped close at {close_center:?}");

    // Shrink back into the avatar the story came from.
    let anchor = screen.avatar_anchor(index).expect("avatar is still in the scene");
    screen.ctx.set_view(ViewKey::To, None);
    screen.ctx.set_view(ViewKey::From, Some(story.root));
    reveal.configure(TransitionMode::Dismiss, anchor);
    reveal.animate(&mut screen.ctx);
    if run_phase(&mut reveal, &mut screen.ctx, "dismiss") {
        screen.mark_watched(index);
    }
    screen.ctx.set_view(ViewKey::From, None);
    screen.scene().remove(story.root);

    assert!(reveal.overlay().is_none());
    println!(
        "story {index} watched: {}, border {} pt, state {:?}",
        screen.watched.contains(&index),
        border_width(screen.watched.contains(&index)),
        reveal.state()
    );
}
