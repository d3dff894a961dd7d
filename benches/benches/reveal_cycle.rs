// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::time::Duration;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Rect};
use reveal_scene::{LocalView, Scene};
use reveal_transition::{
    CircularReveal, RevealStyle, SceneContext, SnapshotHint, TransitionContext, TransitionMode,
    ViewKey,
};

const FRAME: Duration = Duration::from_millis(16);

/// A window with `n` sibling views and a detached full-screen story.
fn setup(n: usize) -> (SceneContext, CircularReveal) {
    let mut scene = Scene::new();
    let window = scene.insert(None, LocalView::with_frame(Rect::new(0.0, 0.0, 390.0, 844.0)));
    for i in 0..n {
        let y = (i % 64) as f64 * 12.0;
        scene.insert(
            Some(window),
            LocalView::with_frame(Rect::new(0.0, y, 390.0, y + 10.0)),
        );
    }
    let story = scene.insert(None, LocalView::with_frame(Rect::new(0.0, 0.0, 390.0, 844.0)));
    let _ = scene.commit();
    let ctx = SceneContext::new(scene, window).with_view(ViewKey::To, story);
    let style = RevealStyle::default()
        .with_snapshot(SnapshotHint::Size(kurbo::Size::new(66.0, 66.0)));
    (ctx, CircularReveal::new(style))
}

fn run(reveal: &mut CircularReveal, ctx: &mut SceneContext, commit: bool) {
    while reveal.tick(ctx, FRAME) {
        if commit {
            black_box(ctx.scene_mut().commit());
        }
    }
}

fn cycle(mut ctx: SceneContext, mut reveal: CircularReveal, commit: bool) -> SceneContext {
    let story = ctx.view(ViewKey::To);
    reveal.configure(TransitionMode::Present, Point::new(48.0, 152.0));
    reveal.animate(&mut ctx);
    run(&mut reveal, &mut ctx, commit);
    ctx.set_view(ViewKey::To, None);
    ctx.set_view(ViewKey::From, story);
    reveal.configure(TransitionMode::Dismiss, Point::new(195.0, 790.0));
    reveal.animate(&mut ctx);
    run(&mut reveal, &mut ctx, commit);
    ctx
}

fn bench_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("reveal");
    for &n in &[0_usize, 256] {
        group.bench_function(format!("present_dismiss_siblings{n}"), |b| {
            b.iter_batched(
                || setup(n),
                |(ctx, reveal)| black_box(cycle(ctx, reveal, false)),
                BatchSize::SmallInput,
            );
        });
        group.bench_function(format!("present_dismiss_commit_siblings{n}"), |b| {
            b.iter_batched(
                || setup(n),
                |(ctx, reveal)| black_box(cycle(ctx, reveal, true)),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cycle);
criterion_main!(benches);
