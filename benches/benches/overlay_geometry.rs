// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size};
use reveal_geometry::{collapsed_scale, overlay_bounds};

fn anchors(n: usize, content: Size) -> Vec<Point> {
    // Inside and around the content, on a coarse grid.
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let fx = x as f64 / (n - 1) as f64;
            let fy = y as f64 / (n - 1) as f64;
            out.push(Point::new(
                (fx * 1.5 - 0.25) * content.width,
                (fy * 1.5 - 0.25) * content.height,
            ));
        }
    }
    out
}

fn bench_overlay_bounds(c: &mut Criterion) {
    let content = Size::new(390.0, 844.0);
    let points = anchors(32, content);
    let mut group = c.benchmark_group("geometry");
    group.throughput(Throughput::Elements(points.len() as u64));
    group.bench_function("overlay_bounds_grid32", |b| {
        b.iter(|| {
            let mut total = 0.0;
            for &anchor in &points {
                total += overlay_bounds(black_box(content), black_box(anchor)).width();
            }
            black_box(total)
        });
    });
    group.bench_function("collapsed_scale_grid32", |b| {
        let hint = Some(Size::new(66.0, 66.0));
        b.iter(|| {
            let mut total = 0.0;
            for &anchor in &points {
                let overlay = overlay_bounds(content, anchor).size();
                total += collapsed_scale(black_box(hint), overlay);
            }
            black_box(total)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_overlay_bounds);
criterion_main!(benches);
