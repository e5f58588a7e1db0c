// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::time::Duration;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Size, Vec2};
use understory_placement::config::PlacementConfig;
use understory_placement::headless::{FlowPanel, HeadlessOrigin, HeadlessViewport};
use understory_placement::host::ScrollSource;
use understory_placement::placer::Placer;
use understory_placement::session::Session;
use understory_placement::types::Side;

const WINDOW: Size = Size::new(1280.0, 720.0);

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_origins(count: usize, seed: u64) -> Vec<Rect> {
    let mut rng = Rng::new(seed);
    (0..count)
        .map(|_| {
            let x = (rng.next_f64() * (WINDOW.width - 60.0)).floor();
            let y = (rng.next_f64() * (WINDOW.height - 24.0)).floor();
            Rect::new(x, y, x + 60.0, y + 24.0)
        })
        .collect()
}

fn viewport() -> HeadlessViewport {
    HeadlessViewport::new(WINDOW).with_document(Size::new(WINDOW.width, 4000.0))
}

fn bench_place(c: &mut Criterion) {
    let mut group = c.benchmark_group("place");
    let origins = gen_origins(256, 0x5eed);
    let viewport = viewport();
    let panels = [
        ("small_rigid", FlowPanel::rigid(Size::new(160.0, 40.0))),
        ("wide_text", FlowPanel::text(Size::new(1800.0, 18.0), 120.0)),
        ("oversized", FlowPanel::rigid(Size::new(3000.0, 3000.0))),
    ];
    group.throughput(Throughput::Elements(origins.len() as u64));
    for (name, panel) in &panels {
        group.bench_function(*name, |b| {
            let mut placer = Placer::new(PlacementConfig::default());
            b.iter(|| {
                for r in &origins {
                    let mut origin = HeadlessOrigin::new(*r);
                    let run = placer.compute(&mut origin, &viewport, panel);
                    black_box(run.placement.coord);
                }
            });
        });
    }
    group.finish();
}

fn bench_sides(c: &mut Criterion) {
    let mut group = c.benchmark_group("preferred_side");
    let origins = gen_origins(256, 0xfeed);
    let viewport = viewport();
    let panel = FlowPanel::text(Size::new(600.0, 18.0), 80.0);
    for side in Side::ALL {
        group.bench_function(format!("{side:?}"), |b| {
            let mut placer = Placer::new(PlacementConfig::default().side(side));
            b.iter(|| {
                for r in &origins {
                    let mut origin = HeadlessOrigin::new(*r);
                    black_box(placer.compute(&mut origin, &viewport, &panel));
                }
            });
        });
    }
    group.finish();
}

fn bench_scroll_tracking(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroll");
    let viewport = viewport();
    group.bench_function("ancestor_translate", |b| {
        b.iter_batched(
            || {
                let mut s = Session::new(
                    HeadlessOrigin::new(Rect::new(600.0, 300.0, 660.0, 324.0)),
                    FlowPanel::rigid(Size::new(160.0, 40.0)),
                    Placer::new(PlacementConfig::default()),
                );
                s.open(Duration::ZERO, &viewport);
                s
            },
            |mut s| {
                for _ in 0..64 {
                    s.origin_mut().translate(Vec2::new(0.0, -1.0));
                    black_box(s.on_scroll(ScrollSource::Ancestor, &viewport));
                }
            },
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

criterion_group!(benches, bench_place, bench_sides, bench_scroll_tracking);
criterion_main!(benches);
