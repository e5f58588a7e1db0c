// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Place a tooltip around origins at different spots of the viewport.
//!
//! Each origin gets the same panel and the same preferred side; the printed lines show which
//! container, side and mode won and where the arrow ends up.
//!
//! Run:
//! - `cargo run -p understory_demos --example placement_basics`
//! - `RUST_LOG=understory_placement=trace cargo run -p understory_demos --example placement_basics`

use kurbo::{Rect, Size};
use tracing_subscriber::EnvFilter;
use understory_placement::config::PlacementConfig;
use understory_placement::geometry::AreaShape;
use understory_placement::headless::{FlowPanel, HeadlessOrigin, HeadlessViewport};
use understory_placement::placer::Placer;
use understory_placement::types::Side;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let viewport = HeadlessViewport::new(Size::new(800.0, 600.0));
    let mut placer = Placer::new(PlacementConfig::default().side(Side::Top));

    let origins = [
        ("center", HeadlessOrigin::new(Rect::new(380.0, 290.0, 420.0, 310.0))),
        ("top edge", HeadlessOrigin::new(Rect::new(380.0, 0.0, 420.0, 20.0))),
        ("top-left corner", HeadlessOrigin::new(Rect::new(0.0, 0.0, 20.0, 20.0))),
        ("right edge", HeadlessOrigin::new(Rect::new(780.0, 290.0, 800.0, 310.0))),
        (
            "wrapped link",
            HeadlessOrigin::lines(vec![
                Rect::new(620.0, 200.0, 790.0, 218.0),
                Rect::new(10.0, 218.0, 140.0, 236.0),
            ]),
        ),
        (
            "map area",
            HeadlessOrigin::area(
                Rect::new(100.0, 100.0, 400.0, 400.0),
                AreaShape::Circle {
                    center: (150.0, 150.0).into(),
                    radius: 30.0,
                },
            ),
        ),
    ];

    tracing::info!(count = origins.len(), "placing panels");
    for (name, mut origin) in origins {
        let mut panel = FlowPanel::text(Size::new(520.0, 18.0), 90.0);
        let run = placer.place(&mut origin, &viewport, &mut panel);
        let p = &run.placement;
        println!(
            "{name:>16}: {:?}/{:?}/{:?} at ({}, {}) size {}x{} arrow {:?}",
            run.winner.container,
            p.side,
            run.winner.mode,
            p.coord.x,
            p.coord.y,
            p.size.width,
            p.size.height,
            p.arrow,
        );
    }

    // Nothing fits: the panel goes below the origin and the document grows.
    let mut origin = HeadlessOrigin::new(Rect::new(0.0, 0.0, 20.0, 20.0));
    let mut huge = FlowPanel::rigid(Size::new(2000.0, 2000.0));
    let run = placer.place(&mut origin, &viewport, &mut huge);
    let p = &run.placement;
    println!(
        "{:>16}: {:?}/{:?} at ({}, {})",
        "oversized", run.winner.container, p.side, p.coord.x, p.coord.y
    );
}
