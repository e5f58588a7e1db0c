// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Follow an open tooltip while its origin scrolls inside a clipping container.
//!
//! The origin sits in a list that scrolls vertically. As it scrolls out of the list's
//! visible area the tooltip is hidden, and as it comes back the tooltip is shown and
//! translated, without a new placement run.
//!
//! Run:
//! - `RUST_LOG=debug cargo run -p understory_demos --example tracking_scroll`

use core::time::Duration;

use kurbo::{Rect, Size, Vec2};
use tracing_subscriber::EnvFilter;
use understory_placement::config::PlacementConfig;
use understory_placement::headless::{FlowPanel, HeadlessOrigin, HeadlessViewport};
use understory_placement::host::{ClipAxes, ScrollAncestor, ScrollSource};
use understory_placement::placer::Placer;
use understory_placement::registry::Registry;
use understory_placement::session::Session;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let viewport = HeadlessViewport::new(Size::new(800.0, 600.0));
    let list = ScrollAncestor {
        rect: Rect::new(200.0, 150.0, 600.0, 450.0),
        clip: ClipAxes::Y,
        fixed: false,
    };

    let mut registry = Registry::new();
    let id = registry.register(Session::new(
        HeadlessOrigin::new(Rect::new(380.0, 300.0, 420.0, 320.0)).with_ancestors(vec![list]),
        FlowPanel::rigid(Size::new(120.0, 40.0)),
        Placer::new(PlacementConfig::default().track(true, true)),
    ));

    let Some(session) = registry.get_mut(id) else {
        return;
    };
    tracing::info!(?id, "opening tooltip");
    let run = session.open(Duration::ZERO, &viewport);
    println!("opened: {:?} at {:?}", run.placement.side, run.placement.coord);

    for step in 1..=8 {
        session.origin_mut().translate(Vec2::new(0.0, -40.0));
        let commands = session.on_scroll(ScrollSource::Ancestor, &viewport);
        println!(
            "scroll {step}: {commands:?} visible={} coord={:?}",
            session.panel().is_visible(),
            session.panel().coord()
        );
    }

    // A timer tick notices the origin moved since the last full run and re-places.
    let commands = session.tick(Duration::from_secs(1), &viewport);
    println!("tick: {commands:?} placement={:?}", session.last_placement());

    session.origin_mut().detach();
    let removed = registry.sweep(Duration::from_secs(30), |s| s.is_alive());
    println!("swept {} detached session(s), {} left", removed.len(), registry.len());
}
