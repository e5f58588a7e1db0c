// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sessions following their origin through scrolling, layout changes and detachment.

use core::time::Duration;

use kurbo::{Point, Rect, Size, Vec2};
use understory_placement::config::PlacementConfig;
use understory_placement::headless::{FlowPanel, HeadlessOrigin, HeadlessViewport};
use understory_placement::hooks::{PlacementHooks, PositionContext, PositionDecision};
use understory_placement::host::{ClipAxes, ScrollAncestor, ScrollSource};
use understory_placement::placer::Placer;
use understory_placement::registry::Registry;
use understory_placement::session::Session;
use understory_placement::tracker::TrackerCommand;
use understory_placement::types::{Proposal, Side};

/// Counts full placement runs.
#[derive(Debug, Default)]
struct Runs(u32);

impl PlacementHooks for Runs {
    fn position(&mut self, _proposal: &Proposal, _ctx: PositionContext<'_>) -> PositionDecision {
        self.0 += 1;
        PositionDecision::Accept
    }
}

type Tracked = Session<HeadlessOrigin, FlowPanel, Runs>;

fn window() -> HeadlessViewport {
    HeadlessViewport::new(Size::new(800.0, 600.0))
}

/// An origin inside a vertically scrolling box spanning `y = 100..400`.
fn scrolled_session(config: PlacementConfig) -> Tracked {
    let scroller = ScrollAncestor {
        rect: Rect::new(0.0, 100.0, 800.0, 400.0),
        clip: ClipAxes::Y,
        fixed: false,
    };
    Session::new(
        HeadlessOrigin::new(Rect::new(300.0, 300.0, 340.0, 320.0)).with_ancestors(vec![scroller]),
        FlowPanel::rigid(Size::new(100.0, 50.0)),
        Placer::with_hooks(config, Runs::default()),
    )
}

fn runs(s: &Tracked) -> u32 {
    s.placer().hooks().0
}

#[test]
fn clipped_origin_hides_then_shows_without_a_new_run() {
    let viewport = window();
    let mut s = scrolled_session(PlacementConfig::default());
    s.open(Duration::ZERO, &viewport);
    assert_eq!(runs(&s), 1);
    assert_eq!(s.panel().coord(), Some(Point::new(270.0, 244.0)));

    // Scrolled out of the box's visible area: hidden, not closed.
    s.origin_mut().translate(Vec2::new(0.0, -250.0));
    let cmds = s.on_scroll(ScrollSource::Ancestor, &viewport);
    assert_eq!(cmds, vec![TrackerCommand::SetVisible(false)]);
    assert!(s.is_open());
    assert!(!s.panel().is_visible());

    // Back in view, 20px above where it was placed.
    s.origin_mut().translate(Vec2::new(0.0, 230.0));
    let cmds = s.on_scroll(ScrollSource::Ancestor, &viewport);
    assert_eq!(
        cmds,
        vec![
            TrackerCommand::SetVisible(true),
            TrackerCommand::MoveTo(Point::new(270.0, 224.0))
        ]
    );
    assert!(s.panel().is_visible());
    assert_eq!(s.panel().coord(), Some(Point::new(270.0, 224.0)));
    assert_eq!(runs(&s), 1, "scroll translation never re-runs the search");
}

#[test]
fn reposition_on_scroll_runs_the_search() {
    let viewport = window();
    let mut s = scrolled_session(PlacementConfig::default().reposition_on_scroll(true));
    s.open(Duration::ZERO, &viewport);
    s.origin_mut().translate(Vec2::new(0.0, -20.0));
    assert_eq!(
        s.on_scroll(ScrollSource::Ancestor, &viewport),
        vec![TrackerCommand::Reposition]
    );
    assert_eq!(runs(&s), 2);
    assert_eq!(s.panel().coord(), Some(Point::new(270.0, 224.0)));
}

#[test]
fn window_scroll_is_free_for_document_panels() {
    let mut s = scrolled_session(PlacementConfig::default());
    let viewport = window().with_document(Size::new(800.0, 2000.0));
    s.open(Duration::ZERO, &viewport);
    let scrolled = viewport.with_scroll(Vec2::new(0.0, 100.0));
    s.origin_mut().translate(Vec2::new(0.0, -100.0));
    assert!(s.on_scroll(ScrollSource::Window, &scrolled).is_empty());
    assert_eq!(runs(&s), 1);
}

#[test]
fn close_on_scroll_closes() {
    let viewport = window();
    let mut s = scrolled_session(PlacementConfig::default().close_on_scroll(true));
    s.open(Duration::ZERO, &viewport);
    assert_eq!(
        s.on_scroll(ScrollSource::Window, &viewport),
        vec![TrackerCommand::Close]
    );
    assert!(!s.is_open());
    assert!(!s.panel().is_visible());
}

#[test]
fn tick_reacts_to_content_resize() {
    let viewport = window();
    let mut s = scrolled_session(PlacementConfig::default().track(false, true));
    s.open(Duration::ZERO, &viewport);
    s.panel_mut().set_natural(Size::new(100.0, 100.0));

    assert!(
        s.tick(Duration::from_millis(100), &viewport).is_empty(),
        "within the poll interval"
    );
    assert_eq!(
        s.tick(Duration::from_millis(600), &viewport),
        vec![TrackerCommand::Reposition]
    );
    let placement = s.last_placement().cloned();
    assert_eq!(placement.map(|p| p.size), Some(Size::new(100.0, 100.0)));
    assert_eq!(s.panel().coord(), Some(Point::new(270.0, 194.0)));
}

#[test]
fn tick_can_close_on_origin_move() {
    let viewport = window();
    let config = PlacementConfig::default()
        .track(true, false)
        .close_on_origin_move(true);
    let mut s = scrolled_session(config);
    s.open(Duration::ZERO, &viewport);
    s.origin_mut().translate(Vec2::new(5.0, 0.0));
    assert_eq!(
        s.tick(Duration::from_secs(1), &viewport),
        vec![TrackerCommand::Close]
    );
    assert!(!s.is_open());
}

#[test]
fn registry_sweep_drops_dead_sessions() {
    let viewport = window();
    let mut registry = Registry::new();
    let a = registry.register(scrolled_session(PlacementConfig::default()));
    let b = registry.register(scrolled_session(PlacementConfig::default().side(Side::Bottom)));
    for (_, s) in registry.iter_mut() {
        s.open(Duration::ZERO, &viewport);
    }

    if let Some(s) = registry.get_mut(a) {
        s.origin_mut().detach();
    }
    let removed = registry.sweep(Duration::from_secs(30), Tracked::is_alive);
    assert_eq!(removed.len(), 1);
    assert_eq!(removed[0].0, a);
    assert!(registry.get(a).is_none());

    let survivor = registry.get(b).and_then(Tracked::last_placement);
    assert_eq!(survivor.map(|p| p.side), Some(Side::Bottom));
}
