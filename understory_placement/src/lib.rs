// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_placement --heading-base-level=0

//! Understory Placement: a Kurbo-native engine that positions a floating panel next to an origin element.
//!
//! ## Overview
//!
//! Given an origin (the element a tooltip or popover points at), a panel that can be measured,
//! and the viewport, this crate decides on which side of the origin the panel goes, how big it
//! is, where exactly it sits, and where its arrow points. While the panel is open it follows
//! the origin through layout changes and scrolling.
//!
//! The engine never touches a document model. The host implements small capability traits
//! from [`host`]; [`headless`] provides in-memory versions.
//!
//! ## Pipeline
//!
//! 1) [`GeometrySnapshot`](crate::geometry::GeometrySnapshot): origin box in window and
//!    document space, viewport, and the free space on each side. Image-map areas are resolved
//!    to their shape's box.
//! 2) [`find_targets`](crate::target::find_targets): per-side anchor points. Wrapped inline
//!    origins anchor on their first, middle, or last line.
//! 3) [`search`](crate::search): for each container (window, then document), each allowed side,
//!    and each mode (natural, then width-constrained), measure the panel with a
//!    [`Ruler`](crate::ruler::Ruler) and record a [`Candidate`](crate::types::Candidate).
//! 4) Selection: whole candidates (fit and keep the origin visible) beat fitting ones, which beat
//!    the rest; ties go to side preference, then natural mode. With nothing viable the panel goes
//!    below the origin in the document.
//! 5) [`resolve`](crate::resolve): coordinates with controlled overflow, the arrow offset, and the
//!    conversion to the panel's positioning space.
//!
//! [`Placer`](crate::placer::Placer) drives one run and writes the result once, at the end.
//! [`Session`](crate::session::Session) adds the open/track/close lifecycle on top, using the
//! [`Tracker`](crate::tracker::Tracker) state machine, and
//! [`Registry`](crate::registry::Registry) owns many sessions explicitly.
//!
//! ## Extension points
//!
//! [`PlacementHooks`](crate::hooks::PlacementHooks) can replace the origin box, force or veto
//! individual tests, edit the candidate list, and override the final proposal. Each hook returns
//! a typed decision.
//!
//! ## Example
//!
//! ```
//! use kurbo::{Rect, Size};
//! use understory_placement::config::PlacementConfig;
//! use understory_placement::headless::{FlowPanel, HeadlessOrigin, HeadlessViewport};
//! use understory_placement::placer::Placer;
//! use understory_placement::types::{ArrowOffset, Container, Side};
//!
//! let viewport = HeadlessViewport::new(Size::new(800.0, 600.0));
//! let mut origin = HeadlessOrigin::new(Rect::new(380.0, 300.0, 420.0, 320.0));
//! let mut panel = FlowPanel::text(Size::new(200.0, 40.0), 50.0);
//!
//! let mut placer = Placer::new(PlacementConfig::default().side(Side::Right));
//! let run = placer.place(&mut origin, &viewport, &mut panel);
//!
//! assert_eq!(run.winner.container, Container::Window);
//! assert_eq!(run.placement.side, Side::Right);
//! // Flush against the origin's right edge plus the default 6px distance.
//! assert_eq!(run.placement.coord.x, 426.0);
//! assert_eq!(run.placement.arrow, ArrowOffset::Top(20.0));
//! ```
//!
//! ## Features
//!
//! - `tracing`: debug spans and events for placement runs, candidates, tracker decisions and
//!   registry sweeps.
//! - `serde`: `Serialize`/`Deserialize` for [`PlacementConfig`](crate::config::PlacementConfig)
//!   and the enums it uses.

pub mod config;
pub mod geometry;
pub mod headless;
pub mod hooks;
pub mod host;
pub mod placer;
pub mod registry;
pub mod resolve;
pub mod ruler;
pub mod search;
pub mod session;
pub mod target;
pub mod tracker;
pub mod types;
