// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Anchor points on the origin that a panel centers on.
//!
//! A single-box origin anchors on its center. An origin that renders as several boxes
//! (wrapped inline text) anchors a top panel on the first line, a bottom panel on the last
//! line, and side panels on a middle line.

use kurbo::Rect;

use crate::geometry::GeometrySnapshot;
use crate::host::Origin;
use crate::types::Targets;

/// Opacity applied while re-reading client rects of a fully opaque origin.
///
/// Some engines report duplicated line boxes for elements at opacity 1.
const OPACITY_NUDGE: f64 = 0.99;

/// Compute the per-side anchors for `origin`.
///
/// The single-box case uses the snapshot's origin box, so image-map areas and
/// [`origin_box`](crate::hooks::PlacementHooks::origin_box) overrides are honored.
pub fn find_targets<O: Origin + ?Sized>(origin: &mut O, geo: &GeometrySnapshot) -> Targets {
    let mut rects = origin.client_rects();
    if rects.len() > 1 && origin.opacity() == 1.0 {
        origin.set_opacity(OPACITY_NUDGE);
        rects = origin.client_rects();
        origin.set_opacity(1.0);
    }
    targets_from_rects(&rects, geo)
}

/// Pure part of [`find_targets`].
pub fn targets_from_rects(rects: &[Rect], geo: &GeometrySnapshot) -> Targets {
    let [first, .., last] = rects else {
        let o = geo.origin.window_offset;
        let horizontal = (o.x0 + o.width() / 2.0).floor();
        let vertical = (o.y0 + o.height() / 2.0).floor();
        return Targets {
            top: horizontal,
            bottom: horizontal,
            left: vertical,
            right: vertical,
        };
    };

    let n = rects.len();
    // Middle line: with an even count the right anchor takes the earlier of the two
    // middle lines (index n/2 - 1) and the left anchor the later one (index n/2).
    let (right_line, left_line) = if n > 2 {
        (&rects[n.div_ceil(2) - 1], &rects[(n + 1).div_ceil(2) - 1])
    } else {
        (first, last)
    };

    Targets {
        top: center_x(first),
        right: center_y(right_line),
        bottom: center_x(last),
        left: center_y(left_line),
    }
}

fn center_x(r: &Rect) -> f64 {
    (r.x0 + r.width() / 2.0).floor()
}

fn center_y(r: &Rect) -> f64 {
    (r.y0 + r.height() / 2.0).floor()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Size, Vec2};

    fn geo_for(r: Rect) -> GeometrySnapshot {
        GeometrySnapshot::from_parts(
            r,
            false,
            Size::new(800.0, 600.0),
            Vec2::ZERO,
            Size::new(800.0, 600.0),
        )
    }

    fn line(i: u32, x0: f64, x1: f64) -> Rect {
        let y = f64::from(i) * 20.0;
        Rect::new(x0, y, x1, y + 20.0)
    }

    #[test]
    fn single_box_collapses_to_center() {
        let r = Rect::new(10.0, 10.0, 31.0, 41.0);
        let t = targets_from_rects(&[r], &geo_for(r));
        assert_eq!(t.top, 20.0);
        assert_eq!(t.bottom, 20.0);
        assert_eq!(t.left, 25.0);
        assert_eq!(t.right, 25.0);
    }

    #[test]
    fn two_lines_use_first_and_last() {
        let rects = [line(0, 100.0, 300.0), line(1, 0.0, 50.0)];
        let t = targets_from_rects(&rects, &geo_for(Rect::new(0.0, 0.0, 300.0, 40.0)));
        assert_eq!(t.top, 200.0);
        assert_eq!(t.bottom, 25.0);
        assert_eq!(t.right, 10.0);
        assert_eq!(t.left, 30.0);
    }

    #[test]
    fn four_lines_split_middle_both_ways() {
        let rects: Vec<Rect> = (0..4).map(|i| line(i, 0.0, 100.0)).collect();
        let t = targets_from_rects(&rects, &geo_for(Rect::new(0.0, 0.0, 100.0, 80.0)));
        // Second line (index 1) for the right anchor, third (index 2) for the left.
        assert_eq!(t.right, 30.0);
        assert_eq!(t.left, 50.0);
    }

    #[test]
    fn three_lines_share_the_middle() {
        let rects: Vec<Rect> = (0..3).map(|i| line(i, 0.0, 100.0)).collect();
        let t = targets_from_rects(&rects, &geo_for(Rect::new(0.0, 0.0, 100.0, 60.0)));
        assert_eq!(t.right, 30.0);
        assert_eq!(t.left, 30.0);
    }

    #[test]
    fn opaque_origin_is_nudged_and_restored() {
        struct Flaky {
            opacity: f64,
            writes: Vec<f64>,
        }
        impl Origin for Flaky {
            fn bounding_rect(&self) -> Option<Rect> {
                Some(Rect::new(0.0, 0.0, 100.0, 40.0))
            }
            fn client_rects(&self) -> Vec<Rect> {
                let mut out = vec![line(0, 0.0, 100.0), line(1, 0.0, 60.0)];
                if self.opacity == 1.0 {
                    // duplicated fragment
                    out.push(line(1, 0.0, 60.0));
                }
                out
            }
            fn opacity(&self) -> f64 {
                self.opacity
            }
            fn set_opacity(&mut self, opacity: f64) {
                self.opacity = opacity;
                self.writes.push(opacity);
            }
        }
        let mut o = Flaky {
            opacity: 1.0,
            writes: Vec::new(),
        };
        let geo = geo_for(Rect::new(0.0, 0.0, 100.0, 40.0));
        let t = find_targets(&mut o, &geo);
        assert_eq!(o.writes, vec![0.99, 1.0]);
        assert_eq!(o.opacity, 1.0);
        assert_eq!(t.left, 30.0, "two real lines, not three");
    }
}
