// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry snapshot: origin, viewport and document measurements, and the free space around the origin.
//!
//! ## Overview
//!
//! A [`GeometrySnapshot`] is recomputed before every placement run. It is plain data:
//! [`GeometrySnapshot::compute`] reads the host once and never fails. A detached or
//! zero-sized origin yields zero-sized fields so callers can decide to skip placement.
//!
//! ## Image-map areas
//!
//! When the origin is an image-map area, its box is derived from the area's
//! [`AreaShape`] within the image rather than from the element's own rendered box.
//!
//! ```
//! use understory_placement::geometry::AreaShape;
//! use kurbo::Rect;
//!
//! let circle = AreaShape::parse("circle", "50,50,10").unwrap();
//! assert_eq!(circle.bounds(), Rect::new(40.0, 40.0, 60.0, 60.0));
//! ```

use kurbo::{Point, Rect, Size, Vec2};
use thiserror::Error;

use crate::hooks::PlacementHooks;
use crate::host::{Origin, Viewport};
use crate::types::{Container, Side};

/// Shape of an image-map area, in the image's pixel space.
#[derive(Clone, Debug, PartialEq)]
pub enum AreaShape {
    /// Circle given by center and radius.
    Circle {
        /// Center of the circle.
        center: Point,
        /// Radius of the circle.
        radius: f64,
    },
    /// Literal rectangle.
    Rect(Rect),
    /// Polygon given by its vertices.
    Polygon(Vec<Point>),
}

/// Errors from parsing image-map area attributes.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AreaError {
    /// The `shape` attribute names a shape without a usable box (for example `default`).
    #[error("unsupported area shape `{0}`")]
    UnsupportedShape(String),
    /// A coordinate is not a number.
    #[error("invalid coordinate `{value}` at position {index}")]
    InvalidCoordinate {
        /// Zero-based position in the coordinate list.
        index: usize,
        /// The offending text.
        value: String,
    },
    /// The coordinate list has the wrong length for the shape.
    #[error("{shape} needs {expected} coordinates, found {found}")]
    CoordinateCount {
        /// Normalized shape name.
        shape: &'static str,
        /// Description of the expected count.
        expected: &'static str,
        /// Number of coordinates found.
        found: usize,
    },
}

impl AreaShape {
    /// Parse the `shape` and `coords` attributes of an area element.
    ///
    /// Accepts `circle`/`circ`, `rect`/`rectangle` and `poly`/`polygon`, case-insensitively.
    pub fn parse(shape: &str, coords: &str) -> Result<Self, AreaError> {
        let values = coords
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .enumerate()
            .map(|(index, s)| {
                s.parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| AreaError::InvalidCoordinate {
                        index,
                        value: s.to_owned(),
                    })
            })
            .collect::<Result<Vec<f64>, _>>()?;

        match shape.trim().to_ascii_lowercase().as_str() {
            "circle" | "circ" => match values[..] {
                [x, y, r] => Ok(Self::Circle {
                    center: Point::new(x, y),
                    radius: r.max(0.0),
                }),
                _ => Err(AreaError::CoordinateCount {
                    shape: "circle",
                    expected: "3",
                    found: values.len(),
                }),
            },
            "rect" | "rectangle" => match values[..] {
                [x0, y0, x1, y1] => Ok(Self::Rect(Rect::new(x0, y0, x1, y1).abs())),
                _ => Err(AreaError::CoordinateCount {
                    shape: "rect",
                    expected: "4",
                    found: values.len(),
                }),
            },
            "poly" | "polygon" => {
                if values.is_empty() || values.len() % 2 != 0 {
                    return Err(AreaError::CoordinateCount {
                        shape: "poly",
                        expected: "a non-zero even number of",
                        found: values.len(),
                    });
                }
                Ok(Self::Polygon(
                    values
                        .chunks_exact(2)
                        .map(|p| Point::new(p[0], p[1]))
                        .collect(),
                ))
            }
            other => Err(AreaError::UnsupportedShape(other.to_owned())),
        }
    }

    /// Bounding box of the shape in image space.
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Circle { center, radius } => Rect::new(
                center.x - radius,
                center.y - radius,
                center.x + radius,
                center.y + radius,
            ),
            Self::Rect(r) => *r,
            Self::Polygon(points) => {
                let mut it = points.iter();
                let Some(first) = it.next() else {
                    return Rect::ZERO;
                };
                it.fold(Rect::from_points(*first, *first), |acc, p| {
                    acc.union_pt(*p)
                })
            }
        }
    }
}

/// Viewport measurements.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct WindowGeometry {
    /// Visible size.
    pub size: Size,
    /// Scroll position within the document.
    pub scroll: Vec2,
}

/// Origin measurements.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct OriginGeometry {
    /// Size of the origin box.
    pub size: Size,
    /// Box relative to the viewport. May lie partly or fully off-screen.
    pub window_offset: Rect,
    /// Box relative to the document.
    pub document_offset: Rect,
    /// The origin or one of its ancestors is positioned `fixed`.
    pub fixed_lineage: bool,
}

/// Free space on each side of the origin within one container.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct SideSpace {
    /// Space above the origin.
    pub top: Size,
    /// Space right of the origin.
    pub right: Size,
    /// Space below the origin.
    pub bottom: Size,
    /// Space left of the origin.
    pub left: Size,
}

impl SideSpace {
    /// Space for `side`.
    pub const fn get(&self, side: Side) -> Size {
        match side {
            Side::Top => self.top,
            Side::Right => self.right,
            Side::Bottom => self.bottom,
            Side::Left => self.left,
        }
    }
}

/// Free space for both containers.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Available {
    /// Space within the viewport.
    pub window: SideSpace,
    /// Space within the document.
    pub document: SideSpace,
}

impl Available {
    /// Space on `side` within `container`.
    pub const fn get(&self, container: Container, side: Side) -> Size {
        match container {
            Container::Window => self.window.get(side),
            Container::Document => self.document.get(side),
        }
    }
}

/// Everything the search needs to know about the page, captured at one instant.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct GeometrySnapshot {
    /// Full scrollable document size.
    pub document: Size,
    /// Viewport size and scroll.
    pub window: WindowGeometry,
    /// Origin box in window and document space.
    pub origin: OriginGeometry,
    /// Free space around the origin, never negative.
    pub available: Available,
}

impl GeometrySnapshot {
    /// Measure `origin` within `viewport`.
    ///
    /// The raw origin box (after image-map resolution) is passed through
    /// [`PlacementHooks::origin_box`] before any derived field is computed.
    pub fn compute<O, V, H>(origin: &O, viewport: &V, hooks: &mut H) -> Self
    where
        O: Origin + ?Sized,
        V: Viewport + ?Sized,
        H: PlacementHooks + ?Sized,
    {
        let mut raw = origin.bounding_rect().unwrap_or(Rect::ZERO);
        if let Some(area) = origin.area() {
            let b = area.bounds();
            raw = Rect::from_origin_size(raw.origin() + b.origin().to_vec2(), b.size());
        }
        let raw = hooks.origin_box(raw);
        Self::from_parts(
            raw,
            origin.fixed_lineage(),
            viewport.window_size(),
            viewport.scroll(),
            viewport.document_size(),
        )
    }

    /// Derive a snapshot from an origin box (window space) and page measurements.
    pub fn from_parts(
        origin_box: Rect,
        fixed_lineage: bool,
        window_size: Size,
        scroll: Vec2,
        document: Size,
    ) -> Self {
        let size = Size::new(origin_box.width().max(0.0), origin_box.height().max(0.0));
        let window_offset = Rect::from_origin_size(origin_box.origin(), size);
        let document_offset = window_offset + scroll;
        let wo = window_offset;
        let dof = document_offset;

        let window = SideSpace {
            top: Size::new(window_size.width, wo.y0.max(0.0)),
            right: Size::new(
                (window_size.width - wo.x1.max(0.0)).max(0.0),
                window_size.height,
            ),
            bottom: Size::new(
                window_size.width,
                (window_size.height - wo.y1.max(0.0)).max(0.0),
            ),
            left: Size::new(wo.x0.max(0.0), window_size.height),
        };
        let document_space = SideSpace {
            top: Size::new(document.width, dof.y0.max(0.0)),
            right: Size::new((document.width - dof.x1).max(0.0), document.height),
            bottom: Size::new(document.width, (document.height - dof.y1).max(0.0)),
            left: Size::new(dof.x0.max(0.0), document.height),
        };

        Self {
            document,
            window: WindowGeometry {
                size: window_size,
                scroll,
            },
            origin: OriginGeometry {
                size,
                window_offset,
                document_offset,
                fixed_lineage,
            },
            available: Available {
                window,
                document: document_space,
            },
        }
    }
}
