//! Geometry kernel.
//!
//! Planar primitives shared by every other part of the crate: tolerance-based
//! point equality, segment/segment and line/segment intersection with
//! fixed-precision rounding, collinearity, and parity tests against a polygon
//! boundary.
//!
//! Intersections are rounded to [`DECIMAL_PLACES`] decimals so that the same
//! nominal crossing computed twice (for example once from each side of a
//! shared edge) yields bit-identical coordinates. Callers must treat `None`
//! as an ordinary answer: parallel and doubly-vertical inputs never error.
//!
//! # Example
//!
//! ```
//! use nalgebra::Point2;
//! use sightmesh::geom::{segment_intersect, points_coincide};
//!
//! let hit = segment_intersect(
//!     Point2::new(0.0, 0.0),
//!     Point2::new(2.0, 2.0),
//!     Point2::new(0.0, 2.0),
//!     Point2::new(2.0, 0.0),
//! )
//! .unwrap();
//! assert!(points_coincide(&hit, &Point2::new(1.0, 1.0)));
//! ```

mod intersect;
mod predicates;

pub use intersect::{line_intersect, round_coord, segment_intersect};
pub use predicates::{
    are_collinear, cross, distance_squared, point_on_segment, points_coincide,
    polygon_signed_area, segment_in_polygon, segments_touch,
};

/// Tolerance used for vertex equality and collinearity.
pub const EPSILON: f64 = 1e-5;

/// Number of decimals intersection coordinates are rounded to.
pub const DECIMAL_PLACES: i32 = 6;

/// Offset added to a segment midpoint before casting the parity ray, so the
/// ray rarely runs exactly along a grid line of a rectilinear polygon.
pub const RAY_OFFSET: f64 = 0.00382;

/// X coordinate the parity ray is cast to.
pub const RAY_FAR_X: f64 = 1_000_000.0;
