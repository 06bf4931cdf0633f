//! # sightmesh
//!
//! Leveled visibility regions of simple polygons.
//!
//! Given a simple polygon and a guard vertex, sightmesh finds the part of
//! the polygon visible from the guard up to a number of occluding walls (the
//! visibility level). The polygon is held as a half-edge planar subdivision;
//! sightlines from the guard through every polygon vertex are cut into
//! occlusion chords that split its faces, every face is labelled with its
//! level, and faces up to a level are merged into the reported regions.
//!
//! ## Features
//!
//! - **Half-edge subdivision**: arena storage with type-safe indices and a
//!   real exterior face
//! - **Chord insertion**: atomic, idempotent cuts between points on the
//!   subdivision, including through interior vertices
//! - **Tolerant geometry**: rounded intersections and tolerance-based vertex
//!   lookup
//! - **Plain-text I/O**: polygon input with optional partition grid, region
//!   output
//!
//! ## Quick Start
//!
//! ```
//! use sightmesh::prelude::*;
//! use sightmesh::algo::{compute_visibility, merge_faces};
//! use nalgebra::Point2;
//!
//! // L-shape with its reflex corner at (2, 2).
//! let mut mesh = build_from_polygon(&[
//!     Point2::new(0.0, 0.0),
//!     Point2::new(4.0, 0.0),
//!     Point2::new(4.0, 2.0),
//!     Point2::new(2.0, 2.0),
//!     Point2::new(2.0, 4.0),
//!     Point2::new(0.0, 4.0),
//! ])
//! .unwrap();
//!
//! let guard = Point2::new(4.0, 0.0);
//! compute_visibility(&mut mesh, guard).unwrap();
//!
//! let regions = merge_faces(&mut mesh, guard, 0).unwrap();
//! assert_eq!(regions.len(), 1);
//! assert_eq!(regions[0].len(), 5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod error;
pub mod geom;
pub mod io;
pub mod mesh;

/// Prelude module for convenient imports.
///
/// ```
/// use sightmesh::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{MeshError, Result};
    pub use crate::mesh::{
        build_from_polygon, ChordStop, Face, FaceId, HalfEdge, HalfEdgeId, HalfEdgeMesh, Vertex,
        VertexId,
    };
}

// Re-export nalgebra types for convenience
pub use nalgebra;
