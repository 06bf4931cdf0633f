//! Planar subdivision data structures.
//!
//! This module provides the half-edge mesh that represents a simple polygon
//! cut into faces by chords, and the chord insertion engine that mutates it.
//!
//! # Overview
//!
//! The primary type is [`HalfEdgeMesh`]. It is built once from the input
//! polygon with [`build_from_polygon`] and then cut by
//! [`HalfEdgeMesh::insert_chord`]. Every mutation keeps the half-edge
//! invariants (`twin(twin(h)) == h`, `prev(next(h)) == h`, closed face
//! cycles), which [`HalfEdgeMesh::is_valid`] checks.
//!
//! # Index Types
//!
//! Mesh elements are identified by type-safe index wrappers:
//! - [`VertexId`] - Identifies a vertex
//! - [`HalfEdgeId`] - Identifies a half-edge
//! - [`FaceId`] - Identifies a face; `FaceId::EXTERIOR` is the unbounded one
//!
//! # Example
//!
//! ```
//! use sightmesh::mesh::build_from_polygon;
//! use nalgebra::Point2;
//!
//! let mut mesh = build_from_polygon(&[
//!     Point2::new(0.0, 0.0),
//!     Point2::new(3.0, 0.0),
//!     Point2::new(3.0, 3.0),
//!     Point2::new(0.0, 3.0),
//! ])
//! .unwrap();
//!
//! mesh.insert_chord(Point2::new(0.0, 1.0), Point2::new(3.0, 2.0)).unwrap();
//! assert_eq!(mesh.num_faces(), 2);
//! assert!(mesh.is_valid());
//! ```

mod builder;
mod chord;
mod halfedge;
mod index;
mod lookup;

pub use builder::{build_from_polygon, validate_polygon};
pub use chord::ChordStop;
pub use halfedge::{Face, FaceHalfEdgeIter, HalfEdge, HalfEdgeMesh, Vertex, VertexHalfEdgeIter};
pub use index::{FaceId, HalfEdgeId, VertexId};
pub use lookup::VertexLookup;
