//! Error types for sightmesh.
//!
//! Geometric degeneracies (parallel segments, vertical slopes) are not errors:
//! the kernel answers them with `None`. The variants here describe malformed
//! input and contract violations of the mesh operations.

use thiserror::Error;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors that can occur while building or mutating a subdivision.
#[derive(Error, Debug)]
pub enum MeshError {
    /// The polygon has fewer than three vertices.
    #[error("polygon needs at least 3 vertices, got {count}")]
    TooFewVertices {
        /// Number of vertices supplied.
        count: usize,
    },

    /// Two polygon vertices coincide under the vertex tolerance.
    #[error("polygon vertices {first} and {second} coincide")]
    DuplicateVertex {
        /// Index of the first vertex.
        first: usize,
        /// Index of the second vertex.
        second: usize,
    },

    /// Two non-adjacent polygon edges intersect.
    #[error("polygon is not simple: edges {first_edge} and {second_edge} intersect")]
    NotSimple {
        /// Index of the first edge (edge `i` runs from vertex `i` to `i + 1`).
        first_edge: usize,
        /// Index of the second edge.
        second_edge: usize,
    },

    /// The polygon vertices are not in counter-clockwise order.
    #[error("polygon vertices must be in counter-clockwise order")]
    NotCounterClockwise,

    /// A point that must lie on the subdivision does not.
    #[error("point ({x}, {y}) does not lie on the mesh")]
    PointNotOnMesh {
        /// X coordinate.
        x: f64,
        /// Y coordinate.
        y: f64,
    },

    /// A chord would leave the bounded part of the subdivision.
    #[error("chord leaves the polygon near ({x}, {y})")]
    ChordOutsidePolygon {
        /// X coordinate of the offending chord piece's midpoint.
        x: f64,
        /// Y coordinate of the offending chord piece's midpoint.
        y: f64,
    },

    /// Chord origin and end coincide.
    #[error("chord origin and end coincide")]
    DegenerateChord,

    /// Visibility levels are always even.
    #[error("visibility level must be even, got {level}")]
    OddLevel {
        /// The rejected level.
        level: u32,
    },

    /// Invalid mesh state for the requested operation.
    #[error("invalid mesh state: {0}")]
    InvalidState(String),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed interchange file.
    #[error("parse error on line {line}: {message}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// Error message.
        message: String,
    },
}

impl MeshError {
    /// Create a [`MeshError::PointNotOnMesh`] for a point.
    pub fn off_mesh(p: &nalgebra::Point2<f64>) -> Self {
        MeshError::PointNotOnMesh { x: p.x, y: p.y }
    }
}
