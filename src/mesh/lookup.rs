//! Spatial lookup of vertices by rounded coordinates.
//!
//! Vertices are bucketed on a grid whose cell size equals the vertex
//! tolerance, so any vertex coinciding with a query point sits in the query's
//! cell or one of its eight neighbours.

use std::collections::HashMap;

use nalgebra::Point2;

use super::index::VertexId;
use crate::geom::{points_coincide, EPSILON};

/// Grid cell coordinates.
type Cell = (i64, i64);

/// Tolerance-aware map from positions to vertices.
#[derive(Debug, Clone, Default)]
pub struct VertexLookup {
    cells: HashMap<Cell, Vec<(VertexId, Point2<f64>)>>,
}

impl VertexLookup {
    /// Create an empty lookup.
    pub fn new() -> Self {
        Self::default()
    }

    fn cell(p: &Point2<f64>) -> Cell {
        ((p.x / EPSILON).floor() as i64, (p.y / EPSILON).floor() as i64)
    }

    /// Register a vertex at a position.
    pub fn insert(&mut self, id: VertexId, p: Point2<f64>) {
        self.cells.entry(Self::cell(&p)).or_default().push((id, p));
    }

    /// Find a registered vertex coinciding with `p` under the vertex tolerance.
    pub fn find(&self, p: &Point2<f64>) -> Option<VertexId> {
        let (cx, cy) = Self::cell(p);
        (cx - 1..=cx + 1)
            .flat_map(|x| (cy - 1..=cy + 1).map(move |y| (x, y)))
            .filter_map(|cell| self.cells.get(&cell))
            .flatten()
            .find(|(_, q)| points_coincide(p, q))
            .map(|(id, _)| *id)
    }

    /// Number of registered vertices.
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    /// Whether no vertex is registered.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_within_tolerance() {
        let mut lookup = VertexLookup::new();
        lookup.insert(VertexId::new(0), Point2::new(1.0, 2.0));
        lookup.insert(VertexId::new(1), Point2::new(3.0, 2.0));

        assert_eq!(lookup.find(&Point2::new(1.000004, 1.999996)), Some(VertexId::new(0)));
        assert_eq!(lookup.find(&Point2::new(3.0, 2.0)), Some(VertexId::new(1)));
        assert_eq!(lookup.find(&Point2::new(2.0, 2.0)), None);
        assert_eq!(lookup.len(), 2);
    }

    #[test]
    fn test_find_across_cell_border() {
        let mut lookup = VertexLookup::new();
        // Sits just below a cell boundary; the query sits just above it.
        lookup.insert(VertexId::new(3), Point2::new(0.999999, 0.0));
        assert_eq!(lookup.find(&Point2::new(1.000001, 0.0)), Some(VertexId::new(3)));
    }

    #[test]
    fn test_negative_coordinates() {
        let mut lookup = VertexLookup::new();
        lookup.insert(VertexId::new(0), Point2::new(-2.5, -0.000001));
        assert_eq!(lookup.find(&Point2::new(-2.5, 0.000001)), Some(VertexId::new(0)));
    }
}
