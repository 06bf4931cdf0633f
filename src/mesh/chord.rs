//! Chord insertion.
//!
//! A chord is a straight cut between two points already on the subdivision.
//! Insertion runs in two phases:
//!
//! 1. **Plan** (read-only): cut the chord into pieces at every vertex it
//!    touches and every edge it crosses, giving an ordered list of
//!    [`ChordStop`]s. Each piece is checked to run through one bounded face,
//!    seen identically from both of its ends.
//! 2. **Commit**: every [`ChordStop::Edge`] becomes a vertex through
//!    [`HalfEdgeMesh::split_edge`], then every piece not already present is
//!    added with [`HalfEdgeMesh::connect`], which splits the face it runs
//!    through.
//!
//! The face a piece runs through is found by angular sector lookup at its
//! end vertices, so a chord passing through a vertex shared by several faces
//! (including interior crossings of earlier chords) is attached to the faces
//! it actually traverses.

use nalgebra::{Point2, Vector2};

use super::halfedge::HalfEdgeMesh;
use super::index::{FaceId, HalfEdgeId, VertexId};
use crate::error::{MeshError, Result};
use crate::geom::{point_on_segment, points_coincide, segment_intersect};

/// A point where a chord meets the current subdivision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChordStop {
    /// The chord touches an existing vertex.
    Vertex(VertexId),
    /// The chord meets the interior of an edge; the edge is split here.
    Edge {
        /// One half-edge of the edge being met.
        halfedge: HalfEdgeId,
        /// Where the edge is met.
        point: Point2<f64>,
    },
}

impl ChordStop {
    fn is_vertex(&self) -> bool {
        matches!(self, ChordStop::Vertex(_))
    }
}

impl HalfEdgeMesh {
    /// Position of a stop.
    fn stop_point(&self, stop: &ChordStop) -> Point2<f64> {
        match *stop {
            ChordStop::Vertex(v) => *self.position(v),
            ChordStop::Edge { point, .. } => point,
        }
    }

    /// Whether `p` lies on the edge of `he` but away from both end points.
    fn inside_edge(&self, he: HalfEdgeId, p: &Point2<f64>) -> bool {
        let (a, b) = self.segment(he);
        point_on_segment(p, &a, &b) && !points_coincide(p, &a) && !points_coincide(p, &b)
    }

    /// Whether the open segment `pq` runs along an existing edge.
    fn along_edge(&self, p: &Point2<f64>, q: &Point2<f64>) -> bool {
        let mid = Point2::from((p.coords + q.coords) / 2.0);
        self.edge_ids().any(|he| {
            let (a, b) = self.segment(he);
            point_on_segment(&mid, &a, &b)
        })
    }

    /// The face a segment leaving `stop` in direction `dir` enters.
    fn face_toward(&self, stop: &ChordStop, dir: &Vector2<f64>) -> Option<FaceId> {
        match *stop {
            ChordStop::Vertex(v) => self.sector_halfedge(v, dir).map(|he| self.face_of(he)),
            ChordStop::Edge { halfedge, .. } => {
                let (a, b) = self.segment(halfedge);
                let along = b - a;
                if along.perp(dir) > 0.0 {
                    Some(self.face_of(halfedge))
                } else {
                    Some(self.face_of(self.twin(halfedge)))
                }
            }
        }
    }

    /// Ordered stops of the chord `origin -> end` against the current mesh.
    ///
    /// This is the read-only planning phase of [`insert_chord`](Self::insert_chord):
    /// it fails with the same errors and never mutates the mesh.
    pub fn chord_stops(&self, origin: Point2<f64>, end: Point2<f64>) -> Result<Vec<ChordStop>> {
        if points_coincide(&origin, &end) {
            return Err(MeshError::DegenerateChord);
        }

        let dir = end - origin;
        let len_sq = dir.norm_squared();
        let param = |p: &Point2<f64>| (p - origin).dot(&dir) / len_sq;

        let mut stops: Vec<(f64, ChordStop)> = Vec::new();

        for (i, v) in self.vertices.iter().enumerate() {
            if v.halfedge.is_valid() && point_on_segment(&v.position, &origin, &end) {
                stops.push((param(&v.position), ChordStop::Vertex(VertexId::new(i))));
            }
        }

        for he in self.edge_ids() {
            let (a, b) = self.segment(he);
            if let Some(hit) = segment_intersect(origin, end, a, b) {
                if !points_coincide(&hit, &a) && !points_coincide(&hit, &b) {
                    stops.push((param(&hit), ChordStop::Edge { halfedge: he, point: hit }));
                }
            }
            // Chord ends resting on an edge parallel to the chord are not
            // reported by the intersection above.
            for p in [origin, end] {
                if self.inside_edge(he, &p) {
                    stops.push((param(&p), ChordStop::Edge { halfedge: he, point: p }));
                }
            }
        }

        stops.sort_by(|a, b| a.0.total_cmp(&b.0));

        let mut ordered: Vec<ChordStop> = Vec::with_capacity(stops.len());
        for (_, stop) in stops {
            let repeats_last = ordered.last().map_or(false, |last| {
                points_coincide(&self.stop_point(last), &self.stop_point(&stop))
            });
            if !repeats_last {
                ordered.push(stop);
            } else if let Some(last) = ordered.last_mut() {
                // A vertex wins over an edge crossing at the same spot.
                if stop.is_vertex() && !last.is_vertex() {
                    *last = stop;
                }
            }
        }

        match ordered.first() {
            Some(first) if points_coincide(&self.stop_point(first), &origin) => {}
            _ => return Err(MeshError::off_mesh(&origin)),
        }
        match ordered.last() {
            Some(last) if points_coincide(&self.stop_point(last), &end) => {}
            _ => return Err(MeshError::off_mesh(&end)),
        }

        for pair in ordered.windows(2) {
            let (p, q) = (self.stop_point(&pair[0]), self.stop_point(&pair[1]));
            if self.along_edge(&p, &q) {
                continue;
            }
            let forward = q - p;
            let from_p = self.face_toward(&pair[0], &forward);
            let from_q = self.face_toward(&pair[1], &-forward);
            match (from_p, from_q) {
                (Some(f), Some(g)) if f == g && !f.is_exterior() => {}
                _ => {
                    let mid = Point2::from((p.coords + q.coords) / 2.0);
                    return Err(MeshError::ChordOutsidePolygon { x: mid.x, y: mid.y });
                }
            }
        }

        Ok(ordered)
    }

    /// Turn a stop into a vertex, splitting its edge if needed.
    fn resolve_stop(&mut self, stop: &ChordStop) -> Result<VertexId> {
        match *stop {
            ChordStop::Vertex(v) => Ok(v),
            ChordStop::Edge { halfedge, point } => {
                if let Some(v) = self.find_vertex(&point) {
                    if self.vertex(v).halfedge.is_valid() {
                        return Ok(v);
                    }
                }
                // An earlier split may have shortened the planned edge.
                let he = if self.inside_edge(halfedge, &point) {
                    halfedge
                } else {
                    self.edge_ids()
                        .find(|&he| self.inside_edge(he, &point))
                        .ok_or_else(|| MeshError::off_mesh(&point))?
                };
                Ok(self.split_edge(he, point))
            }
        }
    }

    /// Add the straight edge `a -> b` unless it already exists.
    fn attach(&mut self, a: VertexId, b: VertexId) -> Result<Option<HalfEdgeId>> {
        if a == b || self.find_halfedge(a, b).is_some() {
            return Ok(None);
        }
        let dir = self.position(b) - self.position(a);
        let a_out = self
            .sector_halfedge(a, &dir)
            .ok_or_else(|| MeshError::off_mesh(self.position(a)))?;
        let b_out = self
            .sector_halfedge(b, &-dir)
            .ok_or_else(|| MeshError::off_mesh(self.position(b)))?;

        let ab = self.connect(a_out, b_out)?;
        for f in [self.face_of(ab), self.face_of(self.twin(ab))] {
            let c = self.compute_centroid(f);
            self.face_mut(f).centroid = c;
        }
        Ok(Some(ab))
    }

    fn commit_chord(&mut self, stops: &[ChordStop]) -> Result<Vec<HalfEdgeId>> {
        let mut vertices = Vec::with_capacity(stops.len());
        for stop in stops {
            vertices.push(self.resolve_stop(stop)?);
        }

        let mut added = Vec::new();
        for pair in vertices.windows(2) {
            if let Some(he) = self.attach(pair[0], pair[1])? {
                added.push(he);
            }
        }
        Ok(added)
    }

    /// Insert the chord `origin -> end`, splitting every face it runs through.
    ///
    /// Both end points must lie on the subdivision (on a vertex or an edge)
    /// and every piece of the chord must run through a bounded face. Returns
    /// the new half-edges, oriented from `origin` towards `end`; pieces that
    /// already exist are skipped, so inserting the same chord twice changes
    /// nothing the second time.
    ///
    /// On error the mesh is left exactly as it was.
    pub fn insert_chord(&mut self, origin: Point2<f64>, end: Point2<f64>) -> Result<Vec<HalfEdgeId>> {
        let stops = self.chord_stops(origin, end)?;

        if self.chord_already_present(&stops) {
            log::debug!(
                "chord ({}, {}) -> ({}, {}) already present",
                origin.x, origin.y, end.x, end.y
            );
            return Ok(Vec::new());
        }

        let checkpoint = self.clone();
        match self.commit_chord(&stops) {
            Ok(added) => {
                log::debug!(
                    "chord ({}, {}) -> ({}, {}): {} stops, {} new edges",
                    origin.x,
                    origin.y,
                    end.x,
                    end.y,
                    stops.len(),
                    added.len()
                );
                Ok(added)
            }
            Err(e) => {
                *self = checkpoint;
                Err(e)
            }
        }
    }

    /// Whether every piece between consecutive stops runs along an existing edge.
    fn chord_already_present(&self, stops: &[ChordStop]) -> bool {
        stops.windows(2).all(|pair| {
            let (p, q) = (self.stop_point(&pair[0]), self.stop_point(&pair[1]));
            self.along_edge(&p, &q)
        })
    }
}
