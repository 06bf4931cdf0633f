//! Half-edge mesh data structure.
//!
//! This module provides a half-edge (doubly-connected edge list) representation
//! of a planar subdivision of a simple polygon.
//!
//! # Structure
//!
//! - Each edge is split into two **half-edges** pointing in opposite directions,
//!   always allocated together as a pair and twinned at creation
//! - Each half-edge knows its **twin**, **next** and **prev** around its face,
//!   its **origin vertex**, and its **incident face** (the face on its left)
//! - Each vertex stores one outgoing half-edge; the full set of half-edges
//!   leaving a vertex is recovered by rotating with `next(twin(he))`
//! - Each face stores one half-edge on its boundary
//!
//! # Exterior
//!
//! Unlike a triangle mesh with open boundaries, every half-edge here has a
//! face: the unbounded region around the polygon is the real face
//! [`FaceId::EXTERIOR`]. Bounded faces are traversed counter-clockwise, the
//! exterior clockwise.
//!
//! # Removal
//!
//! Elements are never freed individually. Merging faces marks the contracted
//! half-edge pair and the absorbed face as removed; iteration skips them.

use std::f64::consts::TAU;

use nalgebra::{Point2, Vector2};

use super::index::{FaceId, HalfEdgeId, VertexId};
use super::lookup::VertexLookup;
use crate::error::{MeshError, Result};

/// A vertex in the half-edge mesh.
#[derive(Debug, Clone)]
pub struct Vertex {
    /// The 2D position of this vertex.
    pub position: Point2<f64>,

    /// One outgoing half-edge from this vertex.
    /// Invalid for a vertex left isolated by region merging.
    pub halfedge: HalfEdgeId,
}

impl Vertex {
    /// Create a new vertex at the given position.
    pub fn new(position: Point2<f64>) -> Self {
        Self {
            position,
            halfedge: HalfEdgeId::invalid(),
        }
    }
}

/// A half-edge in the mesh.
#[derive(Debug, Clone, Copy)]
pub struct HalfEdge {
    /// The vertex this half-edge originates from.
    pub origin: VertexId,

    /// The opposite half-edge. Set once, when the pair is allocated.
    pub twin: HalfEdgeId,

    /// The next half-edge around the face.
    pub next: HalfEdgeId,

    /// The previous half-edge around the face.
    pub prev: HalfEdgeId,

    /// The face on the left of this half-edge.
    pub face: FaceId,

    /// Set when the edge was contracted away.
    pub removed: bool,
}

impl HalfEdge {
    fn new(origin: VertexId, twin: HalfEdgeId) -> Self {
        Self {
            origin,
            twin,
            next: HalfEdgeId::invalid(),
            prev: HalfEdgeId::invalid(),
            face: FaceId::invalid(),
            removed: false,
        }
    }
}

/// A face of the subdivision.
#[derive(Debug, Clone)]
pub struct Face {
    /// One half-edge on the boundary of this face.
    pub halfedge: HalfEdgeId,

    /// Arithmetic mean of the boundary vertices, refreshed by
    /// [`HalfEdgeMesh::update_centroids`].
    pub centroid: Point2<f64>,

    /// Number of boundary crossings (rounded up to even) between the guard and
    /// the centroid. `None` until computed, and always `None` for the
    /// exterior, which counts as an unreachable level.
    pub level: Option<u32>,

    /// Set when the face was absorbed by a neighbour during region merging.
    pub removed: bool,
}

impl Face {
    /// Create a new face with the given half-edge.
    pub fn new(halfedge: HalfEdgeId) -> Self {
        Self {
            halfedge,
            centroid: Point2::origin(),
            level: None,
            removed: false,
        }
    }

    /// Whether this face's level is at most `k`.
    #[inline]
    pub fn level_at_most(&self, k: u32) -> bool {
        !self.removed && matches!(self.level, Some(level) if level <= k)
    }
}

/// A half-edge planar subdivision of a simple polygon.
///
/// Owns every vertex, half-edge and face; all cross references are arena
/// indices.
#[derive(Debug, Clone)]
pub struct HalfEdgeMesh {
    /// All vertices in the mesh.
    pub(crate) vertices: Vec<Vertex>,

    /// All half-edges in the mesh. Pairs occupy consecutive slots.
    pub(crate) halfedges: Vec<HalfEdge>,

    /// All faces in the mesh; slot 0 is the exterior.
    pub(crate) faces: Vec<Face>,

    /// The input polygon's vertices, in counter-clockwise order.
    pub(crate) polygon: Vec<VertexId>,

    /// Coordinate lookup over `vertices`.
    pub(crate) lookup: VertexLookup,
}

impl Default for HalfEdgeMesh {
    fn default() -> Self {
        Self::new()
    }
}

impl HalfEdgeMesh {
    /// Create a new mesh holding only the exterior face.
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            halfedges: Vec::new(),
            faces: vec![Face::new(HalfEdgeId::invalid())],
            polygon: Vec::new(),
            lookup: VertexLookup::new(),
        }
    }

    // ==================== Accessors ====================

    /// Number of vertices, including ones isolated by merging.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of live half-edges.
    pub fn num_halfedges(&self) -> usize {
        self.halfedges.iter().filter(|he| !he.removed).count()
    }

    /// Number of live undirected edges.
    pub fn num_edges(&self) -> usize {
        self.num_halfedges() / 2
    }

    /// Number of live bounded faces (the exterior is not counted).
    pub fn num_faces(&self) -> usize {
        self.face_ids().count()
    }

    /// Get a vertex by ID.
    #[inline]
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.index()]
    }

    /// Get a mutable vertex by ID.
    #[inline]
    pub fn vertex_mut(&mut self, id: VertexId) -> &mut Vertex {
        &mut self.vertices[id.index()]
    }

    /// Get a half-edge by ID.
    #[inline]
    pub fn halfedge(&self, id: HalfEdgeId) -> &HalfEdge {
        &self.halfedges[id.index()]
    }

    /// Get a mutable half-edge by ID.
    #[inline]
    pub fn halfedge_mut(&mut self, id: HalfEdgeId) -> &mut HalfEdge {
        &mut self.halfedges[id.index()]
    }

    /// Get a face by ID.
    #[inline]
    pub fn face(&self, id: FaceId) -> &Face {
        &self.faces[id.index()]
    }

    /// Get a mutable face by ID.
    #[inline]
    pub fn face_mut(&mut self, id: FaceId) -> &mut Face {
        &mut self.faces[id.index()]
    }

    /// Get the position of a vertex.
    #[inline]
    pub fn position(&self, v: VertexId) -> &Point2<f64> {
        &self.vertex(v).position
    }

    /// The input polygon's vertices, in the order they were given.
    pub fn polygon_vertices(&self) -> &[VertexId] {
        &self.polygon
    }

    /// Find the vertex coinciding with `p` under the vertex tolerance.
    pub fn find_vertex(&self, p: &Point2<f64>) -> Option<VertexId> {
        self.lookup.find(p)
    }

    // ==================== Topology Queries ====================

    /// Get the twin (opposite) half-edge.
    #[inline]
    pub fn twin(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.halfedge(he).twin
    }

    /// Get the next half-edge around the face.
    #[inline]
    pub fn next(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.halfedge(he).next
    }

    /// Get the previous half-edge around the face.
    #[inline]
    pub fn prev(&self, he: HalfEdgeId) -> HalfEdgeId {
        self.halfedge(he).prev
    }

    /// Get the origin vertex of a half-edge.
    #[inline]
    pub fn origin(&self, he: HalfEdgeId) -> VertexId {
        self.halfedge(he).origin
    }

    /// Get the destination vertex of a half-edge.
    #[inline]
    pub fn dest(&self, he: HalfEdgeId) -> VertexId {
        self.origin(self.twin(he))
    }

    /// Get the face of a half-edge.
    #[inline]
    pub fn face_of(&self, he: HalfEdgeId) -> FaceId {
        self.halfedge(he).face
    }

    /// Whether a half-edge lies on the polygon boundary, on the interior side.
    #[inline]
    pub fn is_boundary_halfedge(&self, he: HalfEdgeId) -> bool {
        !self.face_of(he).is_exterior() && self.face_of(self.twin(he)).is_exterior()
    }

    /// End points of a half-edge, origin first.
    #[inline]
    pub fn segment(&self, he: HalfEdgeId) -> (Point2<f64>, Point2<f64>) {
        (*self.position(self.origin(he)), *self.position(self.dest(he)))
    }

    /// Find the half-edge running from `a` to `b`, if the edge exists.
    pub fn find_halfedge(&self, a: VertexId, b: VertexId) -> Option<HalfEdgeId> {
        self.vertex_halfedges(a).find(|&he| self.dest(he) == b)
    }

    // ==================== Iteration ====================

    /// Iterate over all vertex IDs.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId::new)
    }

    /// Iterate over all live half-edge IDs.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        self.halfedges
            .iter()
            .enumerate()
            .filter(|(_, he)| !he.removed)
            .map(|(i, _)| HalfEdgeId::new(i))
    }

    /// Iterate over one half-edge per live undirected edge.
    pub fn edge_ids(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        self.halfedge_ids().filter(move |&he| he < self.twin(he))
    }

    /// Iterate over all live bounded face IDs (the exterior is skipped).
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, f)| !f.removed)
            .map(|(i, _)| FaceId::new(i))
    }

    /// Interior-side half-edges of the polygon boundary.
    pub fn boundary_halfedges(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        self.halfedge_ids()
            .filter(move |&he| self.is_boundary_halfedge(he))
    }

    /// Edges of the input polygon, ignoring later subdivision.
    pub fn polygon_segments(&self) -> Vec<(Point2<f64>, Point2<f64>)> {
        let n = self.polygon.len();
        (0..n)
            .map(|i| {
                (
                    *self.position(self.polygon[i]),
                    *self.position(self.polygon[(i + 1) % n]),
                )
            })
            .collect()
    }

    /// Whether `p` lies on the polygon boundary.
    pub fn on_polygon_boundary(&self, p: &Point2<f64>) -> bool {
        self.polygon_segments()
            .iter()
            .any(|(a, b)| crate::geom::point_on_segment(p, a, b))
    }

    /// Iterate over half-edges leaving a vertex.
    pub fn vertex_halfedges(&self, v: VertexId) -> VertexHalfEdgeIter<'_> {
        VertexHalfEdgeIter::new(self, v)
    }

    /// Iterate over half-edges around a face.
    pub fn face_halfedges(&self, f: FaceId) -> FaceHalfEdgeIter<'_> {
        FaceHalfEdgeIter::new(self, self.face(f).halfedge)
    }

    /// Iterate over the cycle starting at a half-edge.
    pub fn cycle(&self, start: HalfEdgeId) -> FaceHalfEdgeIter<'_> {
        FaceHalfEdgeIter::new(self, start)
    }

    /// Iterate over vertices of a face.
    pub fn face_vertices(&self, f: FaceId) -> impl Iterator<Item = VertexId> + '_ {
        self.face_halfedges(f).map(|he| self.origin(he))
    }

    /// Ordered boundary positions of a face.
    pub fn face_boundary(&self, f: FaceId) -> Vec<Point2<f64>> {
        self.face_vertices(f).map(|v| *self.position(v)).collect()
    }

    // ==================== Geometry ====================

    /// Arithmetic mean of a face's boundary vertices.
    pub fn compute_centroid(&self, f: FaceId) -> Point2<f64> {
        let (sum, count) = self
            .face_vertices(f)
            .fold((Vector2::zeros(), 0usize), |(sum, count), v| {
                (sum + self.position(v).coords, count + 1)
            });
        if count == 0 {
            return Point2::origin();
        }
        Point2::from(sum / count as f64)
    }

    /// Recompute the centroid of every bounded face.
    pub fn update_centroids(&mut self) {
        let ids: Vec<FaceId> = self.face_ids().collect();
        for f in ids {
            let c = self.compute_centroid(f);
            self.face_mut(f).centroid = c;
        }
    }

    /// Direction of a half-edge as an angle in `(-PI, PI]`.
    fn halfedge_angle(&self, he: HalfEdgeId) -> f64 {
        let (a, b) = self.segment(he);
        (b.y - a.y).atan2(b.x - a.x)
    }

    /// The outgoing half-edge at `v` that is first reached when rotating
    /// clockwise from `dir` (an edge pointing exactly along `dir` counts).
    ///
    /// A segment leaving `v` in direction `dir` enters the face on the left
    /// of the returned half-edge.
    pub fn sector_halfedge(&self, v: VertexId, dir: &Vector2<f64>) -> Option<HalfEdgeId> {
        let target = dir.y.atan2(dir.x);
        self.vertex_halfedges(v).min_by(|&a, &b| {
            let ca = (target - self.halfedge_angle(a)).rem_euclid(TAU);
            let cb = (target - self.halfedge_angle(b)).rem_euclid(TAU);
            ca.total_cmp(&cb)
        })
    }

    /// Compute the bounding box of the mesh.
    pub fn bounding_box(&self) -> Option<(Point2<f64>, Point2<f64>)> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().fold((first, first), |(min, max), v| {
            (
                Point2::new(min.x.min(v.position.x), min.y.min(v.position.y)),
                Point2::new(max.x.max(v.position.x), max.y.max(v.position.y)),
            )
        }))
    }

    // ==================== Construction ====================

    /// Add a new vertex and return its ID.
    pub fn add_vertex(&mut self, position: Point2<f64>) -> VertexId {
        let id = VertexId::new(self.vertices.len());
        self.vertices.push(Vertex::new(position));
        self.lookup.insert(id, position);
        id
    }

    /// Allocate a twinned pair of half-edges `a -> b` and `b -> a`.
    ///
    /// Faces and next/prev links are left unset for the caller to wire.
    pub fn add_halfedge_pair(&mut self, a: VertexId, b: VertexId) -> (HalfEdgeId, HalfEdgeId) {
        let ab = HalfEdgeId::new(self.halfedges.len());
        let ba = HalfEdgeId::new(self.halfedges.len() + 1);
        self.halfedges.push(HalfEdge::new(a, ba));
        self.halfedges.push(HalfEdge::new(b, ab));
        (ab, ba)
    }

    /// Add a new face bounded by the cycle through `halfedge`.
    pub fn add_face(&mut self, halfedge: HalfEdgeId) -> FaceId {
        let id = FaceId::new(self.faces.len());
        self.faces.push(Face::new(halfedge));
        id
    }

    /// Make `b` follow `a` around their face.
    #[inline]
    fn link(&mut self, a: HalfEdgeId, b: HalfEdgeId) {
        self.halfedge_mut(a).next = b;
        self.halfedge_mut(b).prev = a;
    }

    /// Assign `f` to every half-edge on the cycle through `start`.
    fn assign_face(&mut self, start: HalfEdgeId, f: FaceId) {
        let cycle: Vec<HalfEdgeId> = self.cycle(start).collect();
        for he in cycle {
            self.halfedge_mut(he).face = f;
        }
        self.face_mut(f).halfedge = start;
    }

    // ==================== Mutation ====================

    /// Split the edge of `he` at `p`, which must lie strictly inside it.
    ///
    /// `he` (u -> w) is shortened to u -> m and a new pair m -> w / w -> m
    /// takes over the far half; both sides keep their faces. Returns `m`.
    pub fn split_edge(&mut self, he: HalfEdgeId, p: Point2<f64>) -> VertexId {
        let t = self.twin(he);
        let w = self.dest(he);
        let he_next = self.next(he);
        let t_prev = self.prev(t);

        let m = self.add_vertex(p);
        let (mw, wm) = self.add_halfedge_pair(m, w);
        self.halfedge_mut(mw).face = self.face_of(he);
        self.halfedge_mut(wm).face = self.face_of(t);

        self.link(mw, he_next);
        self.link(he, mw);
        self.link(t_prev, wm);
        self.link(wm, t);
        self.halfedge_mut(t).origin = m;

        if self.vertex(w).halfedge == t {
            self.vertex_mut(w).halfedge = wm;
        }
        self.vertex_mut(m).halfedge = mw;
        m
    }

    /// Insert an edge between the origins of `a_out` and `b_out`.
    ///
    /// `a_out` and `b_out` are the sector half-edges (see
    /// [`sector_halfedge`](Self::sector_halfedge)) of the new edge's direction
    /// at each end, so both bound the face being cut. That face keeps the side
    /// containing `a_out`; a new face is opened on the other side. Returns the
    /// new half-edge leaving `a_out`'s origin, which bounds the new face.
    pub fn connect(&mut self, a_out: HalfEdgeId, b_out: HalfEdgeId) -> Result<HalfEdgeId> {
        let f = self.face_of(a_out);
        if self.face_of(b_out) != f {
            return Err(MeshError::InvalidState(format!(
                "{:?} and {:?} do not bound the same face",
                a_out, b_out
            )));
        }
        if f.is_exterior() {
            return Err(MeshError::InvalidState(
                "cannot cut the exterior face".to_string(),
            ));
        }

        let a = self.origin(a_out);
        let b = self.origin(b_out);
        let a_in = self.prev(a_out);
        let b_in = self.prev(b_out);

        let (ab, ba) = self.add_halfedge_pair(a, b);
        self.link(a_in, ab);
        self.link(ab, b_out);
        self.link(b_in, ba);
        self.link(ba, a_out);

        let new_face = self.add_face(ab);
        self.assign_face(ab, new_face);
        self.assign_face(ba, f);
        Ok(ab)
    }

    /// Remove the edge of `he`, folding the face across it into `he`'s face.
    ///
    /// Both sides must belong to different bounded faces. Returns the
    /// absorbed face.
    pub fn join_faces(&mut self, he: HalfEdgeId) -> Result<FaceId> {
        let t = self.twin(he);
        let keep = self.face_of(he);
        let gone = self.face_of(t);
        if keep == gone {
            return Err(MeshError::InvalidState(format!(
                "{:?} has {:?} on both sides",
                he, keep
            )));
        }
        if keep.is_exterior() || gone.is_exterior() {
            return Err(MeshError::InvalidState(
                "cannot merge with the exterior face".to_string(),
            ));
        }

        let a = self.origin(he);
        let b = self.origin(t);
        let (hp, hn, tp, tn) = (self.prev(he), self.next(he), self.prev(t), self.next(t));

        let absorbed: Vec<HalfEdgeId> = self.cycle(t).filter(|&h| h != t).collect();
        for h in absorbed {
            self.halfedge_mut(h).face = keep;
        }

        self.link(hp, tn);
        self.link(tp, hn);

        if self.vertex(a).halfedge == he {
            self.vertex_mut(a).halfedge = tn;
        }
        if self.vertex(b).halfedge == t {
            self.vertex_mut(b).halfedge = hn;
        }
        if self.face(keep).halfedge == he {
            self.face_mut(keep).halfedge = hp;
        }

        self.halfedge_mut(he).removed = true;
        self.halfedge_mut(t).removed = true;
        let absorbed_face = self.face_mut(gone);
        absorbed_face.removed = true;
        absorbed_face.halfedge = HalfEdgeId::invalid();
        Ok(gone)
    }

    /// Remove a dangling edge `he` whose destination has no other edge
    /// (`next(he) == twin(he)`). Returns the half-edge that now follows
    /// `prev(he)`.
    pub fn remove_spur(&mut self, he: HalfEdgeId) -> HalfEdgeId {
        let t = self.twin(he);
        debug_assert_eq!(self.next(he), t, "{:?} is not a spur", he);
        let a = self.origin(he);
        let b = self.origin(t);
        let hp = self.prev(he);
        let tn = self.next(t);
        let f = self.face_of(he);

        self.link(hp, tn);
        if self.vertex(a).halfedge == he {
            self.vertex_mut(a).halfedge = tn;
        }
        self.vertex_mut(b).halfedge = HalfEdgeId::invalid();
        let face_he = self.face(f).halfedge;
        if face_he == he || face_he == t {
            self.face_mut(f).halfedge = hp;
        }

        self.halfedge_mut(he).removed = true;
        self.halfedge_mut(t).removed = true;
        tn
    }

    // ==================== Validation ====================

    /// Euler characteristic `V - E + F` counting non-isolated vertices, live
    /// edges and live faces including the exterior. A connected planar
    /// subdivision gives 2.
    pub fn euler_characteristic(&self) -> i64 {
        let v = self
            .vertices
            .iter()
            .filter(|v| v.halfedge.is_valid())
            .count() as i64;
        let e = self.num_edges() as i64;
        let f = self.num_faces() as i64 + 1;
        v - e + f
    }

    /// Check if the mesh is valid (all connectivity is consistent).
    ///
    /// Verifies twin and next/prev symmetry, that every face's cycle closes
    /// and carries that face, and that the face cycles cover every live
    /// half-edge exactly once.
    pub fn is_valid(&self) -> bool {
        for (i, v) in self.vertices.iter().enumerate() {
            if v.halfedge.is_valid() {
                let he = self.halfedge(v.halfedge);
                if he.removed || he.origin != VertexId::new(i) {
                    return false;
                }
            }
        }

        let live = self.num_halfedges();
        for heid in self.halfedge_ids() {
            let he = self.halfedge(heid);
            if !he.twin.is_valid() || !he.next.is_valid() || !he.prev.is_valid() {
                return false;
            }
            let twin = self.halfedge(he.twin);
            if twin.removed || twin.twin != heid || twin.origin == he.origin {
                return false;
            }
            let next = self.halfedge(he.next);
            if next.removed || next.prev != heid || next.face != he.face {
                return false;
            }
            if next.origin != twin.origin {
                return false;
            }
            if self.halfedge(he.prev).next != heid {
                return false;
            }
            if !he.face.is_valid() || self.face(he.face).removed {
                return false;
            }
        }

        let mut covered = 0;
        let exterior = std::iter::once(FaceId::EXTERIOR);
        for fid in exterior.chain(self.face_ids()) {
            let start = self.face(fid).halfedge;
            if !start.is_valid() {
                // The exterior of an empty mesh has no boundary.
                if fid.is_exterior() && live == 0 {
                    continue;
                }
                return false;
            }
            let mut he = start;
            let mut steps = 0;
            loop {
                if self.face_of(he) != fid {
                    return false;
                }
                steps += 1;
                if steps > live {
                    return false;
                }
                he = self.next(he);
                if he == start {
                    break;
                }
            }
            covered += steps;
        }

        covered == live
    }
}

/// Iterator over half-edges leaving a vertex.
pub struct VertexHalfEdgeIter<'a> {
    mesh: &'a HalfEdgeMesh,
    start: HalfEdgeId,
    current: HalfEdgeId,
    done: bool,
}

impl<'a> VertexHalfEdgeIter<'a> {
    fn new(mesh: &'a HalfEdgeMesh, v: VertexId) -> Self {
        let start = mesh.vertex(v).halfedge;
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<'a> Iterator for VertexHalfEdgeIter<'a> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;

        // twin(he) arrives at v, so the half-edge after it leaves v again,
        // one sector further clockwise.
        self.current = self.mesh.next(self.mesh.twin(self.current));

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}

/// Iterator over the half-edges of a cycle.
pub struct FaceHalfEdgeIter<'a> {
    mesh: &'a HalfEdgeMesh,
    start: HalfEdgeId,
    current: HalfEdgeId,
    done: bool,
}

impl<'a> FaceHalfEdgeIter<'a> {
    fn new(mesh: &'a HalfEdgeMesh, start: HalfEdgeId) -> Self {
        Self {
            mesh,
            start,
            current: start,
            done: !start.is_valid(),
        }
    }
}

impl<'a> Iterator for FaceHalfEdgeIter<'a> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let result = self.current;
        self.current = self.mesh.next(self.current);

        if self.current == self.start {
            self.done = true;
        }

        Some(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_polygon;

    fn square() -> HalfEdgeMesh {
        build_from_polygon(&[
            Point2::new(0.0, 0.0),
            Point2::new(3.0, 0.0),
            Point2::new(3.0, 3.0),
            Point2::new(0.0, 3.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = HalfEdgeMesh::new();
        assert_eq!(mesh.num_vertices(), 0);
        assert_eq!(mesh.num_halfedges(), 0);
        assert_eq!(mesh.num_faces(), 0);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_add_halfedge_pair_twins() {
        let mut mesh = HalfEdgeMesh::new();
        let a = mesh.add_vertex(Point2::new(0.0, 0.0));
        let b = mesh.add_vertex(Point2::new(1.0, 0.0));
        let (ab, ba) = mesh.add_halfedge_pair(a, b);
        assert_eq!(mesh.twin(ab), ba);
        assert_eq!(mesh.twin(ba), ab);
        assert_eq!(mesh.origin(ab), a);
        assert_eq!(mesh.dest(ab), b);
    }

    #[test]
    fn test_vertex_rotation_visits_all_outgoing() {
        let mesh = square();
        for v in mesh.vertex_ids() {
            let out: Vec<_> = mesh.vertex_halfedges(v).collect();
            assert_eq!(out.len(), 2);
            assert!(out.iter().all(|&he| mesh.origin(he) == v));
        }
    }

    #[test]
    fn test_split_edge_keeps_invariants() {
        let mut mesh = square();
        let a = mesh.find_vertex(&Point2::new(3.0, 0.0)).unwrap();
        let b = mesh.find_vertex(&Point2::new(3.0, 3.0)).unwrap();
        let he = mesh.find_halfedge(a, b).unwrap();

        let m = mesh.split_edge(he, Point2::new(3.0, 2.0));
        assert!(mesh.is_valid());
        assert_eq!(mesh.dest(he), m);
        assert!(mesh.find_halfedge(m, b).is_some());
        assert!(mesh.find_halfedge(b, m).is_some());
        assert_eq!(mesh.face_boundary(FaceId::new(1)).len(), 5);
        assert_eq!(mesh.euler_characteristic(), 2);
    }

    #[test]
    fn test_connect_then_join_restores_face() {
        let mut mesh = square();
        let a = mesh.find_vertex(&Point2::new(0.0, 0.0)).unwrap();
        let c = mesh.find_vertex(&Point2::new(3.0, 3.0)).unwrap();
        let dir = mesh.position(c) - mesh.position(a);
        let a_out = mesh.sector_halfedge(a, &dir).unwrap();
        let c_out = mesh.sector_halfedge(c, &-dir).unwrap();
        assert_eq!(mesh.face_of(a_out), FaceId::new(1));
        assert_eq!(mesh.face_of(c_out), FaceId::new(1));

        let ac = mesh.connect(a_out, c_out).unwrap();
        assert!(mesh.is_valid());
        assert_eq!(mesh.num_faces(), 2);
        assert_eq!(mesh.face_boundary(mesh.face_of(ac)).len(), 3);
        assert_eq!(mesh.euler_characteristic(), 2);

        let gone = mesh.join_faces(mesh.twin(ac)).unwrap();
        assert_eq!(gone, mesh.face_of(ac));
        assert!(mesh.is_valid());
        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.face_boundary(FaceId::new(1)).len(), 4);
    }

    #[test]
    fn test_join_refuses_exterior() {
        let mut mesh = square();
        let he = mesh.boundary_halfedges().next().unwrap();
        assert!(matches!(mesh.join_faces(he), Err(MeshError::InvalidState(_))));
        assert!(mesh.is_valid());
        assert_eq!(mesh.num_faces(), 1);
    }

    #[test]
    fn test_centroid_and_bounding_box() {
        let mut mesh = square();
        mesh.update_centroids();
        assert_eq!(mesh.face(FaceId::new(1)).centroid, Point2::new(1.5, 1.5));
        let (min, max) = mesh.bounding_box().unwrap();
        assert_eq!(min, Point2::new(0.0, 0.0));
        assert_eq!(max, Point2::new(3.0, 3.0));
    }
}
