//! Mesh construction from a simple polygon.

use nalgebra::Point2;

use super::halfedge::HalfEdgeMesh;
use super::index::{FaceId, HalfEdgeId, VertexId};
use crate::error::{MeshError, Result};
use crate::geom::{points_coincide, polygon_signed_area, segments_touch};

/// Check that `vertices` describe a simple polygon in counter-clockwise order.
///
/// Rejects fewer than three vertices, coinciding vertices, intersecting
/// non-adjacent edges and clockwise (or zero-area) rings.
pub fn validate_polygon(vertices: &[Point2<f64>]) -> Result<()> {
    let n = vertices.len();
    if n < 3 {
        return Err(MeshError::TooFewVertices { count: n });
    }

    for i in 0..n {
        for j in (i + 1)..n {
            if points_coincide(&vertices[i], &vertices[j]) {
                return Err(MeshError::DuplicateVertex { first: i, second: j });
            }
        }
    }

    for i in 0..n {
        let a1 = &vertices[i];
        let a2 = &vertices[(i + 1) % n];
        for j in (i + 2)..n {
            // Edges n-1 and 0 share vertex 0.
            if (j + 1) % n == i {
                continue;
            }
            let b1 = &vertices[j];
            let b2 = &vertices[(j + 1) % n];
            if segments_touch(a1, a2, b1, b2) {
                return Err(MeshError::NotSimple {
                    first_edge: i,
                    second_edge: j,
                });
            }
        }
    }

    if polygon_signed_area(vertices) <= 0.0 {
        return Err(MeshError::NotCounterClockwise);
    }

    Ok(())
}

/// Build a half-edge mesh from the vertices of a simple polygon.
///
/// The vertices must be in counter-clockwise order. The counter-clockwise
/// chain bounds face `F(1)`, its reverse bounds the exterior `F(0)`.
///
/// # Example
/// ```
/// use sightmesh::mesh::build_from_polygon;
/// use nalgebra::Point2;
///
/// let mesh = build_from_polygon(&[
///     Point2::new(0.0, 0.0),
///     Point2::new(1.0, 0.0),
///     Point2::new(0.0, 1.0),
/// ])
/// .unwrap();
/// assert_eq!(mesh.num_vertices(), 3);
/// assert_eq!(mesh.num_faces(), 1);
/// assert_eq!(mesh.num_halfedges(), 6);
/// ```
pub fn build_from_polygon(vertices: &[Point2<f64>]) -> Result<HalfEdgeMesh> {
    validate_polygon(vertices)?;

    let n = vertices.len();
    let mut mesh = HalfEdgeMesh::new();
    let interior = mesh.add_face(HalfEdgeId::invalid());

    let ids: Vec<VertexId> = vertices.iter().map(|&p| mesh.add_vertex(p)).collect();

    let inner: Vec<HalfEdgeId> = (0..n)
        .map(|i| {
            let (he, twin) = mesh.add_halfedge_pair(ids[i], ids[(i + 1) % n]);
            mesh.halfedge_mut(he).face = interior;
            mesh.halfedge_mut(twin).face = FaceId::EXTERIOR;
            mesh.vertex_mut(ids[i]).halfedge = he;
            he
        })
        .collect();

    for i in 0..n {
        let he = inner[i];
        let he_next = inner[(i + 1) % n];
        mesh.halfedge_mut(he).next = he_next;
        mesh.halfedge_mut(he_next).prev = he;

        // The exterior runs the other way round.
        let outer = mesh.twin(he);
        let outer_prev = mesh.twin(he_next);
        mesh.halfedge_mut(outer_prev).next = outer;
        mesh.halfedge_mut(outer).prev = outer_prev;
    }

    mesh.face_mut(interior).halfedge = inner[0];
    mesh.face_mut(FaceId::EXTERIOR).halfedge = mesh.twin(inner[0]);
    mesh.polygon = ids;
    mesh.update_centroids();

    log::debug!("built polygon mesh with {} vertices", n);
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    #[test]
    fn test_square() {
        let mesh = build_from_polygon(&[p(0.0, 0.0), p(3.0, 0.0), p(3.0, 3.0), p(0.0, 3.0)]).unwrap();
        assert_eq!(mesh.num_vertices(), 4);
        assert_eq!(mesh.num_edges(), 4);
        assert_eq!(mesh.num_faces(), 1);
        assert!(mesh.is_valid());
        assert_eq!(mesh.euler_characteristic(), 2);

        assert_eq!(
            mesh.face_boundary(FaceId::new(1)),
            vec![p(0.0, 0.0), p(3.0, 0.0), p(3.0, 3.0), p(0.0, 3.0)]
        );
        // The exterior walks the same ring clockwise.
        assert_eq!(
            mesh.face_boundary(FaceId::EXTERIOR),
            vec![p(3.0, 0.0), p(0.0, 0.0), p(0.0, 3.0), p(3.0, 3.0)]
        );
        assert_eq!(mesh.boundary_halfedges().count(), 4);
    }

    #[test]
    fn test_too_few_vertices() {
        assert!(matches!(
            build_from_polygon(&[p(0.0, 0.0), p(1.0, 0.0)]),
            Err(MeshError::TooFewVertices { count: 2 })
        ));
    }

    #[test]
    fn test_duplicate_vertex() {
        assert!(matches!(
            build_from_polygon(&[p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.000001, 0.0)]),
            Err(MeshError::DuplicateVertex { first: 0, second: 3 })
        ));
    }

    #[test]
    fn test_clockwise_rejected() {
        assert!(matches!(
            build_from_polygon(&[p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0), p(1.0, 0.0)]),
            Err(MeshError::NotCounterClockwise)
        ));
    }

    #[test]
    fn test_bowtie_rejected() {
        assert!(matches!(
            build_from_polygon(&[p(0.0, 0.0), p(2.0, 2.0), p(2.0, 0.0), p(0.0, 2.0)]),
            Err(MeshError::NotSimple { .. })
        ));
    }
}
