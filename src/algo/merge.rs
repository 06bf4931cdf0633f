//! Region merging.
//!
//! Faces whose visibility level is at most `k` are fused into maximal
//! regions. Faces are taken topmost first (rightmost on ties); the topmost
//! remaining face of a region always borders a face above the threshold or
//! the exterior, and that shared edge (the barrier) anchors the walk around
//! the growing region.
//!
//! # Limitations
//!
//! An edge with the merged region on both sides that is not a dangling spur
//! (a bridge to an enclosed hole) is left in place, so such a region is
//! reported with a slit.

use std::cmp::Ordering;

use nalgebra::Point2;

use crate::error::{MeshError, Result};
use crate::geom::are_collinear;
use crate::mesh::{FaceId, HalfEdgeId, HalfEdgeMesh};

/// Merge all faces with visibility level at most `k` and report the merged
/// regions.
///
/// Levels must already be assigned (see
/// [`compute_visibility`](super::compute_visibility)) from `guard`, which
/// must be a mesh vertex. `k` must be even. Each region is a
/// counter-clockwise loop without collinear vertices, starting at its
/// leftmost vertex (topmost among equals). No qualifying face gives an empty
/// result.
pub fn merge_faces(
    mesh: &mut HalfEdgeMesh,
    guard: Point2<f64>,
    k: u32,
) -> Result<Vec<Vec<Point2<f64>>>> {
    if k % 2 != 0 {
        return Err(MeshError::OddLevel { level: k });
    }
    match mesh.find_vertex(&guard) {
        Some(v) if mesh.vertex(v).halfedge.is_valid() => {}
        _ => return Err(MeshError::off_mesh(&guard)),
    }

    let mut pending: Vec<FaceId> = mesh
        .face_ids()
        .filter(|&f| mesh.face(f).level_at_most(k))
        .collect();
    pending.sort_by(|&a, &b| topmost_first(mesh, a, b));

    let mut regions = Vec::new();
    while !pending.is_empty() {
        let face = pending.remove(0);
        let Some(barrier) = find_barrier(mesh, face, k) else {
            log::debug!("{:?} has no barrier edge at level {}", face, k);
            continue;
        };

        absorb_neighbours(mesh, face, barrier, k, &mut pending)?;
        let c = mesh.compute_centroid(face);
        mesh.face_mut(face).centroid = c;

        regions.push(region_outline(mesh, barrier));
    }

    log::info!(
        "merged level <= {} seen from ({}, {}) into {} regions",
        k,
        guard.x,
        guard.y,
        regions.len()
    );
    Ok(regions)
}

/// Centroid order: larger y first, then larger x.
fn topmost_first(mesh: &HalfEdgeMesh, a: FaceId, b: FaceId) -> Ordering {
    let (ca, cb) = (mesh.face(a).centroid, mesh.face(b).centroid);
    cb.y.total_cmp(&ca.y).then(cb.x.total_cmp(&ca.x))
}

/// A boundary half-edge of `face` whose other side is above `k`.
fn find_barrier(mesh: &HalfEdgeMesh, face: FaceId, k: u32) -> Option<HalfEdgeId> {
    mesh.face_halfedges(face).find(|&he| {
        let other = mesh.face_of(mesh.twin(he));
        !mesh.face(other).level_at_most(k)
    })
}

/// Walk `face` from `barrier`, joining every qualifying neighbour and
/// dropping dangling edges the joins leave behind.
fn absorb_neighbours(
    mesh: &mut HalfEdgeMesh,
    face: FaceId,
    barrier: HalfEdgeId,
    k: u32,
    pending: &mut Vec<FaceId>,
) -> Result<()> {
    let mut he = mesh.next(barrier);
    while he != barrier {
        let twin = mesh.twin(he);
        let other = mesh.face_of(twin);

        if other != face && mesh.face(other).level_at_most(k) {
            let resume = mesh.next(twin);
            let gone = mesh.join_faces(he)?;
            pending.retain(|&f| f != gone);
            he = resume;
        } else if other == face && mesh.next(he) == twin {
            let mut resume = mesh.remove_spur(he);
            // Removing one spur can expose the next one along a shared chain.
            loop {
                let before = mesh.prev(resume);
                if before != barrier && mesh.next(before) == mesh.twin(before) {
                    resume = mesh.remove_spur(before);
                } else {
                    break;
                }
            }
            he = resume;
        } else {
            he = mesh.next(he);
        }
    }
    Ok(())
}

/// Boundary of the region through `start`, without collinear vertices,
/// rotated to begin at its leftmost-then-topmost vertex.
fn region_outline(mesh: &HalfEdgeMesh, start: HalfEdgeId) -> Vec<Point2<f64>> {
    let mut ring: Vec<Point2<f64>> = Vec::new();
    for he in mesh.cycle(start) {
        let p = *mesh.position(mesh.origin(he));
        let n = ring.len();
        if n >= 2 && are_collinear(&ring[n - 2], &ring[n - 1], &p) {
            ring.pop();
        }
        ring.push(p);
    }

    let n = ring.len();
    if n >= 3 && are_collinear(&ring[n - 2], &ring[n - 1], &ring[0]) {
        ring.pop();
    }
    let n = ring.len();
    if n >= 3 && are_collinear(&ring[1], &ring[0], &ring[n - 1]) {
        ring.remove(0);
    }

    let mut first = 0;
    for (i, p) in ring.iter().enumerate() {
        let best = ring[first];
        if p.x < best.x || (p.x == best.x && p.y > best.y) {
            first = i;
        }
    }
    ring.rotate_left(first);
    ring
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algo::{compute_visibility, seed_partitions};
    use crate::geom::{point_on_segment, points_coincide};
    use crate::mesh::build_from_polygon;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    fn l_shape() -> HalfEdgeMesh {
        build_from_polygon(&[
            p(0.0, 0.0),
            p(4.0, 0.0),
            p(4.0, 2.0),
            p(2.0, 2.0),
            p(2.0, 4.0),
            p(0.0, 4.0),
        ])
        .unwrap()
    }

    fn assert_ring(actual: &[Point2<f64>], expected: &[Point2<f64>]) {
        assert_eq!(actual.len(), expected.len(), "{:?}", actual);
        for (a, e) in actual.iter().zip(expected) {
            assert!(points_coincide(a, e), "{:?} != {:?}", actual, expected);
        }
    }

    #[test]
    fn test_odd_level_rejected() {
        let mut mesh = l_shape();
        compute_visibility(&mut mesh, p(4.0, 0.0)).unwrap();
        assert!(matches!(
            merge_faces(&mut mesh, p(4.0, 0.0), 1),
            Err(MeshError::OddLevel { level: 1 })
        ));
    }

    #[test]
    fn test_unlabelled_mesh_gives_no_regions() {
        let mut mesh = l_shape();
        assert!(merge_faces(&mut mesh, p(4.0, 0.0), 4).unwrap().is_empty());
    }

    #[test]
    fn test_single_face_region() {
        let mut mesh = build_from_polygon(&[p(0.0, 0.0), p(3.0, 0.0), p(3.0, 3.0), p(0.0, 3.0)])
            .unwrap();
        compute_visibility(&mut mesh, p(0.0, 0.0)).unwrap();
        let regions = merge_faces(&mut mesh, p(0.0, 0.0), 0).unwrap();
        assert_eq!(regions.len(), 1);
        assert_ring(&regions[0], &[p(0.0, 3.0), p(0.0, 0.0), p(3.0, 0.0), p(3.0, 3.0)]);
    }

    #[test]
    fn test_visible_part_of_l_shape() {
        let mut mesh = l_shape();
        compute_visibility(&mut mesh, p(4.0, 0.0)).unwrap();

        let regions = merge_faces(&mut mesh, p(4.0, 0.0), 0).unwrap();
        assert_eq!(regions.len(), 1);
        assert_ring(
            &regions[0],
            &[p(0.0, 4.0), p(0.0, 0.0), p(4.0, 0.0), p(4.0, 2.0), p(2.0, 2.0)],
        );
    }

    #[test]
    fn test_whole_l_shape_at_level_two() {
        let mut mesh = l_shape();
        compute_visibility(&mut mesh, p(4.0, 0.0)).unwrap();

        let regions = merge_faces(&mut mesh, p(4.0, 0.0), 2).unwrap();
        assert_eq!(regions.len(), 1);
        assert_ring(
            &regions[0],
            &[
                p(0.0, 4.0),
                p(0.0, 0.0),
                p(4.0, 0.0),
                p(4.0, 2.0),
                p(2.0, 2.0),
                p(2.0, 4.0),
            ],
        );
        assert_eq!(mesh.num_faces(), 1);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_merged_cells_drop_collinear_vertices() {
        let mut mesh = l_shape();
        let grid = [(p(2.0, 2.0), p(2.0, 0.0)), (p(2.0, 2.0), p(0.0, 2.0))];
        seed_partitions(&mut mesh, &grid).unwrap();
        compute_visibility(&mut mesh, p(4.0, 2.0)).unwrap();

        let boundaries: Vec<(Point2<f64>, Point2<f64>)> = mesh
            .face_ids()
            .filter(|&f| mesh.face(f).level_at_most(0))
            .flat_map(|f| mesh.face_halfedges(f).map(|he| mesh.segment(he)).collect::<Vec<_>>())
            .collect();

        let regions = merge_faces(&mut mesh, p(4.0, 2.0), 0).unwrap();
        assert_eq!(regions.len(), 1);
        assert_ring(&regions[0], &[p(0.0, 2.0), p(0.0, 0.0), p(4.0, 0.0), p(4.0, 2.0)]);

        for v in regions.iter().flatten() {
            assert!(boundaries.iter().any(|(a, b)| point_on_segment(v, a, b)));
        }
        assert_eq!(mesh.num_faces(), 2);
        assert!(mesh.is_valid());
    }

    #[test]
    fn test_guard_left_isolated_by_merge_is_rejected() {
        // A T of chords whose junction loses every edge once all cells merge.
        let mut mesh = build_from_polygon(&[p(0.0, 0.0), p(3.0, 0.0), p(3.0, 3.0), p(0.0, 3.0)])
            .unwrap();
        mesh.insert_chord(p(0.0, 1.0), p(3.0, 1.0)).unwrap();
        mesh.insert_chord(p(1.0, 1.0), p(1.0, 3.0)).unwrap();
        mesh.update_centroids();
        for f in mesh.face_ids().collect::<Vec<_>>() {
            mesh.face_mut(f).level = Some(0);
        }

        let regions = merge_faces(&mut mesh, p(0.0, 0.0), 0).unwrap();
        assert_eq!(regions.len(), 1);
        assert_ring(&regions[0], &[p(0.0, 3.0), p(0.0, 0.0), p(3.0, 0.0), p(3.0, 3.0)]);

        let junction = mesh.find_vertex(&p(1.0, 1.0)).unwrap();
        assert!(!mesh.vertex(junction).halfedge.is_valid());
        assert!(matches!(
            merge_faces(&mut mesh, p(1.0, 1.0), 0),
            Err(MeshError::PointNotOnMesh { .. })
        ));
    }

    #[test]
    fn test_region_around_hidden_cell_keeps_a_slit() {
        // 3x3 grid whose centre cell is hidden and ringed by visible cells.
        let mut mesh = build_from_polygon(&[p(0.0, 0.0), p(3.0, 0.0), p(3.0, 3.0), p(0.0, 3.0)])
            .unwrap();
        mesh.insert_chord(p(1.0, 0.0), p(1.0, 3.0)).unwrap();
        mesh.insert_chord(p(2.0, 0.0), p(2.0, 3.0)).unwrap();
        mesh.insert_chord(p(0.0, 1.0), p(3.0, 1.0)).unwrap();
        mesh.insert_chord(p(0.0, 2.0), p(3.0, 2.0)).unwrap();
        mesh.update_centroids();
        assert_eq!(mesh.num_faces(), 9);
        for f in mesh.face_ids().collect::<Vec<_>>() {
            let c = mesh.face(f).centroid;
            let hidden = c.x > 1.0 && c.x < 2.0 && c.y > 1.0 && c.y < 2.0;
            mesh.face_mut(f).level = Some(if hidden { 2 } else { 0 });
        }

        let regions = merge_faces(&mut mesh, p(0.0, 0.0), 0).unwrap();
        assert_eq!(regions.len(), 1);
        assert!(mesh.is_valid());
        assert_eq!(mesh.num_faces(), 2);

        // Eight cells in a ring need seven joins, so one grid edge stays as
        // a slit connecting the outer boundary to the hidden cell.
        let merged = mesh
            .face_ids()
            .find(|&f| mesh.face(f).level == Some(0))
            .unwrap();
        let slits = mesh
            .face_halfedges(merged)
            .filter(|&he| mesh.face_of(mesh.twin(he)) == merged)
            .count();
        assert_eq!(slits, 2);

        let ring = &regions[0];
        assert!(ring.len() > 4, "{:?}", ring);
        assert!(points_coincide(&ring[0], &p(0.0, 3.0)));
        for corner in [p(0.0, 0.0), p(3.0, 0.0), p(3.0, 3.0)] {
            assert!(ring.iter().any(|v| points_coincide(v, &corner)));
        }
        let hole_corners = [p(1.0, 1.0), p(2.0, 1.0), p(2.0, 2.0), p(1.0, 2.0)]
            .iter()
            .filter(|c| ring.iter().any(|v| points_coincide(v, c)))
            .count();
        assert!(hole_corners >= 3, "{:?}", ring);
    }

    #[test]
    fn test_separate_regions_reported_topmost_first() {
        // Two level-0 cells separated by a hidden one, seen along the bottom.
        let mut mesh = build_from_polygon(&[
            p(0.0, 0.0),
            p(6.0, 0.0),
            p(6.0, 2.0),
            p(0.0, 2.0),
        ])
        .unwrap();
        mesh.insert_chord(p(2.0, 0.0), p(2.0, 2.0)).unwrap();
        mesh.insert_chord(p(4.0, 0.0), p(4.0, 2.0)).unwrap();
        mesh.update_centroids();
        for f in mesh.face_ids().collect::<Vec<_>>() {
            let c = mesh.face(f).centroid;
            let level = if c.x > 2.0 && c.x < 4.0 { 2 } else { 0 };
            mesh.face_mut(f).level = Some(level);
        }

        let regions = merge_faces(&mut mesh, p(0.0, 0.0), 0).unwrap();
        assert_eq!(regions.len(), 2);
        // Equal heights: rightmost first.
        assert_ring(&regions[0], &[p(4.0, 2.0), p(4.0, 0.0), p(6.0, 0.0), p(6.0, 2.0)]);
        assert_ring(&regions[1], &[p(0.0, 2.0), p(0.0, 0.0), p(2.0, 0.0), p(2.0, 2.0)]);
    }
}
