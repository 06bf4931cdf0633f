//! Seeding of horizontal/vertical partition segments.
//!
//! A partition grid usually arrives as short segments between grid points,
//! many of which start or end inside the polygon. Chords can only run
//! between points already on the subdivision, so each segment starting on
//! the boundary is extended through collinear continuation segments until it
//! reaches the boundary again, and only then inserted.

use nalgebra::Point2;

use crate::error::Result;
use crate::geom::{are_collinear, point_on_segment, points_coincide};
use crate::mesh::HalfEdgeMesh;

/// Segments sharing an origin, in input order.
struct OriginGroup {
    origin: Point2<f64>,
    ends: Vec<Point2<f64>>,
}

fn group_by_origin(segments: &[(Point2<f64>, Point2<f64>)]) -> Vec<OriginGroup> {
    let mut groups: Vec<OriginGroup> = Vec::new();
    for &(origin, end) in segments {
        match groups.iter_mut().find(|g| points_coincide(&g.origin, &origin)) {
            Some(group) => group.ends.push(end),
            None => groups.push(OriginGroup {
                origin,
                ends: vec![end],
            }),
        }
    }
    groups
}

/// Whether `pq` lies on a single polygon edge.
fn on_polygon_edge(boundary: &[(Point2<f64>, Point2<f64>)], p: &Point2<f64>, q: &Point2<f64>) -> bool {
    boundary
        .iter()
        .any(|(a, b)| point_on_segment(p, a, b) && point_on_segment(q, a, b))
}

/// Extend `origin -> end` through continuation segments until `end` lies on
/// the polygon boundary. Returns `None` if the chain stops inside.
fn extend_to_boundary(
    mesh: &HalfEdgeMesh,
    groups: &[OriginGroup],
    origin: Point2<f64>,
    mut end: Point2<f64>,
) -> Option<Point2<f64>> {
    // Every step moves `end` strictly forward, so a chain cannot revisit a group.
    for _ in 0..=groups.len() {
        if mesh.on_polygon_boundary(&end) {
            return Some(end);
        }
        let current = end;
        let forward = current - origin;
        let group = groups.iter().find(|g| points_coincide(&g.origin, &current))?;
        end = *group.ends.iter().find(|&&next| {
            are_collinear(&origin, &current, &next) && (next - current).dot(&forward) > 0.0
        })?;
    }
    None
}

/// Insert partition segments as chords.
///
/// Segments are grouped by origin. A segment is skipped when it lies on a
/// polygon edge, when its origin is not on the polygon boundary, when it
/// cannot be extended to the boundary, or when it duplicates a segment
/// already inserted. Returns the number of chords inserted.
pub fn seed_partitions(
    mesh: &mut HalfEdgeMesh,
    segments: &[(Point2<f64>, Point2<f64>)],
) -> Result<usize> {
    let boundary = mesh.polygon_segments();
    let groups = group_by_origin(segments);
    let mut inserted: Vec<(Point2<f64>, Point2<f64>)> = Vec::new();

    for group in &groups {
        let origin = group.origin;
        if !mesh.on_polygon_boundary(&origin) {
            log::trace!("partition origin ({}, {}) is inside the polygon", origin.x, origin.y);
            continue;
        }

        for &first_end in &group.ends {
            if on_polygon_edge(&boundary, &origin, &first_end) {
                continue;
            }
            let Some(end) = extend_to_boundary(mesh, &groups, origin, first_end) else {
                log::debug!(
                    "partition from ({}, {}) never reaches the boundary",
                    origin.x,
                    origin.y
                );
                continue;
            };
            if inserted.iter().any(|(a, b)| {
                (points_coincide(a, &origin) && points_coincide(b, &end))
                    || (points_coincide(a, &end) && points_coincide(b, &origin))
            }) {
                continue;
            }

            mesh.insert_chord(origin, end)?;
            inserted.push((origin, end));
        }
    }

    log::debug!("seeded {} of {} partition segments", inserted.len(), segments.len());
    Ok(inserted.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::build_from_polygon;

    fn p(x: f64, y: f64) -> Point2<f64> {
        Point2::new(x, y)
    }

    fn square(size: f64) -> HalfEdgeMesh {
        build_from_polygon(&[p(0.0, 0.0), p(size, 0.0), p(size, size), p(0.0, size)]).unwrap()
    }

    #[test]
    fn test_grid_chains_are_extended() {
        let mut mesh = square(3.0);
        // x = 1 and y = 1 split in unit steps, as a grid generator writes them.
        let grid = [
            (p(1.0, 0.0), p(1.0, 1.0)),
            (p(1.0, 1.0), p(1.0, 2.0)),
            (p(1.0, 2.0), p(1.0, 3.0)),
            (p(0.0, 1.0), p(1.0, 1.0)),
            (p(1.0, 1.0), p(2.0, 1.0)),
            (p(2.0, 1.0), p(3.0, 1.0)),
        ];
        assert_eq!(seed_partitions(&mut mesh, &grid).unwrap(), 2);
        assert_eq!(mesh.num_faces(), 4);
        assert!(mesh.is_valid());
        assert_eq!(mesh.euler_characteristic(), 2);
    }

    #[test]
    fn test_boundary_and_duplicate_segments_are_skipped() {
        let mut mesh = square(3.0);
        let grid = [
            (p(0.0, 0.0), p(3.0, 0.0)),
            (p(1.0, 0.0), p(2.0, 0.0)),
            (p(1.0, 0.0), p(1.0, 3.0)),
            (p(1.0, 3.0), p(1.0, 0.0)),
        ];
        assert_eq!(seed_partitions(&mut mesh, &grid).unwrap(), 1);
        assert_eq!(mesh.num_faces(), 2);
    }

    #[test]
    fn test_dead_end_chain_is_dropped() {
        let mut mesh = square(3.0);
        let grid = [(p(1.0, 0.0), p(1.0, 1.0)), (p(1.5, 1.5), p(1.5, 3.0))];
        assert_eq!(seed_partitions(&mut mesh, &grid).unwrap(), 0);
        assert_eq!(mesh.num_faces(), 1);
    }
}
