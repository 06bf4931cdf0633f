//! Visibility propagation from a guard vertex.
//!
//! For every polygon vertex `v` the line through the guard and `v` is cut
//! against the polygon boundary. The hits beyond `v`, together with `v`
//! itself, are sorted from far to near; each consecutive pair bounds a piece
//! of the sightline lying behind an obstruction, and the pieces inside the
//! polygon become occlusion chords. Once all chords are in, every face gets
//! a visibility level: the number of distinct boundary crossings between the
//! guard and its centroid, rounded up to even.
//!
//! # Example
//!
//! ```
//! use sightmesh::algo::compute_visibility;
//! use sightmesh::mesh::build_from_polygon;
//! use nalgebra::Point2;
//!
//! // L-shape with the reflex corner at (2, 2).
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
//! compute_visibility(&mut mesh, Point2::new(4.0, 0.0)).unwrap();
//! assert_eq!(mesh.num_faces(), 2);
//! ```

use nalgebra::Point2;

use super::Progress;
use crate::error::{MeshError, Result};
use crate::geom::{
    distance_squared, line_intersect, points_coincide, segment_in_polygon, segment_intersect,
};
use crate::mesh::{FaceId, HalfEdgeMesh};

/// Options for visibility propagation.
#[derive(Debug, Clone, Default)]
pub struct VisibilityOptions {
    /// Log and skip occlusion chords the mesh rejects instead of failing.
    pub skip_invalid_chords: bool,
}

impl VisibilityOptions {
    /// Set whether rejected occlusion chords are skipped.
    pub fn with_skip_invalid_chords(mut self, skip: bool) -> Self {
        self.skip_invalid_chords = skip;
        self
    }
}

/// Insert the occlusion chords seen from `guard` and label every face with
/// its visibility level.
///
/// `guard` must coincide with a vertex of the mesh. Returns the number of
/// occlusion chords accepted.
pub fn compute_visibility(mesh: &mut HalfEdgeMesh, guard: Point2<f64>) -> Result<usize> {
    compute_visibility_internal(mesh, guard, &VisibilityOptions::default(), None)
}

/// [`compute_visibility`] with explicit options.
pub fn compute_visibility_with_options(
    mesh: &mut HalfEdgeMesh,
    guard: Point2<f64>,
    options: &VisibilityOptions,
) -> Result<usize> {
    compute_visibility_internal(mesh, guard, options, None)
}

/// [`compute_visibility`] with options and progress reporting.
pub fn compute_visibility_with_progress(
    mesh: &mut HalfEdgeMesh,
    guard: Point2<f64>,
    options: &VisibilityOptions,
    progress: &Progress,
) -> Result<usize> {
    compute_visibility_internal(mesh, guard, options, Some(progress))
}

fn compute_visibility_internal(
    mesh: &mut HalfEdgeMesh,
    guard: Point2<f64>,
    options: &VisibilityOptions,
    progress: Option<&Progress>,
) -> Result<usize> {
    match mesh.find_vertex(&guard) {
        Some(v) if mesh.vertex(v).halfedge.is_valid() => {}
        _ => return Err(MeshError::off_mesh(&guard)),
    }

    let boundary = mesh.polygon_segments();
    let corners: Vec<Point2<f64>> = mesh
        .polygon_vertices()
        .iter()
        .map(|&v| *mesh.position(v))
        .collect();
    let total_steps = corners.len() + 1;

    // Accepted chords as (far, near), in either orientation a duplicate.
    let mut accepted: Vec<(Point2<f64>, Point2<f64>)> = Vec::new();

    for (step, v) in corners.iter().enumerate() {
        if let Some(p) = progress {
            p.report(step, total_steps, "Casting sightlines");
        }
        if points_coincide(v, &guard) {
            continue;
        }

        let hits = sightline_hits(&guard, v, &boundary);
        let axis_aligned = v.x == guard.x || v.y == guard.y;

        for pair in hits.windows(2) {
            let (far, near) = (pair[0], pair[1]);
            if accepted.iter().any(|(a, b)| {
                (points_coincide(a, &far) && points_coincide(b, &near))
                    || (points_coincide(a, &near) && points_coincide(b, &far))
            }) {
                continue;
            }
            if axis_aligned && runs_along_partition(mesh, &corners, v, &far, &near) {
                continue;
            }
            if !segment_in_polygon(&near, &far, &boundary) {
                continue;
            }

            // The parity test can misread a thin sliver outside the polygon.
            if let Err(MeshError::ChordOutsidePolygon { x, y }) = mesh.chord_stops(near, far) {
                log::debug!(
                    "discarding candidate ({}, {}) -> ({}, {}): leaves the polygon near ({}, {})",
                    near.x,
                    near.y,
                    far.x,
                    far.y,
                    x,
                    y
                );
                continue;
            }

            match mesh.insert_chord(near, far) {
                Ok(_) => accepted.push((far, near)),
                Err(e) if options.skip_invalid_chords => {
                    log::warn!(
                        "skipping occlusion chord ({}, {}) -> ({}, {}): {}",
                        near.x,
                        near.y,
                        far.x,
                        far.y,
                        e
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    assign_levels_internal(mesh, &guard, &boundary, progress, total_steps);

    log::info!(
        "visibility from ({}, {}): {} occlusion chords, {} faces",
        guard.x,
        guard.y,
        accepted.len(),
        mesh.num_faces()
    );
    Ok(accepted.len())
}

/// Boundary hits of the line through `guard` and `v` lying beyond `v`,
/// followed by `v`, ordered from farthest to nearest.
fn sightline_hits(
    guard: &Point2<f64>,
    v: &Point2<f64>,
    boundary: &[(Point2<f64>, Point2<f64>)],
) -> Vec<Point2<f64>> {
    let dir = v - guard;
    let len_sq = dir.norm_squared();

    let mut hits: Vec<Point2<f64>> = boundary
        .iter()
        .filter_map(|(a, b)| line_intersect(*guard, *v, *a, *b))
        .filter(|i| !points_coincide(i, v) && (i - guard).dot(&dir) / len_sq > 1.0)
        .collect();
    hits.push(*v);

    hits.sort_by(|a, b| distance_squared(b, guard).total_cmp(&distance_squared(a, guard)));
    hits.dedup_by(|a, b| points_coincide(a, b));
    hits
}

/// Axis-aligned sightlines run along the horizontal/vertical partition
/// grid. Their candidates touching `v`, an existing edge or a polygon corner
/// are already part of the subdivision.
fn runs_along_partition(
    mesh: &HalfEdgeMesh,
    corners: &[Point2<f64>],
    v: &Point2<f64>,
    far: &Point2<f64>,
    near: &Point2<f64>,
) -> bool {
    if points_coincide(far, v) || points_coincide(near, v) {
        return true;
    }
    if let (Some(a), Some(b)) = (mesh.find_vertex(near), mesh.find_vertex(far)) {
        if mesh.find_halfedge(a, b).is_some() {
            return true;
        }
    }
    corners
        .iter()
        .any(|c| points_coincide(c, far) || points_coincide(c, near))
}

/// Visibility level of a point seen from `guard`.
///
/// Counts the distinct points where segment `guard -> p` meets the boundary,
/// ignoring the end points themselves, rounded up to even.
pub fn crossing_level(
    guard: &Point2<f64>,
    p: &Point2<f64>,
    boundary: &[(Point2<f64>, Point2<f64>)],
) -> u32 {
    let mut hits: Vec<Point2<f64>> = Vec::new();
    for (a, b) in boundary {
        if let Some(i) = segment_intersect(*guard, *p, *a, *b) {
            if !points_coincide(&i, guard)
                && !points_coincide(&i, p)
                && !hits.iter().any(|h| points_coincide(h, &i))
            {
                hits.push(i);
            }
        }
    }
    let count = hits.len() as u32;
    count + count % 2
}

/// Recompute every face's centroid and visibility level as seen from `guard`.
///
/// The exterior face keeps no level, which ranks it above every `k`.
pub fn assign_levels(mesh: &mut HalfEdgeMesh, guard: &Point2<f64>) {
    let boundary = mesh.polygon_segments();
    assign_levels_internal(mesh, guard, &boundary, None, 1);
}

fn assign_levels_internal(
    mesh: &mut HalfEdgeMesh,
    guard: &Point2<f64>,
    boundary: &[(Point2<f64>, Point2<f64>)],
    progress: Option<&Progress>,
    total_steps: usize,
) {
    mesh.update_centroids();
    mesh.face_mut(FaceId::EXTERIOR).level = None;

    let faces: Vec<FaceId> = mesh.face_ids().collect();
    for (i, &f) in faces.iter().enumerate() {
        let level = crossing_level(guard, &mesh.face(f).centroid, boundary);
        mesh.face_mut(f).level = Some(level);

        if let Some(p) = progress {
            p.report_sub(i + 1, faces.len(), total_steps - 1, total_steps, "Assigning levels");
        }
    }
}
