//! Tolerance-based predicates.

use nalgebra::Point2;

use super::{segment_intersect, EPSILON, RAY_FAR_X, RAY_OFFSET};

/// Cross product of `(a - o)` and `(b - o)`; positive when `o, a, b` turn left.
#[inline]
pub fn cross(o: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Squared Euclidean distance.
#[inline]
pub fn distance_squared(a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    (b - a).norm_squared()
}

/// Vertex equality: both coordinate differences below [`EPSILON`].
#[inline]
pub fn points_coincide(a: &Point2<f64>, b: &Point2<f64>) -> bool {
    (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
}

/// Whether `a`, `b`, `c` lie on a common line, within [`EPSILON`] on the
/// cross product.
#[inline]
pub fn are_collinear(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> bool {
    cross(a, b, c).abs() < EPSILON
}

/// Whether `p` lies within [`EPSILON`] of the closed segment `ab`.
pub fn point_on_segment(p: &Point2<f64>, a: &Point2<f64>, b: &Point2<f64>) -> bool {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq == 0.0 {
        return points_coincide(p, a);
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    let closest = a + ab * t;
    distance_squared(p, &closest) < EPSILON * EPSILON
}

/// Whether closed segments `ab` and `cd` share at least one point, including
/// collinear overlap and touching endpoints.
pub fn segments_touch(
    a: &Point2<f64>,
    b: &Point2<f64>,
    c: &Point2<f64>,
    d: &Point2<f64>,
) -> bool {
    let d1 = cross(c, d, a);
    let d2 = cross(c, d, b);
    let d3 = cross(a, b, c);
    let d4 = cross(a, b, d);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    point_on_segment(a, c, d)
        || point_on_segment(b, c, d)
        || point_on_segment(c, a, b)
        || point_on_segment(d, a, b)
}

/// Signed area of a ring (shoelace formula); positive for CCW order.
pub fn polygon_signed_area(ring: &[Point2<f64>]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let n = ring.len();
    let twice: f64 = (0..n)
        .map(|i| {
            let j = (i + 1) % n;
            ring[i].x * ring[j].y - ring[j].x * ring[i].y
        })
        .sum();
    twice / 2.0
}

/// Parity test: does segment `pq` lie inside the polygon bounded by `boundary`?
///
/// A ray is cast from the segment's midpoint, nudged by [`RAY_OFFSET`] on
/// both axes, to a point far to the right. A crossing landing on an edge's
/// end point is not counted, so a vertex shared by two consecutive boundary
/// edges is counted once. An odd crossing count means inside.
pub fn segment_in_polygon<'a, I>(p: &Point2<f64>, q: &Point2<f64>, boundary: I) -> bool
where
    I: IntoIterator<Item = &'a (Point2<f64>, Point2<f64>)>,
{
    let center = Point2::new(
        (p.x + q.x) / 2.0 + RAY_OFFSET,
        (p.y + q.y) / 2.0 + RAY_OFFSET,
    );
    let far = Point2::new(RAY_FAR_X, center.y);

    let crossings = boundary
        .into_iter()
        .filter_map(|(a, b)| segment_intersect(center, far, *a, *b).map(|i| (i, b)))
        .filter(|(i, b)| !points_coincide(i, b))
        .count();

    crossings % 2 == 1
}
