//! Segment and line intersection in slope/intercept form.

use nalgebra::Point2;

use super::DECIMAL_PLACES;

/// Round a coordinate to [`DECIMAL_PLACES`] decimals, halves away from zero.
#[inline]
pub fn round_coord(v: f64) -> f64 {
    let scale = 10f64.powi(DECIMAL_PLACES);
    (v * scale).round() / scale
}

/// Axis-aligned window an intersection point must fall into.
#[derive(Debug, Clone, Copy)]
struct Extent {
    min_x: f64,
    max_x: f64,
    min_y: f64,
    max_y: f64,
}

impl Extent {
    fn of(a: &Point2<f64>, b: &Point2<f64>) -> Self {
        Self {
            min_x: a.x.min(b.x),
            max_x: a.x.max(b.x),
            min_y: a.y.min(b.y),
            max_y: a.y.max(b.y),
        }
    }

    fn overlap(&self, other: &Extent) -> Self {
        Self {
            min_x: self.min_x.max(other.min_x),
            max_x: self.max_x.min(other.max_x),
            min_y: self.min_y.max(other.min_y),
            max_y: self.max_y.min(other.max_y),
        }
    }

    fn rounded(self) -> Self {
        Self {
            min_x: round_coord(self.min_x),
            max_x: round_coord(self.max_x),
            min_y: round_coord(self.min_y),
            max_y: round_coord(self.max_y),
        }
    }

    fn contains(&self, p: &Point2<f64>) -> bool {
        p.x >= self.min_x && p.x <= self.max_x && p.y >= self.min_y && p.y <= self.max_y
    }
}

/// Slope and intercept of the (non-vertical) line through `a` and `b`.
#[inline]
fn slope_intercept(a: &Point2<f64>, b: &Point2<f64>) -> (f64, f64) {
    let m = (b.y - a.y) / (b.x - a.x);
    (m, b.y - m * b.x)
}

/// Crossing of the infinite lines `ab` and `cd`, rounded.
///
/// Vertical lines are branched on explicitly so no slope is ever infinite.
/// Two vertical lines, or two lines of equal slope, have no crossing.
fn line_crossing(
    a: &Point2<f64>,
    b: &Point2<f64>,
    c: &Point2<f64>,
    d: &Point2<f64>,
) -> Option<Point2<f64>> {
    let ab_vertical = a.x == b.x;
    let cd_vertical = c.x == d.x;

    match (ab_vertical, cd_vertical) {
        (true, true) => None,
        (true, false) => {
            let (m2, b2) = slope_intercept(c, d);
            Some(Point2::new(round_coord(a.x), round_coord(m2 * a.x + b2)))
        }
        (false, true) => {
            let (m1, b1) = slope_intercept(a, b);
            Some(Point2::new(round_coord(c.x), round_coord(m1 * c.x + b1)))
        }
        (false, false) => {
            let (m1, b1) = slope_intercept(a, b);
            let (m2, b2) = slope_intercept(c, d);
            if m1 == m2 {
                return None;
            }
            let x = if b1 != b2 { (b2 - b1) / (m1 - m2) } else { 0.0 };
            Some(Point2::new(round_coord(x), round_coord(m1 * x + b1)))
        }
    }
}

/// Intersection point of segments `ab` and `cd`.
///
/// The point is returned only if it lies inside both segments' bounding
/// extents. Collinear or parallel segments (including two vertical ones)
/// have no intersection here, whatever their overlap.
pub fn segment_intersect(
    a: Point2<f64>,
    b: Point2<f64>,
    c: Point2<f64>,
    d: Point2<f64>,
) -> Option<Point2<f64>> {
    let extent = Extent::of(&a, &b).overlap(&Extent::of(&c, &d)).rounded();
    line_crossing(&a, &b, &c, &d).filter(|p| extent.contains(p))
}

/// Intersection point of the infinite line through `a`, `b` with segment `cd`.
///
/// Only `cd`'s extent is checked. Used for sightlines, which are tested
/// against every boundary edge regardless of where the guard sits.
pub fn line_intersect(
    a: Point2<f64>,
    b: Point2<f64>,
    c: Point2<f64>,
    d: Point2<f64>,
) -> Option<Point2<f64>> {
    let extent = Extent::of(&c, &d).rounded();
    line_crossing(&a, &b, &c, &d).filter(|p| extent.contains(p))
}
