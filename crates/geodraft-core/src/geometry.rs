//! Geometry kernel.
//!
//! Stateless helpers shared by hit-testing, snapping and the construction
//! tools. Every function is total: degenerate inputs (zero-length segments,
//! collapsed curves) fall back to a well-defined answer instead of dividing
//! by zero. The one fallible operation is [`circumcircle`].

use kurbo::{Point, Rect, Vec2};
use std::f64::consts::TAU;
use thiserror::Error;

/// Determinant magnitude below which three points count as collinear.
pub const COLLINEAR_EPSILON: f64 = 1e-6;

/// Lowest sampling resolution accepted for curve approximation.
pub const MIN_CURVE_SAMPLES: usize = 32;

/// Default sampling resolution for curve hit-testing.
pub const DEFAULT_CURVE_SAMPLES: usize = 200;

/// Errors produced by the geometry kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("points are collinear, no circle passes through all three")]
    Collinear,
}

/// Euclidean distance between two points.
pub fn distance(p: Point, q: Point) -> f64 {
    p.distance(q)
}

/// Squared distance between two points.
pub fn distance_squared(p: Point, q: Point) -> f64 {
    p.distance_squared(q)
}

/// Parametric position of the projection of `p` onto the line through `a`
/// and `b`, or `None` when `a` and `b` coincide.
fn projection_param(p: Point, a: Point, b: Point) -> Option<f64> {
    let ab = b - a;
    let len_sq = ab.hypot2();
    if len_sq < f64::EPSILON {
        return None;
    }
    Some((p - a).dot(ab) / len_sq)
}

fn distance_at_param(p: Point, a: Point, b: Point, t: f64) -> f64 {
    p.distance(a.lerp(b, t))
}

/// Distance from `p` to the segment `ab`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f64 {
    match projection_param(p, a, b) {
        Some(t) => distance_at_param(p, a, b, t.clamp(0.0, 1.0)),
        None => p.distance(a),
    }
}

/// Distance from `p` to the infinite line through `a` and `b`.
pub fn distance_to_infinite_line(p: Point, a: Point, b: Point) -> f64 {
    match projection_param(p, a, b) {
        Some(t) => distance_at_param(p, a, b, t),
        None => p.distance(a),
    }
}

/// Distance from `p` to the ray anchored at `a` heading through `b`.
pub fn distance_to_ray(p: Point, a: Point, b: Point) -> f64 {
    match projection_param(p, a, b) {
        Some(t) => distance_at_param(p, a, b, t.max(0.0)),
        None => p.distance(a),
    }
}

/// Distance from `p` to the boundary of a circle.
pub fn distance_to_circle_boundary(p: Point, center: Point, radius: f64) -> f64 {
    (p.distance(center) - radius).abs()
}

/// Minimum distance from `p` to a chain of segments.
///
/// Returns `f64::INFINITY` for fewer than two vertices.
pub fn distance_to_polyline(p: Point, vertices: &[Point]) -> f64 {
    vertices
        .windows(2)
        .map(|w| distance_to_segment(p, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}

/// Samples an ellipse as a closed chain (first point repeated at the end).
pub fn sample_ellipse(center: Point, a: f64, b: f64, rotation: f64, samples: usize) -> Vec<Point> {
    let samples = samples.max(MIN_CURVE_SAMPLES);
    let (sin_r, cos_r) = rotation.sin_cos();
    (0..=samples)
        .map(|i| {
            let t = TAU * i as f64 / samples as f64;
            let x = a * t.cos();
            let y = b * t.sin();
            Point::new(
                center.x + x * cos_r - y * sin_r,
                center.y + x * sin_r + y * cos_r,
            )
        })
        .collect()
}

/// Approximate distance from `p` to an ellipse outline.
pub fn distance_to_ellipse(
    p: Point,
    center: Point,
    a: f64,
    b: f64,
    rotation: f64,
    samples: usize,
) -> f64 {
    distance_to_polyline(p, &sample_ellipse(center, a, b, rotation, samples))
}

/// Samples the parabola `x² = 4ay` (vertical) or `y² = 4ax` (horizontal),
/// translated to `vertex`, over the free coordinate range `[from, to]`
/// measured relative to the vertex.
pub fn sample_parabola(
    vertex: Point,
    param_a: f64,
    is_vertical: bool,
    from: f64,
    to: f64,
    samples: usize,
) -> Vec<Point> {
    let samples = samples.max(MIN_CURVE_SAMPLES);
    (0..samples)
        .map(|i| {
            let u = from + (to - from) * i as f64 / (samples - 1) as f64;
            let v = u * u / (4.0 * param_a);
            if is_vertical {
                Point::new(vertex.x + u, vertex.y + v)
            } else {
                Point::new(vertex.x + v, vertex.y + u)
            }
        })
        .collect()
}

/// Approximate distance from `p` to a parabola.
///
/// The curve is sampled over a window of `half_range` on either side of the
/// pointer's coordinate along the parabola's free axis. A zero `param_a`
/// collapses the curve onto its axis line.
pub fn distance_to_parabola(
    p: Point,
    vertex: Point,
    param_a: f64,
    is_vertical: bool,
    half_range: f64,
    samples: usize,
) -> f64 {
    let axis = if is_vertical { Vec2::new(0.0, 1.0) } else { Vec2::new(1.0, 0.0) };
    if param_a.abs() < f64::EPSILON {
        return distance_to_infinite_line(p, vertex, vertex + axis);
    }
    let local = p - vertex;
    let center = if is_vertical { local.x } else { local.y };
    let pts = sample_parabola(
        vertex,
        param_a,
        is_vertical,
        center - half_range,
        center + half_range,
        samples,
    );
    distance_to_polyline(p, &pts)
}

/// Samples both branches of the hyperbola `x²/a² − y²/b² = 1` (or the
/// vertical variant `y²/a² − x²/b² = 1`) for hyperbolic parameter
/// `t ∈ [-t_max, t_max]`.
pub fn sample_hyperbola(
    center: Point,
    a: f64,
    b: f64,
    is_vertical: bool,
    t_max: f64,
    samples: usize,
) -> [Vec<Point>; 2] {
    let samples = samples.max(MIN_CURVE_SAMPLES);
    let branch = |sign: f64| -> Vec<Point> {
        (0..samples)
            .map(|i| {
                let t = -t_max + 2.0 * t_max * i as f64 / (samples - 1) as f64;
                let along = sign * a * t.cosh();
                let across = b * t.sinh();
                if is_vertical {
                    Point::new(center.x + across, center.y + along)
                } else {
                    Point::new(center.x + along, center.y + across)
                }
            })
            .collect()
    };
    [branch(1.0), branch(-1.0)]
}

/// Approximate distance from `p` to either branch of a hyperbola.
///
/// Degenerate hyperbolas (non-positive `a` or `b`) are never hit.
pub fn distance_to_hyperbola(
    p: Point,
    center: Point,
    a: f64,
    b: f64,
    is_vertical: bool,
    half_range: f64,
    samples: usize,
) -> f64 {
    if a <= f64::EPSILON || b <= f64::EPSILON {
        return f64::INFINITY;
    }
    let local = p - center;
    let across = if is_vertical { local.x } else { local.y };
    let t_max = ((across.abs() + half_range) / b).asinh();
    let [right, left] = sample_hyperbola(center, a, b, is_vertical, t_max, samples);
    distance_to_polyline(p, &right).min(distance_to_polyline(p, &left))
}

/// Midpoint of `a` and `b`.
pub fn midpoint(a: Point, b: Point) -> Point {
    a.midpoint(b)
}

/// Point reflection of `p` through `center`.
pub fn reflect_across_point(p: Point, center: Point) -> Point {
    center + (center - p)
}

/// Mirror image of `p` across the infinite line through `a` and `b`.
///
/// A degenerate line (`a == b`) leaves `p` unchanged.
pub fn reflect_across_line(p: Point, a: Point, b: Point) -> Point {
    match projection_param(p, a, b) {
        Some(t) => {
            let foot = a.lerp(b, t);
            foot + (foot - p)
        }
        None => p,
    }
}

/// Rotates `p` counter-clockwise about `center` by `angle_degrees`.
pub fn rotate(p: Point, center: Point, angle_degrees: f64) -> Point {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    let d = p - center;
    Point::new(
        center.x + d.x * cos - d.y * sin,
        center.y + d.x * sin + d.y * cos,
    )
}

/// Circle through three points, as `(center, radius)`.
pub fn circumcircle(p1: Point, p2: Point, p3: Point) -> Result<(Point, f64), GeometryError> {
    let d = 2.0 * (p1.x * (p2.y - p3.y) + p2.x * (p3.y - p1.y) + p3.x * (p1.y - p2.y));
    if d.abs() < COLLINEAR_EPSILON {
        return Err(GeometryError::Collinear);
    }
    let s1 = p1.x * p1.x + p1.y * p1.y;
    let s2 = p2.x * p2.x + p2.y * p2.y;
    let s3 = p3.x * p3.x + p3.y * p3.y;
    let center = Point::new(
        (s1 * (p2.y - p3.y) + s2 * (p3.y - p1.y) + s3 * (p1.y - p2.y)) / d,
        (s1 * (p3.x - p2.x) + s2 * (p1.x - p3.x) + s3 * (p2.x - p1.x)) / d,
    );
    Ok((center, center.distance(p1)))
}

/// Unsigned angle between two directions, in degrees within `[0, 90]`.
///
/// Measured through the absolute cosine, `acos(|v1·v2| / (|v1||v2|))`, so a
/// pair of lines always reports the acute angle between them. Returns `None`
/// if either direction has zero length.
pub fn angle_between_degrees(v1: Vec2, v2: Vec2) -> Option<f64> {
    let denom = v1.hypot() * v2.hypot();
    if denom < f64::EPSILON {
        return None;
    }
    let cos = (v1.dot(v2).abs() / denom).clamp(0.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Clips the parametric line `origin + t·direction` to `rect`, with `t`
/// restricted to `[t_min, ∞)` (use `f64::NEG_INFINITY` for a full line).
///
/// Returns the visible portion as a pair of endpoints, or `None` when the
/// line misses the rectangle.
pub fn clip_line_to_rect(origin: Point, direction: Vec2, t_min: f64, rect: Rect) -> Option<(Point, Point)> {
    if direction.hypot2() < f64::EPSILON {
        return None;
    }
    let mut lo = t_min;
    let mut hi = f64::INFINITY;
    let checks = [
        (-direction.x, origin.x - rect.x0),
        (direction.x, rect.x1 - origin.x),
        (-direction.y, origin.y - rect.y0),
        (direction.y, rect.y1 - origin.y),
    ];
    for (p, q) in checks {
        if p.abs() < f64::EPSILON {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            lo = lo.max(r);
        } else {
            hi = hi.min(r);
        }
        if lo > hi {
            return None;
        }
    }
    if !lo.is_finite() || !hi.is_finite() {
        return None;
    }
    Some((origin + direction * lo, origin + direction * hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_distance_to_segment_clamps() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((distance_to_segment(Point::new(5.0, 3.0), a, b) - 3.0).abs() < EPS);
        assert!((distance_to_segment(Point::new(-4.0, 3.0), a, b) - 5.0).abs() < EPS);
        assert!((distance_to_segment(Point::new(13.0, 4.0), a, b) - 5.0).abs() < EPS);
    }

    #[test]
    fn test_distance_to_degenerate_segment() {
        let a = Point::new(1.0, 1.0);
        assert!((distance_to_segment(Point::new(4.0, 5.0), a, a) - 5.0).abs() < EPS);
    }

    #[test]
    fn test_line_and_ray_extend() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(1.0, 0.0);
        let p = Point::new(-10.0, 2.0);
        assert!((distance_to_infinite_line(p, a, b) - 2.0).abs() < EPS);
        assert!((distance_to_ray(p, a, b) - p.distance(a)).abs() < EPS);
        assert!((distance_to_ray(Point::new(50.0, 2.0), a, b) - 2.0).abs() < EPS);
    }

    #[test]
    fn test_circle_boundary_rotation_invariant() {
        let center = Point::new(1.0, -2.0);
        let p = Point::new(4.0, 2.0);
        let d = distance_to_circle_boundary(p, center, 2.0);
        for deg in [30.0, 90.0, 200.0, 315.0] {
            let q = rotate(p, center, deg);
            assert!((distance_to_circle_boundary(q, center, 2.0) - d).abs() < 1e-9);
        }
        assert!(d >= 0.0);
    }

    #[test]
    fn test_polyline_needs_two_vertices() {
        let p = Point::new(0.0, 0.0);
        assert!(distance_to_polyline(p, &[]).is_infinite());
        assert!(distance_to_polyline(p, &[Point::new(1.0, 1.0)]).is_infinite());
        let d = distance_to_polyline(p, &[Point::new(-1.0, 1.0), Point::new(1.0, 1.0), Point::new(1.0, 5.0)]);
        assert!((d - 1.0).abs() < EPS);
    }

    #[test]
    fn test_ellipse_distance_on_and_off_curve() {
        let c = Point::new(0.0, 0.0);
        let on = distance_to_ellipse(Point::new(2.0, 0.0), c, 2.0, 1.0, 0.0, 200);
        assert!(on < 1e-3);
        let off = distance_to_ellipse(Point::new(0.0, 3.0), c, 2.0, 1.0, 0.0, 200);
        assert!((off - 2.0).abs() < 1e-2);
        // Rotating by a quarter turn swaps the axes.
        let rotated = distance_to_ellipse(Point::new(0.0, 2.0), c, 2.0, 1.0, std::f64::consts::FRAC_PI_2, 200);
        assert!(rotated < 1e-3);
    }

    #[test]
    fn test_parabola_distance() {
        let v = Point::new(1.0, 1.0);
        // x² = 4·0.25·y  =>  y = x²
        let on = distance_to_parabola(Point::new(3.0, 5.0), v, 0.25, true, 4.0, 200);
        assert!(on < 1e-2);
        let at_vertex = distance_to_parabola(Point::new(1.0, 0.5), v, 0.25, true, 4.0, 200);
        assert!((at_vertex - 0.5).abs() < 1e-2);
        let horizontal = distance_to_parabola(Point::new(5.0, 3.0), v, 0.25, false, 4.0, 200);
        assert!(horizontal < 1e-2);
    }

    #[test]
    fn test_parabola_mirror_symmetry() {
        let v = Point::new(0.0, 0.0);
        let left = distance_to_parabola(Point::new(-1.5, 2.0), v, 0.5, true, 4.0, 400);
        let right = distance_to_parabola(Point::new(1.5, 2.0), v, 0.5, true, 4.0, 400);
        assert!((left - right).abs() < 1e-3);
    }

    #[test]
    fn test_hyperbola_both_branches() {
        let c = Point::new(0.0, 0.0);
        assert!(distance_to_hyperbola(Point::new(1.0, 0.0), c, 1.0, 1.0, false, 4.0, 200) < 1e-3);
        assert!(distance_to_hyperbola(Point::new(-1.0, 0.0), c, 1.0, 1.0, false, 4.0, 200) < 1e-3);
        assert!(distance_to_hyperbola(Point::new(0.0, 1.0), c, 1.0, 1.0, true, 4.0, 200) < 1e-3);
        assert!(distance_to_hyperbola(Point::new(0.0, 0.0), c, 0.0, 1.0, false, 4.0, 200).is_infinite());
    }

    #[test]
    fn test_reflections_and_rotation() {
        let p = Point::new(2.0, 1.0);
        assert_eq!(reflect_across_point(p, Point::new(0.0, 0.0)), Point::new(-2.0, -1.0));
        let r = reflect_across_line(p, Point::new(0.0, 0.0), Point::new(1.0, 0.0));
        assert!((r.x - 2.0).abs() < EPS && (r.y + 1.0).abs() < EPS);
        assert_eq!(reflect_across_line(p, Point::new(3.0, 3.0), Point::new(3.0, 3.0)), p);
        let q = rotate(Point::new(1.0, 0.0), Point::new(0.0, 0.0), 90.0);
        assert!(q.x.abs() < EPS && (q.y - 1.0).abs() < EPS);
        assert_eq!(midpoint(Point::new(0.0, 0.0), Point::new(2.0, 0.0)), Point::new(1.0, 0.0));
    }

    #[test]
    fn test_circumcircle_passes_through_points() {
        let pts = [Point::new(0.0, 0.0), Point::new(2.0, 0.0), Point::new(1.0, 1.0)];
        let (center, radius) = circumcircle(pts[0], pts[1], pts[2]).unwrap();
        for p in pts {
            assert!((center.distance(p) - radius).abs() < 1e-4);
        }
        assert!((center.x - 1.0).abs() < EPS && center.y.abs() < EPS);
    }

    #[test]
    fn test_circumcircle_collinear() {
        let result = circumcircle(Point::new(0.0, 0.0), Point::new(1.0, 1.0), Point::new(3.0, 3.0));
        assert_eq!(result, Err(GeometryError::Collinear));
    }

    #[test]
    fn test_angle_between_uses_absolute_cosine() {
        let x = Vec2::new(1.0, 0.0);
        assert!((angle_between_degrees(x, Vec2::new(0.0, 3.0)).unwrap() - 90.0).abs() < 1e-9);
        assert!(angle_between_degrees(x, Vec2::new(-2.0, 0.0)).unwrap().abs() < 1e-9);
        let obtuse = angle_between_degrees(x, Vec2::new(-1.0, 1.0)).unwrap();
        assert!((obtuse - 45.0).abs() < 1e-9);
        assert!(angle_between_degrees(x, Vec2::ZERO).is_none());
    }

    #[test]
    fn test_clip_line_to_rect() {
        let rect = Rect::new(-1.0, -1.0, 1.0, 1.0);
        let (a, b) = clip_line_to_rect(Point::new(0.0, 0.0), Vec2::new(1.0, 0.0), f64::NEG_INFINITY, rect).unwrap();
        assert!((a.x + 1.0).abs() < EPS && (b.x - 1.0).abs() < EPS);
        let (a, _) = clip_line_to_rect(Point::new(0.0, 0.0), Vec2::new(1.0, 0.0), 0.0, rect).unwrap();
        assert!(a.x.abs() < EPS);
        assert!(clip_line_to_rect(Point::new(0.0, 5.0), Vec2::new(1.0, 0.0), f64::NEG_INFINITY, rect).is_none());
        assert!(clip_line_to_rect(Point::new(5.0, 0.0), Vec2::new(1.0, 0.0), 0.0, rect).is_none());
    }
}
