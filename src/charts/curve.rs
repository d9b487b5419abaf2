//! Monotone-in-x cubic interpolation (Fritsch-Carlson tangents, Steffen's limiter).
//!
//! Produces the same segments as d3's `curveMonotoneX`: the curve passes
//! through every point and never overshoots between two points whose
//! neighbours are monotone.

use kurbo::{BezPath, Point};

/// Smooth path through `points`, which must be sorted by x.
pub fn monotone_x(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some(&first) = points.first() else {
        return path;
    };
    path.move_to(first);

    match points.len() {
        1 => return path,
        2 => {
            path.line_to(points[1]);
            return path;
        }
        _ => {}
    }

    let tangents = tangents(points);
    for (i, pair) in points.windows(2).enumerate() {
        let (p0, p1) = (pair[0], pair[1]);
        let dx = (p1.x - p0.x) / 3.0;
        path.curve_to(
            Point::new(p0.x + dx, p0.y + dx * tangents[i]),
            Point::new(p1.x - dx, p1.y - dx * tangents[i + 1]),
            p1,
        );
    }
    path
}

/// Tangent at every point; needs at least three points.
fn tangents(points: &[Point]) -> Vec<f64> {
    let n = points.len();
    let mut t = vec![0.0; n];

    for i in 1..n - 1 {
        t[i] = interior_slope(points[i - 1], points[i], points[i + 1]);
    }
    t[0] = end_slope(points[0], points[1], t[1]);
    t[n - 1] = end_slope(points[n - 2], points[n - 1], t[n - 2]);
    t
}

fn sign(x: f64) -> f64 {
    if x < 0.0 {
        -1.0
    } else {
        1.0
    }
}

fn interior_slope(p0: Point, p1: Point, p2: Point) -> f64 {
    let h0 = p1.x - p0.x;
    let h1 = p2.x - p1.x;
    let s0 = divide_or_zero(p1.y - p0.y, h0, h1);
    let s1 = divide_or_zero(p2.y - p1.y, h1, h0);
    let p = (s0 * h1 + s1 * h0) / (h0 + h1);
    let slope = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    if slope.is_finite() {
        slope
    } else {
        0.0
    }
}

/// `dy / h`, with a signed zero denominator when `h` is zero so the slope
/// takes the direction of the other interval.
fn divide_or_zero(dy: f64, h: f64, other: f64) -> f64 {
    if h != 0.0 {
        dy / h
    } else if other < 0.0 {
        dy / -0.0
    } else {
        dy / 0.0
    }
}

fn end_slope(p0: Point, p1: Point, neighbour: f64) -> f64 {
    let h = p1.x - p0.x;
    if h != 0.0 {
        (3.0 * (p1.y - p0.y) / h - neighbour) / 2.0
    } else {
        neighbour
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{ParamCurve, PathEl, PathSeg};

    #[test]
    fn empty_and_single_points() {
        assert!(monotone_x(&[]).elements().is_empty());
        let single = monotone_x(&[Point::new(1.0, 2.0)]);
        assert_eq!(single.elements(), &[PathEl::MoveTo(Point::new(1.0, 2.0))]);
    }

    #[test]
    fn two_points_are_a_straight_line() {
        let path = monotone_x(&[Point::new(0.0, 0.0), Point::new(10.0, 5.0)]);
        assert_eq!(
            path.elements(),
            &[
                PathEl::MoveTo(Point::new(0.0, 0.0)),
                PathEl::LineTo(Point::new(10.0, 5.0)),
            ]
        );
    }

    #[test]
    fn passes_through_every_point() {
        let points = [
            Point::new(0.0, 10.0),
            Point::new(10.0, 40.0),
            Point::new(20.0, 15.0),
            Point::new(30.0, 30.0),
        ];
        let path = monotone_x(&points);
        let ends: Vec<Point> = path.segments().map(|seg| seg.end()).collect();
        assert_eq!(ends, points[1..].to_vec());
    }

    #[test]
    fn flat_extremum_has_zero_tangent() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 5.0),
            Point::new(2.0, 0.0),
        ];
        let t = tangents(&points);
        assert_eq!(t[1], 0.0);
    }

    #[test]
    fn monotone_data_does_not_overshoot() {
        let points = [
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 1.1),
            Point::new(3.0, 10.0),
        ];
        let path = monotone_x(&points);
        for (i, seg) in path.segments().enumerate() {
            let (lo, hi) = (points[i].y, points[i + 1].y);
            let PathSeg::Cubic(cubic) = seg else {
                panic!("expected cubic segment");
            };
            for step in 0..=20 {
                let y = cubic.eval(step as f64 / 20.0).y;
                assert!(y >= lo - 1e-9 && y <= hi + 1e-9, "segment {i} overshoots: {y}");
            }
        }
    }
}
