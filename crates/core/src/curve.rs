//! Points and the quadratic Bézier curves edges are drawn along.

use core::ops::{Add, Mul, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn distance(self, other: Point) -> f64 {
        (self - other).length()
    }

    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    #[inline]
    pub fn lerp(self, other: Point, t: f64) -> Point {
        self + (other - self) * t
    }

    #[inline]
    pub fn midpoint(self, other: Point) -> Point {
        self.lerp(other, 0.5)
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, o: Point) -> Point {
        Point::new(self.x + o.x, self.y + o.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, o: Point) -> Point {
        Point::new(self.x - o.x, self.y - o.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, k: f64) -> Point {
        Point::new(self.x * k, self.y * k)
    }
}

/// Upper bound on the perpendicular bulge factor.
pub const MAX_CURVATURE: f64 = 0.3;
/// Numerator of the distance-dependent curvature (`k / distance`).
pub const CURVATURE_DISTANCE_SCALE: f64 = 50.0;
/// Constant vertical offset of every control point; negative bulges upward.
pub const CONTROL_VERTICAL_BIAS: f64 = -30.0;

/// Control point for the edge from `source` to `target`.
///
/// Midpoint of the two centres, pushed along the perpendicular `(-dy, dx)`
/// by `min(0.3, 50 / distance)` and lifted by a fixed bias. Coincident
/// endpoints (self-loops) get the maximum curvature and only the bias.
pub fn control_point(source: Point, target: Point) -> Point {
    let d = target - source;
    let distance = d.length();
    let curvature = if distance > 0.0 {
        MAX_CURVATURE.min(CURVATURE_DISTANCE_SCALE / distance)
    } else {
        MAX_CURVATURE
    };
    let mid = source.midpoint(target);
    Point::new(
        mid.x - d.y * curvature,
        mid.y + d.x * curvature + CONTROL_VERTICAL_BIAS,
    )
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuadCurve {
    pub start: Point,
    pub control: Point,
    pub end: Point,
}

impl QuadCurve {
    pub fn new(start: Point, control: Point, end: Point) -> Self {
        Self {
            start,
            control,
            end,
        }
    }

    /// The curve an edge between two node centres follows.
    pub fn for_edge(source: Point, target: Point) -> Self {
        Self::new(source, control_point(source, target), target)
    }

    pub fn at(&self, t: f64) -> Point {
        let u = 1.0 - t;
        self.start * (u * u) + self.control * (2.0 * u * t) + self.end * (t * t)
    }

    /// First derivative (unnormalised tangent).
    pub fn tangent(&self, t: f64) -> Point {
        (self.control - self.start) * (2.0 * (1.0 - t)) + (self.end - self.control) * (2.0 * t)
    }

    /// `n` points at evenly spaced parameters from 0 to 1 inclusive.
    pub fn samples(&self, n: usize) -> impl Iterator<Item = Point> + '_ {
        let denom = n.saturating_sub(1).max(1) as f64;
        (0..n).map(move |i| self.at(i as f64 / denom))
    }

    /// Smallest distance from `p` to any of `n` evenly spaced samples.
    pub fn sampled_distance(&self, p: Point, n: usize) -> f64 {
        self.samples(n)
            .map(|s| s.distance(p))
            .fold(f64::INFINITY, f64::min)
    }

    /// Largest parameter at which the curve is still outside a circle of
    /// `radius` around its end point, scanning back from `t = 1` in `step`s.
    pub fn exit_param(&self, radius: f64, step: f64) -> f64 {
        let step = step.max(1e-3);
        let mut t = 1.0;
        while t > 0.0 {
            if self.at(t).distance(self.end) > radius {
                return t;
            }
            t -= step;
        }
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-9
    }

    #[test]
    fn control_point_for_horizontal_edge() {
        // distance 400 -> curvature 0.125; perpendicular of (400, 0) is (0, 400).
        let c = control_point(Point::new(0.0, 0.0), Point::new(400.0, 0.0));
        assert!(close(c, Point::new(200.0, 50.0 - 30.0)));
    }

    #[test]
    fn short_edges_cap_curvature() {
        // distance 100 -> 50/100 = 0.5, capped at 0.3.
        let c = control_point(Point::new(0.0, 0.0), Point::new(0.0, 100.0));
        assert!(close(c, Point::new(-30.0, 50.0 - 30.0)));
    }

    #[test]
    fn self_loop_control_is_lifted() {
        let p = Point::new(10.0, 10.0);
        assert!(close(control_point(p, p), Point::new(10.0, -20.0)));
    }

    #[test]
    fn curve_endpoints_and_samples() {
        let q = QuadCurve::for_edge(Point::new(0.0, 0.0), Point::new(300.0, 0.0));
        assert!(close(q.at(0.0), q.start));
        assert!(close(q.at(1.0), q.end));
        let s: Vec<Point> = q.samples(11).collect();
        assert_eq!(s.len(), 11);
        assert!(close(s[10], q.end));
        assert_eq!(q.sampled_distance(q.start, 11), 0.0);
    }

    #[test]
    fn exit_param_leaves_the_target_disc() {
        let q = QuadCurve::for_edge(Point::new(0.0, 0.0), Point::new(300.0, 0.0));
        let t = q.exit_param(30.0, 0.01);
        assert!(t < 1.0 && t > 0.8);
        assert!(q.at(t).distance(q.end) > 30.0);
    }
}
