//! Two-dimensional agent positions and the missing-observation sentinel.

use std::fmt;
use std::ops::{Add, Sub};

/// A 2D world-space coordinate (or displacement) in scene units.
///
/// A position whose `x` or `y` is NaN is the *missing* sentinel: the
/// agent exists in the scene but was not observed at this step. Use
/// [`Point2::MISSING`] to construct one and [`Point2::is_missing`] to
/// test for it; never compare against NaN directly.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point2 {
    /// Horizontal component (grid axis 0).
    pub x: f32,
    /// Vertical component (grid axis 1).
    pub y: f32,
}

impl Point2 {
    /// The origin / zero displacement.
    pub const ZERO: Point2 = Point2 { x: 0.0, y: 0.0 };

    /// Sentinel for an agent that is not observed at this step.
    pub const MISSING: Point2 = Point2 {
        x: f32::NAN,
        y: f32::NAN,
    };

    /// Create a point from its components.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Whether this is the missing sentinel (either component is NaN).
    pub fn is_missing(&self) -> bool {
        self.x.is_nan() || self.y.is_nan()
    }

    /// Euclidean length.
    pub fn norm(&self) -> f32 {
        self.x.hypot(self.y)
    }
}

impl Add for Point2 {
    type Output = Point2;

    fn add(self, rhs: Point2) -> Point2 {
        Point2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2 {
    type Output = Point2;

    fn sub(self, rhs: Point2) -> Point2 {
        Point2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl From<[f32; 2]> for Point2 {
    fn from(v: [f32; 2]) -> Self {
        Point2::new(v[0], v[1])
    }
}

impl From<(f32, f32)> for Point2 {
    fn from((x, y): (f32, f32)) -> Self {
        Point2::new(x, y)
    }
}

impl From<Point2> for [f32; 2] {
    fn from(p: Point2) -> Self {
        [p.x, p.y]
    }
}

impl fmt::Display for Point2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_missing() {
            write!(f, "(missing)")
        } else {
            write!(f, "({}, {})", self.x, self.y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sentinel_detected() {
        assert!(Point2::MISSING.is_missing());
        assert!(Point2::new(f32::NAN, 1.0).is_missing());
        assert!(Point2::new(1.0, f32::NAN).is_missing());
        assert!(!Point2::new(1.0, 2.0).is_missing());
        assert!(!Point2::ZERO.is_missing());
    }

    #[test]
    fn arithmetic_is_componentwise() {
        let a = Point2::new(3.0, -1.0);
        let b = Point2::new(0.5, 2.0);
        assert_eq!(a - b, Point2::new(2.5, -3.0));
        assert_eq!(a + b, Point2::new(3.5, 1.0));
    }

    #[test]
    fn conversions_round_trip_components() {
        let p: Point2 = [1.5, -2.0].into();
        assert_eq!(p, Point2::new(1.5, -2.0));
        let q: Point2 = (4.0, 5.0).into();
        let arr: [f32; 2] = q.into();
        assert_eq!(arr, [4.0, 5.0]);
    }

    #[test]
    fn display_marks_missing() {
        assert_eq!(Point2::MISSING.to_string(), "(missing)");
        assert_eq!(Point2::new(1.0, 2.0).to_string(), "(1, 2)");
    }

    #[test]
    fn norm_of_3_4_is_5() {
        assert!((Point2::new(3.0, 4.0).norm() - 5.0).abs() < 1e-6);
    }
}
