//! Plain point data shared by the fitters, the deformer and the editing sessions.
use std::ops::{Add, Mul, Sub};
use strum_macros::{Display, EnumIter};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Point2 { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Point3 { x, y, z }
    }

    pub fn zero() -> Self {
        Point3::default()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
        }
    }

    pub fn from_axes(f: impl Fn(Axis) -> f64) -> Self {
        Point3::new(f(Axis::X), f(Axis::Y), f(Axis::Z))
    }
}

impl Add for Point3 {
    type Output = Point3;
    fn add(self, rhs: Point3) -> Point3 {
        Point3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point3 {
    type Output = Point3;
    fn sub(self, rhs: Point3) -> Point3 {
        Point3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Point3 {
    type Output = Point3;
    fn mul(self, k: f64) -> Point3 {
        Point3::new(self.x * k, self.y * k, self.z * k)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Axis {
    #[strum(serialize = "x")]
    X,
    #[strum(serialize = "y")]
    Y,
    #[strum(serialize = "z")]
    Z,
}

/// identity token of a draggable control, unique within one editing session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkerId(pub usize);

/// A user-draggable control point. Only markers with a finite `t` take part in
/// kernel deformation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub id: MarkerId,
    pub position: Point3,
    pub t: Option<f64>,
}

impl Marker {
    pub fn new(id: MarkerId, position: Point3, t: Option<f64>) -> Self {
        Marker { id, position, t }
    }

    /// the curve parameter if it is usable
    pub fn parameter(&self) -> Option<f64> {
        self.t.filter(|t| t.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn test_point_arithmetic() {
        let a = Point3::new(1.0, 2.0, 2.0);
        let b = Point3::new(0.5, 0.0, -1.0);
        assert_eq!(a + b, Point3::new(1.5, 2.0, 1.0));
        assert_eq!(a - b, Point3::new(0.5, 2.0, 3.0));
        assert_eq!(a * 2.0, Point3::new(2.0, 4.0, 4.0));
        assert_relative_eq!(a.norm(), 3.0);
    }

    #[test]
    fn test_axis_access() {
        let mut p = Point3::zero();
        for (k, axis) in Axis::iter().enumerate() {
            p.set(axis, k as f64);
        }
        assert_eq!(p, Point3::new(0.0, 1.0, 2.0));
        assert_eq!(Point3::from_axes(|a| p.get(a) * 10.0), Point3::new(0.0, 10.0, 20.0));
        assert_eq!(Axis::Y.to_string(), "y");
    }

    #[test]
    fn test_marker_parameter_must_be_finite() {
        let m = Marker::new(MarkerId(0), Point3::zero(), Some(f64::NAN));
        assert_eq!(m.parameter(), None);
        let m = Marker::new(MarkerId(1), Point3::zero(), Some(0.5));
        assert_eq!(m.parameter(), Some(0.5));
    }
}
