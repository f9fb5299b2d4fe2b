use std::ops::{Add, Div, Mul, Neg, Sub};

use super::is_zero;

/// A position in 3D space. Positions and directions share one
/// representation; the vector role carries the extra expectation of a
/// non-zero length, enforced where directions are produced.
pub type Point3 = Vector3;

/// A vector in 3D space.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Vector3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vector3 {
    /// Instantiate a new Vector3.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Find the dot product between two Vector3s.
    pub fn dot(self, other: Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross two Vector3s.
    pub fn cross(self, other: Self) -> Self {
        Self {
            x: self.y * other.z - self.z * other.y,
            y: -self.x * other.z + self.z * other.x,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Find the squared magnitude of this Vector3.
    pub fn length_squared(self) -> f64 {
        self.dot(self)
    }

    /// Find the magnitude of this Vector3.
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Distance to another point.
    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }

    /// Squared distance to another point.
    pub fn distance_squared(self, other: Self) -> f64 {
        (self - other).length_squared()
    }

    /// Normalize this Vector3 by dividing it by its own magnitude.
    ///
    /// An effectively zero vector has no direction; asking for one is a
    /// programming error and panics. Use [`try_normalize`] where the
    /// input is a freshly computed vector that may legitimately vanish.
    ///
    /// [`try_normalize`]: Vector3::try_normalize
    pub fn normalize(self) -> Self {
        let length = self.length();
        assert!(!is_zero(length), "cannot normalize a zero-length vector");
        self / length
    }

    /// Normalize this Vector3, or None when its magnitude is
    /// effectively zero.
    pub fn try_normalize(self) -> Option<Self> {
        let length = self.length();
        if is_zero(length) {
            None
        } else {
            Some(self / length)
        }
    }

    /// Rotate this Vector3 around an axis (unit vector) by an angle in
    /// degrees, following the right-hand rule.
    pub fn rotated(self, axis: Vector3, degrees: f64) -> Self {
        let theta = degrees.to_radians();
        let (sin, cos) = theta.sin_cos();
        self * cos + axis.cross(self) * sin + axis * (axis.dot(self) * (1.0 - cos))
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

impl Mul<f64> for Vector3 {
    type Output = Vector3;

    fn mul(self, rhs: f64) -> Self::Output {
        Self {
            x: self.x * rhs,
            y: self.y * rhs,
            z: self.z * rhs,
        }
    }
}

impl Div<f64> for Vector3 {
    type Output = Vector3;

    fn div(self, rhs: f64) -> Self::Output {
        Self {
            x: self.x / rhs,
            y: self.y / rhs,
            z: self.z / rhs,
        }
    }
}

#[test]
fn dot_and_cross() {
    let a = Vector3::new(1.0, 2.0, 3.0);
    let b = Vector3::new(-2.0, -4.0, -6.0);
    assert_eq!(a.dot(b), -28.0);

    let x = Vector3::new(1.0, 0.0, 0.0);
    let y = Vector3::new(0.0, 1.0, 0.0);
    assert_eq!(x.cross(y), Vector3::new(0.0, 0.0, 1.0));

    // a cross product is orthogonal to both operands
    let c = a.cross(Vector3::new(0.0, 3.0, -2.0));
    assert!(is_zero(c.dot(a)));
}

#[test]
fn normalization() {
    let v = Vector3::new(0.0, 3.0, 4.0);
    let n = v.normalize();
    assert!((n.length() - 1.0).abs() < 1e-5);
    assert_eq!(n, Vector3::new(0.0, 0.6, 0.8));

    assert!(Vector3::new(0.0, 0.0, 1e-12).try_normalize().is_none());
}

#[test]
#[should_panic(expected = "zero-length")]
fn normalizing_zero_panics() {
    Vector3::default().normalize();
}

#[test]
fn rotation_about_axis() {
    let axis = Vector3::new(0.0, 0.0, 1.0);
    let r = Vector3::new(1.0, 0.0, 0.0).rotated(axis, 90.0);
    assert!(r.distance(Vector3::new(0.0, 1.0, 0.0)) < 1e-10);

    // rotating about itself is the identity
    let v = Vector3::new(0.0, 0.0, 2.0);
    assert!(v.rotated(axis, 37.0).distance(v) < 1e-10);
}
