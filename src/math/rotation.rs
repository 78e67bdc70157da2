use crate::math::Vector3;
use approx::{AbsDiffEq, RelativeEq};
use nalgebra::UnitQuaternion;
use std::fmt;
use std::ops::Mul;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Quaternion for representing orientations in the 3D arena.
///
/// The physics space only models rotation about the vertical axis, so most
/// code reads the yaw out of a quaternion and writes it back with
/// [`Quaternion::from_yaw`]. The other two Euler angles are carried by
/// entities but never reach the 2D engine.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Quaternion {
    /// Real component
    pub w: f32,

    /// First imaginary component
    pub x: f32,

    /// Second imaginary component
    pub y: f32,

    /// Third imaginary component
    pub z: f32,
}

impl Quaternion {
    /// Creates a new quaternion
    #[inline]
    pub const fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    /// Creates an identity quaternion (no rotation)
    #[inline]
    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    /// Creates a quaternion from an axis-angle representation
    pub fn from_axis_angle(axis: Vector3, angle: f32) -> Self {
        if axis.length() <= crate::math::EPSILON {
            return Self::identity();
        }
        let axis = nalgebra::Unit::new_normalize(axis.to_nalgebra());
        Self::from_nalgebra(UnitQuaternion::from_axis_angle(&axis, angle).quaternion())
    }

    /// Creates a rotation about the vertical (Z) axis
    #[inline]
    pub fn from_yaw(yaw: f32) -> Self {
        Self::from_axis_angle(Vector3::new(0.0, 0.0, 1.0), yaw)
    }

    /// Creates a quaternion from Z-Y-X Euler angles (yaw, pitch, roll), in radians
    pub fn from_euler_zyx(z: f32, y: f32, x: f32) -> Self {
        let q = UnitQuaternion::from_euler_angles(x, y, z);
        Self::from_nalgebra(q.quaternion())
    }

    /// Decomposes this quaternion into Z-Y-X Euler angles (yaw, pitch, roll)
    pub fn to_euler_zyx(&self) -> (f32, f32, f32) {
        let q = UnitQuaternion::from_quaternion(self.to_nalgebra());
        let (roll, pitch, yaw) = q.euler_angles();
        (yaw, pitch, roll)
    }

    /// Returns the rotation about the vertical axis
    #[inline]
    pub fn yaw(&self) -> f32 {
        self.to_euler_zyx().0
    }

    /// Returns the length of this quaternion
    #[inline]
    pub fn length(&self) -> f32 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Normalizes this quaternion
    #[inline]
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > crate::math::EPSILON {
            Self::new(self.w / len, self.x / len, self.y / len, self.z / len)
        } else {
            Self::identity()
        }
    }

    /// Convert to nalgebra Quaternion
    #[inline]
    pub fn to_nalgebra(&self) -> nalgebra::Quaternion<f32> {
        nalgebra::Quaternion::new(self.w, self.x, self.y, self.z)
    }

    /// Convert from nalgebra Quaternion
    #[inline]
    pub fn from_nalgebra(q: &nalgebra::Quaternion<f32>) -> Self {
        Self::new(q.scalar(), q.vector()[0], q.vector()[1], q.vector()[2])
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.w, self.x, self.y, self.z)
    }
}

impl Mul for Quaternion {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self::Output {
        Self {
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
        }
    }
}

impl AbsDiffEq for Quaternion {
    type Epsilon = f32;

    fn default_epsilon() -> f32 {
        f32::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
        self.w.abs_diff_eq(&other.w, epsilon)
            && self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && self.z.abs_diff_eq(&other.z, epsilon)
    }
}

impl RelativeEq for Quaternion {
    fn default_max_relative() -> f32 {
        f32::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
        self.w.relative_eq(&other.w, epsilon, max_relative)
            && self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && self.z.relative_eq(&other.z, epsilon, max_relative)
    }
}
