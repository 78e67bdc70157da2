use crate::math::{Vector2, Vector3};

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// A finite ray in the arena, from `start` to `end`.
///
/// Points along the ray are addressed by a parameter `t` in `[0, 1]`,
/// which is the same parametrization the 2D segment query reports.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Ray3 {
    /// Where the ray starts
    pub start: Vector3,

    /// Where the ray ends
    pub end: Vector3,
}

impl Ray3 {
    /// Creates a new ray between two points
    #[inline]
    pub fn new(start: Vector3, end: Vector3) -> Self {
        Self { start, end }
    }

    /// Returns the point at parameter `t` along the ray
    #[inline]
    pub fn point_at(&self, t: f32) -> Vector3 {
        self.start.lerp(&self.end, t)
    }

    /// Returns the length of the ray
    #[inline]
    pub fn length(&self) -> f32 {
        (self.end - self.start).length()
    }

    /// Projects the ray onto the horizontal plane
    #[inline]
    pub fn to_segment_2d(&self) -> (Vector2, Vector2) {
        (self.start.xy(), self.end.xy())
    }

    /// Returns the parameter interval over which the ray's height lies in
    /// `[min_z, max_z]`, clamped to `[0, 1]`.
    ///
    /// `None` when the ray never enters the slab.
    pub fn clip_to_z_range(&self, min_z: f32, max_z: f32) -> Option<(f32, f32)> {
        let dz = self.end.z - self.start.z;
        if dz.abs() <= crate::math::EPSILON {
            return if self.start.z >= min_z && self.start.z <= max_z {
                Some((0.0, 1.0))
            } else {
                None
            };
        }

        let t_a = (min_z - self.start.z) / dz;
        let t_b = (max_z - self.start.z) / dz;
        let t_lo = t_a.min(t_b).max(0.0);
        let t_hi = t_a.max(t_b).min(1.0);
        if t_lo > t_hi {
            None
        } else {
            Some((t_lo, t_hi))
        }
    }
}
