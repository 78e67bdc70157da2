use crate::math::{Vector2, Vector3};

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// Axis-Aligned Bounding Box in the 3D arena
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Minimum corner of the AABB
    pub min: Vector3,

    /// Maximum corner of the AABB
    pub max: Vector3,
}

impl Aabb {
    /// Creates a new AABB from minimum and maximum points
    #[inline]
    pub fn new(min: Vector3, max: Vector3) -> Self {
        Self { min, max }
    }

    /// Builds a box from a planar rectangle and a vertical extent
    #[inline]
    pub fn from_rect(rect: &Rect, min_z: f32, max_z: f32) -> Self {
        Self {
            min: Vector3::new(rect.min.x, rect.min.y, min_z),
            max: Vector3::new(rect.max.x, rect.max.y, max_z),
        }
    }

    /// Returns the planar footprint of the box
    #[inline]
    pub fn footprint(&self) -> Rect {
        Rect::new(self.min.xy(), self.max.xy())
    }

    /// Returns the center of the AABB
    #[inline]
    pub fn center(&self) -> Vector3 {
        (self.min + self.max) * 0.5
    }

    /// Returns the extents of the AABB in each dimension
    #[inline]
    pub fn extents(&self) -> Vector3 {
        self.max - self.min
    }

    /// Checks if this AABB contains a point
    #[inline]
    pub fn contains_point(&self, point: Vector3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y &&
        point.z >= self.min.z && point.z <= self.max.z
    }

    /// Checks if this AABB fully contains another AABB
    #[inline]
    pub fn contains_aabb(&self, other: &Self) -> bool {
        self.min.x <= other.min.x && self.max.x >= other.max.x &&
        self.min.y <= other.min.y && self.max.y >= other.max.y &&
        self.min.z <= other.min.z && self.max.z >= other.max.z
    }

    /// Checks if this AABB intersects with another AABB
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }
}

/// Axis-aligned rectangle in the plane of the physics space.
///
/// Every shape caches one of these as its broad-phase bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct Rect {
    /// Left/bottom corner
    pub min: Vector2,

    /// Right/top corner
    pub max: Vector2,
}

impl Rect {
    /// Creates a rectangle from its corners
    #[inline]
    pub fn new(min: Vector2, max: Vector2) -> Self {
        Self { min, max }
    }

    /// Creates a rectangle centered at `center` with the given half extents
    #[inline]
    pub fn from_center_half_extents(center: Vector2, half_extents: Vector2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Creates the tightest rectangle enclosing a set of points
    pub fn from_points(points: &[Vector2]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut rect = Self::new(*first, *first);
        for point in rest {
            rect.expand_to_include_point(*point);
        }
        Some(rect)
    }

    /// Returns the center of the rectangle
    #[inline]
    pub fn center(&self) -> Vector2 {
        (self.min + self.max) * 0.5
    }

    /// Returns the size of the rectangle along each axis
    #[inline]
    pub fn extents(&self) -> Vector2 {
        self.max - self.min
    }

    /// Checks if the rectangle contains a point (boundary included)
    #[inline]
    pub fn contains_point(&self, point: Vector2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x &&
        point.y >= self.min.y && point.y <= self.max.y
    }

    /// Checks if two rectangles overlap (touching counts)
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y
    }

    /// Grows the rectangle to include a point
    #[inline]
    pub fn expand_to_include_point(&mut self, point: Vector2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// Returns a copy grown by `margin` on every side
    #[inline]
    pub fn expand(&self, margin: f32) -> Self {
        let margin = Vector2::new(margin, margin);
        Self {
            min: self.min - margin,
            max: self.max + margin,
        }
    }
}
