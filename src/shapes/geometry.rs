use crate::bodies::{moment_for_circle, moment_for_polygon, polygon_signed_area};
use crate::error::PhysicsError;
use crate::math::{Rect, Vector2, EPSILON};
use crate::Result;

/// A convex polygon with clockwise winding.
///
/// Edge `i` runs from vertex `i` to vertex `i + 1`, and `normals[i]` is its
/// outward unit normal.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vector2>,
    normals: Vec<Vector2>,
}

impl Polygon {
    /// Creates a polygon from clockwise vertices, translated by `offset`.
    ///
    /// Fails unless there are at least three finite vertices forming a
    /// convex, clockwise outline with non-zero area.
    pub fn new(vertices: &[Vector2], offset: Vector2) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(PhysicsError::InvalidParameter(format!(
                "Polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        if vertices.iter().any(|v| !v.x.is_finite() || !v.y.is_finite()) {
            return Err(PhysicsError::InvalidParameter(
                "Polygon vertices must be finite".to_string(),
            ));
        }

        let count = vertices.len();
        for i in 0..count {
            let a = vertices[i];
            let b = vertices[(i + 1) % count];
            let c = vertices[(i + 2) % count];
            if (b - a).is_zero() {
                return Err(PhysicsError::InvalidParameter(format!(
                    "Polygon edge {} has zero length",
                    i
                )));
            }
            if (b - a).cross(&(c - b)) > 0.0 {
                return Err(PhysicsError::InvalidParameter(
                    "Polygon must be convex with clockwise winding".to_string(),
                ));
            }
        }
        if polygon_signed_area(vertices) >= 0.0 {
            return Err(PhysicsError::InvalidParameter(
                "Polygon must enclose a non-zero area with clockwise winding".to_string(),
            ));
        }

        let vertices: Vec<Vector2> = vertices.iter().map(|v| *v + offset).collect();
        Ok(Self::from_valid_vertices(vertices))
    }

    /// Creates an axis-aligned box centered at the origin
    pub fn rectangle(width: f32, height: f32) -> Result<Self> {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(PhysicsError::InvalidParameter(format!(
                "Box extents must be positive and finite, got {} x {}",
                width, height
            )));
        }
        let hw = width * 0.5;
        let hh = height * 0.5;
        Self::new(
            &[
                Vector2::new(-hw, -hh),
                Vector2::new(-hw, hh),
                Vector2::new(hw, hh),
                Vector2::new(hw, -hh),
            ],
            Vector2::ZERO,
        )
    }

    /// Creates a regular polygon with `sides` vertices inscribed in a
    /// circle of the given radius
    pub fn regular(sides: usize, radius: f32) -> Result<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(PhysicsError::InvalidParameter(format!(
                "Polygon radius must be positive and finite, got {}",
                radius
            )));
        }
        let step = std::f32::consts::TAU / sides as f32;
        // negative angular step yields clockwise winding
        let vertices: Vec<Vector2> = (0..sides)
            .map(|i| Vector2::for_angle(-(i as f32) * step) * radius)
            .collect();
        Self::new(&vertices, Vector2::ZERO)
    }

    fn from_valid_vertices(vertices: Vec<Vector2>) -> Self {
        let count = vertices.len();
        let normals = (0..count)
            .map(|i| (vertices[(i + 1) % count] - vertices[i]).perpendicular().normalize())
            .collect();
        Self { vertices, normals }
    }

    /// Returns the vertices
    #[inline]
    pub fn vertices(&self) -> &[Vector2] {
        &self.vertices
    }

    /// Returns the outward edge normals
    #[inline]
    pub fn normals(&self) -> &[Vector2] {
        &self.normals
    }

    /// Returns the number of vertices
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// A validated polygon is never empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Rotates by the unit vector `rotation`, then translates
    pub fn transformed(&self, rotation: Vector2, translation: Vector2) -> Self {
        Self {
            vertices: self
                .vertices
                .iter()
                .map(|v| v.rotate(rotation) + translation)
                .collect(),
            normals: self.normals.iter().map(|n| n.rotate(rotation)).collect(),
        }
    }

    /// Signed distance from the edge plane `i` to a point; negative inside
    #[inline]
    pub fn edge_distance(&self, i: usize, point: Vector2) -> f32 {
        self.normals[i].dot(&(point - self.vertices[i]))
    }

    /// Returns true if the point lies strictly inside the polygon
    pub fn contains_point(&self, point: Vector2) -> bool {
        (0..self.len()).all(|i| self.edge_distance(i, point) < 0.0)
    }

    /// Closest point on the outline to `point`
    pub fn closest_boundary_point(&self, point: Vector2) -> Vector2 {
        let count = self.len();
        let mut best = self.vertices[0];
        let mut best_dist = f32::INFINITY;
        for i in 0..count {
            let candidate = closest_point_on_segment(point, self.vertices[i], self.vertices[(i + 1) % count]);
            let dist = candidate.distance(&point);
            if dist < best_dist {
                best_dist = dist;
                best = candidate;
            }
        }
        best
    }
}

/// A circle, possibly offset from the body's center of mass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    /// Center relative to the body
    pub center: Vector2,

    /// Radius of the circle
    pub radius: f32,
}

impl Circle {
    /// Creates a circle of the given radius centered at `center`
    pub fn new(radius: f32, center: Vector2) -> Result<Self> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(PhysicsError::InvalidParameter(format!(
                "Circle radius must be positive and finite, got {}",
                radius
            )));
        }
        Ok(Self { center, radius })
    }

    /// Returns true if the point lies strictly inside the circle
    #[inline]
    pub fn contains_point(&self, point: Vector2) -> bool {
        (point - self.center).length_squared() < self.radius * self.radius
    }
}

/// Collision geometry of a shape, in body coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// Convex polygon
    Polygon(Polygon),

    /// Circle
    Circle(Circle),
}

impl Geometry {
    /// Box footprint centered at the origin
    pub fn rectangle(width: f32, height: f32) -> Result<Self> {
        Polygon::rectangle(width, height).map(Self::Polygon)
    }

    /// Disc footprint centered at the origin
    pub fn circle(radius: f32) -> Result<Self> {
        Circle::new(radius, Vector2::ZERO).map(Self::Circle)
    }

    /// Moment of inertia of this geometry for a given mass
    pub fn moment(&self, mass: f32) -> f32 {
        match self {
            Self::Polygon(polygon) => moment_for_polygon(mass, polygon.vertices(), Vector2::ZERO),
            Self::Circle(circle) => moment_for_circle(mass, 0.0, circle.radius, circle.center),
        }
    }

    /// Rotates by the unit vector `rotation`, then translates
    pub fn transformed(&self, rotation: Vector2, translation: Vector2) -> Self {
        match self {
            Self::Polygon(polygon) => Self::Polygon(polygon.transformed(rotation, translation)),
            Self::Circle(circle) => Self::Circle(Circle {
                center: circle.center.rotate(rotation) + translation,
                radius: circle.radius,
            }),
        }
    }

    /// Tight axis-aligned bounds
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Polygon(polygon) => {
                Rect::from_points(polygon.vertices()).unwrap_or_default()
            }
            Self::Circle(circle) => Rect::from_center_half_extents(
                circle.center,
                Vector2::new(circle.radius, circle.radius),
            ),
        }
    }

    /// Returns true if the point lies strictly inside the geometry
    pub fn contains_point(&self, point: Vector2) -> bool {
        match self {
            Self::Polygon(polygon) => polygon.contains_point(point),
            Self::Circle(circle) => circle.contains_point(point),
        }
    }
}

/// Closest point to `point` on the segment `a`-`b`
pub(crate) fn closest_point_on_segment(point: Vector2, a: Vector2, b: Vector2) -> Vector2 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= EPSILON * EPSILON {
        return a;
    }
    let t = ((point - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}
