use crate::math::Vector2;
use crate::shapes::{Circle, Geometry, Polygon};

/// Exact overlap tests between world-space geometries.
///
/// Two geometries overlap when they penetrate by more than `slop`.
/// Geometries that merely touch do not overlap.
pub struct NarrowPhase;

impl NarrowPhase {
    /// Returns true when `a` and `b` penetrate deeper than `slop`
    pub fn overlaps(a: &Geometry, b: &Geometry, slop: f32) -> bool {
        Self::penetration(a, b).map_or(false, |depth| depth > slop)
    }

    /// Penetration depth of two geometries, or `None` when separated
    /// or touching
    pub fn penetration(a: &Geometry, b: &Geometry) -> Option<f32> {
        let depth = match (a, b) {
            (Geometry::Polygon(pa), Geometry::Polygon(pb)) => polygon_polygon(pa, pb),
            (Geometry::Polygon(poly), Geometry::Circle(circle))
            | (Geometry::Circle(circle), Geometry::Polygon(poly)) => polygon_circle(poly, circle),
            (Geometry::Circle(ca), Geometry::Circle(cb)) => circle_circle(ca, cb),
        };
        (depth > 0.0).then_some(depth)
    }
}

/// Projects the vertices of a polygon onto an axis
fn project_polygon(vertices: &[Vector2], axis: Vector2) -> (f32, f32) {
    let mut min = f32::INFINITY;
    let mut max = f32::NEG_INFINITY;
    for v in vertices {
        let p = v.dot(&axis);
        min = min.min(p);
        max = max.max(p);
    }
    (min, max)
}

/// Smallest overlap along the edge normals of `reference`
fn sat_test_axes(reference: &Polygon, other: &Polygon) -> f32 {
    let mut min_overlap = f32::INFINITY;
    for axis in reference.normals() {
        let (min_a, max_a) = project_polygon(reference.vertices(), *axis);
        let (min_b, max_b) = project_polygon(other.vertices(), *axis);
        let overlap = max_a.min(max_b) - min_a.max(min_b);
        if overlap <= 0.0 {
            return overlap;
        }
        min_overlap = min_overlap.min(overlap);
    }
    min_overlap
}

fn polygon_polygon(a: &Polygon, b: &Polygon) -> f32 {
    let depth_a = sat_test_axes(a, b);
    if depth_a <= 0.0 {
        return depth_a;
    }
    depth_a.min(sat_test_axes(b, a))
}

fn polygon_circle(poly: &Polygon, circle: &Circle) -> f32 {
    let closest = poly.closest_boundary_point(circle.center);
    let distance = closest.distance(&circle.center);
    if poly.contains_point(circle.center) {
        circle.radius + distance
    } else {
        circle.radius - distance
    }
}

fn circle_circle(a: &Circle, b: &Circle) -> f32 {
    a.radius + b.radius - a.center.distance(&b.center)
}

