use crate::math::{Vector2, EPSILON};
use crate::shapes::{Circle, Geometry, Polygon};

/// Result of a segment query against a single shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentQueryInfo {
    /// Normalized distance along the segment, in `[0, 1]`
    pub t: f32,

    /// Hit point in world coordinates
    pub point: Vector2,

    /// Surface normal at the hit point. Zero when the segment starts
    /// inside the shape.
    pub normal: Vector2,
}

/// Intersects the segment `a`-`b` with a world-space geometry.
///
/// A segment that starts inside the geometry hits at `t = 0`.
pub fn segment_query(geometry: &Geometry, a: Vector2, b: Vector2) -> Option<SegmentQueryInfo> {
    if geometry.contains_point(a) {
        return Some(SegmentQueryInfo {
            t: 0.0,
            point: a,
            normal: Vector2::ZERO,
        });
    }

    match geometry {
        Geometry::Polygon(polygon) => polygon_segment_query(polygon, a, b),
        Geometry::Circle(circle) => circle_segment_query(circle, a, b),
    }
}

fn polygon_segment_query(polygon: &Polygon, a: Vector2, b: Vector2) -> Option<SegmentQueryInfo> {
    let vertices = polygon.vertices();
    let count = vertices.len();
    let mut best: Option<SegmentQueryInfo> = None;

    for (i, normal) in polygon.normals().iter().enumerate() {
        let plane = normal.dot(&vertices[i]);
        let an = normal.dot(&a);
        // the start point must be in front of this face
        if an < plane {
            continue;
        }

        let bn = normal.dot(&b);
        let denom = bn - an;
        if denom.abs() <= EPSILON {
            continue;
        }
        let t = (plane - an) / denom;
        if !(0.0..=1.0).contains(&t) {
            continue;
        }

        let point = a.lerp(&b, t);
        let v1 = vertices[i];
        let v2 = vertices[(i + 1) % count];
        let edge = (v2 - v1).normalize();
        let along = edge.dot(&point);
        if along < edge.dot(&v1) - EPSILON || along > edge.dot(&v2) + EPSILON {
            continue;
        }

        if best.map_or(true, |hit| t < hit.t) {
            best = Some(SegmentQueryInfo {
                t,
                point,
                normal: *normal,
            });
        }
    }
    best
}

fn circle_segment_query(circle: &Circle, a: Vector2, b: Vector2) -> Option<SegmentQueryInfo> {
    let d = b - a;
    let f = a - circle.center;

    let qa = d.dot(&d);
    if qa <= EPSILON * EPSILON {
        return None;
    }
    let qb = 2.0 * f.dot(&d);
    let qc = f.dot(&f) - circle.radius * circle.radius;

    let discriminant = qb * qb - 4.0 * qa * qc;
    if discriminant < 0.0 {
        return None;
    }

    let t = (-qb - discriminant.sqrt()) / (2.0 * qa);
    if !(0.0..=1.0).contains(&t) {
        return None;
    }

    let point = a.lerp(&b, t);
    Some(SegmentQueryInfo {
        t,
        point,
        normal: (point - circle.center).normalize(),
    })
}
