use crate::math::Vector2;

/// Moment of inertia of a solid polygon of uniform density.
///
/// `vertices` are taken relative to the body's center of mass after
/// adding `offset`. Either winding gives the same result.
pub fn moment_for_polygon(mass: f32, vertices: &[Vector2], offset: Vector2) -> f32 {
    let count = vertices.len();
    if count < 3 {
        return 0.0;
    }

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for i in 0..count {
        let v1 = vertices[i] + offset;
        let v2 = vertices[(i + 1) % count] + offset;

        let a = v2.cross(&v1);
        let b = v1.dot(&v1) + v1.dot(&v2) + v2.dot(&v2);

        numerator += a * b;
        denominator += a;
    }

    if denominator.abs() <= f32::EPSILON {
        return 0.0;
    }

    (mass * numerator) / (6.0 * denominator)
}

/// Moment of inertia of a hollow circle (ring) with the given inner and
/// outer radius, centered at `offset`. A solid disc has `inner_radius = 0`.
pub fn moment_for_circle(mass: f32, inner_radius: f32, outer_radius: f32, offset: Vector2) -> f32 {
    mass * (0.5 * (inner_radius * inner_radius + outer_radius * outer_radius) + offset.length_squared())
}

/// Signed area of a polygon; negative for clockwise winding
pub fn polygon_signed_area(vertices: &[Vector2]) -> f32 {
    let count = vertices.len();
    let mut area = 0.0;
    for i in 0..count {
        area += vertices[i].cross(&vertices[(i + 1) % count]);
    }
    0.5 * area
}
