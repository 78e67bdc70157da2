use crate::bodies::Body;
use crate::constraints::Constraint;
use crate::core::{BodyHandle, BodyStorage};
use crate::math::{Vector2, EPSILON};
use crate::Result;
use nalgebra::Matrix2;
use std::any::Any;

/// A pivot joint pins an anchor point on one body to an anchor point on
/// another. With a zero `max_bias` it only resists relative motion, which
/// makes it a Coulomb friction against the other body.
#[derive(Debug, Clone)]
pub struct PivotJoint {
    /// The bodies involved in the constraint
    bodies: [BodyHandle; 2],

    /// The anchor point on the first body (in local space)
    anchor_a: Vector2,

    /// The anchor point on the second body (in local space)
    anchor_b: Vector2,

    max_force: f32,
    max_bias: f32,

    // Per-step solver state
    r1: Vector2,
    r2: Vector2,
    k: Matrix2<f32>,
    bias: Vector2,
    j_acc: Vector2,
    j_max_len: f32,
}

impl PivotJoint {
    /// Creates a pivot joint from anchors given in each body's local space
    pub fn new(body_a: BodyHandle, body_b: BodyHandle, anchor_a: Vector2, anchor_b: Vector2) -> Self {
        Self {
            bodies: [body_a, body_b],
            anchor_a,
            anchor_b,
            max_force: f32::INFINITY,
            max_bias: f32::INFINITY,
            r1: Vector2::ZERO,
            r2: Vector2::ZERO,
            k: Matrix2::zeros(),
            bias: Vector2::ZERO,
            j_acc: Vector2::ZERO,
            j_max_len: 0.0,
        }
    }

    /// Creates a pivot joint around a point given in world space
    pub fn from_world_pivot(
        body_a: BodyHandle,
        a: &Body,
        body_b: BodyHandle,
        b: &Body,
        pivot: Vector2,
    ) -> Self {
        Self::new(body_a, body_b, a.world_to_local(pivot), b.world_to_local(pivot))
    }

    /// Sets the maximum force
    pub fn with_max_force(mut self, max_force: f32) -> Self {
        self.max_force = max_force;
        self
    }

    /// Sets the maximum error correction speed
    pub fn with_max_bias(mut self, max_bias: f32) -> Self {
        self.max_bias = max_bias;
        self
    }

    /// Returns the anchor on the first body
    pub fn get_anchor_a(&self) -> Vector2 {
        self.anchor_a
    }

    /// Returns the anchor on the second body
    pub fn get_anchor_b(&self) -> Vector2 {
        self.anchor_b
    }

    fn k_mult(&self, v: Vector2) -> Vector2 {
        Vector2::from_nalgebra(&(self.k * v.to_nalgebra()))
    }
}

fn clamp_length(v: Vector2, max: f32) -> Vector2 {
    let len_sq = v.length_squared();
    if len_sq > max * max {
        if max <= 0.0 {
            return Vector2::ZERO;
        }
        v * (max / len_sq.sqrt())
    } else {
        v
    }
}

impl Constraint for PivotJoint {
    fn constraint_type(&self) -> &'static str {
        "PivotJoint"
    }

    fn get_bodies(&self) -> &[BodyHandle] {
        &self.bodies
    }

    fn get_max_force(&self) -> f32 {
        self.max_force
    }

    fn set_max_force(&mut self, max_force: f32) {
        self.max_force = max_force;
    }

    fn get_max_bias(&self) -> f32 {
        self.max_bias
    }

    fn set_max_bias(&mut self, max_bias: f32) {
        self.max_bias = max_bias;
    }

    fn prepare(&mut self, dt: f32, bias_coef: f32, bodies: &BodyStorage) -> Result<()> {
        let a = bodies.get(self.bodies[0])?;
        let b = bodies.get(self.bodies[1])?;

        self.r1 = self.anchor_a.rotate(a.get_rotation());
        self.r2 = self.anchor_b.rotate(b.get_rotation());

        // Effective mass tensor
        let m_sum = a.get_inverse_mass() + b.get_inverse_mass();
        let (ia, ib) = (a.get_inverse_moment(), b.get_inverse_moment());
        let (r1, r2) = (self.r1, self.r2);
        let k11 = m_sum + r1.y * r1.y * ia + r2.y * r2.y * ib;
        let k12 = -r1.x * r1.y * ia - r2.x * r2.y * ib;
        let k22 = m_sum + r1.x * r1.x * ia + r2.x * r2.x * ib;
        let k = Matrix2::new(k11, k12, k12, k22);
        self.k = if k.determinant().abs() <= EPSILON {
            Matrix2::zeros()
        } else {
            k.try_inverse().unwrap_or_else(Matrix2::zeros)
        };

        let delta = (b.get_position() + r2) - (a.get_position() + r1);
        self.bias = clamp_length(delta * (-bias_coef / dt), self.max_bias);
        self.j_max_len = self.max_force * dt;
        self.j_acc = Vector2::ZERO;
        Ok(())
    }

    fn solve_velocity(&mut self, bodies: &mut BodyStorage) -> Result<()> {
        let vr = bodies.get(self.bodies[1])?.velocity_at_offset(self.r2)
            - bodies.get(self.bodies[0])?.velocity_at_offset(self.r1);

        let j = self.k_mult(self.bias - vr);
        let j_old = self.j_acc;
        self.j_acc = clamp_length(self.j_acc + j, self.j_max_len);
        let j = self.j_acc - j_old;

        bodies.get_mut(self.bodies[0])?.apply_impulse(-j, self.r1);
        bodies.get_mut(self.bodies[1])?.apply_impulse(j, self.r2);
        Ok(())
    }

    fn get_impulse(&self) -> f32 {
        self.j_acc.length()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
