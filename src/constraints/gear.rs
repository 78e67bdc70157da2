use crate::constraints::Constraint;
use crate::core::{BodyHandle, BodyStorage};
use crate::math::clamp;
use crate::Result;
use std::any::Any;

/// A gear joint keeps the angular velocity ratio of two bodies constant.
///
/// Against a static body, with ratio 1 and a zero `max_bias`, it acts as
/// rotational friction capped at `max_force`.
#[derive(Debug, Clone)]
pub struct GearJoint {
    /// The bodies involved in the constraint
    bodies: [BodyHandle; 2],

    /// Angular offset of the second body relative to the first
    phase: f32,

    /// Angular velocity ratio of the second body to the first
    ratio: f32,
    ratio_inv: f32,

    max_force: f32,
    max_bias: f32,

    // Per-step solver state
    i_sum: f32,
    bias: f32,
    j_acc: f32,
    j_max: f32,
}

impl GearJoint {
    /// Creates a gear joint. A zero ratio is treated as 1.
    pub fn new(body_a: BodyHandle, body_b: BodyHandle, phase: f32, ratio: f32) -> Self {
        let ratio = if ratio == 0.0 || !ratio.is_finite() { 1.0 } else { ratio };
        Self {
            bodies: [body_a, body_b],
            phase,
            ratio,
            ratio_inv: 1.0 / ratio,
            max_force: f32::INFINITY,
            max_bias: f32::INFINITY,
            i_sum: 0.0,
            bias: 0.0,
            j_acc: 0.0,
            j_max: 0.0,
        }
    }

    /// Sets the maximum torque
    pub fn with_max_force(mut self, max_force: f32) -> Self {
        self.max_force = max_force;
        self
    }

    /// Sets the maximum error correction speed
    pub fn with_max_bias(mut self, max_bias: f32) -> Self {
        self.max_bias = max_bias;
        self
    }

    /// Returns the phase
    pub fn get_phase(&self) -> f32 {
        self.phase
    }

    /// Returns the ratio
    pub fn get_ratio(&self) -> f32 {
        self.ratio
    }
}

impl Constraint for GearJoint {
    fn constraint_type(&self) -> &'static str {
        "GearJoint"
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

        let k = a.get_inverse_moment() * self.ratio_inv + self.ratio * b.get_inverse_moment();
        self.i_sum = if k > 0.0 { 1.0 / k } else { 0.0 };

        let error = b.get_angle() * self.ratio - a.get_angle() - self.phase;
        self.bias = clamp(-bias_coef * error / dt, -self.max_bias, self.max_bias);
        self.j_max = self.max_force * dt;
        self.j_acc = 0.0;
        Ok(())
    }

    fn solve_velocity(&mut self, bodies: &mut BodyStorage) -> Result<()> {
        let wr = bodies.get(self.bodies[1])?.get_angular_velocity() * self.ratio
            - bodies.get(self.bodies[0])?.get_angular_velocity();

        let j = (self.bias - wr) * self.i_sum;
        let j_old = self.j_acc;
        self.j_acc = clamp(j_old + j, -self.j_max, self.j_max);
        let j = self.j_acc - j_old;

        bodies.get_mut(self.bodies[0])?.apply_angular_impulse(-j * self.ratio_inv);
        bodies.get_mut(self.bodies[1])?.apply_angular_impulse(j);
        Ok(())
    }

    fn get_impulse(&self) -> f32 {
        self.j_acc.abs()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
