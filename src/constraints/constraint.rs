use crate::core::{BodyHandle, BodyStorage};
use crate::Result;
use std::any::Any;
use std::fmt::Debug;

/// Base trait for physics constraints.
///
/// A constraint is solved as a velocity constraint: `prepare` runs once per
/// step, then `solve_velocity` runs once per solver iteration and applies
/// an impulse whose accumulated magnitude never exceeds `max_force * dt`.
pub trait Constraint: Debug + Send + Sync + 'static {
    /// Returns the type name of the constraint
    fn constraint_type(&self) -> &'static str;

    /// Returns the bodies involved in the constraint
    fn get_bodies(&self) -> &[BodyHandle];

    /// Checks if the constraint involves a specific body
    fn involves_body(&self, body: BodyHandle) -> bool {
        self.get_bodies().contains(&body)
    }

    /// Maximum force the constraint may apply
    fn get_max_force(&self) -> f32;

    /// Sets the maximum force the constraint may apply
    fn set_max_force(&mut self, max_force: f32);

    /// Maximum speed at which joint error is corrected
    fn get_max_bias(&self) -> f32;

    /// Sets the maximum speed at which joint error is corrected
    fn set_max_bias(&mut self, max_bias: f32);

    /// Prepares the constraint for solving
    fn prepare(&mut self, dt: f32, bias_coef: f32, bodies: &BodyStorage) -> Result<()>;

    /// Solves the velocity constraint
    fn solve_velocity(&mut self, bodies: &mut BodyStorage) -> Result<()>;

    /// Magnitude of the impulse accumulated during the last step
    fn get_impulse(&self) -> f32;

    /// Returns a dynamic reference to any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Returns a dynamic mutable reference to any for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
