mod binding;
mod box_model;
mod config;
mod cylinder_model;
mod gripping;
mod single_body;

pub use self::box_model::BoxModel;
pub use self::config::ModelConfig;
pub use self::cylinder_model::CylinderModel;
pub use self::gripping::{Attacher, AttacherRef, Grippable, Gripper};
pub use self::single_body::{ShapedEntity, SingleBodyModel};

use crate::math::{Aabb, Quaternion, Ray3, Vector3};

/// The binding between one entity and its representation in a physics
/// space.
///
/// Every operation except [`PhysicsModel::is_destroyed`] panics once the
/// model has been destroyed.
pub trait PhysicsModel {
    /// Pulls the engine's pose into the entity, then refreshes the
    /// entity's dependent components
    fn update_entity_status(&mut self);

    /// Teleports the entity if the destination is free.
    ///
    /// Returns true when the destination is collision-free. With
    /// `check_only` the entity never moves. Immovable entities always
    /// return false.
    fn move_to(&mut self, position: Vector3, orientation: Quaternion, check_only: bool) -> bool;

    /// Puts a movable entity back at its initial pose, at rest
    fn reset(&mut self);

    /// Frees every physics resource. Calling it twice panics.
    fn destroy(&mut self);

    /// Parameter along `ray` where it first enters the entity
    fn check_intersection_with_ray(&self, ray: &Ray3) -> Option<f32>;

    /// True when the entity's shape overlaps any other shape
    fn is_colliding_with_something(&self) -> bool;

    /// Axis-aligned bounds, including the vertical extent
    fn bounding_box(&self) -> &Aabb;

    fn is_destroyed(&self) -> bool;
}
