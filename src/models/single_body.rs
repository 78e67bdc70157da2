use std::fmt;
use std::sync::Arc;

use log::{debug, trace};

use crate::bodies::Body;
use crate::constraints::{GearJoint, PivotJoint};
use crate::core::{BodyHandle, ConstraintHandle, ShapeHandle, SpaceHandle};
use crate::entity::EmbodiedEntity;
use crate::error::PhysicsError;
use crate::math::{Aabb, Quaternion, Ray3, Vector2, Vector3};
use crate::models::binding::{
    Binding, BodyGuard, ConstraintGuard, DynamicBinding, FrictionJoints, ShapeGuard,
    StaticBinding, StaticShapeGuard,
};
use crate::models::gripping::GripperMounts;
use crate::models::{Grippable, Gripper, ModelConfig, PhysicsModel};
use crate::shapes::{CollisionCategory, Geometry, Shape};
use crate::Result;

/// An entity with a single rigid footprint extruded vertically
pub trait ShapedEntity {
    /// The entity's pose
    fn embodied(&self) -> &EmbodiedEntity;

    /// The entity's pose, mutably
    fn embodied_mut(&mut self) -> &mut EmbodiedEntity;

    fn get_mass(&self) -> f32;

    /// Vertical extent above the entity's position
    fn get_height(&self) -> f32;

    fn get_collision_category(&self) -> CollisionCategory;

    /// Footprint in the entity's own frame, centered at its origin
    fn footprint(&self) -> Result<Geometry>;
}

/// Binds one entity to one body and one shape in a shared space.
///
/// Movable entities get a dynamic body held to the ground by a pair of
/// force-capped friction joints. Immovable entities get a static shape on
/// the ground body. The model keeps the entity's logical pose and the
/// engine state consistent, and frees everything it registered when
/// destroyed or dropped.
pub struct SingleBodyModel<E: ShapedEntity> {
    space: SpaceHandle,
    entity: E,
    bounding_box: Aabb,
    binding: Option<Binding>,
}

impl<E: ShapedEntity> SingleBodyModel<E> {
    /// Binds `entity` to the space with default parameters, anchored to
    /// the space's ground body
    pub fn new(space: SpaceHandle, entity: E) -> Result<Self> {
        let ground = space.borrow().ground();
        Self::with_config(space, ground, entity, &ModelConfig::default())
    }

    /// Binds `entity` to the space, anchored to `ground`
    pub fn with_config(
        space: SpaceHandle,
        ground: BodyHandle,
        entity: E,
        config: &ModelConfig,
    ) -> Result<Self> {
        let footprint = Arc::new(entity.footprint()?);
        let height = entity.get_height();
        if !(height.is_finite() && height >= 0.0) {
            return Err(PhysicsError::InvalidParameter(format!(
                "Entity height must be non-negative and finite, got {}",
                height
            )));
        }

        let embodied = entity.embodied();
        let position = embodied.get_position();
        let yaw = embodied.get_orientation().yaw();

        let binding = if embodied.is_movable() {
            Binding::Dynamic(Self::bind_dynamic(
                &space, ground, &entity, footprint, position, yaw, config,
            )?)
        } else {
            Binding::Static(Self::bind_static(&space, ground, footprint, position, yaw, config)?)
        };

        let mut model = Self {
            space,
            entity,
            bounding_box: Aabb::new(
                Vector3::new(0.0, 0.0, position.z),
                Vector3::new(0.0, 0.0, position.z + height),
            ),
            binding: Some(binding),
        };
        model.update_bounding_box();
        debug!(
            "Bound {} entity '{}' at {}",
            if model.is_movable() { "movable" } else { "immovable" },
            model.entity.embodied().id(),
            position
        );
        Ok(model)
    }

    fn bind_dynamic(
        space: &SpaceHandle,
        ground: BodyHandle,
        entity: &E,
        footprint: Arc<Geometry>,
        position: Vector3,
        yaw: f32,
        config: &ModelConfig,
    ) -> Result<DynamicBinding> {
        let mass = entity.get_mass();
        let mut body = Body::new_dynamic(mass, footprint.moment(mass))?;
        body.set_position(position.xy());
        body.set_angle(yaw);

        let handle = space.borrow_mut().add_body(body);
        let body = BodyGuard::new(space.clone(), handle);

        let category = entity.get_collision_category();
        let shape = Shape::new(body.handle(), footprint)
            .with_elasticity(config.elasticity)
            .with_friction(config.movable_friction)
            .with_category(category);
        let handle = space.borrow_mut().add_shape(shape)?;
        let shape = ShapeGuard::new(space.clone(), handle);

        let linear = PivotJoint::new(ground, body.handle(), Vector2::ZERO, Vector2::ZERO)
            .with_max_bias(0.0)
            .with_max_force(config.linear_friction_max_force);
        let handle = space.borrow_mut().add_constraint(Box::new(linear))?;
        let linear = ConstraintGuard::new(space.clone(), handle);

        let angular = GearJoint::new(ground, body.handle(), 0.0, 1.0)
            .with_max_bias(0.0)
            .with_max_force(config.angular_friction_max_torque);
        let handle = space.borrow_mut().add_constraint(Box::new(angular))?;
        let angular = ConstraintGuard::new(space.clone(), handle);

        let grippable = (category == CollisionCategory::Grippable)
            .then(|| Grippable::new(body.handle(), shape.handle()));

        Ok(DynamicBinding {
            grippers: GripperMounts::default(),
            grippable,
            friction: FrictionJoints { linear, angular },
            shape,
            body,
        })
    }

    fn bind_static(
        space: &SpaceHandle,
        ground: BodyHandle,
        footprint: Arc<Geometry>,
        position: Vector3,
        yaw: f32,
        config: &ModelConfig,
    ) -> Result<StaticBinding> {
        let placed = footprint.transformed(Vector2::for_angle(yaw), position.xy());
        let shape = Shape::new(ground, Arc::new(placed))
            .with_elasticity(config.elasticity)
            .with_friction(config.static_friction)
            .with_category(CollisionCategory::Normal);

        let handle = space.borrow_mut().add_static_shape(shape)?;

        Ok(StaticBinding {
            shape: StaticShapeGuard::new(space.clone(), handle),
        })
    }

    fn live(&self, operation: &str) -> &Binding {
        match &self.binding {
            Some(binding) => binding,
            None => panic!(
                "{} on destroyed physics model of entity '{}'",
                operation,
                self.entity.embodied().id()
            ),
        }
    }

    fn dynamic(&self, operation: &str) -> Option<&DynamicBinding> {
        match self.live(operation) {
            Binding::Dynamic(binding) => Some(binding),
            Binding::Static(_) => None,
        }
    }

    /// Unwraps a space call on resources this model owns
    fn owned<T>(&self, result: Result<T>) -> T {
        match result {
            Ok(value) => value,
            Err(err) => panic!(
                "physics model of entity '{}' lost one of its resources: {}",
                self.entity.embodied().id(),
                err
            ),
        }
    }

    fn release_attachments(&self) {
        if let Some(Binding::Dynamic(DynamicBinding {
            grippable: Some(grippable),
            ..
        })) = &self.binding
        {
            grippable.release_all();
        }
    }

    /// Copies the shape's cached bounds into the planar extent of the
    /// bounding box
    fn update_bounding_box(&mut self) {
        let shape = self.live("update_bounding_box").shape();
        let bounds = self.owned(self.space.borrow().shape_bounds(shape));
        self.bounding_box.min.x = bounds.min.x;
        self.bounding_box.min.y = bounds.min.y;
        self.bounding_box.max.x = bounds.max.x;
        self.bounding_box.max.y = bounds.max.y;
    }

    /// The bound entity
    pub fn entity(&self) -> &E {
        &self.entity
    }

    /// The bound entity, mutably
    pub fn entity_mut(&mut self) -> &mut E {
        &mut self.entity
    }

    /// The space this model lives in
    pub fn space(&self) -> &SpaceHandle {
        &self.space
    }

    /// True when the entity was bound with a dynamic body
    pub fn is_movable(&self) -> bool {
        matches!(self.binding, Some(Binding::Dynamic(_)))
    }

    /// The dynamic body, for movable entities
    pub fn body_handle(&self) -> Option<BodyHandle> {
        self.dynamic("body_handle").map(|binding| binding.body.handle())
    }

    /// The bound shape
    pub fn shape_handle(&self) -> ShapeHandle {
        self.live("shape_handle").shape()
    }

    /// The friction joints (linear, angular), for movable entities
    pub fn friction_joints(&self) -> Option<(ConstraintHandle, ConstraintHandle)> {
        self.dynamic("friction_joints").map(|binding| {
            (
                binding.friction.linear.handle(),
                binding.friction.angular.handle(),
            )
        })
    }

    /// The attachment controller, for grippable entities
    pub fn attachment(&self) -> Option<&Grippable> {
        self.dynamic("attachment")
            .and_then(|binding| binding.grippable.as_ref())
    }

    /// Mounts a gripper on a movable entity's body. Destroying the model
    /// makes its grippers let go first.
    pub fn mount_gripper(&self) -> Option<Gripper> {
        self.dynamic("mount_gripper").map(|binding| {
            Gripper::mount(self.space.clone(), binding.body.handle(), &binding.grippers)
        })
    }
}

impl<E: ShapedEntity> PhysicsModel for SingleBodyModel<E> {
    fn update_entity_status(&mut self) {
        if let Some(body) = self.body_handle() {
            self.update_bounding_box();
            let (position, angle) = {
                let space = self.space.borrow();
                let body = self.owned(space.body(body));
                (body.get_position(), body.get_angle())
            };
            let embodied = self.entity.embodied_mut();
            let z = embodied.get_position().z;
            embodied.set_position(Vector3::from_xy(position, z));
            embodied.set_orientation(Quaternion::from_yaw(angle));
        }
        self.entity.embodied_mut().update_components();
    }

    fn move_to(&mut self, position: Vector3, orientation: Quaternion, check_only: bool) -> bool {
        let (body, shape) = match self.dynamic("move_to") {
            Some(binding) => (binding.body.handle(), binding.shape.handle()),
            None => return false,
        };

        let collides = {
            let mut space = self.space.borrow_mut();
            let saved = self.owned(space.body(body)).pose();
            {
                let body = self.owned(space.body_mut(body));
                body.set_position(position.xy());
                body.set_angle(orientation.yaw());
            }

            let probe = self.owned(space.shape(shape)).probe();
            let collides = space.shape_query(&probe) > 0;

            if collides || check_only {
                self.owned(space.body_mut(body)).set_pose(saved);
            }
            collides
        };

        if collides {
            trace!(
                "Move of '{}' to {} rejected by collision",
                self.entity.embodied().id(),
                position
            );
        } else if !check_only {
            self.release_attachments();
            self.owned(self.space.borrow_mut().reindex_shape(shape));
            self.update_bounding_box();
            debug!("Moved '{}' to {}", self.entity.embodied().id(), position);
        }
        !collides
    }

    fn reset(&mut self) {
        let (body, shape) = match self.dynamic("reset") {
            Some(binding) => (binding.body.handle(), binding.shape.handle()),
            None => return,
        };

        self.entity.embodied_mut().reset_pose();
        let position = self.entity.embodied().get_init_position();
        let yaw = self.entity.embodied().get_init_orientation().yaw();
        {
            let mut space = self.space.borrow_mut();
            {
                let body = self.owned(space.body_mut(body));
                body.set_position(position.xy());
                body.set_angle(yaw);
                body.set_velocity(Vector2::ZERO);
                body.set_angular_velocity(0.0);
                body.reset_forces();
            }
            self.owned(space.cache_bounds(shape));
            self.owned(space.reindex_shape(shape));
        }
        self.update_bounding_box();
        self.release_attachments();
        debug!("Reset '{}' to {}", self.entity.embodied().id(), position);
    }

    fn destroy(&mut self) {
        match self.binding.take() {
            Some(binding) => {
                drop(binding);
                debug!("Destroyed physics model of '{}'", self.entity.embodied().id());
            }
            None => panic!(
                "destroy called twice on physics model of entity '{}'",
                self.entity.embodied().id()
            ),
        }
    }

    /// Clips the ray to the entity's vertical extent before the planar
    /// query, rather than testing the height of the planar hit afterwards.
    /// A ray that crosses the footprint's edge below the entity and then
    /// rises into it therefore hits where it first enters the entity's
    /// volume, where a height check would reject it.
    fn check_intersection_with_ray(&self, ray: &Ray3) -> Option<f32> {
        let shape = self.live("check_intersection_with_ray").shape();
        let base = self.entity.embodied().get_position().z;
        let top = base + self.entity.get_height();

        // only the part of the ray inside the entity's vertical extent can hit
        let (t0, t1) = ray.clip_to_z_range(base, top)?;

        let start = ray.point_at(t0).xy();
        let end = ray.point_at(t1).xy();
        let hit = self.owned(self.space.borrow().segment_query(shape, start, end))?;
        Some(t0 + hit.t * (t1 - t0))
    }

    fn is_colliding_with_something(&self) -> bool {
        let shape = self.live("is_colliding_with_something").shape();
        self.owned(self.space.borrow().shape_query_registered(shape)) > 0
    }

    fn bounding_box(&self) -> &Aabb {
        self.live("bounding_box");
        &self.bounding_box
    }

    fn is_destroyed(&self) -> bool {
        self.binding.is_none()
    }
}

impl<E: ShapedEntity> fmt::Debug for SingleBodyModel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleBodyModel")
            .field("entity", &self.entity.embodied().id())
            .field("movable", &self.is_movable())
            .field("bounding_box", &self.bounding_box)
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}
