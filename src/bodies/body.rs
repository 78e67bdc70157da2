use crate::bodies::BodyType;
use crate::error::PhysicsError;
use crate::math::Vector2;
use crate::Result;

/// Planar pose of a body, enough to restore it exactly
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyPose {
    /// Center of mass in world space
    pub position: Vector2,

    /// Rotation angle in radians
    pub angle: f32,

    /// Unit vector `(cos angle, sin angle)`
    pub rotation: Vector2,
}

/// A rigid body in the plane of a physics space
#[derive(Debug, Clone)]
pub struct Body {
    /// The body's type (dynamic or static)
    body_type: BodyType,

    /// Center of mass in world space
    position: Vector2,

    /// Rotation angle in radians
    angle: f32,

    /// Cached `(cos angle, sin angle)`
    rotation: Vector2,

    /// The body's linear velocity
    velocity: Vector2,

    /// The body's angular velocity
    angular_velocity: f32,

    /// Accumulated force, kept until [`Body::reset_forces`]
    force: Vector2,

    /// Accumulated torque, kept until [`Body::reset_forces`]
    torque: f32,

    mass: f32,
    inv_mass: f32,
    moment: f32,
    inv_moment: f32,
}

impl Body {
    /// Creates a dynamic body with the given mass and moment of inertia
    pub fn new_dynamic(mass: f32, moment: f32) -> Result<Self> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(PhysicsError::InvalidParameter(format!(
                "Body mass must be positive and finite, got {}",
                mass
            )));
        }
        if !(moment.is_finite() && moment > 0.0) {
            return Err(PhysicsError::InvalidParameter(format!(
                "Body moment of inertia must be positive and finite, got {}",
                moment
            )));
        }

        Ok(Self {
            body_type: BodyType::Dynamic,
            mass,
            inv_mass: 1.0 / mass,
            moment,
            inv_moment: 1.0 / moment,
            ..Self::new_static()
        })
    }

    /// Creates a static body with infinite mass
    pub fn new_static() -> Self {
        Self {
            body_type: BodyType::Static,
            position: Vector2::ZERO,
            angle: 0.0,
            rotation: Vector2::new(1.0, 0.0),
            velocity: Vector2::ZERO,
            angular_velocity: 0.0,
            force: Vector2::ZERO,
            torque: 0.0,
            mass: f32::INFINITY,
            inv_mass: 0.0,
            moment: f32::INFINITY,
            inv_moment: 0.0,
        }
    }

    /// Returns the body's type
    #[inline]
    pub fn get_body_type(&self) -> BodyType {
        self.body_type
    }

    /// Returns true if the body is static
    #[inline]
    pub fn is_static(&self) -> bool {
        self.body_type == BodyType::Static
    }

    /// Returns the body's position
    #[inline]
    pub fn get_position(&self) -> Vector2 {
        self.position
    }

    /// Sets the body's position
    pub fn set_position(&mut self, position: Vector2) {
        self.position = position;
    }

    /// Returns the body's rotation angle in radians
    #[inline]
    pub fn get_angle(&self) -> f32 {
        self.angle
    }

    /// Sets the body's rotation angle in radians
    pub fn set_angle(&mut self, angle: f32) {
        self.angle = angle;
        self.rotation = Vector2::for_angle(angle);
    }

    /// Returns the unit rotation vector
    #[inline]
    pub fn get_rotation(&self) -> Vector2 {
        self.rotation
    }

    /// Snapshot of position and orientation
    #[inline]
    pub fn pose(&self) -> BodyPose {
        BodyPose {
            position: self.position,
            angle: self.angle,
            rotation: self.rotation,
        }
    }

    /// Restores a snapshot taken with [`Body::pose`], bit for bit
    pub fn set_pose(&mut self, pose: BodyPose) {
        self.position = pose.position;
        self.angle = pose.angle;
        self.rotation = pose.rotation;
    }

    /// Returns the body's linear velocity
    #[inline]
    pub fn get_velocity(&self) -> Vector2 {
        self.velocity
    }

    /// Sets the body's linear velocity
    pub fn set_velocity(&mut self, velocity: Vector2) {
        if self.body_type.is_dynamic() {
            self.velocity = velocity;
        }
    }

    /// Returns the body's angular velocity
    #[inline]
    pub fn get_angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    /// Sets the body's angular velocity
    pub fn set_angular_velocity(&mut self, angular_velocity: f32) {
        if self.body_type.is_dynamic() {
            self.angular_velocity = angular_velocity;
        }
    }

    /// Returns the accumulated force
    #[inline]
    pub fn get_force(&self) -> Vector2 {
        self.force
    }

    /// Returns the accumulated torque
    #[inline]
    pub fn get_torque(&self) -> f32 {
        self.torque
    }

    /// Applies a force at the center of mass
    pub fn apply_force(&mut self, force: Vector2) {
        self.force += force;
    }

    /// Applies a force at a point given relative to the center of mass,
    /// in world orientation
    pub fn apply_force_at_offset(&mut self, force: Vector2, offset: Vector2) {
        self.force += force;
        self.torque += offset.cross(&force);
    }

    /// Applies a torque
    pub fn apply_torque(&mut self, torque: f32) {
        self.torque += torque;
    }

    /// Clears accumulated force and torque
    pub fn reset_forces(&mut self) {
        self.force = Vector2::ZERO;
        self.torque = 0.0;
    }

    /// Applies an impulse at a point given relative to the center of mass
    pub fn apply_impulse(&mut self, impulse: Vector2, offset: Vector2) {
        self.velocity += impulse * self.inv_mass;
        self.angular_velocity += self.inv_moment * offset.cross(&impulse);
    }

    /// Applies an angular impulse
    pub fn apply_angular_impulse(&mut self, impulse: f32) {
        self.angular_velocity += impulse * self.inv_moment;
    }

    /// Returns the body's mass
    #[inline]
    pub fn get_mass(&self) -> f32 {
        self.mass
    }

    /// Returns the inverse mass (zero for static bodies)
    #[inline]
    pub fn get_inverse_mass(&self) -> f32 {
        self.inv_mass
    }

    /// Returns the moment of inertia
    #[inline]
    pub fn get_moment(&self) -> f32 {
        self.moment
    }

    /// Returns the inverse moment of inertia (zero for static bodies)
    #[inline]
    pub fn get_inverse_moment(&self) -> f32 {
        self.inv_moment
    }

    /// Converts a point from body-local coordinates to world coordinates
    #[inline]
    pub fn local_to_world(&self, point: Vector2) -> Vector2 {
        self.position + point.rotate(self.rotation)
    }

    /// Converts a point from world coordinates to body-local coordinates
    #[inline]
    pub fn world_to_local(&self, point: Vector2) -> Vector2 {
        (point - self.position).unrotate(self.rotation)
    }

    /// Velocity of a point given relative to the center of mass
    #[inline]
    pub fn velocity_at_offset(&self, offset: Vector2) -> Vector2 {
        self.velocity + offset.perpendicular() * self.angular_velocity
    }

    /// Integrates velocity from accumulated force and torque
    pub(crate) fn integrate_velocity(&mut self, dt: f32) {
        if !self.body_type.is_dynamic() {
            return;
        }
        self.velocity += self.force * self.inv_mass * dt;
        self.angular_velocity += self.torque * self.inv_moment * dt;
    }

    /// Integrates position from velocity
    pub(crate) fn integrate_position(&mut self, dt: f32) {
        if !self.body_type.is_dynamic() {
            return;
        }
        self.position += self.velocity * dt;
        self.set_angle(self.angle + self.angular_velocity * dt);
    }
}
