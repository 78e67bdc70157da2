#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Material and friction parameters applied when binding an entity
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct ModelConfig {
    /// Surface friction of movable shapes
    pub movable_friction: f32,

    /// Surface friction of immovable shapes
    pub static_friction: f32,

    /// Restitution of every bound shape
    pub elasticity: f32,

    /// Force cap of the linear friction joint
    pub linear_friction_max_force: f32,

    /// Torque cap of the angular friction joint
    pub angular_friction_max_torque: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            movable_friction: 0.7,
            static_friction: 0.1,
            elasticity: 0.0,
            // tuned against the force and torque limits of the wheeled robots
            linear_friction_max_force: 1.49,
            angular_friction_max_torque: 1.49,
        }
    }
}
