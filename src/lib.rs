pub mod math;
pub mod core;
pub mod bodies;
pub mod shapes;
pub mod collision;
pub mod constraints;
pub mod entity;
pub mod models;
pub mod control;

/// Re-export common types for easier usage
pub use crate::core::{PhysicsSpace, Space, SpaceConfig, SpaceHandle};
pub use crate::entity::{BoxEntity, CylinderEntity, EmbodiedEntity};
pub use crate::models::{BoxModel, CylinderModel, ModelConfig, PhysicsModel};
pub use crate::math::{Quaternion, Ray3, Vector2, Vector3};

/// Error types for the physics binding layer
pub mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum PhysicsError {
        #[error("Invalid parameter: {0}")]
        InvalidParameter(String),

        #[error("Resource not found: {0}")]
        ResourceNotFound(String),

        #[error("Not configured: {0}")]
        NotConfigured(String),

        #[error("Type mismatch: {0}")]
        TypeMismatch(String),

        #[error("Internal error: {0}")]
        InternalError(String),
    }
}

/// Result type for physics operations
pub type Result<T> = std::result::Result<T, error::PhysicsError>;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Creates a new space with the given configuration behind a shared handle
pub fn new_space(config: SpaceConfig) -> SpaceHandle {
    std::rc::Rc::new(std::cell::RefCell::new(Space::with_config(config)))
}
