mod box_entity;
mod cylinder_entity;
mod embodied;

pub use self::box_entity::BoxEntity;
pub use self::cylinder_entity::CylinderEntity;
pub use self::embodied::{EmbodiedEntity, EntityComponent};
