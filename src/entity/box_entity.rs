use crate::entity::EmbodiedEntity;
use crate::math::{Quaternion, Vector3};
use crate::shapes::CollisionCategory;

/// A box-shaped obstacle
#[derive(Debug)]
pub struct BoxEntity {
    embodied: EmbodiedEntity,

    /// Full extents along x, y and z
    size: Vector3,

    mass: f32,
    category: CollisionCategory,
}

impl BoxEntity {
    /// Creates a box. Movable boxes can be gripped by default.
    pub fn new(
        id: impl Into<String>,
        position: Vector3,
        orientation: Quaternion,
        movable: bool,
        size: Vector3,
        mass: f32,
    ) -> Self {
        Self {
            embodied: EmbodiedEntity::new(id, position, orientation, movable),
            size,
            mass,
            category: if movable {
                CollisionCategory::Grippable
            } else {
                CollisionCategory::Normal
            },
        }
    }

    /// Overrides the collision category
    pub fn with_category(mut self, category: CollisionCategory) -> Self {
        self.category = category;
        self
    }

    pub fn get_size(&self) -> Vector3 {
        self.size
    }

    pub fn embodied(&self) -> &EmbodiedEntity {
        &self.embodied
    }

    pub fn embodied_mut(&mut self) -> &mut EmbodiedEntity {
        &mut self.embodied
    }

    pub fn get_mass(&self) -> f32 {
        self.mass
    }

    pub fn get_category(&self) -> CollisionCategory {
        self.category
    }
}
