use crate::entity::EmbodiedEntity;
use crate::math::{Quaternion, Vector3};
use crate::shapes::CollisionCategory;

/// An upright cylindrical obstacle
#[derive(Debug)]
pub struct CylinderEntity {
    embodied: EmbodiedEntity,
    radius: f32,
    height: f32,
    mass: f32,
    category: CollisionCategory,
}

impl CylinderEntity {
    /// Creates a cylinder. Movable cylinders can be gripped by default.
    pub fn new(
        id: impl Into<String>,
        position: Vector3,
        orientation: Quaternion,
        movable: bool,
        radius: f32,
        height: f32,
        mass: f32,
    ) -> Self {
        Self {
            embodied: EmbodiedEntity::new(id, position, orientation, movable),
            radius,
            height,
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

    pub fn get_radius(&self) -> f32 {
        self.radius
    }

    pub fn get_height(&self) -> f32 {
        self.height
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
