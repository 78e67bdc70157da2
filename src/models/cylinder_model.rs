use crate::entity::{CylinderEntity, EmbodiedEntity};
use crate::models::{ShapedEntity, SingleBodyModel};
use crate::shapes::{CollisionCategory, Geometry};
use crate::Result;

/// Physics model of an upright cylinder: a disc footprint extruded to the
/// cylinder's height
pub type CylinderModel = SingleBodyModel<CylinderEntity>;

impl ShapedEntity for CylinderEntity {
    fn embodied(&self) -> &EmbodiedEntity {
        CylinderEntity::embodied(self)
    }

    fn embodied_mut(&mut self) -> &mut EmbodiedEntity {
        CylinderEntity::embodied_mut(self)
    }

    fn get_mass(&self) -> f32 {
        CylinderEntity::get_mass(self)
    }

    fn get_height(&self) -> f32 {
        CylinderEntity::get_height(self)
    }

    fn get_collision_category(&self) -> CollisionCategory {
        self.get_category()
    }

    fn footprint(&self) -> Result<Geometry> {
        Geometry::circle(self.get_radius())
    }
}
