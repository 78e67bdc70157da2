use crate::entity::{BoxEntity, EmbodiedEntity};
use crate::models::{ShapedEntity, SingleBodyModel};
use crate::shapes::{CollisionCategory, Geometry};
use crate::Result;

/// Physics model of a box: a rectangular footprint extruded to the box's
/// height
pub type BoxModel = SingleBodyModel<BoxEntity>;

impl ShapedEntity for BoxEntity {
    fn embodied(&self) -> &EmbodiedEntity {
        BoxEntity::embodied(self)
    }

    fn embodied_mut(&mut self) -> &mut EmbodiedEntity {
        BoxEntity::embodied_mut(self)
    }

    fn get_mass(&self) -> f32 {
        BoxEntity::get_mass(self)
    }

    fn get_height(&self) -> f32 {
        self.get_size().z
    }

    fn get_collision_category(&self) -> CollisionCategory {
        self.get_category()
    }

    fn footprint(&self) -> Result<Geometry> {
        let size = self.get_size();
        Geometry::rectangle(size.x, size.y)
    }
}
