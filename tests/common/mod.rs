#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use phys_dynamics2d::{
    BoxEntity, BoxModel, CylinderEntity, CylinderModel, Quaternion, Space, SpaceHandle, Vector3,
};

/// Installs a test logger once per test binary
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a space plus a type-erased handle to it
pub fn new_space() -> (Rc<RefCell<Space>>, SpaceHandle) {
    init_logging();
    let space = Rc::new(RefCell::new(Space::new()));
    let handle: SpaceHandle = space.clone();
    (space, handle)
}

pub fn movable_box(space: &SpaceHandle, id: &str, position: Vector3) -> BoxModel {
    let entity = BoxEntity::new(
        id,
        position,
        Quaternion::identity(),
        true,
        Vector3::new(1.0, 1.0, 1.0),
        1.0,
    );
    BoxModel::new(space.clone(), entity).unwrap()
}

pub fn static_box(space: &SpaceHandle, id: &str, position: Vector3) -> BoxModel {
    let entity = BoxEntity::new(
        id,
        position,
        Quaternion::identity(),
        false,
        Vector3::new(1.0, 1.0, 1.0),
        0.0,
    );
    BoxModel::new(space.clone(), entity).unwrap()
}

pub fn movable_cylinder(space: &SpaceHandle, id: &str, position: Vector3, radius: f32) -> CylinderModel {
    let entity = CylinderEntity::new(id, position, Quaternion::identity(), true, radius, 0.5, 1.0);
    CylinderModel::new(space.clone(), entity).unwrap()
}
