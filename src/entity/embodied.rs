use std::fmt;

use crate::math::{Quaternion, Vector3};

/// A component whose state derives from its entity's pose, such as a
/// mounted sensor or a light
pub trait EntityComponent {
    /// Name of the component, unique within its entity
    fn name(&self) -> &str;

    /// Refreshes the component after the entity's pose changed
    fn update(&mut self, position: &Vector3, orientation: &Quaternion);
}

/// The logical pose of a physical object, as seen by the rest of the
/// simulator
pub struct EmbodiedEntity {
    id: String,
    position: Vector3,
    orientation: Quaternion,
    init_position: Vector3,
    init_orientation: Quaternion,
    movable: bool,
    components: Vec<Box<dyn EntityComponent>>,
    update_count: u64,
}

impl EmbodiedEntity {
    /// Creates an entity at its initial pose
    pub fn new(id: impl Into<String>, position: Vector3, orientation: Quaternion, movable: bool) -> Self {
        Self {
            id: id.into(),
            position,
            orientation,
            init_position: position,
            init_orientation: orientation,
            movable,
            components: Vec::new(),
            update_count: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_movable(&self) -> bool {
        self.movable
    }

    pub fn get_position(&self) -> Vector3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vector3) {
        self.position = position;
    }

    pub fn get_orientation(&self) -> Quaternion {
        self.orientation
    }

    pub fn set_orientation(&mut self, orientation: Quaternion) {
        self.orientation = orientation;
    }

    pub fn get_init_position(&self) -> Vector3 {
        self.init_position
    }

    pub fn set_init_position(&mut self, position: Vector3) {
        self.init_position = position;
    }

    pub fn get_init_orientation(&self) -> Quaternion {
        self.init_orientation
    }

    pub fn set_init_orientation(&mut self, orientation: Quaternion) {
        self.init_orientation = orientation;
    }

    /// Puts the entity back at its initial pose
    pub fn reset_pose(&mut self) {
        self.position = self.init_position;
        self.orientation = self.init_orientation;
    }

    /// Registers a dependent component
    pub fn add_component(&mut self, component: Box<dyn EntityComponent>) {
        self.components.push(component);
    }

    /// Names of the registered components, in registration order
    pub fn component_names(&self) -> Vec<&str> {
        self.components.iter().map(|c| c.name()).collect()
    }

    /// Pushes the current pose to every dependent component
    pub fn update_components(&mut self) {
        let (position, orientation) = (self.position, self.orientation);
        for component in &mut self.components {
            component.update(&position, &orientation);
        }
        self.update_count += 1;
    }

    /// How many times the components have been refreshed
    pub fn update_count(&self) -> u64 {
        self.update_count
    }
}

impl fmt::Debug for EmbodiedEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbodiedEntity")
            .field("id", &self.id)
            .field("position", &self.position)
            .field("orientation", &self.orientation)
            .field("movable", &self.movable)
            .field("components", &self.component_names())
            .finish()
    }
}
