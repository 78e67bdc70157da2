use std::any::{type_name, Any};
use std::collections::BTreeMap;

use crate::error::PhysicsError;
use crate::Result;

/// A source of readings available to a controller
pub trait Sensor: Any {
    /// Refreshes the readings for the current step
    fn update(&mut self) {}

    /// Returns the sensor to its initial state
    fn reset(&mut self) {}

    /// Returns a dynamic reference to any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Returns a dynamic mutable reference to any for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A device a controller can drive
pub trait Actuator: Any {
    /// Applies the commands set during the current step
    fn update(&mut self) {}

    /// Returns the actuator to its initial state
    fn reset(&mut self) {}

    /// Returns a dynamic reference to any for downcasting
    fn as_any(&self) -> &dyn Any;

    /// Returns a dynamic mutable reference to any for downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Capabilities keyed by label
pub struct CapabilityMap<T: ?Sized> {
    entries: BTreeMap<String, Box<T>>,
}

impl<T: ?Sized> Default for CapabilityMap<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T: ?Sized> CapabilityMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a capability, returning the one it replaces
    pub fn insert(&mut self, label: impl Into<String>, capability: Box<T>) -> Option<Box<T>> {
        self.entries.insert(label.into(), capability)
    }

    pub fn get(&self, label: &str) -> Option<&T> {
        self.entries.get(label).map(|c| c.as_ref())
    }

    pub fn get_mut(&mut self, label: &str) -> Option<&mut T> {
        self.entries.get_mut(label).map(|c| c.as_mut())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.entries.contains_key(label)
    }

    /// Registered labels, sorted
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.entries.values_mut().map(|c| c.as_mut())
    }
}

fn not_configured(kind: &str, label: &str) -> PhysicsError {
    PhysicsError::NotConfigured(format!("Unknown {} '{}' requested by controller", kind, label))
}

fn type_mismatch<T>(kind: &str, label: &str) -> PhysicsError {
    PhysicsError::TypeMismatch(format!(
        "{} '{}' cannot be used as {}",
        kind,
        label,
        type_name::<T>()
    ))
}

/// The sensors and actuators a controller is wired to
#[derive(Default)]
pub struct ControlInterface {
    sensors: CapabilityMap<dyn Sensor>,
    actuators: CapabilityMap<dyn Actuator>,
}

impl ControlInterface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_sensor(&mut self, label: impl Into<String>, sensor: Box<dyn Sensor>) {
        self.sensors.insert(label, sensor);
    }

    pub fn add_actuator(&mut self, label: impl Into<String>, actuator: Box<dyn Actuator>) {
        self.actuators.insert(label, actuator);
    }

    pub fn has_sensor(&self, label: &str) -> bool {
        self.sensors.contains(label)
    }

    pub fn has_actuator(&self, label: &str) -> bool {
        self.actuators.contains(label)
    }

    /// Looks up a sensor by label as its concrete type
    pub fn sensor<T: Sensor>(&self, label: &str) -> Result<&T> {
        self.sensors
            .get(label)
            .ok_or_else(|| not_configured("sensor", label))?
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| type_mismatch::<T>("Sensor", label))
    }

    /// Looks up a sensor by label as its concrete type, mutably
    pub fn sensor_mut<T: Sensor>(&mut self, label: &str) -> Result<&mut T> {
        self.sensors
            .get_mut(label)
            .ok_or_else(|| not_configured("sensor", label))?
            .as_any_mut()
            .downcast_mut::<T>()
            .ok_or_else(|| type_mismatch::<T>("Sensor", label))
    }

    /// Looks up an actuator by label as its concrete type
    pub fn actuator<T: Actuator>(&self, label: &str) -> Result<&T> {
        self.actuators
            .get(label)
            .ok_or_else(|| not_configured("actuator", label))?
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| type_mismatch::<T>("Actuator", label))
    }

    /// Looks up an actuator by label as its concrete type, mutably
    pub fn actuator_mut<T: Actuator>(&mut self, label: &str) -> Result<&mut T> {
        self.actuators
            .get_mut(label)
            .ok_or_else(|| not_configured("actuator", label))?
            .as_any_mut()
            .downcast_mut::<T>()
            .ok_or_else(|| type_mismatch::<T>("Actuator", label))
    }

    pub fn sensors(&self) -> &CapabilityMap<dyn Sensor> {
        &self.sensors
    }

    pub fn actuators(&self) -> &CapabilityMap<dyn Actuator> {
        &self.actuators
    }

    /// Refreshes every sensor
    pub fn update_sensors(&mut self) {
        for sensor in self.sensors.values_mut() {
            sensor.update();
        }
    }

    /// Applies every actuator
    pub fn update_actuators(&mut self) {
        for actuator in self.actuators.values_mut() {
            actuator.update();
        }
    }

    /// Resets every sensor and actuator
    pub fn reset(&mut self) {
        for sensor in self.sensors.values_mut() {
            sensor.reset();
        }
        for actuator in self.actuators.values_mut() {
            actuator.reset();
        }
    }
}
