mod capability;
mod controller;

pub use self::capability::{Actuator, CapabilityMap, ControlInterface, Sensor};
pub use self::controller::{run_control_step, Controller};
