use crate::control::ControlInterface;
use crate::Result;

/// Robot control logic, run once per simulation step
pub trait Controller {
    /// Identifier of the controlled robot
    fn id(&self) -> &str;

    /// Looks up the capabilities the controller needs
    fn init(&mut self, _interface: &mut ControlInterface) -> Result<()> {
        Ok(())
    }

    /// Reads sensors and sets actuator commands
    fn control_step(&mut self, _interface: &mut ControlInterface) {}

    fn reset(&mut self) {}

    fn destroy(&mut self) {}

    /// True once the controller has nothing left to do
    fn is_finished(&self) -> bool {
        false
    }
}

/// Runs one control cycle: sensors, controller, actuators
pub fn run_control_step(controller: &mut dyn Controller, interface: &mut ControlInterface) {
    interface.update_sensors();
    controller.control_step(interface);
    interface.update_actuators();
}
