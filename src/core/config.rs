#[cfg(feature = "serialize")]
use serde::{Serialize, Deserialize};

/// Configuration parameters for a physics space
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub struct SpaceConfig {
    /// The fixed time step used by [`crate::core::Space::tick`]
    pub time_step: f32,

    /// The number of iterations to run for solving velocity constraints
    pub iterations: u32,

    /// Fraction of joint error left uncorrected after one second
    pub joint_error_bias: f32,

    /// Side length of a spatial hash cell
    pub cell_size: f32,

    /// Penetration depth below which two shapes are only touching
    pub collision_slop: f32,
}

impl Default for SpaceConfig {
    fn default() -> Self {
        Self {
            time_step: 1.0 / 60.0,
            iterations: 10,
            joint_error_bias: (1.0f32 - 0.1).powf(60.0),
            cell_size: 0.1,
            collision_slop: 0.0,
        }
    }
}

impl SpaceConfig {
    /// Creates a configuration with the given spatial hash cell size
    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Bias coefficient applied to joint error for a step of length `dt`
    #[inline]
    pub fn bias_coef(&self, dt: f32) -> f32 {
        1.0 - self.joint_error_bias.powf(dt)
    }
}
