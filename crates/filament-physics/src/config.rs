//! Simulation parameters for runtime tuning

use glam::Vec3;

/// Tuning parameters for the filament solver.
///
/// All values are sampled live by the kernels on every sub-step, so a
/// changed config takes effect without reallocating simulation state.
#[derive(Clone, Copy, Debug)]
pub struct SimConfig {
    /// Total filament length in world units.
    pub length: f32,
    /// Per-filament length variation, 0 = uniform, 1 = up to ±100%.
    pub length_randomness: f32,
    /// Spring stiffness toward the rest position.
    pub spring: f32,
    /// Velocity damping coefficient.
    pub damping: f32,
    /// Constant external acceleration.
    pub gravity: Vec3,
    /// Upper bound on a single integration sub-step, in seconds.
    pub max_time_step: f32,
    /// Seed for the per-filament random values.
    pub random_seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            length: 1.0,
            length_randomness: 0.5,
            spring: 600.0,
            damping: 30.0,
            gravity: Vec3::new(0.0, -8.0, 2.0),
            max_time_step: 0.006,
            random_seed: 0,
        }
    }
}
