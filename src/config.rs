//! Game configuration.

use std::time::Duration;

/// Runtime settings for the frame loop, the input actor and the object
/// generators.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed sleep between flush and clear. Not compensated for draw
    /// time, so the real frame period is never shorter.
    pub frame_interval: Duration,
    /// Capacity of the control-signal queue.
    pub control_capacity: usize,
    /// Input poll timeout.
    pub input_poll_timeout: Duration,
    /// Delay between two meteorite spawns.
    pub meteorite_interval: Duration,
    /// Seed for meteorite placement.
    pub seed: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            frame_interval: Duration::from_millis(10),
            control_capacity: 15,
            input_poll_timeout: Duration::from_millis(10),
            meteorite_interval: Duration::from_millis(800),
            seed: 1,
        }
    }
}
