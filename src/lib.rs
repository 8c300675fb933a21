//! Pinball Sim - A 2D pinball table simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, scene state)
//! - `config`: Scene layout and validation
//! - `platform`: Input sampling
//! - `renderer`: Snapshot sinks
//! - `session`: Fixed-step driver

pub mod config;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod sim;

pub use config::SceneConfig;
pub use error::{ConfigError, SceneError};
pub use session::Session;

/// Simulation constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Gravity in pixels/s² (y axis points down)
    pub const GRAVITY: [f32; 2] = [0.0, 981.0];

    /// Velocity kept after bouncing off a border wall
    pub const BORDER_DAMPING: f32 = 0.8;
    /// Divisor tying flipper angular rate (deg/s) to the linear kick
    pub const FLIPPER_KICK_DIVISOR: f32 = 35.0;

    /// Index of the flipper pivot vertex in the paddle polygon
    pub const FLIPPER_PIVOT: usize = 5;
    /// Index of the flipper tip vertex in the paddle polygon
    pub const FLIPPER_TIP: usize = 2;

    /// Classic table dimensions
    pub const TABLE_HEIGHT: f32 = 900.0;
    pub const TABLE_WIDTH: f32 = 540.0;
}
