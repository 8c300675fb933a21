//! Error types
//!
//! The simulation itself never fails; these cover building a scene from a
//! configuration.

use thiserror::Error;

use crate::sim::{FlipperSide, Quadrant};

/// A scene configuration that breaks a physics precondition
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SceneError {
    #[error("table dimensions must be positive, got {width}x{height}")]
    InvalidTable { width: f32, height: f32 },

    #[error("time step must be positive and finite, got {0}")]
    InvalidTimeStep(f32),

    #[error("gravity must be finite, got ({x}, {y})")]
    InvalidGravity { x: f32, y: f32 },

    #[error("border needs at least 3 points, got {0}")]
    BorderTooShort(usize),

    #[error("border point {0} is not finite")]
    InvalidBorderPoint(usize),

    #[error("border edge {index}..{next} has zero length")]
    DegenerateBorderEdge { index: usize, next: usize },

    #[error("ball {index}: position and velocity must be finite")]
    NonFiniteBall { index: usize },

    #[error("ball {index}: {field} must be positive, got {value}")]
    InvalidBall {
        index: usize,
        field: &'static str,
        value: f32,
    },

    #[error("ball {index}: restitution must be within [0, 1], got {value}")]
    InvalidRestitution { index: usize, value: f32 },

    #[error("obstacle {index}: {field} is invalid, got {value}")]
    InvalidObstacle {
        index: usize,
        field: &'static str,
        value: f32,
    },

    #[error("{side} flipper: {field} is invalid, got {value}")]
    InvalidFlipper {
        side: FlipperSide,
        field: &'static str,
        value: f32,
    },

    #[error("{quadrant} region uses obstacle {index}, but only {count} exist")]
    UnknownObstacle {
        quadrant: Quadrant,
        index: usize,
        count: usize,
    },

    #[error("{quadrant} region uses border point {index}, but the border has {count}")]
    UnknownBorderPoint {
        quadrant: Quadrant,
        index: usize,
        count: usize,
    },

    #[error("{quadrant} region border chain needs at least 2 points, got {len}")]
    BorderChainTooShort { quadrant: Quadrant, len: usize },

    #[error("{quadrant} region border chain has a zero-length edge {from}..{to}")]
    DegenerateChainEdge {
        quadrant: Quadrant,
        from: usize,
        to: usize,
    },
}

/// Failure loading a scene configuration from disk
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid scene: {0}")]
    Scene(#[from] SceneError),
}
