//! Read-only scene snapshots handed to renderers
//!
//! A snapshot owns copies of everything a renderer draws, so no handle into
//! the live scene outlives a tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Flipper, PhysicsScene};
use crate::consts::{FLIPPER_PIVOT, FLIPPER_TIP};

/// Position and radius of a ball or bumper
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CircleSnapshot {
    pub pos: Vec2,
    pub radius: f32,
}

/// A flipper at its current rotation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlipperSnapshot {
    /// Live rotated paddle polygon
    pub vertices: [Vec2; 6],
    /// End-cap centers: pivot first, then tip
    pub caps: [Vec2; 2],
    pub radius: f32,
}

impl FlipperSnapshot {
    pub fn of(flipper: &Flipper) -> Self {
        let vertices = flipper.live_polygon();
        Self {
            vertices,
            caps: [vertices[FLIPPER_PIVOT], vertices[FLIPPER_TIP]],
            radius: flipper.radius,
        }
    }
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneSnapshot {
    pub tick: u64,
    pub border: Vec<Vec2>,
    pub balls: Vec<CircleSnapshot>,
    pub obstacles: Vec<CircleSnapshot>,
    pub flippers: Vec<FlipperSnapshot>,
    pub score: u64,
    pub paused: bool,
}

impl SceneSnapshot {
    pub fn capture(scene: &PhysicsScene) -> Self {
        Self {
            tick: scene.tick_count,
            border: scene.border.vertices.clone(),
            balls: scene
                .balls
                .iter()
                .map(|b| CircleSnapshot {
                    pos: b.pos,
                    radius: b.radius,
                })
                .collect(),
            obstacles: scene
                .obstacles
                .iter()
                .map(|o| CircleSnapshot {
                    pos: o.pos,
                    radius: o.radius,
                })
                .collect(),
            flippers: scene.flippers.iter().map(FlipperSnapshot::of).collect(),
            score: scene.score,
            paused: scene.paused,
        }
    }
}

impl PhysicsScene {
    /// Copy out the drawable state
    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot::capture(self)
    }
}
