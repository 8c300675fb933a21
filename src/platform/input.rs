//! Keyboard state sampled once per tick
//!
//! Key events can arrive at any time between ticks. They only update this
//! state; the driver turns it into a [`TickInput`] exactly once per tick so a
//! flipper never changes state in the middle of a step.

use std::collections::HashSet;

use crate::config::SceneConfig;
use crate::sim::{FlipperSide, TickInput};

/// Key identifiers bound to each flipper
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlipperBindings {
    pub left: String,
    pub right: String,
}

impl FlipperBindings {
    pub fn from_config(config: &SceneConfig) -> Self {
        Self {
            left: config.left_flipper.key.clone(),
            right: config.right_flipper.key.clone(),
        }
    }

    pub fn key(&self, side: FlipperSide) -> &str {
        match side {
            FlipperSide::Left => &self.left,
            FlipperSide::Right => &self.right,
        }
    }
}

/// Currently held keys plus a pending pause request
#[derive(Debug, Clone, Default)]
pub struct KeyboardState {
    held: HashSet<String>,
    pause_requested: bool,
}

impl KeyboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: &str) {
        self.held.insert(key.to_string());
    }

    pub fn key_up(&mut self, key: &str) {
        self.held.remove(key);
    }

    pub fn is_held(&self, key: &str) -> bool {
        self.held.contains(key)
    }

    /// Request a pause toggle on the next tick
    pub fn request_pause(&mut self) {
        self.pause_requested = true;
    }

    /// Snapshot the state for one tick; the pause request is one-shot
    pub fn sample(&mut self, bindings: &FlipperBindings) -> TickInput {
        let input = TickInput {
            left_pressed: self.is_held(bindings.key(FlipperSide::Left)),
            right_pressed: self.is_held(bindings.key(FlipperSide::Right)),
            pause: self.pause_requested,
        };
        self.pause_requested = false;
        input
    }
}
