//! Game session driver
//!
//! Owns the scene, its configuration and the input state, and turns
//! variable frame times into fixed simulation ticks. The session owns no
//! timers or threads: the caller decides when frames happen.

use crate::config::SceneConfig;
use crate::consts::MAX_SUBSTEPS;
use crate::error::SceneError;
use crate::platform::{FlipperBindings, KeyboardState};
use crate::renderer::RenderSink;
use crate::sim::{PhysicsScene, SceneSnapshot, TickInput, tick};

/// Frame times above this are clamped (seconds)
const MAX_FRAME_DT: f32 = 0.1;

pub struct Session {
    config: SceneConfig,
    scene: PhysicsScene,
    bindings: FlipperBindings,
    pub keys: KeyboardState,
    accumulator: f32,
}

impl Session {
    pub fn new(config: SceneConfig) -> Result<Self, SceneError> {
        let scene = PhysicsScene::new(&config)?;
        let bindings = FlipperBindings::from_config(&config);
        Ok(Self {
            config,
            scene,
            bindings,
            keys: KeyboardState::new(),
            accumulator: 0.0,
        })
    }

    pub fn scene(&self) -> &PhysicsScene {
        &self.scene
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Rebuild the scene from the stored configuration
    pub fn restart(&mut self) -> Result<(), SceneError> {
        self.scene.restart(&self.config)?;
        self.accumulator = 0.0;
        Ok(())
    }

    /// Run exactly one tick, sampling input once
    pub fn step(&mut self) -> bool {
        let input = self.keys.sample(&self.bindings);
        tick(&mut self.scene, &input)
    }

    /// Run one tick with an explicit input, bypassing the keyboard state
    pub fn step_with(&mut self, input: &TickInput) -> bool {
        tick(&mut self.scene, input)
    }

    /// Advance by a frame's worth of wall time; returns ticks run
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        let dt = self.scene.dt;
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= dt && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= dt;
            substeps += 1;
        }

        if substeps == MAX_SUBSTEPS && self.accumulator >= dt {
            log::debug!("Dropping {:.4}s of backlog", self.accumulator);
            self.accumulator = 0.0;
        }

        substeps
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        self.scene.snapshot()
    }

    /// Hand the current state to a renderer
    pub fn present(&self, sink: &mut dyn RenderSink) {
        sink.present(&self.snapshot());
    }
}
