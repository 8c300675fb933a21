//! Presentation sinks
//!
//! A renderer receives one [`SceneSnapshot`] per frame and returns nothing.
//! Drawing itself is up to the implementor.

use std::io::Write;

use crate::sim::SceneSnapshot;

/// Consumer of per-frame scene snapshots
pub trait RenderSink {
    fn present(&mut self, snapshot: &SceneSnapshot);
}

/// Writes each snapshot as one line of JSON
pub struct JsonLinesSink<W: Write> {
    out: W,
    frames: u64,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        log::debug!("JSON lines sink ready");
        Self { out, frames: 0 }
    }

    /// Number of frames written successfully
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_frame(&mut self, snapshot: &SceneSnapshot) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.out, snapshot)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }
}

impl<W: Write> RenderSink for JsonLinesSink<W> {
    fn present(&mut self, snapshot: &SceneSnapshot) {
        match self.write_frame(snapshot) {
            Ok(()) => self.frames += 1,
            Err(e) => log::warn!("Dropped frame {}: {}", snapshot.tick, e),
        }
    }
}

/// Keeps every snapshot in memory (headless runs and tests)
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub frames: Vec<SceneSnapshot>,
}

impl RenderSink for RecordingSink {
    fn present(&mut self, snapshot: &SceneSnapshot) {
        self.frames.push(snapshot.clone());
    }
}
