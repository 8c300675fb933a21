//! Platform abstraction layer
//!
//! Input sources report key identifiers; everything here reduces them to
//! per-flipper pressed flags.

pub mod input;

pub use input::{FlipperBindings, KeyboardState};
