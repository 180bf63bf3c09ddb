//! The playback engine the virtual device delegates to.
//!
//! `PlaybackEngine` is the seam the device is written against; `RodioEngine`
//! implements it with a `rodio` sink driven from a dedicated audio thread.

mod engine;
mod player;
mod sink;
mod thread;
mod types;

pub use engine::PlaybackEngine;
pub use player::RodioEngine;
pub use types::{EngineError, EngineEvent, EngineStatus, SeekOrigin, Volume};
