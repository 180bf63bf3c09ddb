//! Engine-facing types: errors, status snapshots, events and the command
//! protocol spoken between `RodioEngine` and its audio thread.

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use thiserror::Error;

use crate::library::CodecFormat;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no audio output device: {0}")]
    NoOutputDevice(String),

    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("seek failed: {0}")]
    Seek(String),

    #[error("nothing is queued")]
    NothingQueued,

    #[error("audio thread is not running")]
    Disconnected,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SeekOrigin {
    /// Offset counts from the start of the queue.
    Start,
    /// Offset counts back from the end of the queue.
    End,
}

/// Snapshot of what the engine is doing.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct EngineStatus {
    /// A queue has been started and has not finished or been stopped.
    /// Stays set while paused.
    pub playing: bool,
    pub paused: bool,
    /// Index of the playing entry within the current queue.
    pub queue_index: u32,
}

/// Events reported asynchronously by the engine.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Playback stopped, either by `stop()` or by running off the end of the queue.
    Stopped,
}

/// Per-channel volume in percent (`0..=100`).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Volume {
    pub left: u8,
    pub right: u8,
}

impl Volume {
    pub fn both(percent: u8) -> Self {
        let percent = percent.min(100);
        Self {
            left: percent,
            right: percent,
        }
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::both(100)
    }
}

pub(super) type Reply = Sender<Result<(), EngineError>>;

#[derive(Debug)]
pub(super) enum EngineCmd {
    Enqueue {
        path: PathBuf,
        format: CodecFormat,
        reply: Reply,
    },
    Play(Reply),
    Pause(Reply),
    Resume(Reply),
    Stop(Reply),
    Close(Reply),
    Seek {
        seconds: u32,
        origin: SeekOrigin,
        reply: Reply,
    },
    SetVolume {
        volume: Volume,
        reply: Reply,
    },
    SetEventSender(Sender<EngineEvent>),
    Quit,
}

/// State published by the audio thread for synchronous readers.
#[derive(Debug, Clone, Default)]
pub(super) struct EngineInfo {
    pub status: EngineStatus,
    pub elapsed: Duration,
    pub volume: Volume,
}

pub(super) type InfoHandle = Arc<Mutex<EngineInfo>>;
