use std::path::Path;
use std::sync::mpsc::Sender;

use crate::library::CodecFormat;

use super::types::{EngineError, EngineEvent, EngineStatus, SeekOrigin, Volume};

/// The operations the virtual device needs from a playback engine.
///
/// Every call returns promptly; playback itself runs elsewhere and reports
/// its end through the sender registered with `set_event_sender`.
pub trait PlaybackEngine: Send {
    /// Stop and drop everything queued. Does not report `Stopped`.
    fn close(&mut self) -> Result<(), EngineError>;

    /// Append a file to the play queue.
    fn enqueue(&mut self, path: &Path, format: CodecFormat) -> Result<(), EngineError>;

    fn play(&mut self) -> Result<(), EngineError>;

    fn pause(&mut self) -> Result<(), EngineError>;

    fn resume(&mut self) -> Result<(), EngineError>;

    /// Stop playback. Reports `Stopped` if something was playing.
    fn stop(&mut self) -> Result<(), EngineError>;

    fn seek(&mut self, seconds: u32, origin: SeekOrigin) -> Result<(), EngineError>;

    fn status(&self) -> EngineStatus;

    /// Whole seconds played of the current queue entry.
    fn position(&self) -> u32;

    fn volume(&self) -> Volume;

    fn set_volume(&mut self, volume: Volume) -> Result<(), EngineError>;

    /// Register where `EngineEvent`s go. Replaces any earlier sender.
    fn set_event_sender(&mut self, tx: Sender<EngineEvent>);
}
