//! Test doubles shared by the device and dispatcher tests.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use crate::audio::{EngineError, EngineEvent, EngineStatus, PlaybackEngine, SeekOrigin, Volume};
use crate::device::{NotificationKind, NotifyTarget};
use crate::error::Result;
use crate::library::{Candidate, CodecFormat, Probe, TrackSource};
use crate::mci::{Notifier, Passthrough, Request};

/// Everything the fake engine was told, plus the state it reports back.
#[derive(Debug, Default)]
pub(crate) struct EngineLog {
    pub queue: Vec<PathBuf>,
    pub seeks: Vec<(u32, SeekOrigin)>,
    pub plays: usize,
    pub stops: usize,
    pub closes: usize,
    pub volume: Volume,
    pub status: EngineStatus,
    pub position: u32,
    pub events: Option<Sender<EngineEvent>>,
    pub fail_play: bool,
}

pub(crate) type SharedLog = Arc<Mutex<EngineLog>>;

pub(crate) struct FakeEngine {
    log: SharedLog,
}

impl FakeEngine {
    pub fn new() -> (Self, SharedLog) {
        let log = SharedLog::default();
        (Self { log: log.clone() }, log)
    }

    /// Another engine reporting into an existing log, as after a reopen.
    pub fn with_log(log: &SharedLog) -> Self {
        Self { log: log.clone() }
    }
}

/// Let the queue run out: the engine goes idle and reports `Stopped`
/// without anybody draining the event yet.
pub(crate) fn finish(log: &SharedLog) {
    let mut log = log.lock().unwrap();
    log.status = EngineStatus::default();
    if let Some(tx) = &log.events {
        let _ = tx.send(EngineEvent::Stopped);
    }
}

impl PlaybackEngine for FakeEngine {
    fn close(&mut self) -> std::result::Result<(), EngineError> {
        let mut log = self.log.lock().unwrap();
        log.closes += 1;
        log.queue.clear();
        log.status = EngineStatus::default();
        Ok(())
    }

    fn enqueue(&mut self, path: &Path, _format: CodecFormat) -> std::result::Result<(), EngineError> {
        self.log.lock().unwrap().queue.push(path.to_path_buf());
        Ok(())
    }

    fn play(&mut self) -> std::result::Result<(), EngineError> {
        let mut log = self.log.lock().unwrap();
        if log.fail_play || log.queue.is_empty() {
            return Err(EngineError::NothingQueued);
        }
        log.plays += 1;
        log.status.playing = true;
        log.status.paused = false;
        Ok(())
    }

    fn pause(&mut self) -> std::result::Result<(), EngineError> {
        let mut log = self.log.lock().unwrap();
        if log.queue.is_empty() {
            return Err(EngineError::NothingQueued);
        }
        log.status.paused = log.status.playing;
        Ok(())
    }

    fn resume(&mut self) -> std::result::Result<(), EngineError> {
        let mut log = self.log.lock().unwrap();
        if log.queue.is_empty() {
            return Err(EngineError::NothingQueued);
        }
        log.status.paused = false;
        Ok(())
    }

    fn stop(&mut self) -> std::result::Result<(), EngineError> {
        let mut log = self.log.lock().unwrap();
        log.stops += 1;
        if log.status.playing {
            if let Some(tx) = &log.events {
                let _ = tx.send(EngineEvent::Stopped);
            }
        }
        log.status = EngineStatus::default();
        log.queue.clear();
        Ok(())
    }

    fn seek(&mut self, seconds: u32, origin: SeekOrigin) -> std::result::Result<(), EngineError> {
        let mut log = self.log.lock().unwrap();
        if log.queue.is_empty() {
            return Err(EngineError::NothingQueued);
        }
        log.seeks.push((seconds, origin));
        Ok(())
    }

    fn status(&self) -> EngineStatus {
        self.log.lock().unwrap().status
    }

    fn position(&self) -> u32 {
        self.log.lock().unwrap().position
    }

    fn volume(&self) -> Volume {
        self.log.lock().unwrap().volume
    }

    fn set_volume(&mut self, volume: Volume) -> std::result::Result<(), EngineError> {
        self.log.lock().unwrap().volume = volume;
        Ok(())
    }

    fn set_event_sender(&mut self, tx: Sender<EngineEvent>) {
        self.log.lock().unwrap().events = Some(tx);
    }
}

pub(crate) type Deliveries = Arc<Mutex<Vec<(NotifyTarget, NotificationKind, u32)>>>;

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    pub delivered: Deliveries,
}

impl Notifier for RecordingNotifier {
    fn notify(&mut self, target: NotifyTarget, kind: NotificationKind, device: u32) {
        self.delivered.lock().unwrap().push((target, kind, device));
    }
}

/// Pass-through that answers every request with a fixed code.
pub(crate) struct FixedDriver {
    pub code: u32,
    pub seen: Arc<Mutex<Vec<Request>>>,
}

impl Passthrough for FixedDriver {
    fn forward(&mut self, request: &Request) -> u32 {
        self.seen.lock().unwrap().push(request.clone());
        self.code
    }
}

/// A disc described in memory.
#[derive(Debug, Clone, Default)]
pub(crate) struct VecSource(pub Vec<Candidate>);

impl TrackSource for VecSource {
    fn discover(&self) -> Result<Vec<Candidate>> {
        Ok(self.0.clone())
    }
}

pub(crate) fn audio_track(number: i64, duration: u32) -> Candidate {
    Candidate {
        path: PathBuf::from(format!("/disc/Track{number:02}.mp3")),
        number: Some(number),
        probe: Some(Probe {
            format: CodecFormat::Mp3,
            duration,
        }),
    }
}

/// Audio tracks at the given `(number, seconds)` pairs; gaps become data tracks.
pub(crate) fn disc(layout: &[(i64, u32)]) -> VecSource {
    VecSource(layout.iter().map(|&(n, d)| audio_track(n, d)).collect())
}
