use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};

use log::{debug, trace, warn};

use crate::audio::{EngineEvent, PlaybackEngine, SeekOrigin, Volume};
use crate::config::read_volume_file;
use crate::error::{CdError, Param, Result};
use crate::library::{TrackCatalogue, TrackSource};
use crate::timecode::{AbsoluteTime, TimeFormat, from_wire, length_to_wire, to_wire};

use super::model::{
    DeviceOptions, DeviceState, Mode, NotificationKind, NotifyTarget, PendingNotification,
    PlayMode, SeekTarget, Status, StatusItem, TrackKind,
};
use super::volume::{pack_volume, unpack_volume};

/// A CD drive with a disc made of audio files.
///
/// Owns the catalogue built at open, the playback engine, and the state
/// every command reads or mutates. Not thread safe on its own; the
/// dispatcher serializes access.
pub struct VirtualDevice {
    engine: Box<dyn PlaybackEngine>,
    catalogue: Option<TrackCatalogue>,
    state: DeviceState,
    events: Option<Receiver<EngineEvent>>,
    volume_file: Option<PathBuf>,
}

impl VirtualDevice {
    pub fn new(engine: Box<dyn PlaybackEngine>, options: DeviceOptions) -> Self {
        Self {
            engine,
            catalogue: None,
            state: DeviceState::new(options.time_format),
            events: None,
            volume_file: options.volume_file,
        }
    }

    pub fn state(&self) -> &DeviceState {
        &self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    pub fn catalogue(&self) -> Option<&TrackCatalogue> {
        self.catalogue.as_ref()
    }

    fn tracks(&self) -> Result<&TrackCatalogue> {
        self.catalogue.as_ref().ok_or(CdError::DeviceNotOpen)
    }

    /// Build the catalogue from `source` and wire up engine events.
    pub fn open(&mut self, source: &dyn TrackSource) -> Result<()> {
        if self.state.mode != Mode::Closed {
            return Err(CdError::DeviceAlreadyOpen);
        }

        let catalogue = TrackCatalogue::build(source.discover()?);
        debug!("disc inserted: {} tracks", catalogue.len());

        let (tx, rx) = mpsc::channel();
        self.engine.set_event_sender(tx);
        self.events = Some(rx);
        self.catalogue = Some(catalogue);
        self.state.mode = Mode::Stopped;
        self.state.current_track = 1;
        Ok(())
    }

    /// Drop the catalogue and everything queued. Closing twice is harmless.
    pub fn close(&mut self) {
        if self.state.mode == Mode::Closed {
            return;
        }
        if let Err(e) = self.engine.close() {
            warn!("engine close failed: {e}");
        }
        self.catalogue = None;
        self.events = None;
        self.state.mode = Mode::Closed;
        self.state.pending = None;
        debug!("disc ejected");
    }

    pub fn set_time_format(&mut self, raw: u32) -> Result<()> {
        let format =
            TimeFormat::from_raw(raw).ok_or(CdError::InvalidParameter(Param::TimeFormat(raw)))?;
        trace!("time format {format:?}");
        self.state.time_format = format;
        Ok(())
    }

    /// Answer a status query. `track` is the optional track qualifier;
    /// 0 and absent both mean "the whole disc".
    pub fn status(&self, item: StatusItem, track: Option<u32>) -> Result<Status> {
        let format = self.state.time_format;
        let tracks = self.tracks()?;
        let index = track.unwrap_or(0);

        let status = match item {
            StatusItem::CurrentTrack => Status::Number(self.state.current_track),
            StatusItem::Length => Status::Time(length_to_wire(self.length_of(index)?, format)),
            StatusItem::Position => Status::Time(to_wire(self.position_of(index)?, format)),
            StatusItem::TrackType => {
                let number = track.ok_or(CdError::InvalidParameter(Param::MissingTrack))?;
                if tracks.is_audio(number) {
                    Status::Type(TrackKind::Audio)
                } else {
                    Status::Type(TrackKind::Other)
                }
            }
            StatusItem::MediaPresent => Status::Flag(!tracks.is_empty()),
            StatusItem::NumberOfTracks => Status::Number(tracks.len()),
            StatusItem::Mode => {
                let status = self.engine.status();
                if status.paused {
                    Status::Mode(PlayMode::Paused)
                } else if status.playing {
                    Status::Mode(PlayMode::Playing)
                } else {
                    Status::Mode(PlayMode::Stopped)
                }
            }
            StatusItem::Ready => Status::Flag(true),
            StatusItem::TimeFormat => Status::Format(format),
            StatusItem::Start => Status::Number(0),
            StatusItem::Other(raw) => {
                trace!("unanswered status item {raw:#x}");
                Status::Number(0)
            }
        };
        Ok(status)
    }

    /// Seconds in track `index`, or on the whole disc for 0. Unknown tracks are 0 long.
    fn length_of(&self, index: u32) -> Result<u32> {
        let tracks = self.tracks()?;
        if index == 0 {
            tracks.total_seconds()
        } else if tracks.is_valid(index) {
            Ok(tracks.get(index).duration)
        } else {
            Ok(0)
        }
    }

    fn position_of(&self, index: u32) -> Result<AbsoluteTime> {
        let tracks = self.tracks()?;
        if index == 0 {
            return self.current_position();
        }
        if !tracks.is_valid(index) {
            return Ok(AbsoluteTime::default());
        }
        Ok(match self.state.time_format {
            TimeFormat::Tmsf => AbsoluteTime::new(index, 0),
            _ => AbsoluteTime::new(index, tracks.get(index).position),
        })
    }

    /// Track being played and seconds into it.
    fn playhead(&self) -> AbsoluteTime {
        let status = self.engine.status();
        AbsoluteTime::new(
            self.state.current_track + status.queue_index,
            self.engine.position(),
        )
    }

    /// Current position as reported to a position query: track relative in
    /// TMSF, disc relative otherwise.
    fn current_position(&self) -> Result<AbsoluteTime> {
        let tracks = self.tracks()?;
        let head = self.playhead();
        Ok(match self.state.time_format {
            TimeFormat::Tmsf => head,
            _ => AbsoluteTime::new(head.track, tracks.get(head.track).position + head.seconds),
        })
    }

    fn decode_bound(&self, raw: u32) -> Result<AbsoluteTime> {
        let format = self.state.time_format;
        let time = from_wire(raw, format);
        match format {
            TimeFormat::Tmsf => Ok(time),
            _ => self.tracks()?.to_track_time(time),
        }
    }

    /// Play from `from` up to `to`, both wire values in the active format.
    ///
    /// An absent `from` continues at the current playhead; an absent `to`
    /// runs to the end of the disc. The queue stops short of the first data
    /// track in range, and a range ending exactly at a track start leaves
    /// that track out.
    pub fn play(&mut self, from: Option<u32>, to: Option<u32>) -> Result<()> {
        let from = match from {
            Some(raw) => self.decode_bound(raw)?,
            None => self.playhead(),
        };
        let to = match to {
            Some(raw) => self.decode_bound(raw)?,
            None => {
                let tracks = self.tracks()?;
                AbsoluteTime::new(tracks.len(), tracks.last()?.duration)
            }
        };

        self.engine.close()?;
        // the old queue is gone even if nothing new gets played
        if self.state.mode != Mode::Closed {
            self.state.mode = Mode::Stopped;
        }

        trace!("play {from} -> {to}");

        let tracks = self.catalogue.as_ref().ok_or(CdError::DeviceNotOpen)?;
        let on_disc = |t: AbsoluteTime| (1..=tracks.len()).contains(&t.track);
        let degenerate = from.track == to.track && to.seconds <= from.seconds;
        if !on_disc(from) || !on_disc(to) || to.track < from.track || degenerate {
            return Err(CdError::RangeInvalid { from, to });
        }

        for number in from.track..=to.track {
            if !tracks.is_audio(number) {
                debug!("track {number} is not audio, nothing more to queue");
                return Ok(());
            }
            if number == to.track && to.seconds == 0 {
                break;
            }

            let track = tracks.get(number);
            let (Some(path), Some(format)) = (track.path.as_deref(), track.format) else {
                return Ok(());
            };

            if let Some(volume) = self.volume_file.as_deref().and_then(read_volume_file) {
                if let Err(e) = self.engine.set_volume(Volume::both(volume)) {
                    warn!("could not apply volume {volume}: {e}");
                }
            }

            self.engine.enqueue(path, format)?;
        }

        self.state.current_track = from.track;

        if from.seconds > 0 {
            if let Err(e) = self.engine.seek(from.seconds, SeekOrigin::Start) {
                warn!("seek to {}s ignored: {e}", from.seconds);
            }
        }

        self.engine.play()?;
        self.state.mode = Mode::Playing;
        Ok(())
    }

    pub fn pause(&mut self) -> Result<()> {
        self.engine.pause()?;
        if self.state.mode == Mode::Playing {
            self.state.mode = Mode::Paused;
        }
        Ok(())
    }

    pub fn resume(&mut self) -> Result<()> {
        self.engine.resume()?;
        if self.state.mode == Mode::Paused {
            self.state.mode = Mode::Playing;
        }
        Ok(())
    }

    /// Stop playback. An armed notification for the interrupted play is
    /// turned into `Aborted` before the engine gets to report the stop.
    pub fn stop(&mut self) -> Result<()> {
        if matches!(self.state.mode, Mode::Playing | Mode::Paused) {
            if let Some(pending) = self.state.pending.as_mut() {
                pending.kind = NotificationKind::Aborted;
            }
        }

        self.engine.stop()?;

        if self.state.mode != Mode::Closed {
            self.state.mode = Mode::Stopped;
        }
        Ok(())
    }

    pub fn seek(&mut self, target: SeekTarget) -> Result<()> {
        match target {
            SeekTarget::Start => self.engine.seek(0, SeekOrigin::Start)?,
            SeekTarget::End => self.engine.seek(0, SeekOrigin::End)?,
            SeekTarget::To(raw) => {
                let time = from_wire(raw, self.state.time_format);
                self.engine.seek(time.seconds, SeekOrigin::Start)?;
            }
        }
        Ok(())
    }

    /// Arm a `Completed` notification for `target`, replacing any armed one.
    pub fn arm_notification(&mut self, target: NotifyTarget) {
        self.state.pending = Some(PendingNotification {
            kind: NotificationKind::Completed,
            target,
        });
    }

    /// Apply one engine event. Returns the notification to deliver, if any;
    /// it is disarmed in the same step.
    pub fn on_engine_event(&mut self, event: EngineEvent) -> Option<PendingNotification> {
        match event {
            EngineEvent::Stopped => {
                if self.engine.status().playing {
                    trace!("stop event from a replaced queue");
                    return None;
                }
                if matches!(self.state.mode, Mode::Playing | Mode::Paused) {
                    self.state.mode = Mode::Stopped;
                }
                self.state.pending.take()
            }
        }
    }

    /// Apply every engine event received so far.
    pub fn drain_events(&mut self) -> Vec<PendingNotification> {
        let events: Vec<EngineEvent> = match &self.events {
            Some(rx) => rx.try_iter().collect(),
            None => return Vec::new(),
        };
        events
            .into_iter()
            .filter_map(|e| self.on_engine_event(e))
            .collect()
    }

    pub fn aux_volume(&self) -> u32 {
        pack_volume(self.engine.volume())
    }

    pub fn set_aux_volume(&mut self, packed: u32) -> Result<()> {
        self.engine.set_volume(unpack_volume(packed))?;
        Ok(())
    }
}
