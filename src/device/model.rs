use std::path::PathBuf;

use crate::config::Settings;
use crate::mci::codes;
use crate::timecode::TimeFormat;

/// Lifecycle of the virtual drive.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Closed,
    Stopped,
    Playing,
    Paused,
}

/// Opaque handle a notification is posted to (a window handle on the
/// native side).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct NotifyTarget(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NotificationKind {
    Completed,
    Aborted,
}

impl NotificationKind {
    /// `MCI_NOTIFY_*` value carried by the posted message.
    pub fn raw(self) -> u32 {
        match self {
            Self::Completed => codes::MCI_NOTIFY_SUCCESSFUL,
            Self::Aborted => codes::MCI_NOTIFY_ABORTED,
        }
    }
}

/// The one-shot notification armed by the last notifying command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PendingNotification {
    pub kind: NotificationKind,
    pub target: NotifyTarget,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceState {
    pub mode: Mode,
    pub current_track: u32,
    pub time_format: TimeFormat,
    pub pending: Option<PendingNotification>,
}

impl DeviceState {
    pub fn new(time_format: TimeFormat) -> Self {
        Self {
            mode: Mode::Closed,
            current_track: 1,
            time_format,
            pending: None,
        }
    }
}

/// What a status query asks about.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StatusItem {
    CurrentTrack,
    Length,
    Position,
    TrackType,
    MediaPresent,
    NumberOfTracks,
    Mode,
    Ready,
    TimeFormat,
    Start,
    /// Any item a CD drive does not answer; reported as 0.
    Other(u32),
}

impl StatusItem {
    pub fn from_raw(raw: u32) -> Self {
        match raw {
            codes::MCI_STATUS_CURRENT_TRACK => Self::CurrentTrack,
            codes::MCI_STATUS_LENGTH => Self::Length,
            codes::MCI_STATUS_POSITION => Self::Position,
            codes::MCI_CDA_STATUS_TYPE_TRACK => Self::TrackType,
            codes::MCI_STATUS_MEDIA_PRESENT => Self::MediaPresent,
            codes::MCI_STATUS_NUMBER_OF_TRACKS => Self::NumberOfTracks,
            codes::MCI_STATUS_MODE => Self::Mode,
            codes::MCI_STATUS_READY => Self::Ready,
            codes::MCI_STATUS_TIME_FORMAT => Self::TimeFormat,
            codes::MCI_STATUS_START => Self::Start,
            other => Self::Other(other),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TrackKind {
    Audio,
    Other,
}

/// Mode as reported by a status query.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PlayMode {
    Stopped,
    Playing,
    Paused,
}

/// Typed answer to a status query.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    /// A length or position, already encoded in the active wire format.
    Time(u32),
    Number(u32),
    Flag(bool),
    Mode(PlayMode),
    Format(TimeFormat),
    Type(TrackKind),
}

impl Status {
    /// The `dwReturn` value a native caller would read.
    pub fn to_raw(self) -> u32 {
        match self {
            Self::Time(v) | Self::Number(v) => v,
            Self::Flag(b) => u32::from(b),
            Self::Mode(PlayMode::Stopped) => codes::MCI_MODE_STOP,
            Self::Mode(PlayMode::Playing) => codes::MCI_MODE_PLAY,
            Self::Mode(PlayMode::Paused) => codes::MCI_MODE_PAUSE,
            Self::Format(f) => f.raw(),
            Self::Type(TrackKind::Audio) => codes::MCI_CDA_TRACK_AUDIO,
            Self::Type(TrackKind::Other) => codes::MCI_CDA_TRACK_OTHER,
        }
    }
}

/// Where a seek command goes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SeekTarget {
    Start,
    End,
    /// A wire value in the active time format.
    To(u32),
}

/// Per-device settings fixed at construction.
#[derive(Debug, Clone, Default)]
pub struct DeviceOptions {
    pub time_format: TimeFormat,
    /// Re-read before every play; see [`crate::config::read_volume_file`].
    pub volume_file: Option<PathBuf>,
}

impl From<&Settings> for DeviceOptions {
    fn from(settings: &Settings) -> Self {
        Self {
            time_format: settings.device.time_format.into(),
            volume_file: settings.audio.volume_file.clone(),
        }
    }
}
