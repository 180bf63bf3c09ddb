use crate::device::{NotifyTarget, SeekTarget, StatusItem};

use super::codes::MCI_DEVTYPE_CD_AUDIO;

/// Device type qualifier of an open command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceType {
    CdAudio,
    Named(String),
    Id(u32),
}

impl DeviceType {
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("cdaudio") {
            Self::CdAudio
        } else {
            Self::Named(name.to_string())
        }
    }

    pub fn from_id(id: u32) -> Self {
        // only the low word carries the type
        if id & 0xFFFF == MCI_DEVTYPE_CD_AUDIO {
            Self::CdAudio
        } else {
            Self::Id(id)
        }
    }

    pub fn is_cd_audio(&self) -> bool {
        matches!(self, Self::CdAudio)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenParams {
    pub device_type: Option<DeviceType>,
    pub alias: Option<String>,
    pub element: Option<String>,
    pub shareable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(OpenParams),
    Close,
    Set { time_format: Option<u32> },
    Seek(SeekTarget),
    Play { from: Option<u32>, to: Option<u32> },
    Stop,
    Pause,
    Resume,
    Status { item: StatusItem, track: Option<u32> },
    /// Anything a CD drive does not implement, by message number.
    Other { message: u32 },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Open(_) => "open",
            Self::Close => "close",
            Self::Set { .. } => "set",
            Self::Seek(_) => "seek",
            Self::Play { .. } => "play",
            Self::Stop => "stop",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Status { .. } => "status",
            Self::Other { .. } => "other",
        }
    }
}

/// One protocol call: which device, what to do, and the notify/wait flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub device: u32,
    pub command: Command,
    pub notify: Option<NotifyTarget>,
    pub wait: bool,
}

impl Request {
    pub fn new(device: u32, command: Command) -> Self {
        Self {
            device,
            command,
            notify: None,
            wait: false,
        }
    }

    pub fn notify(mut self, target: NotifyTarget) -> Self {
        self.notify = Some(target);
        self
    }

    pub fn wait(mut self) -> Self {
        self.wait = true;
        self
    }
}
