//! Error taxonomy shared by the catalogue, the virtual device and the
//! command dispatcher, plus the mapping onto native MCI result codes.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::audio::EngineError;
use crate::mci::codes;
use crate::timecode::AbsoluteTime;

/// Which parameter of a command was unacceptable.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Param {
    /// A time format other than milliseconds, MSF or TMSF.
    TimeFormat(u32),
    /// A status item that needs a track number was sent without one.
    MissingTrack,
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TimeFormat(raw) => write!(f, "unsupported time format {raw}"),
            Self::MissingTrack => write!(f, "track number required"),
        }
    }
}

#[derive(Debug, Error)]
pub enum CdError {
    #[error("cdaudio device is already open")]
    DeviceAlreadyOpen,

    #[error("cdaudio device has not been opened")]
    DeviceNotOpen,

    #[error("music directory not found: {}", path.display())]
    CatalogueUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(Param),

    #[error("play range {from} -> {to} is out of range")]
    RangeInvalid { from: AbsoluteTime, to: AbsoluteTime },

    #[error("playback engine fault: {0}")]
    EngineFault(#[from] EngineError),

    #[error("track catalogue is empty")]
    EmptyCatalogue,

    #[error("failed to probe {}: {reason}", path.display())]
    Probe { path: PathBuf, reason: String },

    #[error("driver returned error {0}")]
    Driver(u32),
}

impl CdError {
    /// Native result code reported to the caller of the protocol.
    pub fn code(&self) -> u32 {
        match self {
            Self::DeviceAlreadyOpen => codes::MCIERR_DEVICE_OPEN,
            Self::DeviceNotOpen => codes::MCIERR_INVALID_DEVICE_NAME,
            Self::CatalogueUnavailable { .. } => codes::MCIERR_HARDWARE,
            Self::InvalidParameter(Param::TimeFormat(_)) => codes::MMSYSERR_INVALPARAM,
            Self::InvalidParameter(Param::MissingTrack) => codes::MCIERR_MISSING_PARAMETER,
            Self::RangeInvalid { .. } => codes::MCIERR_OUTOFRANGE,
            Self::EngineFault(_) => codes::MCIERR_HARDWARE,
            Self::EmptyCatalogue => codes::MCIERR_HARDWARE,
            Self::Probe { .. } => codes::MCIERR_HARDWARE,
            Self::Driver(code) => *code,
        }
    }

    /// Symbolic name of [`CdError::code`], for logs and the console.
    pub fn code_name(&self) -> &'static str {
        codes::name(self.code())
    }
}

pub type Result<T> = std::result::Result<T, CdError>;
