use std::path::{Path, PathBuf};

/// Audio codecs the playback engine can decode.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CodecFormat {
    Mp3,
    Flac,
    Wav,
    Ogg,
}

impl CodecFormat {
    /// Guess the codec from a file extension (case-insensitive, without dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" => Some(Self::Mp3),
            "flac" => Some(Self::Flac),
            "wav" => Some(Self::Wav),
            "ogg" => Some(Self::Ogg),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_extension)
    }
}

/// What probing a file told us about it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Probe {
    pub format: CodecFormat,
    /// Whole seconds, truncated.
    pub duration: u32,
}

/// A file offered by discovery, before it is accepted as a track.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub path: PathBuf,
    /// Track number parsed from the file name, if it parsed at all.
    pub number: Option<i64>,
    /// `None` when the codec is not recognized.
    pub probe: Option<Probe>,
}

/// One entry of the track catalogue.
///
/// A track without a path is a data track: it occupies time on the disc but
/// can never be played.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Track {
    pub path: Option<PathBuf>,
    pub format: Option<CodecFormat>,
    /// Length in seconds.
    pub duration: u32,
    /// Offset of the track start from the start of the disc, in seconds.
    pub position: u32,
}

impl Track {
    pub fn audio(path: PathBuf, probe: Probe) -> Self {
        Self {
            path: Some(path),
            format: Some(probe.format),
            duration: probe.duration,
            position: 0,
        }
    }

    pub fn is_audio(&self) -> bool {
        self.path
            .as_ref()
            .is_some_and(|p| !p.as_os_str().is_empty())
    }
}
