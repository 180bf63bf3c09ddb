use std::path::PathBuf;

use serde::Deserialize;

use crate::timecode::TimeFormat;

/// Top-level settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/cdaudio/config.toml` or `~/.config/cdaudio/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `CDAUDIO__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub library: LibrarySettings,
    pub audio: AudioSettings,
    pub device: DeviceSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LibrarySettings {
    /// Directory holding the track files.
    pub dir: PathBuf,
    /// File name prefix every track file starts with.
    pub prefix: String,
    /// Character offset of the track number inside the file name.
    pub number_offset: usize,
    /// Number of characters the track number field spans.
    pub number_width: usize,
    /// File extensions to treat as audio (case-insensitive, without dot).
    pub extensions: Vec<String>,
    /// Whether to follow symlinks when scanning.
    pub follow_links: bool,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("music"),
            prefix: "Track".to_string(),
            number_offset: 5,
            number_width: 2,
            extensions: vec!["mp3".into(), "flac".into(), "wav".into(), "ogg".into()],
            follow_links: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Text file holding a 0-100 volume, applied whenever a play queue is built.
    pub volume_file: Option<PathBuf>,
    /// How often pending playback events are drained (milliseconds).
    pub event_poll_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume_file: Some(PathBuf::from("volume.txt")),
            event_poll_ms: 50,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeviceSettings {
    /// Time format the device starts in.
    pub time_format: TimeFormatSetting,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeFormatSetting {
    #[serde(alias = "ms", alias = "millis")]
    Milliseconds,
    #[default]
    Msf,
    Tmsf,
}

impl From<TimeFormatSetting> for TimeFormat {
    fn from(value: TimeFormatSetting) -> Self {
        match value {
            TimeFormatSetting::Milliseconds => TimeFormat::Milliseconds,
            TimeFormatSetting::Msf => TimeFormat::Msf,
            TimeFormatSetting::Tmsf => TimeFormat::Tmsf,
        }
    }
}
