use std::fs;
use std::path::{Path, PathBuf};

use lofty::file::AudioFile;
use log::{debug, trace};
use walkdir::WalkDir;

use crate::config::LibrarySettings;
use crate::error::{CdError, Result};

use super::catalogue::MAX_TRACKS;
use super::model::{Candidate, CodecFormat, Probe};

/// Supplies the files a catalogue is built from.
pub trait TrackSource: Send {
    fn discover(&self) -> Result<Vec<Candidate>>;
}

/// Discovers `<prefix>NN.<ext>` files in a single music directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    dir: PathBuf,
    settings: LibrarySettings,
}

impl DirectorySource {
    pub fn new(dir: impl Into<PathBuf>, settings: LibrarySettings) -> Self {
        Self {
            dir: dir.into(),
            settings,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl TrackSource for DirectorySource {
    fn discover(&self) -> Result<Vec<Candidate>> {
        scan(&self.dir, &self.settings)
    }
}

/// Parse the track number out of `file_name`.
///
/// The name must start with the configured prefix; the number is read from
/// the `number_width` characters at `number_offset`, taking leading digits
/// only (`"7."` parses as 7, `"x7"` does not parse).
pub(crate) fn track_number(file_name: &str, settings: &LibrarySettings) -> Option<i64> {
    if !file_name.starts_with(&settings.prefix) {
        return None;
    }

    let field: String = file_name
        .chars()
        .skip(settings.number_offset)
        .take(settings.number_width)
        .collect();
    let field = field.trim_start();

    let (sign, rest) = match field.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, field.strip_prefix('+').unwrap_or(field)),
    };
    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();

    digits.parse::<i64>().ok().map(|n| sign * n)
}

fn codec_format(path: &Path, settings: &LibrarySettings) -> Option<CodecFormat> {
    let ext = path.extension().and_then(|s| s.to_str())?.to_ascii_lowercase();
    let allowed = settings
        .extensions
        .iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .any(|e| e == ext);

    if allowed {
        CodecFormat::from_extension(&ext)
    } else {
        None
    }
}

fn probe_duration(path: &Path) -> Result<u32> {
    let tagged = lofty::read_from_path(path).map_err(|e| CdError::Probe {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    Ok(tagged.properties().duration().as_secs() as u32)
}

/// Scan the top level of `dir` for track files and probe their durations.
///
/// Files are visited in name order. Only files whose name carries a track
/// number in `1..=MAX_TRACKS` and whose codec is recognized are probed; a
/// probe failure aborts the whole scan.
pub fn scan(dir: &Path, settings: &LibrarySettings) -> Result<Vec<Candidate>> {
    fs::read_dir(dir).map_err(|source| CdError::CatalogueUnavailable {
        path: dir.to_path_buf(),
        source,
    })?;

    debug!("scanning {}", dir.display());

    let mut candidates = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(settings.follow_links)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let Some(file_name) = path.file_name().and_then(|s| s.to_str()) else {
            continue;
        };
        if !file_name.starts_with(&settings.prefix) {
            continue;
        }

        let number = track_number(file_name, settings);
        let probe = match (number, codec_format(path, settings)) {
            (Some(n), Some(format)) if (1..=i64::from(MAX_TRACKS)).contains(&n) => Some(Probe {
                format,
                duration: probe_duration(path)?,
            }),
            _ => None,
        };

        trace!("{file_name}: number {number:?}, probe {probe:?}");

        candidates.push(Candidate {
            path: path.to_path_buf(),
            number,
            probe,
        });
    }

    Ok(candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    /// Write an 8 kHz mono 8-bit PCM wave file of `seconds` length.
    fn write_wav(path: &Path, seconds: u32) {
        let rate = 8000u32;
        let data_len = rate * seconds;
        let mut f = fs::File::create(path).unwrap();
        f.write_all(b"RIFF").unwrap();
        f.write_all(&(36 + data_len).to_le_bytes()).unwrap();
        f.write_all(b"WAVEfmt ").unwrap();
        f.write_all(&16u32.to_le_bytes()).unwrap();
        f.write_all(&1u16.to_le_bytes()).unwrap(); // PCM
        f.write_all(&1u16.to_le_bytes()).unwrap(); // mono
        f.write_all(&rate.to_le_bytes()).unwrap();
        f.write_all(&rate.to_le_bytes()).unwrap(); // byte rate
        f.write_all(&1u16.to_le_bytes()).unwrap(); // block align
        f.write_all(&8u16.to_le_bytes()).unwrap(); // bits per sample
        f.write_all(b"data").unwrap();
        f.write_all(&data_len.to_le_bytes()).unwrap();
        f.write_all(&vec![0x80u8; data_len as usize]).unwrap();
    }

    #[test]
    fn track_number_reads_fixed_width_field_after_prefix() {
        let settings = LibrarySettings::default();
        assert_eq!(track_number("Track02.mp3", &settings), Some(2));
        assert_eq!(track_number("Track12.ogg", &settings), Some(12));
        assert_eq!(track_number("Track7.wav", &settings), Some(7));
        assert_eq!(track_number("Track00.wav", &settings), Some(0));
        assert_eq!(track_number("Track-1.wav", &settings), Some(-1));
        assert_eq!(track_number("TrackXY.wav", &settings), None);
        assert_eq!(track_number("Song02.mp3", &settings), None);
        assert_eq!(track_number("Track", &settings), None);
    }

    #[test]
    fn codec_format_respects_configured_extensions() {
        let settings = LibrarySettings {
            extensions: vec![".MP3".into(), "ogg".into()],
            ..LibrarySettings::default()
        };
        assert_eq!(codec_format(Path::new("a.mp3"), &settings), Some(CodecFormat::Mp3));
        assert_eq!(codec_format(Path::new("a.OGG"), &settings), Some(CodecFormat::Ogg));
        assert_eq!(codec_format(Path::new("a.flac"), &settings), None);
        assert_eq!(codec_format(Path::new("a"), &settings), None);
    }

    #[test]
    fn scan_missing_directory_is_catalogue_unavailable() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("music");
        let err = scan(&missing, &LibrarySettings::default()).unwrap_err();
        assert!(matches!(err, CdError::CatalogueUnavailable { .. }));
    }

    #[test]
    fn scan_probes_numbered_files_and_skips_the_rest() {
        let dir = tempdir().unwrap();
        write_wav(&dir.path().join("Track01.wav"), 3);
        write_wav(&dir.path().join("Track03.wav"), 1);
        fs::write(dir.path().join("Track02.txt"), b"not audio").unwrap();
        fs::write(dir.path().join("Track00.wav"), b"never probed").unwrap();
        fs::write(dir.path().join("cover.wav"), b"no prefix").unwrap();
        fs::create_dir(dir.path().join("Track04.wav")).unwrap();

        let candidates = scan(dir.path(), &LibrarySettings::default()).unwrap();
        let names: Vec<String> = candidates
            .iter()
            .map(|c| c.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["Track00.wav", "Track01.wav", "Track02.txt", "Track03.wav"]);

        assert_eq!(candidates[0].probe, None);
        assert_eq!(
            candidates[1].probe,
            Some(Probe {
                format: CodecFormat::Wav,
                duration: 3
            })
        );
        assert_eq!(candidates[2].probe, None);
        assert_eq!(candidates[3].probe.map(|p| p.duration), Some(1));
    }

    #[test]
    fn scan_does_not_probe_numbers_past_the_last_cd_track() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Track4000000000.mp3"), b"never probed").unwrap();
        let settings = LibrarySettings {
            number_width: 10,
            ..LibrarySettings::default()
        };

        let candidates = scan(dir.path(), &settings).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].number, Some(4_000_000_000));
        assert_eq!(candidates[0].probe, None);
    }

    #[test]
    fn scan_fails_when_a_track_cannot_be_probed() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("Track01.mp3"), b"not a real mp3").unwrap();

        let err = scan(dir.path(), &LibrarySettings::default()).unwrap_err();
        assert!(matches!(err, CdError::Probe { .. }));
    }
}
