use std::fs;
use std::path::Path;

use log::trace;

/// Read a volume percentage from `path`.
///
/// The first whitespace-separated word must be an integer in `0..=100`;
/// anything else (including a missing file) yields `None`.
pub fn read_volume_file(path: &Path) -> Option<u8> {
    let contents = fs::read_to_string(path).ok()?;
    let word = contents.split_whitespace().next()?;
    if !word.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let volume = word.parse::<u32>().ok().filter(|v| *v <= 100)?;
    trace!("volume file {}: {volume}", path.display());
    Some(volume as u8)
}
