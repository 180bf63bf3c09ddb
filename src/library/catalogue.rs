use std::collections::BTreeMap;

use log::{debug, trace};

use crate::error::{CdError, Result};
use crate::timecode::AbsoluteTime;

use super::model::{Candidate, Track};

/// Length of the data tracks inserted for missing track numbers.
pub const PLACEHOLDER_SECONDS: u32 = 2;

/// Highest track number an audio CD can carry.
pub const MAX_TRACKS: u32 = 99;

/// The immutable track layout of the virtual disc. Track numbers are `1..=len()`.
#[derive(Debug, Default)]
pub struct TrackCatalogue {
    tracks: Vec<Track>,
    // Returned for out-of-range lookups so queries never grow the catalogue.
    invalid: Track,
}

impl TrackCatalogue {
    /// Build the catalogue from discovered candidates.
    ///
    /// Candidates without a track number in `1..=MAX_TRACKS` or a recognized
    /// codec are dropped. A later candidate with the same number replaces an earlier one.
    pub fn build<I>(candidates: I) -> Self
    where
        I: IntoIterator<Item = Candidate>,
    {
        let mut found: BTreeMap<u32, Track> = BTreeMap::new();

        for candidate in candidates {
            let Some(number) = candidate
                .number
                .and_then(|n| u32::try_from(n).ok())
                .filter(|n| (1..=MAX_TRACKS).contains(n))
            else {
                trace!("skipping {:?}: no usable track number", candidate.path);
                continue;
            };
            let Some(probe) = candidate.probe else {
                trace!("skipping {:?}: unknown format", candidate.path);
                continue;
            };
            trace!("track {number}: {:?} ({}s)", candidate.path, probe.duration);
            found.insert(number, Track::audio(candidate.path, probe));
        }

        let count = found.keys().next_back().copied().unwrap_or(0);
        let mut tracks = Vec::with_capacity(count as usize);
        let mut position = 0u32;

        for number in 1..=count {
            let mut track = found.remove(&number).unwrap_or_else(|| {
                trace!("track {number}: data track");
                Track {
                    duration: PLACEHOLDER_SECONDS,
                    ..Track::default()
                }
            });
            track.position = position;
            position = position.saturating_add(track.duration);
            tracks.push(track);
        }

        debug!("found {count} tracks, {position}s total");

        Self {
            tracks,
            invalid: Track::default(),
        }
    }

    /// Number of tracks, `N`.
    pub fn len(&self) -> u32 {
        self.tracks.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn is_valid(&self, number: u32) -> bool {
        number >= 1 && number <= self.len()
    }

    /// Track `number`, or an empty non-audio track when out of range.
    pub fn get(&self, number: u32) -> &Track {
        if self.is_valid(number) {
            &self.tracks[number as usize - 1]
        } else {
            &self.invalid
        }
    }

    pub fn last(&self) -> Result<&Track> {
        self.tracks.last().ok_or(CdError::EmptyCatalogue)
    }

    pub fn is_audio(&self, number: u32) -> bool {
        self.is_valid(number) && self.get(number).is_audio()
    }

    /// Length of the whole disc: start of the last track plus its length.
    pub fn total_seconds(&self) -> Result<u32> {
        let last = self.last()?;
        Ok(last.position.saturating_add(last.duration))
    }

    /// Map a whole-disc offset onto a track.
    ///
    /// Picks the first track whose start is at or after `time.seconds` and
    /// reports the distance from the offset to that start. Offsets past the
    /// last track start clamp to the last track with its full length.
    pub fn to_track_time(&self, time: AbsoluteTime) -> Result<AbsoluteTime> {
        for (number, track) in self.iter() {
            if track.position >= time.seconds {
                return Ok(AbsoluteTime::new(number, track.position - time.seconds));
            }
        }

        let last = self.last()?;
        Ok(AbsoluteTime::new(self.len(), last.duration))
    }

    /// Tracks with their numbers, in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Track)> {
        self.tracks
            .iter()
            .enumerate()
            .map(|(i, t)| (i as u32 + 1, t))
    }
}
