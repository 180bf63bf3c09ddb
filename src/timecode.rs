//! Conversions between the internal `(track, seconds)` coordinate and the
//! three time formats a cdaudio device speaks on the wire.
//!
//! The wire layouts follow the MCI packing macros:
//! MSF is `minute | second << 8 | frame << 16` and TMSF is
//! `track | minute << 8 | second << 16 | frame << 24`. Frames are always 0
//! because the playback engine only reports whole seconds.

use std::fmt;

/// Raw value of `MCI_FORMAT_MILLISECONDS`.
pub const FORMAT_MILLISECONDS: u32 = 0;
/// Raw value of `MCI_FORMAT_MSF`.
pub const FORMAT_MSF: u32 = 2;
/// Raw value of `MCI_FORMAT_TMSF`.
pub const FORMAT_TMSF: u32 = 10;

/// A position or duration, either relative to the whole disc (`track == 0`)
/// or relative to the start of `track`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct AbsoluteTime {
    pub track: u32,
    pub seconds: u32,
}

impl AbsoluteTime {
    pub fn new(track: u32, seconds: u32) -> Self {
        Self { track, seconds }
    }

    /// A whole-disc offset with no track qualifier.
    pub fn disc(seconds: u32) -> Self {
        Self { track: 0, seconds }
    }
}

impl fmt::Display for AbsoluteTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.track, self.seconds)
    }
}

/// The wire time formats a cdaudio device accepts.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum TimeFormat {
    Milliseconds,
    #[default]
    Msf,
    Tmsf,
}

impl TimeFormat {
    /// Parse a raw `MCI_FORMAT_*` value. Formats other than the three a CD
    /// supports yield `None`.
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            FORMAT_MILLISECONDS => Some(Self::Milliseconds),
            FORMAT_MSF => Some(Self::Msf),
            FORMAT_TMSF => Some(Self::Tmsf),
            _ => None,
        }
    }

    pub fn raw(self) -> u32 {
        match self {
            Self::Milliseconds => FORMAT_MILLISECONDS,
            Self::Msf => FORMAT_MSF,
            Self::Tmsf => FORMAT_TMSF,
        }
    }

    /// Format used when reporting lengths.
    ///
    /// Real drivers answer length queries in MSF while TMSF is active, even
    /// though positions in TMSF carry the track byte.
    pub fn for_length(self) -> Self {
        match self {
            Self::Tmsf => Self::Msf,
            other => other,
        }
    }
}

fn make_msf(minute: u32, second: u32, frame: u32) -> u32 {
    (minute & 0xFF) | (second & 0xFF) << 8 | (frame & 0xFF) << 16
}

fn make_tmsf(track: u32, minute: u32, second: u32, frame: u32) -> u32 {
    (track & 0xFF) | (minute & 0xFF) << 8 | (second & 0xFF) << 16 | (frame & 0xFF) << 24
}

fn byte(value: u32, index: u32) -> u32 {
    (value >> (index * 8)) & 0xFF
}

/// Encode `time` in `format`.
pub fn to_wire(time: AbsoluteTime, format: TimeFormat) -> u32 {
    let minutes = time.seconds / 60;
    let seconds = time.seconds % 60;
    match format {
        TimeFormat::Milliseconds => time.seconds.wrapping_mul(1000),
        TimeFormat::Msf => make_msf(minutes, seconds, 0),
        TimeFormat::Tmsf => make_tmsf(time.track, minutes, seconds, 0),
    }
}

/// Decode a wire value in `format`. Only TMSF produces a track number.
pub fn from_wire(value: u32, format: TimeFormat) -> AbsoluteTime {
    match format {
        TimeFormat::Milliseconds => AbsoluteTime::disc(value / 1000),
        TimeFormat::Msf => AbsoluteTime::disc(byte(value, 0) * 60 + byte(value, 1)),
        TimeFormat::Tmsf => AbsoluteTime::new(byte(value, 0), byte(value, 1) * 60 + byte(value, 2)),
    }
}

/// Encode a length in `format`, applying the TMSF-as-MSF rule.
pub fn length_to_wire(seconds: u32, format: TimeFormat) -> u32 {
    to_wire(AbsoluteTime::disc(seconds), format.for_length())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn milliseconds_truncate_to_whole_seconds() {
        assert_eq!(to_wire(AbsoluteTime::disc(75), TimeFormat::Milliseconds), 75_000);
        assert_eq!(from_wire(75_999, TimeFormat::Milliseconds), AbsoluteTime::disc(75));
        assert_eq!(from_wire(999, TimeFormat::Milliseconds), AbsoluteTime::disc(0));
    }

    #[test]
    fn msf_packs_minutes_then_seconds() {
        // 2:05 -> minute byte 2, second byte 5, frame 0
        assert_eq!(to_wire(AbsoluteTime::disc(125), TimeFormat::Msf), 0x0000_0502);
        assert_eq!(from_wire(0x0000_0502, TimeFormat::Msf), AbsoluteTime::disc(125));
    }

    #[test]
    fn msf_ignores_track_and_frames() {
        assert_eq!(to_wire(AbsoluteTime::new(7, 61), TimeFormat::Msf), 0x0000_0101);
        assert_eq!(from_wire(0x004A_0101, TimeFormat::Msf), AbsoluteTime::disc(61));
    }

    #[test]
    fn tmsf_carries_track_byte() {
        assert_eq!(to_wire(AbsoluteTime::new(3, 90), TimeFormat::Tmsf), 0x001E_0103);
        assert_eq!(from_wire(0x001E_0103, TimeFormat::Tmsf), AbsoluteTime::new(3, 90));
    }

    #[test]
    fn every_format_round_trips_whole_seconds() {
        let samples = [
            AbsoluteTime::disc(0),
            AbsoluteTime::disc(59),
            AbsoluteTime::disc(3599),
            AbsoluteTime::new(12, 0),
            AbsoluteTime::new(99, 4_000),
        ];
        for t in samples {
            assert_eq!(
                from_wire(to_wire(t, TimeFormat::Milliseconds), TimeFormat::Milliseconds).seconds,
                t.seconds
            );
            if t.seconds < 256 * 60 {
                assert_eq!(from_wire(to_wire(t, TimeFormat::Msf), TimeFormat::Msf).seconds, t.seconds);
                assert_eq!(from_wire(to_wire(t, TimeFormat::Tmsf), TimeFormat::Tmsf), t);
            }
        }
    }

    #[test]
    fn length_in_tmsf_is_reported_as_msf() {
        assert_eq!(length_to_wire(125, TimeFormat::Tmsf), 0x0000_0502);
        assert_eq!(length_to_wire(125, TimeFormat::Msf), 0x0000_0502);
        assert_eq!(length_to_wire(125, TimeFormat::Milliseconds), 125_000);
        // the same instant as a position keeps its track prefix
        assert_eq!(to_wire(AbsoluteTime::new(4, 125), TimeFormat::Tmsf), 0x0005_0204);
    }

    #[test]
    fn from_raw_accepts_only_cd_formats() {
        assert_eq!(TimeFormat::from_raw(0), Some(TimeFormat::Milliseconds));
        assert_eq!(TimeFormat::from_raw(2), Some(TimeFormat::Msf));
        assert_eq!(TimeFormat::from_raw(10), Some(TimeFormat::Tmsf));
        assert_eq!(TimeFormat::from_raw(1), None);
        assert_eq!(TimeFormat::from_raw(3), None);
    }
}
