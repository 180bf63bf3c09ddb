//! Parser for the console's MCI-style command strings.
//!
//! Lines look like `play cdaudio from 1 to 3 notify`. Positions are plain
//! numbers or colon-separated fields; field `i` lands in byte `i`, which is
//! how both `t:m:s:f` (TMSF) and `m:s:f` (MSF) are packed on the wire.

use thiserror::Error;

use crate::device::{NotifyTarget, SeekTarget, StatusItem};
use crate::mci::{Command, DEVICE_ID, DeviceType, OpenParams, Request};
use crate::timecode::{FORMAT_MILLISECONDS, FORMAT_MSF, FORMAT_TMSF};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Empty,
    Quit,
    Request(Request),
    /// `volume` reads the aux volume, `volume N` sets it.
    Volume(Option<u32>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command `{0}`")]
    UnknownVerb(String),
    #[error("`{0}` needs a device name")]
    MissingDevice(String),
    #[error("expected {0}")]
    Expected(&'static str),
    #[error("bad value `{0}`")]
    BadValue(String),
    #[error("unknown status item `{0}`")]
    UnknownItem(String),
}

type Result<T> = std::result::Result<T, ParseError>;

/// Parse a time value: `3`, `0x0203`, or `1:2:30`.
pub fn parse_position(word: &str) -> Result<u32> {
    if word.contains(':') {
        let fields: Vec<&str> = word.split(':').collect();
        if fields.len() > 4 {
            return Err(ParseError::BadValue(word.to_string()));
        }
        let mut packed = 0u32;
        for (i, field) in fields.iter().enumerate() {
            let byte = field
                .parse::<u8>()
                .map_err(|_| ParseError::BadValue(word.to_string()))?;
            packed |= u32::from(byte) << (8 * i);
        }
        return Ok(packed);
    }
    parse_number(word)
}

fn parse_number(word: &str) -> Result<u32> {
    let parsed = match word.strip_prefix("0x").or_else(|| word.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => word.parse::<u32>(),
    };
    parsed.map_err(|_| ParseError::BadValue(word.to_string()))
}

fn parse_time_format(word: &str) -> Result<u32> {
    match word {
        "ms" | "milliseconds" => Ok(FORMAT_MILLISECONDS),
        "msf" => Ok(FORMAT_MSF),
        "tmsf" => Ok(FORMAT_TMSF),
        other => parse_number(other),
    }
}

/// Status items may span several words (`number of tracks`); returns the
/// item and how many words it used.
fn parse_status_item(words: &[&str]) -> Result<(StatusItem, usize)> {
    let first = *words.first().ok_or(ParseError::Expected("a status item"))?;
    let pair = words.get(1).map(|w| format!("{first} {w}"));
    let triple = words
        .get(1..3)
        .map(|w| format!("{first} {} {}", w[0], w[1]));

    if triple.as_deref() == Some("number of tracks") {
        return Ok((StatusItem::NumberOfTracks, 3));
    }
    match pair.as_deref() {
        Some("media present") => return Ok((StatusItem::MediaPresent, 2)),
        Some("time format") => return Ok((StatusItem::TimeFormat, 2)),
        Some("current track") => return Ok((StatusItem::CurrentTrack, 2)),
        _ => {}
    }
    let item = match first {
        "length" => StatusItem::Length,
        "position" => StatusItem::Position,
        "mode" => StatusItem::Mode,
        "ready" => StatusItem::Ready,
        "start" => StatusItem::Start,
        "type" => StatusItem::TrackType,
        other => return Err(ParseError::UnknownItem(other.to_string())),
    };
    Ok((item, 1))
}

/// Parse one console line. `target` is used when the line asks to be notified.
pub fn parse_line(line: &str, target: NotifyTarget) -> Result<Line> {
    let lowered = line.trim().to_ascii_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();

    let Some((&verb, rest)) = words.split_first() else {
        return Ok(Line::Empty);
    };

    match verb {
        "quit" | "exit" => return Ok(Line::Quit),
        "volume" => {
            return match rest.first() {
                Some(w) => Ok(Line::Volume(Some(parse_number(w)?))),
                None => Ok(Line::Volume(None)),
            };
        }
        _ => {}
    }

    let (&device, args) = rest
        .split_first()
        .ok_or_else(|| ParseError::MissingDevice(verb.to_string()))?;

    let mut notify = false;
    let mut wait = false;
    let args: Vec<&str> = args
        .iter()
        .copied()
        .filter(|w| match *w {
            "notify" => {
                notify = true;
                false
            }
            "wait" => {
                wait = true;
                false
            }
            _ => true,
        })
        .collect();

    let command = match verb {
        "open" => Command::Open(parse_open(device, &args)),
        "close" => Command::Close,
        "stop" => Command::Stop,
        "pause" => Command::Pause,
        "resume" => Command::Resume,
        "set" => match args.as_slice() {
            ["time", "format", value] => Command::Set {
                time_format: Some(parse_time_format(value)?),
            },
            _ => return Err(ParseError::Expected("`time format <format>`")),
        },
        "seek" => match args.as_slice() {
            ["to", "start"] => Command::Seek(SeekTarget::Start),
            ["to", "end"] => Command::Seek(SeekTarget::End),
            ["to", value] => Command::Seek(SeekTarget::To(parse_position(value)?)),
            _ => return Err(ParseError::Expected("`to start`, `to end` or `to <position>`")),
        },
        "play" => {
            let mut from = None;
            let mut to = None;
            let mut it = args.iter();
            while let Some(&word) = it.next() {
                let value = it.next().ok_or(ParseError::Expected("a position"))?;
                match word {
                    "from" => from = Some(parse_position(value)?),
                    "to" => to = Some(parse_position(value)?),
                    other => return Err(ParseError::BadValue(other.to_string())),
                }
            }
            Command::Play { from, to }
        }
        "status" => {
            let (item, used) = parse_status_item(&args)?;
            let track = match &args[used..] {
                [] => None,
                ["track", n] => Some(parse_number(n)?),
                _ => return Err(ParseError::Expected("`track <n>`")),
            };
            Command::Status { item, track }
        }
        other => return Err(ParseError::UnknownVerb(other.to_string())),
    };

    let id = match command {
        Command::Open(_) => 0,
        _ if device == "cdaudio" => DEVICE_ID,
        _ => 0,
    };
    let mut request = Request::new(id, command);
    if notify {
        request = request.notify(target);
    }
    if wait {
        request = request.wait();
    }
    Ok(Line::Request(request))
}

fn parse_open(device: &str, args: &[&str]) -> OpenParams {
    let mut params = OpenParams {
        device_type: Some(match device.parse::<u32>() {
            Ok(id) => DeviceType::from_id(id),
            Err(_) => DeviceType::from_name(device),
        }),
        ..OpenParams::default()
    };

    let mut it = args.iter();
    while let Some(&word) = it.next() {
        match word {
            "alias" => params.alias = it.next().map(|s| s.to_string()),
            "element" => params.element = it.next().map(|s| s.to_string()),
            "shareable" => params.shareable = true,
            _ => {}
        }
    }
    params
}
