use super::*;
use crate::audio::{EngineError, PlaybackEngine};
use crate::device::{DeviceOptions, NotifyTarget, SeekTarget, StatusItem};
use crate::mci::{self, Command, DEVICE_ID, DeviceType, Dispatcher, EngineFactory, NoDriver, Request};
use crate::testing::{FakeEngine, RecordingNotifier, disc};
use crate::timecode::{FORMAT_TMSF, TimeFormat};

fn request(line: &str) -> Request {
    match parse_line(line, NotifyTarget(1)).unwrap() {
        Line::Request(r) => r,
        other => panic!("expected a request, got {other:?}"),
    }
}

#[test]
fn positions_pack_fields_into_bytes() {
    assert_eq!(parse_position("3").unwrap(), 3);
    assert_eq!(parse_position("0x0203").unwrap(), 0x0203);
    assert_eq!(parse_position("2:5").unwrap(), 0x0502);
    assert_eq!(parse_position("3:1:30:0").unwrap(), 0x001E_0103);
    assert!(parse_position("1:300").is_err());
    assert!(parse_position("1:2:3:4:5").is_err());
    assert!(parse_position("soon").is_err());
}

#[test]
fn open_lines() {
    let r = request("open cdaudio alias cd shareable");
    assert_eq!(r.device, 0);
    let Command::Open(params) = r.command else {
        panic!("not an open");
    };
    assert_eq!(params.device_type, Some(DeviceType::CdAudio));
    assert_eq!(params.alias.as_deref(), Some("cd"));
    assert!(params.shareable);

    let Command::Open(params) = request("open 516").command else {
        panic!("not an open");
    };
    assert_eq!(params.device_type, Some(DeviceType::CdAudio));
}

#[test]
fn play_line_with_flags() {
    let r = request("PLAY cdaudio from 1 to 3 notify wait");
    assert_eq!(r.device, DEVICE_ID);
    assert_eq!(
        r.command,
        Command::Play {
            from: Some(1),
            to: Some(3)
        }
    );
    assert_eq!(r.notify, Some(NotifyTarget(1)));
    assert!(r.wait);

    assert_eq!(
        request("play cdaudio").command,
        Command::Play { from: None, to: None }
    );
    assert!(parse_line("play cdaudio from", NotifyTarget(1)).is_err());
}

#[test]
fn set_seek_and_status_lines() {
    assert_eq!(
        request("set cdaudio time format tmsf").command,
        Command::Set {
            time_format: Some(FORMAT_TMSF)
        }
    );
    assert_eq!(
        request("seek cdaudio to end").command,
        Command::Seek(SeekTarget::End)
    );
    assert_eq!(
        request("seek cdaudio to 1:30").command,
        Command::Seek(SeekTarget::To(0x1E01))
    );
    assert_eq!(
        request("status cdaudio length track 2").command,
        Command::Status {
            item: StatusItem::Length,
            track: Some(2)
        }
    );
    assert_eq!(
        request("status cdaudio number of tracks").command,
        Command::Status {
            item: StatusItem::NumberOfTracks,
            track: None
        }
    );
    assert_eq!(
        request("status cdaudio type track 4").command,
        Command::Status {
            item: StatusItem::TrackType,
            track: Some(4)
        }
    );
}

#[test]
fn malformed_lines() {
    let t = NotifyTarget(1);
    assert_eq!(parse_line("   ", t).unwrap(), Line::Empty);
    assert_eq!(parse_line("quit", t).unwrap(), Line::Quit);
    assert_eq!(parse_line("volume", t).unwrap(), Line::Volume(None));
    assert_eq!(parse_line("volume 0xffff", t).unwrap(), Line::Volume(Some(0xFFFF)));
    assert!(matches!(parse_line("eject cdaudio", t), Err(ParseError::UnknownVerb(_))));
    assert!(matches!(parse_line("stop", t), Err(ParseError::MissingDevice(_))));
    assert!(matches!(
        parse_line("status cdaudio colour", t),
        Err(ParseError::UnknownItem(_))
    ));
    assert_eq!(request("stop waveaudio").device, 0);
}

fn console() -> mci::SharedDispatcher {
    let (_, log) = FakeEngine::new();
    let engines: EngineFactory = Box::new(move || -> Result<Box<dyn PlaybackEngine>, EngineError> {
        Ok(Box::new(FakeEngine::with_log(&log)))
    });
    mci::into_shared(Dispatcher::new(
        Box::new(disc(&[(1, 65), (2, 60)])),
        engines,
        Box::new(NoDriver),
        Box::new(RecordingNotifier::default()),
        DeviceOptions {
            time_format: TimeFormat::Msf,
            volume_file: None,
        },
    ))
}

fn run_lines(shared: &mci::SharedDispatcher, lines: &str) -> String {
    let mut out = Vec::new();
    event_loop::run(shared, lines.as_bytes(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn console_session() {
    let shared = console();
    let out = run_lines(
        &shared,
        "open cdaudio\n\
         status cdaudio length\n\
         set cdaudio time format tmsf\n\
         status cdaudio position track 2\n\
         play cdaudio from 2 to 1\n\
         volume\n\
         bogus cdaudio\n\
         quit\n\
         close cdaudio\n",
    );
    let lines: Vec<&str> = out.lines().collect();

    assert_eq!(lines[0], DEVICE_ID.to_string());
    assert_eq!(lines[1], 0x0502.to_string());
    assert_eq!(lines[2], "0");
    assert_eq!(lines[3], "2");
    assert!(lines[4].starts_with("error MCIERR_OUTOFRANGE (282)"));
    assert_eq!(lines[5], "0xffffffff");
    assert!(lines[6].starts_with("? unknown command"));
    assert_eq!(lines.len(), 7);
    // quit stops before the close
    assert!(mci::lock(&shared).is_open());
}

#[test]
fn console_reports_errors_with_native_names() {
    let shared = console();
    let mut out = Vec::new();

    let keep_going =
        handle_line(&shared, "pause cdaudio", NotifyTarget(1), &mut out).unwrap();
    assert!(keep_going);
    handle_line(&shared, "volume 5", NotifyTarget(1), &mut out).unwrap();

    let out = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert!(lines[0].starts_with("error MCIERR_INVALID_DEVICE_NAME (263)"));
    assert_eq!(lines[1], "error MMSYSERR_BADDEVICEID (2)");
}

#[test]
fn request_targets_only_the_cd() {
    let r: Request = request("close cdaudio");
    assert_eq!(r, Request::new(DEVICE_ID, Command::Close));
}
