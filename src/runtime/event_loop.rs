use std::io::{self, BufRead, Write};

use log::debug;

use crate::device::{NotificationKind, NotifyTarget};
use crate::mci::{self, Notifier, SharedDispatcher, codes};

use super::parse::{Line, parse_line};

/// Prints delivered notifications to stdout.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&mut self, target: NotifyTarget, kind: NotificationKind, device: u32) {
        let kind = match kind {
            NotificationKind::Completed => "successful",
            NotificationKind::Aborted => "aborted",
        };
        let mut out = io::stdout().lock();
        let _ = writeln!(out, "notify #{} from {device:#x}: {kind}", target.0);
    }
}

/// Execute one line against the dispatcher and write the reply.
/// Returns `false` once the console should exit.
pub fn handle_line(
    shared: &SharedDispatcher,
    line: &str,
    target: NotifyTarget,
    out: &mut impl Write,
) -> io::Result<bool> {
    let parsed = match parse_line(line, target) {
        Ok(parsed) => parsed,
        Err(e) => {
            writeln!(out, "? {e}")?;
            return Ok(true);
        }
    };

    match parsed {
        Line::Empty => {}
        Line::Quit => return Ok(false),
        Line::Volume(None) => match mci::lock(shared).aux_get_volume() {
            Ok(packed) => writeln!(out, "{packed:#010x}")?,
            Err(code) => writeln!(out, "error {} ({code})", codes::name(code))?,
        },
        Line::Volume(Some(packed)) => match mci::lock(shared).aux_set_volume(packed) {
            Ok(()) => writeln!(out, "0")?,
            Err(code) => writeln!(out, "error {} ({code})", codes::name(code))?,
        },
        Line::Request(request) => {
            debug!("console: {request:?}");
            match mci::send_command(shared, request) {
                Ok(value) => writeln!(out, "{value}")?,
                Err(e) => writeln!(out, "error {} ({}): {e}", e.code_name(), e.code())?,
            }
        }
    }
    Ok(true)
}

/// Read commands from `input` until it ends or `quit` is entered.
pub fn run(shared: &SharedDispatcher, input: impl BufRead, out: &mut impl Write) -> io::Result<()> {
    let mut next_target = 1u64;

    for line in input.lines() {
        let line = line?;
        let target = NotifyTarget(next_target);
        if line.contains("notify") {
            next_target += 1;
        }
        if !handle_line(shared, &line, target, out)? {
            break;
        }
        out.flush()?;
    }
    Ok(())
}
