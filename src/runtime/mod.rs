use std::env;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use env_logger::Env;
use log::info;

use crate::audio::{EngineError, PlaybackEngine, RodioEngine};
use crate::device::DeviceOptions;
use crate::library::DirectorySource;
use crate::mci::{self, Command, DEVICE_ID, Dispatcher, EngineFactory, NoDriver, Request};

mod event_loop;
mod parse;
mod settings;

pub use event_loop::{ConsoleNotifier, handle_line};
pub use parse::{Line, ParseError, parse_line, parse_position};

#[cfg(test)]
mod tests;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let settings = settings::load_settings();

    let dir = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| settings.library.dir.clone());
    info!("music directory: {}", dir.display());

    let source = DirectorySource::new(dir, settings.library.clone());
    let engines: EngineFactory = Box::new(|| -> Result<Box<dyn PlaybackEngine>, EngineError> {
        Ok(Box::new(RodioEngine::new()?))
    });

    let shared = mci::into_shared(Dispatcher::new(
        Box::new(source),
        engines,
        Box::new(NoDriver),
        Box::new(ConsoleNotifier),
        DeviceOptions::from(&settings),
    ));
    let pump = mci::spawn_event_pump(&shared, Duration::from_millis(settings.audio.event_poll_ms));

    let run_result = event_loop::run(&shared, io::stdin().lock(), &mut io::stdout());

    if mci::lock(&shared).is_open() {
        let _ = mci::send_command(&shared, Request::new(DEVICE_ID, Command::Close));
    }
    drop(shared);
    let _ = pump.join();

    run_result.map_err(Into::into)
}
