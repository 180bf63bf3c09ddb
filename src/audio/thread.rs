use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use log::{debug, trace, warn};
use rodio::{OutputStream, OutputStreamBuilder, Sink};

use super::sink::open_source;
use super::types::{
    EngineCmd, EngineError, EngineEvent, EngineInfo, InfoHandle, Reply, SeekOrigin, Volume,
};

const TICK: Duration = Duration::from_millis(100);

/// Index of the playing entry given how many were queued and how many remain.
pub(super) fn queue_index(queued: usize, remaining: usize) -> u32 {
    if queued == 0 {
        return 0;
    }
    queued.saturating_sub(remaining.max(1)) as u32
}

/// Sink gain for a per-channel volume. `rodio` sinks are not balanced, so the
/// louder channel wins.
pub(super) fn gain(volume: Volume) -> f32 {
    f32::from(volume.left.max(volume.right).min(100)) / 100.0
}

/// Where the audio thread reports to. Every event and reply goes out after
/// the snapshot it depends on, so a reader woken by one never sees the
/// state from before it.
pub(super) struct Reporter {
    info: InfoHandle,
    events: Option<Sender<EngineEvent>>,
}

impl Reporter {
    pub(super) fn new(info: InfoHandle) -> Self {
        Self { info, events: None }
    }

    pub(super) fn set_events(&mut self, tx: Sender<EngineEvent>) {
        self.events = Some(tx);
    }

    pub(super) fn publish(&self, snapshot: EngineInfo) {
        if let Ok(mut info) = self.info.lock() {
            *info = snapshot;
        }
    }

    pub(super) fn stopped(&self, snapshot: EngineInfo) {
        self.publish(snapshot);
        if let Some(tx) = &self.events {
            let _ = tx.send(EngineEvent::Stopped);
        }
    }

    pub(super) fn reply(
        &self,
        snapshot: EngineInfo,
        reply: Reply,
        result: Result<(), EngineError>,
    ) {
        self.publish(snapshot);
        let _ = reply.send(result);
    }
}

struct AudioThread {
    stream: OutputStream,
    sink: Option<Sink>,
    queued: usize,
    playing: bool,
    paused: bool,
    volume: Volume,
    reporter: Reporter,
}

impl AudioThread {
    fn snapshot(&self) -> EngineInfo {
        let (remaining, elapsed) = self
            .sink
            .as_ref()
            .map_or((0, Duration::ZERO), |s| (s.len(), s.get_pos()));

        EngineInfo {
            status: super::EngineStatus {
                playing: self.playing,
                paused: self.paused,
                queue_index: queue_index(self.queued, remaining),
            },
            elapsed,
            volume: self.volume,
        }
    }

    fn publish(&self) {
        self.reporter.publish(self.snapshot());
    }

    fn report_stopped(&self) {
        self.reporter.stopped(self.snapshot());
    }

    fn answer(&self, reply: Reply, result: Result<(), EngineError>) {
        self.reporter.reply(self.snapshot(), reply, result);
    }

    fn drop_queue(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.queued = 0;
        self.playing = false;
        self.paused = false;
    }

    fn enqueue(&mut self, path: &std::path::Path) -> Result<(), EngineError> {
        let source = open_source(path)?;
        let sink = self.sink.get_or_insert_with(|| {
            let sink = Sink::connect_new(self.stream.mixer());
            sink.pause();
            sink
        });
        sink.set_volume(gain(self.volume));
        sink.append(source);
        self.queued += 1;
        Ok(())
    }

    fn play(&mut self) -> Result<(), EngineError> {
        let sink = self.sink.as_ref().ok_or(EngineError::NothingQueued)?;
        sink.play();
        self.playing = true;
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), EngineError> {
        let sink = self.sink.as_ref().ok_or(EngineError::NothingQueued)?;
        sink.pause();
        self.paused = self.playing;
        Ok(())
    }

    fn resume(&mut self) -> Result<(), EngineError> {
        let sink = self.sink.as_ref().ok_or(EngineError::NothingQueued)?;
        if self.playing {
            sink.play();
        }
        self.paused = false;
        Ok(())
    }

    fn stop(&mut self) {
        let was_playing = self.playing;
        self.drop_queue();
        if was_playing {
            self.report_stopped();
        }
    }

    fn seek(&mut self, seconds: u32, origin: SeekOrigin) -> Result<(), EngineError> {
        let sink = self.sink.as_ref().ok_or(EngineError::NothingQueued)?;
        match origin {
            SeekOrigin::Start => sink
                .try_seek(Duration::from_secs(u64::from(seconds)))
                .map_err(|e| EngineError::Seek(e.to_string())),
            SeekOrigin::End => {
                // Dropping what is left lets the tick notice the end of the queue.
                sink.stop();
                Ok(())
            }
        }
    }

    fn set_volume(&mut self, volume: Volume) {
        self.volume = volume;
        if let Some(s) = self.sink.as_ref() {
            s.set_volume(gain(volume));
        }
    }

    /// Detect the queue running dry while playing.
    fn tick(&mut self) {
        let finished = self.playing
            && !self.paused
            && self.sink.as_ref().is_some_and(Sink::empty);
        if finished {
            debug!("queue finished");
            self.playing = false;
            self.report_stopped();
        }
    }
}

pub(super) fn spawn_audio_thread(
    rx: Receiver<EngineCmd>,
    info: InfoHandle,
    ready: Sender<Result<(), EngineError>>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                let _ = ready.send(Err(EngineError::NoOutputDevice(e.to_string())));
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped.
        stream.log_on_drop(false);
        let _ = ready.send(Ok(()));

        let volume = info.lock().map(|i| i.volume).unwrap_or_default();
        let mut audio = AudioThread {
            stream,
            sink: None,
            queued: 0,
            playing: false,
            paused: false,
            volume,
            reporter: Reporter::new(info),
        };

        loop {
            match rx.recv_timeout(TICK) {
                Ok(cmd) => {
                    trace!("engine command {cmd:?}");
                    match cmd {
                        EngineCmd::Enqueue {
                            path,
                            format,
                            reply,
                        } => {
                            debug!("enqueue {} ({format:?})", path.display());
                            let result = audio.enqueue(&path);
                            audio.answer(reply, result);
                        }
                        EngineCmd::Play(reply) => {
                            let result = audio.play();
                            audio.answer(reply, result);
                        }
                        EngineCmd::Pause(reply) => {
                            let result = audio.pause();
                            audio.answer(reply, result);
                        }
                        EngineCmd::Resume(reply) => {
                            let result = audio.resume();
                            audio.answer(reply, result);
                        }
                        EngineCmd::Stop(reply) => {
                            audio.stop();
                            audio.answer(reply, Ok(()));
                        }
                        EngineCmd::Close(reply) => {
                            audio.drop_queue();
                            audio.answer(reply, Ok(()));
                        }
                        EngineCmd::Seek {
                            seconds,
                            origin,
                            reply,
                        } => {
                            let result = audio.seek(seconds, origin);
                            if let Err(e) = &result {
                                warn!("seek to {seconds}s failed: {e}");
                            }
                            audio.answer(reply, result);
                        }
                        EngineCmd::SetVolume { volume, reply } => {
                            audio.set_volume(volume);
                            audio.answer(reply, Ok(()));
                        }
                        EngineCmd::SetEventSender(tx) => {
                            audio.reporter.set_events(tx);
                        }
                        EngineCmd::Quit => {
                            audio.drop_queue();
                            audio.publish();
                            break;
                        }
                    }
                }
                Err(RecvTimeoutError::Timeout) => audio.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
            audio.publish();
        }
    })
}
