use std::path::Path;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use log::debug;

use crate::library::CodecFormat;

use super::engine::PlaybackEngine;
use super::thread::spawn_audio_thread;
use super::types::{
    EngineCmd, EngineError, EngineEvent, EngineInfo, EngineStatus, InfoHandle, Reply, SeekOrigin,
    Volume,
};

/// `PlaybackEngine` backed by a `rodio` sink on a dedicated audio thread.
pub struct RodioEngine {
    tx: Sender<EngineCmd>,
    info: InfoHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl RodioEngine {
    /// Start the audio thread and open the default output device.
    pub fn new() -> Result<Self, EngineError> {
        let (tx, rx) = mpsc::channel::<EngineCmd>();
        let (ready_tx, ready_rx) = mpsc::channel();
        let info: InfoHandle = Arc::new(Mutex::new(EngineInfo::default()));

        let handle = spawn_audio_thread(rx, info.clone(), ready_tx);
        match ready_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = handle.join();
                return Err(e);
            }
            Err(_) => return Err(EngineError::Disconnected),
        }

        debug!("audio thread started");
        Ok(Self {
            tx,
            info,
            join: Mutex::new(Some(handle)),
        })
    }

    /// Send a command built around a reply channel and wait for the answer.
    fn request(&self, build: impl FnOnce(Reply) -> EngineCmd) -> Result<(), EngineError> {
        let (reply, answer) = mpsc::channel();
        self.tx
            .send(build(reply))
            .map_err(|_| EngineError::Disconnected)?;
        answer.recv().map_err(|_| EngineError::Disconnected)?
    }

    fn snapshot(&self) -> EngineInfo {
        self.info.lock().map(|i| i.clone()).unwrap_or_default()
    }
}

impl PlaybackEngine for RodioEngine {
    fn close(&mut self) -> Result<(), EngineError> {
        self.request(EngineCmd::Close)
    }

    fn enqueue(&mut self, path: &Path, format: CodecFormat) -> Result<(), EngineError> {
        let path = path.to_path_buf();
        self.request(|reply| EngineCmd::Enqueue {
            path,
            format,
            reply,
        })
    }

    fn play(&mut self) -> Result<(), EngineError> {
        self.request(EngineCmd::Play)
    }

    fn pause(&mut self) -> Result<(), EngineError> {
        self.request(EngineCmd::Pause)
    }

    fn resume(&mut self) -> Result<(), EngineError> {
        self.request(EngineCmd::Resume)
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        self.request(EngineCmd::Stop)
    }

    fn seek(&mut self, seconds: u32, origin: SeekOrigin) -> Result<(), EngineError> {
        self.request(|reply| EngineCmd::Seek {
            seconds,
            origin,
            reply,
        })
    }

    fn status(&self) -> EngineStatus {
        self.snapshot().status
    }

    fn position(&self) -> u32 {
        self.snapshot().elapsed.as_secs() as u32
    }

    fn volume(&self) -> Volume {
        self.snapshot().volume
    }

    fn set_volume(&mut self, volume: Volume) -> Result<(), EngineError> {
        self.request(|reply| EngineCmd::SetVolume { volume, reply })
    }

    fn set_event_sender(&mut self, tx: Sender<EngineEvent>) {
        let _ = self.tx.send(EngineCmd::SetEventSender(tx));
    }
}

impl Drop for RodioEngine {
    fn drop(&mut self) {
        let _ = self.tx.send(EngineCmd::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
