use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::info;

use crate::error::Result;

use super::command::Request;
use super::dispatch::Dispatcher;

/// The process-wide lock every command and every engine event goes through.
pub type SharedDispatcher = Arc<Mutex<Dispatcher>>;

pub fn into_shared(dispatcher: Dispatcher) -> SharedDispatcher {
    Arc::new(Mutex::new(dispatcher))
}

pub fn lock(shared: &SharedDispatcher) -> MutexGuard<'_, Dispatcher> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Serialize `request` behind the dispatcher lock. Failures are logged with
/// their native code before being returned.
pub fn send_command(shared: &SharedDispatcher, request: Request) -> Result<u32> {
    let name = request.command.name();
    let result = lock(shared).send(request);
    if let Err(e) = &result {
        info!("{name} failed: {e} ({} = {})", e.code_name(), e.code());
    }
    result
}

/// Deliver engine events every `interval` while no command is running.
/// The thread ends once the dispatcher is dropped.
pub fn spawn_event_pump(shared: &SharedDispatcher, interval: Duration) -> JoinHandle<()> {
    let weak = Arc::downgrade(shared);
    thread::spawn(move || {
        loop {
            thread::sleep(interval);
            let Some(shared) = weak.upgrade() else {
                break;
            };
            lock(&shared).pump();
        }
    })
}
