//! The device-command protocol surface.
//!
//! Requests addressed to the virtual drive are handled by [`Dispatcher`];
//! everything else is passed through to the real driver. All traffic,
//! including asynchronous engine events, is serialized behind one
//! [`SharedDispatcher`] lock.

pub mod codes;
mod command;
mod dispatch;
mod shared;

pub use crate::device::{NotificationKind, NotifyTarget, SeekTarget, StatusItem};
pub use codes::DEVICE_ID;
pub use command::{Command, DeviceType, OpenParams, Request};
pub use dispatch::{AuxCaps, Dispatcher, EngineFactory, NoDriver, Notifier, Passthrough};
pub use shared::{SharedDispatcher, into_shared, lock, send_command, spawn_event_pump};
