//! The virtual CD drive: playback state machine, status answers and the
//! one-shot notification slot.

mod drive;
mod model;
mod volume;

pub use drive::VirtualDevice;
pub use model::*;
pub use volume::{pack_volume, unpack_volume};
