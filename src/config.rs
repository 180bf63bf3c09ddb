//! Configuration loader and schema types.
//!
//! This module exposes the configuration schema used to drive the virtual
//! device, helpers to load it from disk, and the volume file reader.

mod load;
mod schema;
mod volume;

pub use load::{default_config_path, resolve_config_path};
pub use schema::*;
pub use volume::read_volume_file;
