//! A software CD-audio drive.
//!
//! Answers MCI-style device commands as if an audio CD were inserted, while
//! playing a directory of numbered audio files through `rodio`.

pub mod audio;
pub mod config;
pub mod device;
pub mod error;
pub mod library;
pub mod mci;
pub mod runtime;
pub mod timecode;

#[cfg(test)]
mod testing;
