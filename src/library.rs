//! Track discovery and the CD track layout synthesized from it.
//!
//! `scan` finds candidate files on disk and probes them, `catalogue` turns the
//! candidates into a contiguous `1..=N` track list with placeholder data
//! tracks filling the gaps.

mod catalogue;
mod model;
mod scan;

pub use catalogue::*;
pub use model::*;
pub use scan::*;
