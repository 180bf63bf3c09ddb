//! Packing between the aux `DWORD` volume and engine percentages.
//!
//! The low word carries the left channel and the high word the right one,
//! each scaled to `0..=0xFFFF`.

use crate::audio::Volume;

const FULL_SCALE: u32 = 0xFFFF;

pub fn pack_volume(volume: Volume) -> u32 {
    let left = u32::from(volume.left.min(100)) * FULL_SCALE / 100;
    let right = u32::from(volume.right.min(100)) * FULL_SCALE / 100;
    left | right << 16
}

pub fn unpack_volume(packed: u32) -> Volume {
    let left = (packed & FULL_SCALE) * 100 / FULL_SCALE;
    let right = (packed >> 16) * 100 / FULL_SCALE;
    Volume {
        left: left as u8,
        right: right as u8,
    }
}
