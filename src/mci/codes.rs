//! Native constants of the multimedia command interface that a cdaudio
//! driver reads or returns.

pub const MMSYSERR_NOERROR: u32 = 0;
pub const MMSYSERR_BADDEVICEID: u32 = 2;
pub const MMSYSERR_INVALPARAM: u32 = 11;

pub const MCIERR_INVALID_DEVICE_ID: u32 = 257;
pub const MCIERR_UNRECOGNIZED_COMMAND: u32 = 261;
pub const MCIERR_HARDWARE: u32 = 262;
pub const MCIERR_INVALID_DEVICE_NAME: u32 = 263;
pub const MCIERR_DEVICE_OPEN: u32 = 265;
pub const MCIERR_OUTOFRANGE: u32 = 282;
pub const MCIERR_MISSING_PARAMETER: u32 = 417;

/// Identifier handed out by a successful open of the virtual drive.
pub const DEVICE_ID: u32 = 0xCDFA_CADE;

pub const MCI_DEVTYPE_CD_AUDIO: u32 = 516;

pub const MCI_STATUS_LENGTH: u32 = 0x01;
pub const MCI_STATUS_POSITION: u32 = 0x02;
pub const MCI_STATUS_NUMBER_OF_TRACKS: u32 = 0x03;
pub const MCI_STATUS_MODE: u32 = 0x04;
pub const MCI_STATUS_MEDIA_PRESENT: u32 = 0x05;
pub const MCI_STATUS_TIME_FORMAT: u32 = 0x06;
pub const MCI_STATUS_READY: u32 = 0x07;
pub const MCI_STATUS_CURRENT_TRACK: u32 = 0x08;
pub const MCI_STATUS_START: u32 = 0x200;
pub const MCI_CDA_STATUS_TYPE_TRACK: u32 = 0x4001;

pub const MCI_MODE_STOP: u32 = 525;
pub const MCI_MODE_PLAY: u32 = 526;
pub const MCI_MODE_PAUSE: u32 = 529;

pub const MCI_CDA_TRACK_AUDIO: u32 = 1088;
pub const MCI_CDA_TRACK_OTHER: u32 = 1089;

pub const MCI_NOTIFY_SUCCESSFUL: u32 = 0x01;
pub const MCI_NOTIFY_ABORTED: u32 = 0x04;

// aux device capabilities
pub const MM_CREATIVE: u16 = 2;
pub const MM_CREATIVE_AUX_CD: u16 = 401;
pub const AUXCAPS_CDAUDIO: u16 = 1;
pub const AUXCAPS_VOLUME: u32 = 0x0001;

/// Symbolic name of a result code.
pub fn name(code: u32) -> &'static str {
    match code {
        MMSYSERR_NOERROR => "MMSYSERR_NOERROR",
        MMSYSERR_BADDEVICEID => "MMSYSERR_BADDEVICEID",
        MMSYSERR_INVALPARAM => "MMSYSERR_INVALPARAM",
        MCIERR_INVALID_DEVICE_ID => "MCIERR_INVALID_DEVICE_ID",
        MCIERR_UNRECOGNIZED_COMMAND => "MCIERR_UNRECOGNIZED_COMMAND",
        MCIERR_HARDWARE => "MCIERR_HARDWARE",
        MCIERR_INVALID_DEVICE_NAME => "MCIERR_INVALID_DEVICE_NAME",
        MCIERR_DEVICE_OPEN => "MCIERR_DEVICE_OPEN",
        MCIERR_OUTOFRANGE => "MCIERR_OUTOFRANGE",
        MCIERR_MISSING_PARAMETER => "MCIERR_MISSING_PARAMETER",
        _ => "unknown error",
    }
}
