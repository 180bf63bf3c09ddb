use log::{debug, trace};

use crate::audio::{EngineError, PlaybackEngine};
use crate::device::{DeviceOptions, NotificationKind, NotifyTarget, VirtualDevice};
use crate::error::{CdError, Result};
use crate::library::TrackSource;

use super::codes::{self, DEVICE_ID};
use super::command::{Command, OpenParams, Request};

/// The real driver that requests not meant for the virtual drive go to.
pub trait Passthrough: Send {
    /// Forward `request` verbatim and return the native result code.
    fn forward(&mut self, request: &Request) -> u32;
}

/// Stand-in driver for when no real one is loaded.
#[derive(Debug, Default)]
pub struct NoDriver;

impl Passthrough for NoDriver {
    fn forward(&mut self, request: &Request) -> u32 {
        match request.command {
            Command::Open(_) => codes::MCIERR_INVALID_DEVICE_NAME,
            _ if request.device != DEVICE_ID => codes::MCIERR_INVALID_DEVICE_ID,
            _ => codes::MCIERR_UNRECOGNIZED_COMMAND,
        }
    }
}

/// Posts completion messages back to the caller.
pub trait Notifier: Send {
    fn notify(&mut self, target: NotifyTarget, kind: NotificationKind, device: u32);
}

/// Creates a fresh playback engine for each open.
pub type EngineFactory =
    Box<dyn FnMut() -> std::result::Result<Box<dyn PlaybackEngine>, EngineError> + Send>;

/// What the aux interface reports about the drive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxCaps {
    pub manufacturer: u16,
    pub product: u16,
    pub driver_version: u32,
    pub name: &'static str,
    pub technology: u16,
    pub support: u32,
}

pub struct Dispatcher {
    source: Box<dyn TrackSource>,
    engines: EngineFactory,
    driver: Box<dyn Passthrough>,
    notifier: Box<dyn Notifier>,
    options: DeviceOptions,
    device: Option<VirtualDevice>,
}

impl Dispatcher {
    pub fn new(
        source: Box<dyn TrackSource>,
        engines: EngineFactory,
        driver: Box<dyn Passthrough>,
        notifier: Box<dyn Notifier>,
        options: DeviceOptions,
    ) -> Self {
        Self {
            source,
            engines,
            driver,
            notifier,
            options,
            device: None,
        }
    }

    pub fn device(&self) -> Option<&VirtualDevice> {
        self.device.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.device.is_some()
    }

    /// Handle one request and return its value: the device id for an open,
    /// the answer for a status query, 0 otherwise.
    pub fn send(&mut self, request: Request) -> Result<u32> {
        trace!("{} -> {:#x}: {:?}", request.command.name(), request.device, request.command);

        if !matches!(request.command, Command::Open(_)) {
            if request.device != DEVICE_ID {
                return self.forward(&request);
            }
            if self.device.is_none() {
                return Err(CdError::DeviceNotOpen);
            }
        }
        if request.notify.is_some() {
            trace!("  notify");
        }
        if request.wait {
            trace!("  wait");
        }

        let value = match &request.command {
            Command::Open(params) => match self.open(params)? {
                Some(id) => id,
                None => return self.forward(&request),
            },
            Command::Other { message } => {
                trace!("  unrecognized message {message:#x}");
                return self.forward(&request);
            }
            Command::Close => {
                if let Some(mut device) = self.device.take() {
                    device.close();
                }
                0
            }
            command => {
                let device = self.device.as_mut().ok_or(CdError::DeviceNotOpen)?;
                apply(device, command)?
            }
        };

        // a stop caused by this command belongs to the notification armed before it
        self.pump();

        // requests without the notify flag keep whatever is already armed
        if let (Some(device), Some(target)) = (self.device.as_mut(), request.notify) {
            device.arm_notification(target);
        }

        Ok(value)
    }

    /// Open the virtual drive if `params` ask for a CD. `None` means the
    /// open is for some other device.
    fn open(&mut self, params: &OpenParams) -> Result<Option<u32>> {
        if let Some(alias) = &params.alias {
            trace!("  alias {alias}");
        }
        if let Some(element) = &params.element {
            trace!("  element {element}");
        }
        if params.shareable {
            trace!("  shareable");
        }

        if !params.device_type.as_ref().is_some_and(|t| t.is_cd_audio()) {
            return Ok(None);
        }
        if self.device.is_some() {
            return Err(CdError::DeviceAlreadyOpen);
        }

        let engine = (self.engines)()?;
        let mut device = VirtualDevice::new(engine, self.options.clone());
        device.open(self.source.as_ref())?;
        self.device = Some(device);

        debug!("cdaudio open as {DEVICE_ID:#x}");
        Ok(Some(DEVICE_ID))
    }

    fn forward(&mut self, request: &Request) -> Result<u32> {
        trace!("  passing {} through", request.command.name());
        match self.driver.forward(request) {
            codes::MMSYSERR_NOERROR => Ok(0),
            code => Err(CdError::Driver(code)),
        }
    }

    /// Apply pending engine events and deliver the notifications they
    /// release. Returns how many were delivered.
    pub fn pump(&mut self) -> usize {
        let Some(device) = self.device.as_mut() else {
            return 0;
        };
        let delivered = device.drain_events();
        for n in &delivered {
            debug!("notify {:?}: {:?}", n.target, n.kind);
            self.notifier.notify(n.target, n.kind, DEVICE_ID);
        }
        delivered.len()
    }

    pub fn aux_device_count(&self) -> u32 {
        1
    }

    pub fn aux_caps(&self) -> AuxCaps {
        AuxCaps {
            manufacturer: codes::MM_CREATIVE,
            product: codes::MM_CREATIVE_AUX_CD,
            driver_version: 1,
            name: "cdaudio Virtual CD",
            technology: codes::AUXCAPS_CDAUDIO,
            support: codes::AUXCAPS_VOLUME,
        }
    }

    /// Packed `left | right << 16` volume, or `MMSYSERR_BADDEVICEID` with no
    /// drive open.
    pub fn aux_get_volume(&self) -> std::result::Result<u32, u32> {
        self.device
            .as_ref()
            .map(VirtualDevice::aux_volume)
            .ok_or(codes::MMSYSERR_BADDEVICEID)
    }

    pub fn aux_set_volume(&mut self, packed: u32) -> std::result::Result<(), u32> {
        let device = self.device.as_mut().ok_or(codes::MMSYSERR_BADDEVICEID)?;
        device.set_aux_volume(packed).map_err(|e| e.code())
    }
}

fn apply(device: &mut VirtualDevice, command: &Command) -> Result<u32> {
    match command {
        Command::Set { time_format } => {
            if let Some(raw) = time_format {
                device.set_time_format(*raw)?;
            }
        }
        Command::Seek(target) => device.seek(*target)?,
        Command::Play { from, to } => device.play(*from, *to)?,
        Command::Stop => device.stop()?,
        Command::Pause => device.pause()?,
        Command::Resume => device.resume()?,
        Command::Status { item, track } => {
            let status = device.status(*item, *track)?;
            trace!("  status {item:?} = {status:?}");
            return Ok(status.to_raw());
        }
        Command::Open(_) | Command::Close | Command::Other { .. } => {}
    }
    Ok(0)
}
