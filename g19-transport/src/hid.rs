//! hidapi-backed transport for a directly attached G19

use hidapi::{DeviceInfo, HidApi, HidDevice};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::device_registry::{self, interface, report_size};
use crate::error::TransportError;
use crate::types::{Channel, RawPacket, TransportDeviceInfo};
use crate::KeyTransport;

/// A HID interface belonging to a G19, as found during enumeration
#[derive(Debug, Clone)]
pub struct InterfaceInfo {
    pub vid: u16,
    pub pid: u16,
    pub interface_number: i32,
    pub path: String,
    pub product_name: Option<String>,
    /// Which report channel this interface carries, if any
    pub channel: Option<Channel>,
}

fn channel_for(pid: u16, interface_number: i32) -> Option<Channel> {
    match (pid, interface_number) {
        (device_registry::PRODUCT_ID_G19_LCD, interface::G_AND_M) => Some(Channel::GAndM),
        (device_registry::PRODUCT_ID_G19_LCD, interface::DISPLAY_MENU) => {
            Some(Channel::DisplayMenu)
        }
        (device_registry::PRODUCT_ID_G19_KEYBOARD, interface::MULTIMEDIA) => {
            Some(Channel::Multimedia)
        }
        _ => None,
    }
}

/// List every HID interface of every attached G19
pub fn list_interfaces(api: &HidApi) -> Vec<InterfaceInfo> {
    api.device_list()
        .filter(|d| device_registry::is_g19(d.vendor_id(), d.product_id()))
        .map(|d| InterfaceInfo {
            vid: d.vendor_id(),
            pid: d.product_id(),
            interface_number: d.interface_number(),
            path: d.path().to_string_lossy().into_owned(),
            product_name: d.product_string().map(str::to_string),
            channel: channel_for(d.product_id(), d.interface_number()),
        })
        .collect()
}

fn find_interface(api: &HidApi, pid: u16, interface_number: i32) -> Option<&DeviceInfo> {
    api.device_list().find(|d| {
        d.vendor_id() == device_registry::VENDOR_ID
            && d.product_id() == pid
            && d.interface_number() == interface_number
    })
}

/// One opened input interface plus its read buffer size
struct InputEndpoint {
    device: Mutex<HidDevice>,
    report_size: usize,
}

impl InputEndpoint {
    fn open(api: &HidApi, info: &DeviceInfo, report_size: usize) -> Result<Self, TransportError> {
        let device = api.open_path(info.path())?;
        device.set_blocking_mode(false)?;
        Ok(Self {
            device: Mutex::new(device),
            report_size,
        })
    }

    /// Non-blocking read; `None` when no report is queued
    fn read(&self) -> Result<Option<RawPacket>, TransportError> {
        let mut buf = vec![0u8; self.report_size];
        let len = self.device.lock().read_timeout(&mut buf, 0)?;
        if len == 0 {
            return Ok(None);
        }
        buf.truncate(len);
        Ok(Some(buf))
    }
}

/// HID transport reading the three key channels of a G19
pub struct HidKeyTransport {
    g_and_m: InputEndpoint,
    display_menu: InputEndpoint,
    multimedia: Option<InputEndpoint>,
    info: TransportDeviceInfo,
}

impl HidKeyTransport {
    /// Open the first attached G19.
    ///
    /// With `enable_mm_keys` set, the keyboard half is opened as well; if it
    /// cannot be found the multimedia channel is disabled with a warning.
    pub fn open(api: &HidApi, enable_mm_keys: bool) -> Result<Self, TransportError> {
        let gm_info = find_interface(api, device_registry::PRODUCT_ID_G19_LCD, interface::G_AND_M)
            .ok_or_else(|| TransportError::DeviceNotFound("G19 G/M key interface".into()))?;
        let menu_info = find_interface(
            api,
            device_registry::PRODUCT_ID_G19_LCD,
            interface::DISPLAY_MENU,
        )
        .ok_or_else(|| TransportError::DeviceNotFound("G19 menu key interface".into()))?;

        let info = TransportDeviceInfo {
            vid: gm_info.vendor_id(),
            pid: gm_info.product_id(),
            device_path: gm_info.path().to_string_lossy().into_owned(),
            serial: gm_info.serial_number().map(str::to_string),
            product_name: gm_info.product_string().map(str::to_string),
        };

        let g_and_m = InputEndpoint::open(api, gm_info, report_size::G_AND_M)?;
        let display_menu = InputEndpoint::open(api, menu_info, report_size::DISPLAY_MENU)?;
        debug!("Opened G/M and menu interfaces at {}", info.device_path);

        let multimedia = if enable_mm_keys {
            match find_interface(
                api,
                device_registry::PRODUCT_ID_G19_KEYBOARD,
                interface::MULTIMEDIA,
            ) {
                Some(mm_info) => Some(InputEndpoint::open(
                    api,
                    mm_info,
                    report_size::MULTIMEDIA,
                )?),
                None => {
                    warn!("Multimedia key interface not found, multimedia keys disabled");
                    None
                }
            }
        } else {
            None
        };

        info!(
            "Connected to {} ({:04x}:{:04x}), multimedia keys {}",
            info.product_name.as_deref().unwrap_or("G19"),
            info.vid,
            info.pid,
            if multimedia.is_some() { "on" } else { "off" }
        );

        Ok(Self {
            g_and_m,
            display_menu,
            multimedia,
            info,
        })
    }
}

impl KeyTransport for HidKeyTransport {
    fn read_multimedia_keys(&self) -> Result<Option<RawPacket>, TransportError> {
        match &self.multimedia {
            Some(endpoint) => endpoint.read(),
            None => Ok(None),
        }
    }

    fn read_g_and_m_keys(&self) -> Result<Option<RawPacket>, TransportError> {
        self.g_and_m.read()
    }

    fn read_display_menu_keys(&self) -> Result<Option<RawPacket>, TransportError> {
        self.display_menu.read()
    }

    fn enable_mm_keys(&self) -> bool {
        self.multimedia.is_some()
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_for_interfaces() {
        assert_eq!(
            channel_for(device_registry::PRODUCT_ID_G19_LCD, 1),
            Some(Channel::GAndM)
        );
        assert_eq!(
            channel_for(device_registry::PRODUCT_ID_G19_LCD, 0),
            Some(Channel::DisplayMenu)
        );
        assert_eq!(
            channel_for(device_registry::PRODUCT_ID_G19_KEYBOARD, 1),
            Some(Channel::Multimedia)
        );
        assert_eq!(channel_for(device_registry::PRODUCT_ID_G19_KEYBOARD, 0), None);
    }

    #[test]
    #[ignore] // requires hardware
    fn test_open_attached_device() {
        let api = HidApi::new().unwrap();
        let transport = HidKeyTransport::open(&api, true).unwrap();
        assert_eq!(transport.device_info().vid, device_registry::VENDOR_ID);
    }
}
