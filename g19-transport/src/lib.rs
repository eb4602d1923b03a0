//! Transport layer for the Logitech G19 special keys
//!
//! The device reports its extra keys over three independent HID input
//! channels. This crate hides how those reports are fetched behind the
//! [`KeyTransport`] trait; decoding them is the business of `g19-keyboard`.

pub mod device_registry;
pub mod error;
pub mod hid;
pub mod types;

pub use device_registry::{is_g19, PRODUCT_ID_G19_KEYBOARD, PRODUCT_ID_G19_LCD, VENDOR_ID};
pub use error::TransportError;
pub use hid::{list_interfaces, HidKeyTransport, InterfaceInfo};
pub use types::{Channel, RawPacket, TransportDeviceInfo};

/// Source of raw key reports.
///
/// Every read is non-blocking: `Ok(None)` means no report is currently
/// queued on that channel. An `Err` is a transport fault, distinct from a
/// report that fails to decode.
pub trait KeyTransport: Send {
    /// Read a multimedia key report
    fn read_multimedia_keys(&self) -> Result<Option<RawPacket>, TransportError>;

    /// Read a G/M key report
    fn read_g_and_m_keys(&self) -> Result<Option<RawPacket>, TransportError>;

    /// Read an LCD menu key report
    fn read_display_menu_keys(&self) -> Result<Option<RawPacket>, TransportError>;

    /// Whether the multimedia channel should be polled at all
    fn enable_mm_keys(&self) -> bool;

    /// Get device information
    fn device_info(&self) -> &TransportDeviceInfo;

    /// Read from the given channel
    fn read_channel(&self, channel: Channel) -> Result<Option<RawPacket>, TransportError> {
        match channel {
            Channel::Multimedia => self.read_multimedia_keys(),
            Channel::GAndM => self.read_g_and_m_keys(),
            Channel::DisplayMenu => self.read_display_menu_keys(),
        }
    }
}

/// Type alias for a boxed transport
pub type BoxedTransport = Box<dyn KeyTransport>;
