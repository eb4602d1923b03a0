//! Common types for the transport layer

/// One raw input report, byte for byte as the device sent it.
pub type RawPacket = Vec<u8>;

/// The three independent report channels of the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Multimedia keys and the Win-key switch (keyboard half)
    Multimedia,
    /// G1-G12, M1-M3, MR and the backlight key
    GAndM,
    /// LCD menu keys (D-pad, OK, Menu, Back, Settings)
    DisplayMenu,
}

impl Channel {
    /// Poll order used by the receiver
    pub const ALL: &'static [Channel] = &[
        Channel::Multimedia,
        Channel::GAndM,
        Channel::DisplayMenu,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Channel::Multimedia => "multimedia",
            Channel::GAndM => "g/m",
            Channel::DisplayMenu => "menu",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mm" | "multimedia" => Ok(Channel::Multimedia),
            "gm" | "g/m" | "g" | "macro" => Ok(Channel::GAndM),
            "d" | "menu" | "display" => Ok(Channel::DisplayMenu),
            other => Err(format!("unknown channel: {other}")),
        }
    }
}

/// Device identification information
#[derive(Debug, Clone)]
pub struct TransportDeviceInfo {
    /// USB Vendor ID
    pub vid: u16,
    /// USB Product ID of the LCD/G-key half
    pub pid: u16,
    /// Device path of the G/M key interface
    pub device_path: String,
    /// Serial number if available
    pub serial: Option<String>,
    /// Product name if available
    pub product_name: Option<String>,
}
