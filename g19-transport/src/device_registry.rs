//! Known USB identities and HID interface layout of the G19.
//!
//! The G19 enumerates as two USB devices: the LCD unit (which also carries the
//! G/M keys and the menu keys) and the plain keyboard, whose second interface
//! reports the multimedia keys.

/// Logitech vendor ID
pub const VENDOR_ID: u16 = 0x046D;

/// LCD unit with G/M keys and menu keys
pub const PRODUCT_ID_G19_LCD: u16 = 0xC229;

/// Keyboard half (multimedia keys live here)
pub const PRODUCT_ID_G19_KEYBOARD: u16 = 0xC228;

/// HID interface numbers per channel
pub mod interface {
    /// Menu keys on the LCD unit
    pub const DISPLAY_MENU: i32 = 0;
    /// G/M keys on the LCD unit
    pub const G_AND_M: i32 = 1;
    /// Multimedia keys on the keyboard half
    pub const MULTIMEDIA: i32 = 1;
}

/// Maximum report length read per channel
pub mod report_size {
    pub const G_AND_M: usize = 20;
    pub const DISPLAY_MENU: usize = 20;
    pub const MULTIMEDIA: usize = 2;
}

/// Check if a VID/PID pair belongs to the G19
#[inline]
pub fn is_g19(vid: u16, pid: u16) -> bool {
    vid == VENDOR_ID && (pid == PRODUCT_ID_G19_LCD || pid == PRODUCT_ID_G19_KEYBOARD)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_pids() {
        assert!(is_g19(0x046D, 0xC229));
        assert!(is_g19(0x046D, 0xC228));
    }

    #[test]
    fn test_foreign_devices() {
        assert!(!is_g19(0x046D, 0xC33F)); // G815
        assert!(!is_g19(0x3151, 0xC229));
    }
}
