//! Per-model bit-mask tables.
//!
//! Each table is an ordered list of `(mask, key)` pairs. The decoder walks
//! them front to back, so the order here is the order keys are matched in.

use crate::keys::Key;

/// Bit-field layout of one device model's special-key reports
#[derive(Debug, Clone, Copy)]
pub struct KeyMap {
    /// Model name for logging
    pub name: &'static str,
    /// First byte of every G/M report
    pub g_and_m_marker: u8,
    /// Bit that is always set in the 24-bit G/M field
    pub g_and_m_empty: u32,
    pub g_and_m: &'static [(u32, Key)],
    /// Second byte of every menu report
    pub menu_marker: u8,
    pub menu: &'static [(u32, Key)],
    /// First byte of a multimedia bit-field report
    pub multimedia_bitfield: u8,
    /// First byte of a Win-key switch report
    pub multimedia_mode_switch: u8,
    pub multimedia: &'static [(u32, Key)],
}

/// Logitech G19
pub const G19: KeyMap = KeyMap {
    name: "G19",
    g_and_m_marker: 0x02,
    g_and_m_empty: 0x40_0000,
    g_and_m: &[
        (0x00_0001, Key::G1),
        (0x00_0002, Key::G2),
        (0x00_0004, Key::G3),
        (0x00_0008, Key::G4),
        (0x00_0010, Key::G5),
        (0x00_0020, Key::G6),
        (0x00_0040, Key::G7),
        (0x00_0080, Key::G8),
        (0x00_0100, Key::G9),
        (0x00_0200, Key::G10),
        (0x00_0400, Key::G11),
        (0x00_0800, Key::G12),
        (0x00_1000, Key::M1),
        (0x00_2000, Key::M2),
        (0x00_4000, Key::M3),
        (0x00_8000, Key::Mr),
        (0x08_0000, Key::Light),
    ],
    menu_marker: 0x80,
    menu: &[
        (0x01, Key::Settings),
        (0x02, Key::Back),
        (0x04, Key::Menu),
        (0x08, Key::Ok),
        (0x10, Key::Right),
        (0x20, Key::Left),
        (0x40, Key::Down),
        (0x80, Key::Up),
    ],
    multimedia_bitfield: 0x01,
    multimedia_mode_switch: 0x03,
    multimedia: &[
        (0x01, Key::Next),
        (0x02, Key::Prev),
        (0x04, Key::Stop),
        (0x08, Key::Play),
        (0x10, Key::Mute),
        (0x20, Key::ScrollUp),
        (0x40, Key::ScrollDown),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::KeyDomain;

    fn assert_table(table: &[(u32, Key)], domain: KeyDomain) {
        let mut union = 0u32;
        for &(mask, key) in table {
            assert_ne!(mask, 0, "{key} has an empty mask");
            assert_eq!(union & mask, 0, "{key} overlaps another mask");
            assert!(domain.keys().contains(&key), "{key} is outside {domain:?}");
            union |= mask;
        }
    }

    #[test]
    fn test_g19_tables_are_well_formed() {
        assert_table(G19.g_and_m, KeyDomain::GAndM);
        assert_table(G19.menu, KeyDomain::Menu);
        assert_table(G19.multimedia, KeyDomain::Multimedia);
        assert_eq!(G19.g_and_m.len(), KeyDomain::GAndM.keys().len());
    }

    #[test]
    fn test_empty_sentinel_is_not_a_key() {
        assert!(G19.g_and_m.iter().all(|(m, _)| m & G19.g_and_m_empty == 0));
    }
}
