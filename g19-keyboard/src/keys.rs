//! Logical key identifiers and the domains they belong to

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// One physical special key of the G19
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Key {
    // G/M keys
    Light,
    M1,
    M2,
    M3,
    Mr,
    G1,
    G2,
    G3,
    G4,
    G5,
    G6,
    G7,
    G8,
    G9,
    G10,
    G11,
    G12,
    // LCD menu keys
    Back,
    Down,
    Left,
    Menu,
    Ok,
    Right,
    Settings,
    Up,
    // Multimedia keys
    WinkeySwitch,
    Next,
    Prev,
    Stop,
    Play,
    Mute,
    ScrollUp,
    ScrollDown,
}

/// Set of keys; equality is by membership only
pub type KeySet = BTreeSet<Key>;

impl Key {
    pub const ALL: &'static [Key] = &[
        Key::Light,
        Key::M1,
        Key::M2,
        Key::M3,
        Key::Mr,
        Key::G1,
        Key::G2,
        Key::G3,
        Key::G4,
        Key::G5,
        Key::G6,
        Key::G7,
        Key::G8,
        Key::G9,
        Key::G10,
        Key::G11,
        Key::G12,
        Key::Back,
        Key::Down,
        Key::Left,
        Key::Menu,
        Key::Ok,
        Key::Right,
        Key::Settings,
        Key::Up,
        Key::WinkeySwitch,
        Key::Next,
        Key::Prev,
        Key::Stop,
        Key::Play,
        Key::Mute,
        Key::ScrollUp,
        Key::ScrollDown,
    ];

    /// Display name, also accepted by `FromStr`
    pub fn name(&self) -> &'static str {
        match self {
            Key::Light => "Light",
            Key::M1 => "M1",
            Key::M2 => "M2",
            Key::M3 => "M3",
            Key::Mr => "MR",
            Key::G1 => "G1",
            Key::G2 => "G2",
            Key::G3 => "G3",
            Key::G4 => "G4",
            Key::G5 => "G5",
            Key::G6 => "G6",
            Key::G7 => "G7",
            Key::G8 => "G8",
            Key::G9 => "G9",
            Key::G10 => "G10",
            Key::G11 => "G11",
            Key::G12 => "G12",
            Key::Back => "Back",
            Key::Down => "Down",
            Key::Left => "Left",
            Key::Menu => "Menu",
            Key::Ok => "OK",
            Key::Right => "Right",
            Key::Settings => "Settings",
            Key::Up => "Up",
            Key::WinkeySwitch => "WinkeySwitch",
            Key::Next => "Next",
            Key::Prev => "Prev",
            Key::Stop => "Stop",
            Key::Play => "Play",
            Key::Mute => "Mute",
            Key::ScrollUp => "ScrollUp",
            Key::ScrollDown => "ScrollDown",
        }
    }

    /// Macro bank index for M1-M3
    pub fn memory_bank(&self) -> Option<u8> {
        match self {
            Key::M1 => Some(1),
            Key::M2 => Some(2),
            Key::M3 => Some(3),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Key::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown key name: \"{s}\""))
    }
}

/// The fixed universe of keys one packet kind can report.
///
/// The state tracker only ever diffs within one domain, so a packet from one
/// channel never reads as a release of keys owned by another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyDomain {
    /// G1-G12, M1-M3, MR, Light
    GAndM,
    /// LCD menu keys
    Menu,
    /// Multimedia keys, excluding the Win-key switch
    Multimedia,
    /// The Win-key switch alone
    ModeSwitch,
}

const G_AND_M_KEYS: &[Key] = &[
    Key::G1,
    Key::G2,
    Key::G3,
    Key::G4,
    Key::G5,
    Key::G6,
    Key::G7,
    Key::G8,
    Key::G9,
    Key::G10,
    Key::G11,
    Key::G12,
    Key::Light,
    Key::M1,
    Key::M2,
    Key::M3,
    Key::Mr,
];

const MENU_KEYS: &[Key] = &[
    Key::Back,
    Key::Down,
    Key::Left,
    Key::Menu,
    Key::Ok,
    Key::Right,
    Key::Settings,
    Key::Up,
];

const MULTIMEDIA_KEYS: &[Key] = &[
    Key::Next,
    Key::Prev,
    Key::Stop,
    Key::Play,
    Key::Mute,
    Key::ScrollUp,
    Key::ScrollDown,
];

const MODE_SWITCH_KEYS: &[Key] = &[Key::WinkeySwitch];

impl KeyDomain {
    pub const ALL: &'static [KeyDomain] = &[
        KeyDomain::GAndM,
        KeyDomain::Menu,
        KeyDomain::Multimedia,
        KeyDomain::ModeSwitch,
    ];

    pub fn keys(&self) -> &'static [Key] {
        match self {
            KeyDomain::GAndM => G_AND_M_KEYS,
            KeyDomain::Menu => MENU_KEYS,
            KeyDomain::Multimedia => MULTIMEDIA_KEYS,
            KeyDomain::ModeSwitch => MODE_SWITCH_KEYS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domains_are_disjoint_and_complete() {
        let mut seen = KeySet::new();
        for domain in KeyDomain::ALL {
            for key in domain.keys() {
                assert!(seen.insert(*key), "{key} in more than one domain");
            }
        }
        assert_eq!(seen.len(), Key::ALL.len());
    }

    #[test]
    fn test_parse_key_names() {
        assert_eq!("G10".parse::<Key>().unwrap(), Key::G10);
        assert_eq!("mr".parse::<Key>().unwrap(), Key::Mr);
        assert_eq!("ok".parse::<Key>().unwrap(), Key::Ok);
        assert!("G13".parse::<Key>().is_err());
    }

    #[test]
    fn test_memory_bank() {
        assert_eq!(Key::M2.memory_bank(), Some(2));
        assert_eq!(Key::Mr.memory_bank(), None);
    }
}
