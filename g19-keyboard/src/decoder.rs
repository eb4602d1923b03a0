//! Packet decoding: raw report bytes to the set of keys it marks as down.
//!
//! Report layouts (G19):
//! - G/M:        `[0x02, b1, b2, b3]`, 24-bit field `b3<<16 | b2<<8 | b1`,
//!   bit `0x400000` always set
//! - Menu:       `[bits, 0x80]`, `bits == 0` means nothing pressed
//! - Multimedia: `[0x01, bits]` for media keys, `[0x03, 0|1]` for the
//!   Win-key switch

use g19_transport::{Channel, RawPacket};

use crate::error::DecodeError;
use crate::keymap::KeyMap;
use crate::keys::{Key, KeyDomain, KeySet};

/// Keys a packet reports as down, and the universe it reports over
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub keys: KeySet,
    pub domain: KeyDomain,
}

impl Decoded {
    fn new(keys: KeySet, domain: KeyDomain) -> Self {
        Self { keys, domain }
    }
}

/// Strip known masks off `value` until only `empty` is left.
///
/// Every pass walks the whole table in order, clearing each mask that is
/// fully present. A pass that clears nothing while `value != empty` means the
/// remaining bits belong to no key; those bits are returned as the error.
fn match_masks(mut value: u32, empty: u32, table: &[(u32, Key)]) -> Result<KeySet, u32> {
    let mut keys = KeySet::new();
    while value != empty {
        let mut found = false;
        for &(mask, key) in table {
            if value & mask == mask {
                value ^= mask;
                keys.insert(key);
                found = true;
            }
        }
        if !found {
            return Err(value);
        }
    }
    Ok(keys)
}

/// Decode a G/M key report
pub fn decode_g_and_m(map: &KeyMap, packet: &[u8]) -> Result<Decoded, DecodeError> {
    if packet.len() != 4 {
        return Err(DecodeError::WrongLength {
            channel: Channel::GAndM,
            expected: 4,
            packet: packet.to_vec(),
        });
    }
    if packet[0] != map.g_and_m_marker {
        return Err(DecodeError::BadMarker {
            channel: Channel::GAndM,
            packet: packet.to_vec(),
        });
    }

    let value = (packet[3] as u32) << 16 | (packet[2] as u32) << 8 | packet[1] as u32;
    let keys = match_masks(value, map.g_and_m_empty, map.g_and_m).map_err(|remainder| {
        DecodeError::UnmappedBits {
            channel: Channel::GAndM,
            remainder,
            packet: packet.to_vec(),
        }
    })?;
    Ok(Decoded::new(keys, KeyDomain::GAndM))
}

/// Decode an LCD menu key report
pub fn decode_menu(map: &KeyMap, packet: &[u8]) -> Result<Decoded, DecodeError> {
    if packet.len() != 2 {
        return Err(DecodeError::WrongLength {
            channel: Channel::DisplayMenu,
            expected: 2,
            packet: packet.to_vec(),
        });
    }
    if packet[1] != map.menu_marker {
        return Err(DecodeError::BadMarker {
            channel: Channel::DisplayMenu,
            packet: packet.to_vec(),
        });
    }

    // Zero is release of all menu keys
    let keys = match_masks(packet[0] as u32, 0, map.menu).map_err(|remainder| {
        DecodeError::UnmappedBits {
            channel: Channel::DisplayMenu,
            remainder,
            packet: packet.to_vec(),
        }
    })?;
    Ok(Decoded::new(keys, KeyDomain::Menu))
}

/// Decode a multimedia report of either sub-kind
pub fn decode_multimedia(map: &KeyMap, packet: &[u8]) -> Result<Decoded, DecodeError> {
    if packet.len() != 2 {
        return Err(DecodeError::WrongLength {
            channel: Channel::Multimedia,
            expected: 2,
            packet: packet.to_vec(),
        });
    }

    match packet[0] {
        kind if kind == map.multimedia_bitfield => decode_multimedia_bits(map, packet),
        kind if kind == map.multimedia_mode_switch => decode_mode_switch(map, packet),
        kind => Err(DecodeError::UnknownSubKind {
            kind,
            packet: packet.to_vec(),
        }),
    }
}

/// Decode the bit-field sub-kind of a multimedia report
pub fn decode_multimedia_bits(map: &KeyMap, packet: &[u8]) -> Result<Decoded, DecodeError> {
    if packet.len() != 2 || packet[0] != map.multimedia_bitfield {
        return Err(DecodeError::BadMarker {
            channel: Channel::Multimedia,
            packet: packet.to_vec(),
        });
    }

    let keys = match_masks(packet[1] as u32, 0, map.multimedia).map_err(|remainder| {
        DecodeError::UnmappedBits {
            channel: Channel::Multimedia,
            remainder,
            packet: packet.to_vec(),
        }
    })?;
    Ok(Decoded::new(keys, KeyDomain::Multimedia))
}

/// Decode the Win-key switch sub-kind of a multimedia report
pub fn decode_mode_switch(map: &KeyMap, packet: &[u8]) -> Result<Decoded, DecodeError> {
    let switch = map.multimedia_mode_switch;
    let keys = match packet {
        [kind, 0x01] if *kind == switch => KeySet::from([Key::WinkeySwitch]),
        [kind, 0x00] if *kind == switch => KeySet::new(),
        _ => {
            return Err(DecodeError::UnknownModeSwitch {
                packet: packet.to_vec(),
            })
        }
    };
    Ok(Decoded::new(keys, KeyDomain::ModeSwitch))
}

/// Decode a packet from any channel
pub fn decode(map: &KeyMap, channel: Channel, packet: &[u8]) -> Result<Decoded, DecodeError> {
    match channel {
        Channel::Multimedia => decode_multimedia(map, packet),
        Channel::GAndM => decode_g_and_m(map, packet),
        Channel::DisplayMenu => decode_menu(map, packet),
    }
}

/// Parse a hex byte string such as `"02 01 00 40"`, `"2 1 0 40"` or `"02010040"`.
///
/// Separated tokens are one byte each. A single unseparated token is read
/// as consecutive digit pairs.
pub fn parse_hex_packet(s: &str) -> Result<RawPacket, String> {
    let tokens: Vec<&str> = s
        .split(|c: char| c.is_whitespace() || c == ',' || c == ':')
        .filter(|t| !t.is_empty())
        .map(strip_hex_prefix)
        .collect();

    match tokens.as_slice() {
        [] => Err(format!("no hex bytes in \"{s}\"")),
        [digits] => {
            let digits = *digits;
            if digits.len() % 2 != 0 {
                return Err(format!("expected an even number of hex digits: \"{s}\""));
            }
            (0..digits.len())
                .step_by(2)
                .map(|i| parse_hex_byte(digits.get(i..i + 2).unwrap_or(digits)))
                .collect()
        }
        _ => tokens
            .iter()
            .map(|token| {
                if token.len() > 2 {
                    return Err(format!("\"{token}\" does not fit in one byte"));
                }
                parse_hex_byte(token)
            })
            .collect(),
    }
}

fn strip_hex_prefix(token: &str) -> &str {
    token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token)
}

fn parse_hex_byte(digits: &str) -> Result<u8, String> {
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("invalid hex byte \"{digits}\""));
    }
    u8::from_str_radix(digits, 16).map_err(|e| format!("invalid hex byte \"{digits}\": {e}"))
}
