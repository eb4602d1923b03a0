//! Keyboard input error types

use g19_transport::{Channel, RawPacket, TransportError};
use thiserror::Error;

/// A report that does not decode under the device's key map
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("not a {channel} key packet: expected {expected} bytes, got {packet:02X?}")]
    WrongLength {
        channel: Channel,
        expected: usize,
        packet: RawPacket,
    },

    #[error("not a {channel} key packet: bad marker byte in {packet:02X?}")]
    BadMarker { channel: Channel, packet: RawPacket },

    #[error("unknown multimedia packet kind 0x{kind:02X}: {packet:02X?}")]
    UnknownSubKind { kind: u8, packet: RawPacket },

    #[error("incorrect {channel} key packet: unmapped bits 0x{remainder:06X} in {packet:02X?}")]
    UnmappedBits {
        channel: Channel,
        remainder: u32,
        packet: RawPacket,
    },

    #[error("incorrect mode-switch packet: {packet:02X?}")]
    UnknownModeSwitch { packet: RawPacket },
}

impl DecodeError {
    /// Channel the offending packet arrived on
    pub fn channel(&self) -> Channel {
        match self {
            DecodeError::WrongLength { channel, .. }
            | DecodeError::BadMarker { channel, .. }
            | DecodeError::UnmappedBits { channel, .. } => *channel,
            DecodeError::UnknownSubKind { .. } | DecodeError::UnknownModeSwitch { .. } => {
                Channel::Multimedia
            }
        }
    }
}

/// Why a receiver's poll loop stopped
#[derive(Error, Debug)]
pub enum ReceiverError {
    /// The transport kept failing; the device is most likely gone
    #[error("Giving up after {count} consecutive transport faults, last: {last}")]
    TooManyFaults { count: u32, last: TransportError },

    /// The poll thread panicked
    #[error("Receiver thread panicked")]
    Panicked,
}
