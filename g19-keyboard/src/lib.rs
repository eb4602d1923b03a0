//! Special-key input for the Logitech G19
//!
//! Turns the raw G/M, menu and multimedia key reports into edge-triggered
//! [`InputEvent`]s and hands them to registered [`InputProcessor`]s:
//!
//! raw report → [`decoder`] → [`KeyTracker`] (per-domain diff) →
//! [`ProcessorRegistry`] → processors

pub mod decoder;
pub mod error;
pub mod keymap;
pub mod keys;
pub mod processors;
pub mod receiver;
pub mod registry;
pub mod state;

pub use decoder::{decode, Decoded};
pub use error::{DecodeError, ReceiverError};
pub use keymap::{KeyMap, G19};
pub use keys::{Key, KeyDomain, KeySet};
pub use processors::{BroadcastProcessor, LoggingProcessor, MemoryBankProcessor};
pub use receiver::{ChannelRead, Receiver, ReceiverConfig, ReceiverHandle};
pub use registry::{InputProcessor, ProcessorRegistry, SharedProcessor};
pub use state::{InputEvent, KeyTracker, KeyboardState};

// Re-export transport types used in this crate's public API
pub use g19_transport::{Channel, KeyTransport, RawPacket, TransportError};
