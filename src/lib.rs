// Logitech G19 special-key daemon - shared library
// Configuration, macro bindings and daemon wiring on top of g19-keyboard

pub mod config;
pub mod daemon;
pub mod macros;

pub use config::{DriverConfig, MacroBinding, PollConfig};
pub use macros::MacroProcessor;
