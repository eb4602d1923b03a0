// CLI definitions using clap

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "g19d")]
#[command(author, version, about = "Logitech G19 special-key daemon")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file path (default: ~/.config/g19/g19d.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    pub log_level: String,

    /// Do not poll the multimedia key channel
    #[arg(long, global = true)]
    pub no_mm_keys: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the device and dispatch key events until Ctrl-C (default)
    Run,

    /// List HID interfaces of attached G19 devices
    #[command(visible_alias = "ls")]
    List,

    /// Decode one raw packet offline
    Decode {
        /// Channel the packet came from (mm, gm, menu)
        channel: String,
        /// Packet bytes in hex, e.g. "02 01 00 40"
        bytes: Vec<String>,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Also write it to the config file
        #[arg(long)]
        save: bool,
    },
}
