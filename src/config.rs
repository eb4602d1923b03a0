//! Driver configuration
//!
//! Stored as TOML, by default at `~/.config/g19/g19d.toml`. Keys in macro
//! bindings are written by name (`key = "G5"`).

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::bail;
use g19_keyboard::{Key, ReceiverConfig};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serialize a `Key` as its name string (e.g. `"G5"`, `"MR"`).
fn serialize_key<S: Serializer>(key: &Key, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(key.name())
}

fn deserialize_key<'de, D: Deserializer<'de>>(d: D) -> Result<Key, D::Error> {
    let name = String::deserialize(d)?;
    name.parse().map_err(serde::de::Error::custom)
}

/// Poll loop tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Sleep when no channel had data (ms)
    #[serde(default = "default_idle_sleep")]
    pub idle_sleep_ms: u64,
    /// Sleep after a transport fault (ms)
    #[serde(default = "default_error_sleep")]
    pub error_sleep_ms: u64,
    /// Consecutive transport faults before giving up on the device
    #[serde(default = "default_max_faults")]
    pub max_consecutive_faults: u32,
    /// Dispatch events even when no key changed
    #[serde(default)]
    pub dispatch_empty_events: bool,
}

fn default_idle_sleep() -> u64 {
    50
}
fn default_error_sleep() -> u64 {
    100
}
fn default_max_faults() -> u32 {
    5
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            idle_sleep_ms: default_idle_sleep(),
            error_sleep_ms: default_error_sleep(),
            max_consecutive_faults: default_max_faults(),
            dispatch_empty_events: false,
        }
    }
}

impl PollConfig {
    pub fn receiver_config(&self) -> ReceiverConfig {
        ReceiverConfig {
            idle_sleep: Duration::from_millis(self.idle_sleep_ms),
            error_sleep: Duration::from_millis(self.error_sleep_ms),
            max_consecutive_faults: self.max_consecutive_faults,
            dispatch_empty_events: self.dispatch_empty_events,
        }
    }
}

/// A shell command bound to a key in one memory bank
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroBinding {
    /// Memory bank 1-3 (M1-M3)
    #[serde(default = "default_bank")]
    pub bank: u8,
    #[serde(serialize_with = "serialize_key", deserialize_with = "deserialize_key")]
    pub key: Key,
    /// Run with `sh -c`
    pub command: String,
}

fn default_bank() -> u8 {
    1
}

/// Complete driver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriverConfig {
    /// Poll the multimedia key channel
    #[serde(default = "default_true")]
    pub enable_mm_keys: bool,
    #[serde(default)]
    pub poll: PollConfig,
    #[serde(default)]
    pub macros: Vec<MacroBinding>,
}

fn default_true() -> bool {
    true
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            enable_mm_keys: true,
            poll: PollConfig::default(),
            macros: Vec::new(),
        }
    }
}

impl DriverConfig {
    /// Get the default config file path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("g19")
            .join("g19d.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: DriverConfig = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to a file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject bindings no key press can ever trigger
    pub fn validate(&self) -> anyhow::Result<()> {
        for binding in &self.macros {
            if !(1..=3).contains(&binding.bank) {
                bail!(
                    "macro for {} uses bank {}, expected 1-3",
                    binding.key,
                    binding.bank
                );
            }
            if binding.key.memory_bank().is_some() {
                bail!("{} selects a memory bank and cannot carry a macro", binding.key);
            }
        }
        Ok(())
    }
}
