//! Macro processor: run a shell command when a bound key is pressed.

use std::collections::HashMap;
use std::process::Command;
use std::sync::Arc;

use g19_keyboard::{InputEvent, InputProcessor, Key, MemoryBankProcessor};
use tracing::{debug, info, warn};

use crate::config::MacroBinding;

type Launcher = Box<dyn Fn(&str) + Send + Sync>;

/// Runs `command` with `sh -c` on a short-lived thread that reaps it
fn spawn_shell(command: &str) {
    let command = command.to_string();
    let spawned = std::thread::Builder::new()
        .name("g19-macro".into())
        .spawn(move || match Command::new("sh").arg("-c").arg(&command).status() {
            Ok(status) if status.success() => debug!("Macro `{}` finished", command),
            Ok(status) => warn!("Macro `{}` exited with {}", command, status),
            Err(e) => warn!("Failed to run macro `{}`: {}", command, e),
        });
    if let Err(e) = spawned {
        warn!("Failed to spawn macro thread: {}", e);
    }
}

/// Fires the command bound to each newly pressed key in the active bank.
///
/// Consumes events that fired at least one macro.
pub struct MacroProcessor {
    bindings: HashMap<(u8, Key), String>,
    banks: Arc<MemoryBankProcessor>,
    launcher: Launcher,
}

impl MacroProcessor {
    pub fn new(bindings: &[MacroBinding], banks: Arc<MemoryBankProcessor>) -> Self {
        Self::with_launcher(bindings, banks, spawn_shell)
    }

    /// Use `launcher` instead of the shell to run commands
    pub fn with_launcher<F>(
        bindings: &[MacroBinding],
        banks: Arc<MemoryBankProcessor>,
        launcher: F,
    ) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let bindings = bindings
            .iter()
            .map(|b| ((b.bank, b.key), b.command.clone()))
            .collect();
        Self {
            bindings,
            banks,
            launcher: Box::new(launcher),
        }
    }

    /// Command bound to `key` in `bank`
    pub fn binding(&self, bank: u8, key: Key) -> Option<&str> {
        self.bindings.get(&(bank, key)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl InputProcessor for MacroProcessor {
    fn consumes(&self, event: &InputEvent) -> bool {
        let bank = self.banks.current_bank();
        let mut fired = false;
        for key in &event.keys_down {
            if let Some(command) = self.binding(bank, *key) {
                info!("M{} {} -> `{}`", bank, key, command);
                (self.launcher)(command);
                fired = true;
            }
        }
        fired
    }
}
