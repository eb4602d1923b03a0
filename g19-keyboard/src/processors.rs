//! Stock input processors.

use std::sync::atomic::{AtomicU8, Ordering};

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::registry::InputProcessor;
use crate::state::InputEvent;

/// Broadcast channel capacity for input events
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Logs every event; never consumes
#[derive(Debug, Default)]
pub struct LoggingProcessor;

impl InputProcessor for LoggingProcessor {
    fn consumes(&self, event: &InputEvent) -> bool {
        debug!(
            "keys down {:?}, up {:?}, held {:?}",
            event.keys_down,
            event.keys_up,
            event.new_state.keys_down()
        );
        false
    }
}

/// Forwards a copy of every event to async subscribers; never consumes.
///
/// Events sent while nobody is subscribed are dropped.
pub struct BroadcastProcessor {
    tx: broadcast::Sender<InputEvent>,
}

impl Default for BroadcastProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadcastProcessor {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<InputEvent> {
        self.tx.subscribe()
    }
}

impl InputProcessor for BroadcastProcessor {
    fn consumes(&self, event: &InputEvent) -> bool {
        // Ignores if no receivers
        let _ = self.tx.send(event.clone());
        false
    }
}

type BankListener = Box<dyn Fn(u8) + Send + Sync>;

/// Tracks the active macro memory bank (M1-M3).
///
/// Pressing M1, M2 or M3 selects bank 1, 2 or 3. Events whose only new
/// presses are bank keys are consumed; anything else passes through.
pub struct MemoryBankProcessor {
    bank: AtomicU8,
    listeners: Mutex<Vec<BankListener>>,
}

impl Default for MemoryBankProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBankProcessor {
    pub fn new() -> Self {
        Self {
            bank: AtomicU8::new(1),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Active bank, 1-3
    pub fn current_bank(&self) -> u8 {
        self.bank.load(Ordering::SeqCst)
    }

    /// Call `listener` with the new bank whenever it changes
    pub fn on_bank_changed<F>(&self, listener: F)
    where
        F: Fn(u8) + Send + Sync + 'static,
    {
        self.listeners.lock().push(Box::new(listener));
    }

    fn select(&self, bank: u8) {
        let previous = self.bank.swap(bank, Ordering::SeqCst);
        if previous != bank {
            info!("Memory bank M{} selected", bank);
            for listener in self.listeners.lock().iter() {
                listener(bank);
            }
        }
    }
}

impl InputProcessor for MemoryBankProcessor {
    fn consumes(&self, event: &InputEvent) -> bool {
        let mut only_banks = !event.keys_down.is_empty();
        for key in &event.keys_down {
            match key.memory_bank() {
                Some(bank) => self.select(bank),
                None => only_banks = false,
            }
        }
        only_banks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::G19;
    use crate::keys::{Key, KeyDomain, KeySet};
    use crate::state::KeyTracker;
    use std::sync::Arc;

    fn press(tracker: &mut KeyTracker, keys: &[Key]) -> InputEvent {
        tracker.update(KeyDomain::GAndM, &keys.iter().copied().collect::<KeySet>())
    }

    #[test]
    fn test_bank_selection() {
        let banks = MemoryBankProcessor::new();
        let mut tracker = KeyTracker::new(G19);
        assert_eq!(banks.current_bank(), 1);

        assert!(banks.consumes(&press(&mut tracker, &[Key::M3])));
        assert_eq!(banks.current_bank(), 3);

        // Release of M3 is not a selection
        assert!(!banks.consumes(&press(&mut tracker, &[])));
        assert_eq!(banks.current_bank(), 3);
    }

    #[test]
    fn test_mixed_press_passes_through() {
        let banks = MemoryBankProcessor::new();
        let mut tracker = KeyTracker::new(G19);
        assert!(!banks.consumes(&press(&mut tracker, &[Key::M2, Key::G4])));
        assert_eq!(banks.current_bank(), 2);
    }

    #[test]
    fn test_bank_listeners() {
        let banks = MemoryBankProcessor::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        banks.on_bank_changed(move |bank| seen_clone.lock().push(bank));

        let mut tracker = KeyTracker::new(G19);
        banks.consumes(&press(&mut tracker, &[Key::M2]));
        banks.consumes(&press(&mut tracker, &[]));
        banks.consumes(&press(&mut tracker, &[Key::M2]));
        banks.consumes(&press(&mut tracker, &[]));
        banks.consumes(&press(&mut tracker, &[Key::M1]));
        assert_eq!(*seen.lock(), vec![2, 1]);
    }

    #[test]
    fn test_logging_never_consumes() {
        let mut tracker = KeyTracker::new(G19);
        assert!(!LoggingProcessor.consumes(&press(&mut tracker, &[Key::G1])));
    }

    #[tokio::test]
    async fn test_broadcast_forwards_events() {
        let processor = BroadcastProcessor::new();
        let mut rx = processor.subscribe();
        let mut tracker = KeyTracker::new(G19);

        assert!(!processor.consumes(&press(&mut tracker, &[Key::G7])));
        let event = rx.recv().await.unwrap();
        assert!(event.pressed(Key::G7));
    }
}
