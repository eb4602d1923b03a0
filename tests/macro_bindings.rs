//! Integration tests for macro bindings: config → processors → commands.

use std::sync::Arc;

use parking_lot::Mutex;

use g19_driver::config::DriverConfig;
use g19_driver::daemon::build_registry;
use g19_driver::MacroProcessor;
use g19_keyboard::{
    InputEvent, InputProcessor, Key, KeyDomain, KeySet, KeyTracker, MemoryBankProcessor, G19,
};

const CONFIG: &str = r#"
[[macros]]
key = "G1"
command = "echo bank1"

[[macros]]
bank = 2
key = "G1"
command = "echo bank2"

[[macros]]
bank = 2
key = "Play"
command = "echo play"
"#;

fn gm(tracker: &mut KeyTracker, keys: &[Key]) -> InputEvent {
    tracker.update(KeyDomain::GAndM, &keys.iter().copied().collect::<KeySet>())
}

type Launched = Arc<Mutex<Vec<String>>>;

fn processor(config: &DriverConfig) -> (MacroProcessor, Arc<MemoryBankProcessor>, Launched) {
    let banks = Arc::new(MemoryBankProcessor::new());
    let launched = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&launched);
    let macros = MacroProcessor::with_launcher(&config.macros, Arc::clone(&banks), move |cmd| {
        sink.lock().push(cmd.to_string())
    });
    (macros, banks, launched)
}

#[test]
fn macro_follows_active_bank() {
    let config: DriverConfig = toml::from_str(CONFIG).unwrap();
    let (macros, banks, launched) = processor(&config);
    let mut tracker = KeyTracker::new(G19);

    assert!(macros.consumes(&gm(&mut tracker, &[Key::G1])));
    assert!(!macros.consumes(&gm(&mut tracker, &[])));

    assert!(banks.consumes(&gm(&mut tracker, &[Key::M2])));
    gm(&mut tracker, &[]);
    assert!(macros.consumes(&gm(&mut tracker, &[Key::G1])));

    assert_eq!(*launched.lock(), vec!["echo bank1", "echo bank2"]);
}

#[test]
fn unbound_key_passes_through() {
    let config: DriverConfig = toml::from_str(CONFIG).unwrap();
    let (macros, _banks, launched) = processor(&config);
    let mut tracker = KeyTracker::new(G19);

    assert!(!macros.consumes(&gm(&mut tracker, &[Key::G2])));
    assert!(launched.lock().is_empty());
}

#[test]
fn holding_a_key_fires_once() {
    let config: DriverConfig = toml::from_str(CONFIG).unwrap();
    let (macros, _banks, launched) = processor(&config);
    let mut tracker = KeyTracker::new(G19);

    macros.consumes(&gm(&mut tracker, &[Key::G1]));
    macros.consumes(&gm(&mut tracker, &[Key::G1, Key::G3]));
    assert_eq!(launched.lock().len(), 1);
}

#[test]
fn registry_order_lets_subscribers_see_macro_presses() {
    let config: DriverConfig = toml::from_str(CONFIG).unwrap();
    let (registry, broadcast, _banks) = build_registry(&config);
    let mut rx = broadcast.subscribe();
    assert_eq!(registry.len(), 4);

    let mut tracker = KeyTracker::new(G19);
    // M3 is consumed by the bank processor, after the broadcast
    assert_eq!(registry.dispatch(&gm(&mut tracker, &[Key::M3])), Some(2));
    assert!(rx.try_recv().unwrap().pressed(Key::M3));
}

#[test]
fn empty_macro_list_registers_no_macro_processor() {
    let (registry, _broadcast, _banks) = build_registry(&DriverConfig::default());
    assert_eq!(registry.len(), 3);
}
