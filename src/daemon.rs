//! Daemon wiring: open the device, register processors, run until Ctrl-C.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use g19_keyboard::{
    BroadcastProcessor, LoggingProcessor, MemoryBankProcessor, ProcessorRegistry, Receiver, G19,
};
use g19_transport::HidKeyTransport;
use hidapi::HidApi;
use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::config::DriverConfig;
use crate::macros::MacroProcessor;

/// How often the daemon checks whether the receiver thread has died
const RECEIVER_CHECK_INTERVAL: Duration = Duration::from_millis(250);

/// Processors in dispatch order. The broadcast processor goes before the
/// consuming ones so subscribers see every event.
pub fn build_registry(
    config: &DriverConfig,
) -> (ProcessorRegistry, Arc<BroadcastProcessor>, Arc<MemoryBankProcessor>) {
    let registry = ProcessorRegistry::new();
    let bus = Arc::new(BroadcastProcessor::new());
    let banks = Arc::new(MemoryBankProcessor::new());
    let macros = MacroProcessor::new(&config.macros, Arc::clone(&banks));

    registry.register(Arc::new(LoggingProcessor));
    registry.register(bus.clone());
    registry.register(banks.clone());
    if !macros.is_empty() {
        info!("{} macro binding(s) loaded", macros.len());
        registry.register(Arc::new(macros));
    }
    (registry, bus, banks)
}

/// Run the key daemon (blocking until Ctrl-C or device loss).
pub async fn run(config: DriverConfig) -> anyhow::Result<()> {
    let api = HidApi::new().context("initialize hidapi")?;
    let transport = HidKeyTransport::open(&api, config.enable_mm_keys)?;

    let (registry, bus, banks) = build_registry(&config);
    banks.on_bank_changed(|bank| info!("Active macro bank: M{}", bank));
    let mut events = bus.subscribe();

    let handle = Receiver::new(
        Box::new(transport),
        G19,
        registry,
        config.poll.receiver_config(),
    )
    .spawn()
    .context("spawn receiver thread")?;
    info!("Ready. Ctrl+C to stop.");

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut check = tokio::time::interval(RECEIVER_CHECK_INTERVAL);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Stopping");
                handle.stop();
                break;
            }
            event = events.recv() => match event {
                Ok(event) => info!("down {:?} up {:?}", event.keys_down, event.keys_up),
                Err(broadcast::error::RecvError::Lagged(n)) => warn!("Missed {} events", n),
                Err(broadcast::error::RecvError::Closed) => break,
            },
            _ = check.tick() => {
                if handle.is_finished() {
                    break;
                }
            }
        }
    }

    tokio::task::spawn_blocking(move || handle.join()).await??;
    Ok(())
}
