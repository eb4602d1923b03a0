//! Poll loop: read every channel, decode, track, dispatch.
//!
//! One dedicated thread owns the transport and the key state. Each pass
//! reads the multimedia (if enabled), G/M and menu channels once without
//! blocking. Decoded events go to the registered processors, first responder
//! wins. A pass that found no data on any channel sleeps briefly so the loop
//! does not spin.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use g19_transport::{BoxedTransport, Channel, TransportError};
use tracing::{debug, error, info, trace, warn};

use crate::error::{DecodeError, ReceiverError};
use crate::keymap::KeyMap;
use crate::registry::{dispatch_to, ProcessorRegistry, SharedProcessor};
use crate::state::{InputEvent, KeyTracker, KeyboardState};

/// Configuration for the receiver loop
#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    /// Sleep after a pass in which no channel had data
    pub idle_sleep: Duration,
    /// Sleep after a transport fault before retrying
    pub error_sleep: Duration,
    /// Consecutive faulty passes before the loop gives up (0 behaves as 1)
    pub max_consecutive_faults: u32,
    /// Also dispatch events in which no key changed
    pub dispatch_empty_events: bool,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            idle_sleep: Duration::from_millis(50),
            error_sleep: Duration::from_millis(100),
            max_consecutive_faults: 5,
            dispatch_empty_events: false,
        }
    }
}

/// Outcome of reading one channel once
#[derive(Debug)]
pub enum ChannelRead {
    /// No report queued
    Absent,
    /// Report had a shape this channel skips silently
    Ignored,
    /// Report decoded and applied to the key state
    Event(InputEvent),
    /// Report did not decode; key state untouched
    Malformed(DecodeError),
}

impl ChannelRead {
    /// Whether the channel produced anything at all
    pub fn got_data(&self) -> bool {
        !matches!(self, ChannelRead::Absent)
    }
}

/// Special-key receiver for one device
pub struct Receiver {
    transport: BoxedTransport,
    tracker: KeyTracker,
    registry: ProcessorRegistry,
    config: ReceiverConfig,
}

impl Receiver {
    pub fn new(
        transport: BoxedTransport,
        map: KeyMap,
        registry: ProcessorRegistry,
        config: ReceiverConfig,
    ) -> Self {
        Self {
            transport,
            tracker: KeyTracker::new(map),
            registry,
            config,
        }
    }

    /// Handle for registering processors from other threads
    pub fn registry(&self) -> ProcessorRegistry {
        self.registry.clone()
    }

    pub fn state(&self) -> &KeyboardState {
        self.tracker.state()
    }

    /// Read and decode one report from `channel`
    pub fn poll_channel(&mut self, channel: Channel) -> Result<ChannelRead, TransportError> {
        let Some(data) = self.transport.read_channel(channel)? else {
            return Ok(ChannelRead::Absent);
        };
        debug!("{} keys data {:02X?}", channel, data);

        Ok(match self.tracker.packet_received(channel, &data) {
            Ok(Some(event)) => ChannelRead::Event(event),
            Ok(None) => {
                info!("{} keys ignored", channel);
                ChannelRead::Ignored
            }
            Err(e) => {
                warn!("{}", e);
                ChannelRead::Malformed(e)
            }
        })
    }

    /// One pass over all channels. Returns whether any channel had data.
    pub fn poll_once(&mut self) -> Result<bool, TransportError> {
        let processors = self.registry.snapshot();
        let mut got_data = false;

        for &channel in Channel::ALL {
            if channel == Channel::Multimedia && !self.transport.enable_mm_keys() {
                continue;
            }
            let read = self.poll_channel(channel)?;
            got_data |= read.got_data();
            if let ChannelRead::Event(event) = read {
                self.dispatch(&processors, &event);
            }
        }

        Ok(got_data)
    }

    fn dispatch(&self, processors: &[SharedProcessor], event: &InputEvent) {
        if event.is_empty() && !self.config.dispatch_empty_events {
            trace!("Suppressing event without key changes");
            return;
        }
        if let Some(idx) = dispatch_to(processors, event) {
            trace!("Event consumed by processor {}", idx);
        }
    }

    /// Poll until `shutdown` is set or the transport keeps failing.
    ///
    /// The flag is checked at the top of every pass and while sleeping.
    /// Sleeps are cut short when the loop thread is unparked, which
    /// [`ReceiverHandle::stop`] does.
    pub fn run(mut self, shutdown: Arc<AtomicBool>) -> Result<(), ReceiverError> {
        info!("Receiver loop started for {}", self.tracker.key_map().name);
        let mut faults = 0u32;

        while !shutdown.load(Ordering::Relaxed) {
            match self.poll_once() {
                Ok(got_data) => {
                    faults = 0;
                    if !got_data {
                        pause(&shutdown, self.config.idle_sleep);
                    }
                }
                Err(e) => {
                    faults += 1;
                    warn!("Transport fault ({} in a row): {}", faults, e);
                    if faults >= self.config.max_consecutive_faults.max(1) {
                        error!("Stopping receiver: {}", e);
                        return Err(ReceiverError::TooManyFaults {
                            count: faults,
                            last: e,
                        });
                    }
                    pause(&shutdown, self.config.error_sleep);
                }
            }
        }

        debug!("Receiver loop exiting");
        Ok(())
    }

    /// Run the loop on a dedicated thread
    pub fn spawn(self) -> std::io::Result<ReceiverHandle> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = Arc::clone(&shutdown);
        let thread = std::thread::Builder::new()
            .name("g19-receiver".into())
            .spawn(move || self.run(shutdown_clone))?;
        Ok(ReceiverHandle {
            shutdown,
            thread: Some(thread),
        })
    }
}

/// Sleep for `duration` unless `shutdown` is set first
fn pause(shutdown: &AtomicBool, duration: Duration) {
    let deadline = Instant::now() + duration;
    while !shutdown.load(Ordering::Relaxed) {
        let remaining = deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            break;
        }
        std::thread::park_timeout(remaining);
    }
}

/// Owner's handle on a spawned receiver. Dropping it requests shutdown.
pub struct ReceiverHandle {
    shutdown: Arc<AtomicBool>,
    thread: Option<JoinHandle<Result<(), ReceiverError>>>,
}

impl ReceiverHandle {
    /// Ask the loop to stop after the current pass, waking it if asleep
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
        if let Some(thread) = &self.thread {
            thread.thread().unpark();
        }
    }

    /// Whether the loop has ended, by request or on its own
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, |t| t.is_finished())
    }

    /// Wait for the loop to end and return why it did
    pub fn join(mut self) -> Result<(), ReceiverError> {
        match self.thread.take() {
            Some(thread) => thread.join().map_err(|_| ReceiverError::Panicked)?,
            None => Ok(()),
        }
    }
}

impl Drop for ReceiverHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
