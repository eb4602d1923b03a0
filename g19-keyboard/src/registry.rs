//! Ordered, thread-safe list of input event consumers.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::state::InputEvent;

/// Consumer of input events.
///
/// Must return quickly: it runs on the poll thread. Anything slow belongs
/// on another thread.
pub trait InputProcessor: Send + Sync {
    /// Handle `event`. Return `true` if the event was consumed, which stops
    /// it from reaching processors registered later.
    fn consumes(&self, event: &InputEvent) -> bool;
}

impl<F> InputProcessor for F
where
    F: Fn(&InputEvent) -> bool + Send + Sync,
{
    fn consumes(&self, event: &InputEvent) -> bool {
        self(event)
    }
}

/// Shared handle to a registered processor
pub type SharedProcessor = Arc<dyn InputProcessor>;

/// Registration-ordered processor list.
///
/// Cloning gives another handle to the same list. Dispatch works on a copy
/// taken under the lock, so processors may register or unregister (even from
/// inside `consumes`) without disturbing an event already in flight; the
/// change shows from the next event on.
#[derive(Clone, Default)]
pub struct ProcessorRegistry {
    processors: Arc<Mutex<Vec<SharedProcessor>>>,
}

impl ProcessorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a processor; it gets the event after everything registered before it
    pub fn register(&self, processor: SharedProcessor) {
        self.processors.lock().push(processor);
    }

    /// Remove a processor by identity. Returns whether it was registered.
    pub fn unregister(&self, processor: &SharedProcessor) -> bool {
        let target = Arc::as_ptr(processor) as *const ();
        let mut processors = self.processors.lock();
        match processors
            .iter()
            .position(|p| Arc::as_ptr(p) as *const () == target)
        {
            Some(idx) => {
                processors.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Copy of the current list, in registration order
    pub fn snapshot(&self) -> Vec<SharedProcessor> {
        self.processors.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.processors.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.processors.lock().is_empty()
    }

    /// Offer `event` to each processor in order until one consumes it.
    ///
    /// Returns the position of the consuming processor, if any.
    pub fn dispatch(&self, event: &InputEvent) -> Option<usize> {
        dispatch_to(&self.snapshot(), event)
    }
}

/// First-responder dispatch over an already taken snapshot
pub fn dispatch_to(processors: &[SharedProcessor], event: &InputEvent) -> Option<usize> {
    processors.iter().position(|p| p.consumes(event))
}
