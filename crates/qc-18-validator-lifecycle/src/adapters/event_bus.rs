//! Event Bus adapter
//!
//! Implements the EventBus port by recording every notice in order

use crate::domain::Address;
use crate::events::LifecycleEvent;
use crate::ports::EventBus;

/// In-memory event bus adapter
pub struct InMemoryEventBus {
    events: parking_lot::RwLock<Vec<LifecycleEvent>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self {
            events: parking_lot::RwLock::new(Vec::new()),
        }
    }

    pub fn get_events(&self) -> Vec<LifecycleEvent> {
        self.events.read().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events.read().len()
    }

    /// Take every recorded event, leaving the log empty
    pub fn drain(&self) -> Vec<LifecycleEvent> {
        std::mem::take(&mut *self.events.write())
    }

    /// Most recent `ValidatorSetUpdated` payload
    pub fn last_validator_set(&self) -> Option<Vec<Address>> {
        self.events.read().iter().rev().find_map(|e| match e {
            LifecycleEvent::ValidatorSetUpdated { validators } => Some(validators.clone()),
            _ => None,
        })
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus for InMemoryEventBus {
    fn publish(&self, event: LifecycleEvent) -> Result<(), String> {
        tracing::trace!(event = event.name(), "publishing lifecycle event");
        self.events.write().push(event);
        Ok(())
    }

    fn publish_batch(&self, events: Vec<LifecycleEvent>) -> Result<(), String> {
        tracing::trace!(count = events.len(), "publishing lifecycle event batch");
        self.events.write().extend(events);
        Ok(())
    }
}
