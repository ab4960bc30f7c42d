//! Synchronous event bus for render-pass events.
//!
//! Listeners are subscribed explicitly and receive every event whose name they
//! declared. Delivery is inline: `dispatch` returns only after each interested
//! listener has handled the event, and the first handler error aborts the
//! remaining deliveries and propagates to the caller.
//!
//! Two seams keep producers and consumers decoupled:
//!   - [`EventDispatcher`]: "emit this event", injected into producers
//!   - [`EventListener`]: "these are my event names, hand me matching events"

use crate::types::{Result, SubscriptionId};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// =============================================================================
// Message Types
// =============================================================================

/// Named event carrying its target subject.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    pub subject: Value,
    pub data: Option<Value>,
    pub timestamp_ms: i64,
}

impl Event {
    pub fn new(name: impl Into<String>, subject: Value) -> Self {
        Self {
            name: name.into(),
            subject,
            data: None,
            timestamp_ms: Utc::now().timestamp_millis(),
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

// =============================================================================
// Seams
// =============================================================================

/// Emission side of the bus.
pub trait EventDispatcher {
    /// Deliver an event; returns how many listeners handled it.
    fn dispatch(&self, event: Event) -> Result<usize>;
}

/// Subscription side of the bus.
pub trait EventListener: Send + Sync {
    /// Event names this listener wants, in delivery-registration order.
    fn implemented_events(&self) -> Vec<String>;

    /// Handle one delivered event.
    fn handle_event(&self, event: &Event) -> Result<()>;
}

// =============================================================================
// Subscriber Management
// =============================================================================

struct Subscriber {
    id: SubscriptionId,
    listener: Arc<dyn EventListener>,
}

impl fmt::Debug for Subscriber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber").field("id", &self.id).finish()
    }
}

/// Subscription receipt for managing subscriptions.
#[derive(Debug, Clone)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub event_names: Vec<String>,
}

/// Statistics about bus usage.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusStats {
    pub events_dispatched: u64,
    pub active_subscriptions: usize,
    pub registered_handlers: usize,
}

// =============================================================================
// EventBus - In-Memory Synchronous Bus
// =============================================================================

/// In-memory event bus with explicit subscription and inline delivery.
#[derive(Debug, Default)]
pub struct EventBus {
    /// event name -> subscribers in subscription order
    subscribers: HashMap<String, Vec<Subscriber>>,

    events_dispatched: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for each of its implemented events.
    ///
    /// Subscribing the same listener twice registers it twice; each call
    /// returns its own receipt.
    pub fn subscribe(&mut self, listener: Arc<dyn EventListener>) -> Subscription {
        let id = SubscriptionId::new();
        let event_names = listener.implemented_events();

        for name in &event_names {
            self.subscribers
                .entry(name.clone())
                .or_default()
                .push(Subscriber {
                    id: id.clone(),
                    listener: Arc::clone(&listener),
                });
        }

        tracing::debug!("Subscription {} registered for events: {:?}", id, event_names);

        Subscription { id, event_names }
    }

    /// Remove one subscription; other subscriptions of the same listener stay.
    pub fn unsubscribe(&mut self, subscription: &Subscription) {
        for name in &subscription.event_names {
            if let Some(subs) = self.subscribers.get_mut(name) {
                subs.retain(|s| s.id != subscription.id);
                if subs.is_empty() {
                    self.subscribers.remove(name);
                }
            }
        }

        tracing::debug!("Unsubscribed: {}", subscription.id);
    }

    /// Number of listeners registered for an event name.
    pub fn listener_count(&self, name: &str) -> usize {
        self.subscribers.get(name).map_or(0, Vec::len)
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    pub fn stats(&self) -> BusStats {
        let active: HashSet<&SubscriptionId> = self
            .subscribers
            .values()
            .flat_map(|subs| subs.iter().map(|s| &s.id))
            .collect();

        BusStats {
            events_dispatched: self.events_dispatched.load(Ordering::Relaxed),
            active_subscriptions: active.len(),
            registered_handlers: self.subscribers.values().map(Vec::len).sum(),
        }
    }

    /// Reset statistics counters.
    pub fn reset_stats(&self) {
        self.events_dispatched.store(0, Ordering::Relaxed);
    }
}

impl EventDispatcher for EventBus {
    fn dispatch(&self, event: Event) -> Result<usize> {
        self.events_dispatched.fetch_add(1, Ordering::Relaxed);

        let interested = self
            .subscribers
            .get(&event.name)
            .map(|subs| subs.as_slice())
            .unwrap_or(&[]);

        let mut delivered = 0;
        for subscriber in interested {
            subscriber.listener.handle_event(&event)?;
            delivered += 1;
        }

        tracing::debug!(
            "Dispatched event name={} to {} listeners",
            event.name,
            delivered
        );

        Ok(delivered)
    }
}

// =============================================================================
// Tests
// =============================================================================
