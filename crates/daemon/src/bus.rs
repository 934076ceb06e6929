// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Typed topic event bus: a single internal pub-sub, fed by the effect
//! interpreter and drained by every log/output stream subscriber. Slow
//! subscribers are decoupled with a bounded queue per subscriber;
//! overflow drops the oldest entries rather than blocking the producer.

use herdctl_core::event::{Event, SubscriberDroppedEvent};
use herdctl_engine::EventSink;
use tokio::sync::broadcast;

const SUBSCRIBER_QUEUE_CAPACITY: usize = 1024;

/// Publishing end of the bus. Cloning is cheap; every clone publishes to
/// the same set of subscribers.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<Event>,
}

/// One subscriber's view of the bus. Wraps [`broadcast::Receiver`] so a
/// lagging subscriber observes a `subscriber:dropped` event instead of a
/// raw `Lagged` error.
pub struct Subscription {
    rx: broadcast::Receiver<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(SUBSCRIBER_QUEUE_CAPACITY);
        Self { tx }
    }

    pub fn publish(&self, event: Event) {
        // No subscribers is not an error; the event is simply unheard.
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> Subscription {
        Subscription { rx: self.tx.subscribe() }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for EventBus {
    fn publish(&self, event: Event) {
        EventBus::publish(self, event)
    }
}

impl Subscription {
    /// Wait for the next event, surfacing a dropped-count as a
    /// `subscriber:dropped` event rather than an error when this
    /// subscriber fell behind and the bus recycled its backlog.
    pub async fn recv(&mut self) -> Option<Event> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    return Some(Event::SubscriberDropped(SubscriberDroppedEvent {
                        at: chrono::Utc::now(),
                        topic: "*".to_string(),
                        dropped_count: n,
                    }));
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

#[cfg(test)]
#[path = "bus_tests.rs"]
mod tests;
