use std::sync::Arc;
use async_trait::async_trait;
use dashmap::DashMap;
use tracing::{debug, trace};

use caseflow_core::{CoreError, Event, EventBus, EventHandler, EventName, SubscriptionHandle};
use caseflow_monitoring::LogExt;

type Subscribers = Vec<(SubscriptionHandle, Arc<dyn EventHandler>)>;

/// In-process event bus.
///
/// Delivery is synchronous with `publish`: handlers run one after another
/// in subscription order and the first handler error is returned.
#[derive(Clone, Default)]
pub struct InMemoryEventBus {
    subscribers: Arc<DashMap<EventName, Subscribers>>,
}

impl InMemoryEventBus {
    /// Create a bus with no subscribers
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handlers subscribed to an event name
    pub fn subscriber_count(&self, event: &EventName) -> usize {
        self.subscribers
            .get(event)
            .map(|subs| subs.len())
            .unwrap_or(0)
    }

    /// Total number of subscriptions across all event names
    pub fn total_subscriptions(&self) -> usize {
        self.subscribers.iter().map(|entry| entry.value().len()).sum()
    }
}

#[async_trait]
impl EventBus for InMemoryEventBus {
    async fn subscribe(
        &self,
        event: &EventName,
        handler: Arc<dyn EventHandler>,
    ) -> Result<SubscriptionHandle, CoreError> {
        let handle = SubscriptionHandle::new(event.clone());
        self.subscribers
            .entry(event.clone())
            .or_default()
            .push((handle.clone(), handler));

        debug!(event = %event, subscription = %handle.id, "Subscribed");
        Ok(handle)
    }

    async fn unsubscribe(&self, handle: &SubscriptionHandle) -> Result<(), CoreError> {
        let now_empty = match self.subscribers.get_mut(&handle.event) {
            Some(mut subs) => {
                subs.retain(|(h, _)| h.id != handle.id);
                subs.is_empty()
            }
            None => false,
        };
        if now_empty {
            self.subscribers.remove_if(&handle.event, |_, subs| subs.is_empty());
        }

        debug!(event = %handle.event, subscription = %handle.id, "Unsubscribed");
        Ok(())
    }

    async fn publish(&self, event: Event) -> Result<(), CoreError> {
        // Snapshot so no map guard is held while handlers run
        let handlers: Vec<Arc<dyn EventHandler>> = self
            .subscribers
            .get(&event.name)
            .map(|subs| subs.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default();

        if handlers.is_empty() {
            trace!(event = %event.name, "No subscribers for event");
            return Ok(());
        }

        for handler in handlers {
            handler
                .handle(&event)
                .await
                .log_err(&format!("Handler for {} failed", event.name))?;
        }
        Ok(())
    }
}
