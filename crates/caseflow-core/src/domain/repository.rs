//! Collaborator interfaces for the caseflow runtime
//!
//! Case persistence and event delivery live outside this crate. External
//! crates implement these traits to plug in a store or a message bus.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use super::case::{Case, CaseId};
use super::event::{Event, EventName};
use crate::CoreError;

/// Repository for cases.
///
/// The runtime issues a plain read-modify-write per case. Implementations
/// are responsible for serialising concurrent writes to the same case.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaseRepository: Send + Sync {
    /// Cases the event applies to, resolved from the event's target
    async fn for_event(&self, event: &Event) -> Result<Vec<Case>, CoreError>;

    /// Find a case by ID
    async fn find_by_id(&self, id: &CaseId) -> Result<Option<Case>, CoreError>;

    /// Save a case
    async fn save(&self, case: &Case) -> Result<(), CoreError>;
}

/// Receives events from the bus
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handle a delivered event
    async fn handle(&self, event: &Event) -> Result<(), CoreError>;
}

/// Value object: handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubscriptionHandle {
    /// Unique identifier of the subscription
    pub id: Uuid,

    /// Event the subscription listens for
    pub event: EventName,
}

impl SubscriptionHandle {
    /// Create a fresh handle for an event
    pub fn new(event: EventName) -> Self {
        Self {
            id: Uuid::new_v4(),
            event,
        }
    }
}

/// Publish/subscribe transport delivering named events
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Register a handler for an event name
    async fn subscribe(
        &self,
        event: &EventName,
        handler: Arc<dyn EventHandler>,
    ) -> Result<SubscriptionHandle, CoreError>;

    /// Remove a subscription; unknown handles are ignored
    async fn unsubscribe(&self, handle: &SubscriptionHandle) -> Result<(), CoreError>;

    /// Deliver an event to every handler subscribed to its name
    async fn publish(&self, event: Event) -> Result<(), CoreError>;
}
