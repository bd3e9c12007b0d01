//! In-memory collaborators for the caseflow runtime
//!
//! This crate provides in-memory implementations of the case repository
//! and event bus interfaces defined in caseflow-core. It is primarily
//! useful for development, testing, and single-process deployments where
//! persistence is not required.

pub mod event_bus;
pub mod repositories;

pub use event_bus::InMemoryEventBus;
pub use repositories::InMemoryCaseRepository;

use std::sync::Arc;

use caseflow_core::{CaseRepository, EventBus, ProcessRegistry};

/// Provider wiring an in-memory repository and bus together
#[derive(Clone, Default)]
pub struct InMemoryProvider {
    cases: InMemoryCaseRepository,
    bus: InMemoryEventBus,
}

impl InMemoryProvider {
    /// Create a provider with empty storage
    pub fn new() -> Self {
        Self::default()
    }

    /// The case repository
    pub fn cases(&self) -> InMemoryCaseRepository {
        self.cases.clone()
    }

    /// The event bus
    pub fn bus(&self) -> InMemoryEventBus {
        self.bus.clone()
    }

    /// The case repository as a trait object
    pub fn case_repository(&self) -> Arc<dyn CaseRepository> {
        Arc::new(self.cases.clone())
    }

    /// The event bus as a trait object
    pub fn event_bus(&self) -> Arc<dyn EventBus> {
        Arc::new(self.bus.clone())
    }

    /// A process registry publishing through this provider's bus
    pub fn registry(&self) -> ProcessRegistry {
        ProcessRegistry::new(self.event_bus())
    }
}
