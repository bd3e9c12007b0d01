use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use async_trait::async_trait;

use caseflow_core::{Case, CaseId, CaseRepository, CoreError, Event, ProcessName};

/// In-memory implementation of the CaseRepository
#[derive(Clone, Default)]
pub struct InMemoryCaseRepository {
    cases: Arc<RwLock<HashMap<String, Case>>>,
}

impl InMemoryCaseRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository over shared storage
    pub fn with_storage(cases: Arc<RwLock<HashMap<String, Case>>>) -> Self {
        Self { cases }
    }

    /// All cases of a process, oldest first
    pub async fn list_for_process(&self, process: &ProcessName) -> Vec<Case> {
        let cases = self.cases.read().await;
        let mut result: Vec<Case> = cases
            .values()
            .filter(|case| &case.process == process)
            .cloned()
            .collect();
        result.sort_by_key(|case| case.created_at);
        result
    }

    /// Number of stored cases
    pub async fn len(&self) -> usize {
        self.cases.read().await.len()
    }

    /// Whether the repository is empty
    pub async fn is_empty(&self) -> bool {
        self.cases.read().await.is_empty()
    }
}

#[async_trait]
impl CaseRepository for InMemoryCaseRepository {
    async fn for_event(&self, event: &Event) -> Result<Vec<Case>, CoreError> {
        let cases = self.cases.read().await;
        let mut matching: Vec<Case> = cases
            .values()
            .filter(|case| case.matches(&event.target))
            .cloned()
            .collect();
        matching.sort_by_key(|case| case.created_at);

        debug!(
            event = %event.name,
            target = %event.target,
            matches = matching.len(),
            "Resolved cases for event"
        );
        Ok(matching)
    }

    async fn find_by_id(&self, id: &CaseId) -> Result<Option<Case>, CoreError> {
        let cases = self.cases.read().await;
        Ok(cases.get(id.as_str()).cloned())
    }

    async fn save(&self, case: &Case) -> Result<(), CoreError> {
        let mut cases = self.cases.write().await;
        cases.insert(case.id.0.clone(), case.clone());
        Ok(())
    }
}
