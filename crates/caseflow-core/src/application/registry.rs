use crate::{
    application::business_process::BusinessProcess,
    domain::process::{ProcessDefinition, ProcessName},
    domain::repository::{CaseRepository, EventBus},
    CoreError,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Owns the running processes of an application, keyed by name.
///
/// Defining a process under a name that is already taken stops the old
/// process's listeners before the new one starts listening.
pub struct ProcessRegistry {
    bus: Arc<dyn EventBus>,
    processes: RwLock<HashMap<ProcessName, Arc<BusinessProcess>>>,
}

impl ProcessRegistry {
    /// Create an empty registry publishing through the given bus
    pub fn new(bus: Arc<dyn EventBus>) -> Self {
        Self {
            bus,
            processes: RwLock::new(HashMap::new()),
        }
    }

    /// Define (or redefine) a process and start listening for its events.
    ///
    /// A previous process of the same name stays registered until its
    /// replacement is listening. If the replacement cannot start, the
    /// previous process resumes listening and the error is returned.
    pub async fn define(
        &self,
        definition: ProcessDefinition,
        cases: Arc<dyn CaseRepository>,
    ) -> Result<Arc<BusinessProcess>, CoreError> {
        let name = definition.name().clone();
        let mut processes = self.processes.write().await;

        let previous = processes.get(&name).cloned();
        if let Some(previous) = &previous {
            warn!(process = %name, "Redefining process, stopping previous definition");
            previous.stop_listening_for_events().await?;
        }

        let process = match BusinessProcess::define(definition, cases, self.bus.clone()).await {
            Ok(process) => process,
            Err(e) => {
                if let Some(previous) = &previous {
                    warn!(
                        process = %name,
                        error = %e,
                        "Redefinition failed, restoring previous definition"
                    );
                    if let Err(restart) = previous.start_listening_for_events().await {
                        warn!(
                            process = %name,
                            error = %restart,
                            "Previous definition could not resume listening"
                        );
                    }
                }
                return Err(e);
            }
        };

        processes.insert(name.clone(), process.clone());
        info!(process = %name, "Process defined");
        Ok(process)
    }

    /// Look up a running process
    pub async fn get(&self, name: &ProcessName) -> Option<Arc<BusinessProcess>> {
        self.processes.read().await.get(name).cloned()
    }

    /// Names of all defined processes, sorted
    pub async fn names(&self) -> Vec<ProcessName> {
        let mut names: Vec<_> = self.processes.read().await.keys().cloned().collect();
        names.sort();
        names
    }

    /// Stop listening and forget a process.
    ///
    /// A process whose listeners cannot all be dropped stays registered.
    pub async fn remove(&self, name: &ProcessName) -> Result<bool, CoreError> {
        let mut processes = self.processes.write().await;
        let Some(process) = processes.get(name).cloned() else {
            return Ok(false);
        };

        process.stop_listening_for_events().await?;
        processes.remove(name);
        Ok(true)
    }

    /// Stop every process; the first error is returned after all were attempted.
    ///
    /// Processes that failed to stop remain registered.
    pub async fn shutdown(&self) -> Result<(), CoreError> {
        let mut processes = self.processes.write().await;
        let mut first_error = None;
        let mut stopped = Vec::new();

        for (name, process) in processes.iter() {
            match process.stop_listening_for_events().await {
                Ok(()) => stopped.push(name.clone()),
                Err(e) => {
                    warn!(process = %name, error = %e, "Failed to stop process");
                    first_error.get_or_insert(e);
                }
            }
        }
        for name in stopped {
            processes.remove(&name);
        }

        info!(remaining = processes.len(), "Process registry shut down");
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
