use crate::{
    domain::case::{Case, CaseId, TransitionOutcome},
    domain::event::{Event, EventName},
    domain::process::ProcessDefinition,
    domain::repository::{CaseRepository, EventBus, EventHandler, SubscriptionHandle},
    CoreError,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tokio::sync::Mutex;
use tracing::{debug, info, trace, warn};

/// What handling one event did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventOutcome {
    /// Case created by a start event
    pub created: Option<CaseId>,

    /// Transition result for every case the event applied to
    pub transitions: Vec<(CaseId, TransitionOutcome)>,
}

impl EventOutcome {
    /// Number of cases that changed step or closed
    pub fn changed(&self) -> usize {
        self.transitions
            .iter()
            .filter(|(_, outcome)| outcome.is_change())
            .count()
    }
}

#[derive(Default)]
struct Subscriptions {
    listening: bool,
    handles: HashMap<EventName, SubscriptionHandle>,
}

/// Runtime for one business process.
///
/// Owns the immutable definition plus the subscription table. The table
/// and listening flag sit behind one mutex so racing start/stop calls
/// never leave a half-registered listener set.
pub struct BusinessProcess {
    definition: Arc<ProcessDefinition>,
    cases: Arc<dyn CaseRepository>,
    bus: Arc<dyn EventBus>,
    subscriptions: Mutex<Subscriptions>,
}

impl std::fmt::Debug for BusinessProcess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusinessProcess")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

impl BusinessProcess {
    /// Create a process runtime that is not yet listening
    pub fn new(
        definition: ProcessDefinition,
        cases: Arc<dyn CaseRepository>,
        bus: Arc<dyn EventBus>,
    ) -> Arc<Self> {
        Arc::new(Self {
            definition: Arc::new(definition),
            cases,
            bus,
            subscriptions: Mutex::new(Subscriptions::default()),
        })
    }

    /// Create a process runtime and immediately start listening for its events
    pub async fn define(
        definition: ProcessDefinition,
        cases: Arc<dyn CaseRepository>,
        bus: Arc<dyn EventBus>,
    ) -> Result<Arc<Self>, CoreError> {
        let process = Self::new(definition, cases, bus);
        process.start_listening_for_events().await?;
        Ok(process)
    }

    /// The process definition
    pub fn definition(&self) -> &ProcessDefinition {
        &self.definition
    }

    /// Mermaid flowchart of the process
    pub fn to_diagram(&self) -> String {
        self.definition.to_diagram()
    }

    /// Subscribe one dispatcher to every event the process handles.
    ///
    /// No-op when already listening. If a subscription fails the ones made
    /// so far are rolled back and the error is returned.
    pub async fn start_listening_for_events(self: &Arc<Self>) -> Result<(), CoreError> {
        let mut subscriptions = self.subscriptions.lock().await;
        if subscriptions.listening {
            debug!(process = %self.definition.name(), "Already listening for events");
            return Ok(());
        }

        let dispatcher: Arc<dyn EventHandler> = Arc::new(Dispatcher {
            process: Arc::downgrade(self),
        });

        for event in self.definition.handled_events() {
            match self.bus.subscribe(&event, dispatcher.clone()).await {
                Ok(handle) => {
                    subscriptions.handles.insert(event, handle);
                }
                Err(e) => {
                    warn!(
                        process = %self.definition.name(),
                        event = %event,
                        error = %e,
                        "Subscription failed, rolling back"
                    );
                    for (_, handle) in subscriptions.handles.drain() {
                        if let Err(e) = self.bus.unsubscribe(&handle).await {
                            warn!(event = %handle.event, error = %e, "Rollback unsubscribe failed");
                        }
                    }
                    return Err(e);
                }
            }
        }

        subscriptions.listening = true;
        info!(
            process = %self.definition.name(),
            events = subscriptions.handles.len(),
            "Listening for events"
        );
        Ok(())
    }

    /// Drop every subscription. Safe to call when not listening.
    ///
    /// All handles are attempted and the first unsubscribe error is
    /// returned. Handles the bus refused to drop stay in the table and the
    /// process keeps listening, so a later call can retry them.
    pub async fn stop_listening_for_events(&self) -> Result<(), CoreError> {
        let mut subscriptions = self.subscriptions.lock().await;
        if !subscriptions.listening && subscriptions.handles.is_empty() {
            return Ok(());
        }

        let mut first_error = None;
        let mut remaining = HashMap::new();
        for (event, handle) in subscriptions.handles.drain() {
            if let Err(e) = self.bus.unsubscribe(&handle).await {
                warn!(
                    process = %self.definition.name(),
                    event = %event,
                    error = %e,
                    "Unsubscribe failed"
                );
                first_error.get_or_insert(e);
                remaining.insert(event, handle);
            }
        }
        subscriptions.handles = remaining;

        match first_error {
            Some(e) => {
                warn!(
                    process = %self.definition.name(),
                    remaining = subscriptions.handles.len(),
                    "Still listening for some events"
                );
                Err(e)
            }
            None => {
                subscriptions.listening = false;
                info!(process = %self.definition.name(), "Stopped listening for events");
                Ok(())
            }
        }
    }

    /// Whether the process is subscribed to the bus
    pub async fn is_listening(&self) -> bool {
        self.subscriptions.lock().await.listening
    }

    /// Number of live subscriptions, one per handled event name
    pub async fn subscription_count(&self) -> usize {
        self.subscriptions.lock().await.handles.len()
    }

    /// Dispatch an event.
    ///
    /// Start events with no case yet create one at the initial step;
    /// every other event is offered to the cases it targets.
    pub async fn handle_event(&self, event: &Event) -> Result<EventOutcome, CoreError> {
        debug!(
            process = %self.definition.name(),
            event = %event.name,
            target = %event.target,
            "Handling event"
        );

        let (cases, foreign): (Vec<Case>, Vec<Case>) = self
            .cases
            .for_event(event)
            .await?
            .into_iter()
            .partition(|case| &case.process == self.definition.name());
        if !foreign.is_empty() {
            trace!(
                process = %self.definition.name(),
                event = %event.name,
                skipped = foreign.len(),
                "Skipping cases bound to other processes"
            );
        }

        if self.definition.is_start_event(&event.name) && cases.is_empty() {
            let case_id = self.create_case_from_event(event).await?;
            return Ok(EventOutcome {
                created: Some(case_id),
                transitions: Vec::new(),
            });
        }

        self.transition_cases(cases, event).await
    }

    /// Build, start and persist a case for a start event.
    ///
    /// Nothing is saved unless the case starts cleanly.
    async fn create_case_from_event(&self, event: &Event) -> Result<CaseId, CoreError> {
        let handler = self.definition.start_handler(&event.name)?;
        let mut case = handler(event)?;

        if &case.process != self.definition.name() {
            return Err(CoreError::ConfigurationError(format!(
                "Start handler for {} built a case for process {}, expected {}",
                event.name,
                case.process,
                self.definition.name()
            )));
        }

        case.start_from_event(&self.definition, event)?;
        self.cases.save(&case).await?;

        info!(
            process = %self.definition.name(),
            event = %event.name,
            case_id = %case.id,
            "Case created from event"
        );
        Ok(case.id)
    }

    async fn transition_cases(
        &self,
        cases: Vec<Case>,
        event: &Event,
    ) -> Result<EventOutcome, CoreError> {
        let mut outcome = EventOutcome::default();

        for mut case in cases {
            let result = case.transition_to_next_step(&self.definition, event);
            if result.is_change() {
                self.cases.save(&case).await?;
            }
            outcome.transitions.push((case.id, result));
        }

        Ok(outcome)
    }
}

/// Bus callback forwarding events to a process.
///
/// Holds a weak reference so a subscription never keeps a dropped
/// process alive.
struct Dispatcher {
    process: Weak<BusinessProcess>,
}

#[async_trait]
impl EventHandler for Dispatcher {
    async fn handle(&self, event: &Event) -> Result<(), CoreError> {
        match self.process.upgrade() {
            Some(process) => process.handle_event(event).await.map(|_| ()),
            None => {
                trace!(event = %event.name, "Process dropped, ignoring event");
                Ok(())
            }
        }
    }
}
