use crate::domain::case::Case;
use crate::domain::diagram;
use crate::domain::event::{Event, EventName};
use crate::domain::step::{Step, StepName};
use crate::domain::transition::{TransitionTable, TransitionTarget};
use crate::CoreError;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

string_id!(
    /// Value object: Process name
    ProcessName
);

/// Builds the case for a start event that has no case yet
pub type StartHandler = Arc<dyn Fn(&Event) -> Result<Case, CoreError> + Send + Sync>;

/// Immutable registry describing one business process.
///
/// Built once through [`ProcessBuilder`] and shared read-only afterwards.
#[derive(Clone)]
pub struct ProcessDefinition {
    name: ProcessName,
    case_type: String,
    steps: Vec<Step>,
    initial_step: Option<StepName>,
    transitions: TransitionTable,
    start_events: HashMap<EventName, StartHandler>,
}

impl fmt::Debug for ProcessDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessDefinition")
            .field("name", &self.name)
            .field("case_type", &self.case_type)
            .field("steps", &self.steps)
            .field("initial_step", &self.initial_step)
            .field("transitions", &self.transitions)
            .field("start_events", &self.start_events.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ProcessDefinition {
    /// Start building a process bound to the given case type
    pub fn builder(name: impl Into<ProcessName>, case_type: impl Into<String>) -> ProcessBuilder {
        ProcessBuilder::new(name, case_type)
    }

    /// Process name
    pub fn name(&self) -> &ProcessName {
        &self.name
    }

    /// Name of the case type this process drives
    pub fn case_type(&self) -> &str {
        &self.case_type
    }

    /// Registered steps in declaration order
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Look up a step by name
    pub fn step(&self, name: &StepName) -> Option<&Step> {
        self.steps.iter().find(|s| &s.name == name)
    }

    /// Step a freshly created case begins at
    pub fn initial_step(&self) -> Option<&StepName> {
        self.initial_step.as_ref()
    }

    /// The transition table
    pub fn transitions(&self) -> &TransitionTable {
        &self.transitions
    }

    /// Whether the event creates new cases
    pub fn is_start_event(&self, event: &EventName) -> bool {
        self.start_events.contains_key(event)
    }

    /// Handler constructing a case for a start event
    pub fn start_handler(&self, event: &EventName) -> Result<&StartHandler, CoreError> {
        self.start_events
            .get(event)
            .ok_or_else(|| CoreError::StartHandlerMissing(event.to_string()))
    }

    /// Start event names, sorted
    pub fn start_events(&self) -> BTreeSet<EventName> {
        self.start_events.keys().cloned().collect()
    }

    /// Every event this process reacts to, sorted and deduplicated
    pub fn handled_events(&self) -> BTreeSet<EventName> {
        let mut events = self.transitions.event_names();
        events.extend(self.start_events.keys().cloned());
        events
    }

    /// Render the process as a Mermaid flowchart
    pub fn to_diagram(&self) -> String {
        diagram::render(self)
    }
}

/// Fluent builder accumulating a [`ProcessDefinition`]
pub struct ProcessBuilder {
    name: ProcessName,
    case_type: String,
    steps: Vec<Step>,
    initial_step: Option<StepName>,
    transitions: TransitionTable,
    start_events: HashMap<EventName, Option<StartHandler>>,
}

impl ProcessBuilder {
    /// Create an empty builder
    pub fn new(name: impl Into<ProcessName>, case_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            case_type: case_type.into(),
            steps: Vec::new(),
            initial_step: None,
            transitions: TransitionTable::new(),
            start_events: HashMap::new(),
        }
    }

    /// Register a step. A step with the same name is replaced.
    pub fn step(mut self, step: Step) -> Self {
        match self.steps.iter_mut().find(|s| s.name == step.name) {
            Some(existing) => {
                debug!(process = %self.name, step = %step.name, "Overwriting step");
                *existing = step;
            }
            None => self.steps.push(step),
        }
        self
    }

    /// Set the step new cases begin at
    pub fn start(mut self, step: impl Into<StepName>) -> Self {
        self.initial_step = Some(step.into());
        self
    }

    /// Add a `(from, event) -> to` rule; `"end"` closes the case
    pub fn transition(
        mut self,
        from: impl Into<StepName>,
        event: impl Into<EventName>,
        to: impl Into<TransitionTarget>,
    ) -> Self {
        let (from, event) = (from.into(), event.into());
        if let Some(previous) = self.transitions.insert(from.clone(), event.clone(), to.into()) {
            debug!(
                process = %self.name,
                from = %from,
                event = %event,
                previous = ?previous,
                "Overwriting transition"
            );
        }
        self
    }

    /// Register a handler that creates a case when `event` arrives
    pub fn start_event<F>(mut self, event: impl Into<EventName>, handler: F) -> Self
    where
        F: Fn(&Event) -> Result<Case, CoreError> + Send + Sync + 'static,
    {
        self.start_events
            .insert(event.into(), Some(Arc::new(handler) as StartHandler));
        self
    }

    /// Declare a start event whose handler is attached later with [`ProcessBuilder::start_event`]
    pub fn declare_start_event(mut self, event: impl Into<EventName>) -> Self {
        self.start_events.entry(event.into()).or_insert(None);
        self
    }

    /// Validate and freeze the definition
    pub fn build(self) -> Result<ProcessDefinition, CoreError> {
        if self.steps.is_empty() {
            return Err(CoreError::ConfigurationError(format!(
                "Process {} must have at least one step",
                self.name
            )));
        }

        let known = |name: &StepName| self.steps.iter().any(|s| &s.name == name);

        let initial_step = self.initial_step.clone().ok_or_else(|| {
            CoreError::ConfigurationError(format!("Process {} has no start step", self.name))
        })?;
        if !known(&initial_step) {
            return Err(CoreError::StepNotFound(format!(
                "start step {} in process {}",
                initial_step, self.name
            )));
        }

        for transition in self.transitions.iter() {
            if !known(&transition.from) {
                return Err(CoreError::StepNotFound(format!(
                    "{} (transition on {}) in process {}",
                    transition.from, transition.event, self.name
                )));
            }
            if let TransitionTarget::Step(to) = &transition.to {
                if !known(to) {
                    return Err(CoreError::StepNotFound(format!(
                        "{} (transition from {} on {}) in process {}",
                        to, transition.from, transition.event, self.name
                    )));
                }
            }
        }

        let mut start_events = HashMap::with_capacity(self.start_events.len());
        for (event, handler) in self.start_events {
            let handler = handler.ok_or_else(|| CoreError::StartHandlerMissing(event.to_string()))?;
            start_events.insert(event, handler);
        }

        Ok(ProcessDefinition {
            name: self.name,
            case_type: self.case_type,
            steps: self.steps,
            initial_step: Some(initial_step),
            transitions: self.transitions,
            start_events,
        })
    }
}
