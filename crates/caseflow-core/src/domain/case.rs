use crate::domain::event::{CaseTarget, Event, EventName};
use crate::domain::process::{ProcessDefinition, ProcessName};
use crate::domain::step::StepName;
use crate::domain::transition::TransitionTarget;
use crate::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, trace};
use uuid::Uuid;

string_id!(
    /// Value object: Case ID
    CaseId
);

/// Case status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CaseStatus {
    /// Case is moving through the process
    Open,

    /// Case reached the end of the process
    Closed,
}

/// One entry in a case's step history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepChange {
    /// Step the case left, `None` when the case was started
    pub from: Option<StepName>,

    /// Where the case went
    pub to: TransitionTarget,

    /// Event that caused the change
    pub event: EventName,

    /// When it happened
    pub at: DateTime<Utc>,
}

/// Result of offering an event to a case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionOutcome {
    /// No transition applies; the case is unchanged
    Ignored,

    /// The case moved to another step
    Moved {
        /// Previous step
        from: StepName,
        /// New step
        to: StepName,
    },

    /// The case reached `end` and is now closed
    Closed {
        /// Step the case was at when it closed
        from: StepName,
    },
}

impl TransitionOutcome {
    /// Whether the case was changed and must be saved
    pub fn is_change(&self) -> bool {
        !matches!(self, TransitionOutcome::Ignored)
    }
}

/// Aggregate: a case bound to a business process.
///
/// `current_step` is the only state the process mutates. It is `None`
/// until the case is started and always names a registered step after,
/// including once the case is closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    /// Unique identifier
    pub id: CaseId,

    /// Process the case belongs to
    pub process: ProcessName,

    /// Application form the case was opened for, if any
    pub application_form_id: Option<String>,

    /// Current step
    pub current_step: Option<StepName>,

    /// Current status
    pub status: CaseStatus,

    /// Step history, oldest first
    pub history: Vec<StepChange>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl Case {
    /// Create a new, unstarted case
    pub fn new(process: impl Into<ProcessName>) -> Self {
        let now = Utc::now();
        Self {
            id: CaseId(Uuid::new_v4().to_string()),
            process: process.into(),
            application_form_id: None,
            current_step: None,
            status: CaseStatus::Open,
            history: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Bind the case to an application form
    pub fn for_application_form(mut self, form_id: impl Into<String>) -> Self {
        self.application_form_id = Some(form_id.into());
        self
    }

    /// Whether an event target refers to this case
    pub fn matches(&self, target: &CaseTarget) -> bool {
        match target {
            CaseTarget::Case(id) => &self.id == id,
            CaseTarget::ApplicationForm(form_id) => {
                self.application_form_id.as_deref() == Some(form_id.as_str())
            }
        }
    }

    /// Whether the case has been closed
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.status == CaseStatus::Closed
    }

    /// Whether the case has been started
    #[inline]
    pub fn is_started(&self) -> bool {
        self.current_step.is_some() || self.is_closed()
    }

    /// Put a freshly created case at the process's initial step
    pub fn start_from_event(
        &mut self,
        definition: &ProcessDefinition,
        event: &Event,
    ) -> Result<(), CoreError> {
        if self.is_started() {
            return Err(CoreError::InvalidEvent(format!(
                "Case {} has already been started",
                self.id
            )));
        }

        let initial = definition.initial_step().ok_or_else(|| {
            CoreError::ConfigurationError(format!(
                "Process {} has no start step",
                definition.name()
            ))
        })?;

        self.current_step = Some(initial.clone());
        self.record_change(None, TransitionTarget::Step(initial.clone()), event);

        info!(
            process = %definition.name(),
            case_id = %self.id,
            step = %initial,
            "Case started"
        );
        Ok(())
    }

    /// Apply the transition table to this case for the given event.
    ///
    /// Absence of a matching `(current_step, event)` rule is not an error.
    pub fn transition_to_next_step(
        &mut self,
        definition: &ProcessDefinition,
        event: &Event,
    ) -> TransitionOutcome {
        if self.is_closed() {
            trace!(case_id = %self.id, event = %event.name, "Ignoring event for closed case");
            return TransitionOutcome::Ignored;
        }

        let Some(current) = self.current_step.clone() else {
            trace!(case_id = %self.id, event = %event.name, "Ignoring event for unstarted case");
            return TransitionOutcome::Ignored;
        };

        let Some(target) = definition.transitions().lookup(&current, &event.name).cloned() else {
            trace!(
                case_id = %self.id,
                step = %current,
                event = %event.name,
                "No transition for event at current step"
            );
            return TransitionOutcome::Ignored;
        };

        self.record_change(Some(current.clone()), target.clone(), event);

        match target {
            TransitionTarget::End => {
                self.status = CaseStatus::Closed;
                info!(case_id = %self.id, from = %current, event = %event.name, "Case closed");
                TransitionOutcome::Closed { from: current }
            }
            TransitionTarget::Step(to) => {
                self.current_step = Some(to.clone());
                info!(
                    case_id = %self.id,
                    from = %current,
                    to = %to,
                    event = %event.name,
                    "Case moved"
                );
                TransitionOutcome::Moved { from: current, to }
            }
        }
    }

    fn record_change(&mut self, from: Option<StepName>, to: TransitionTarget, event: &Event) {
        let now = Utc::now();
        self.history.push(StepChange {
            from,
            to,
            event: event.name.clone(),
            at: now,
        });
        self.updated_at = now;
    }
}
