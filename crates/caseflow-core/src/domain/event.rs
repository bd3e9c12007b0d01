use crate::domain::case::CaseId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

string_id!(
    /// Value object: Event name
    EventName
);

/// Identifies the case an event is about.
///
/// Events either name the case directly or name the application form the
/// case was opened for; the case repository resolves both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum CaseTarget {
    /// The case itself
    Case(CaseId),

    /// The application form bound 1:1 to a case
    ApplicationForm(String),
}

impl std::fmt::Display for CaseTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaseTarget::Case(id) => write!(f, "case:{}", id),
            CaseTarget::ApplicationForm(id) => write!(f, "application_form:{}", id),
        }
    }
}

/// A named event delivered by the event bus
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier of this delivery
    pub id: Uuid,

    /// Event name used for subscription and transition lookup
    pub name: EventName,

    /// The case the event applies to
    pub target: CaseTarget,

    /// Free-form payload
    #[serde(default)]
    pub payload: Value,

    /// When the event was raised
    pub occurred_at: DateTime<Utc>,
}

impl Event {
    /// Create an event with an empty payload
    pub fn new(name: impl Into<EventName>, target: CaseTarget) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            target,
            payload: Value::Object(Default::default()),
            occurred_at: Utc::now(),
        }
    }

    /// Event about a specific case
    pub fn for_case(name: impl Into<EventName>, case_id: impl Into<CaseId>) -> Self {
        Self::new(name, CaseTarget::Case(case_id.into()))
    }

    /// Event about the case bound to an application form
    pub fn for_application_form(name: impl Into<EventName>, form_id: impl Into<String>) -> Self {
        Self::new(name, CaseTarget::ApplicationForm(form_id.into()))
    }

    /// Attach a payload
    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = payload;
        self
    }
}
