//!
//! Caseflow Core - step/transition state machine for business processes
//!
//! A business process is a named set of steps bound to a case type. Cases
//! move between steps purely by reacting to events: a start event creates
//! a case at the initial step, and every other event is looked up in the
//! transition table against each targeted case's current step.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Domain layer - steps, transitions, cases, process definitions
pub mod domain;

/// Application services - process runtime and registry
pub mod application;

/// Error types
pub mod error;

// Re-export key types
pub use error::CoreError;

pub use application::business_process::{BusinessProcess, EventOutcome};
pub use application::registry::ProcessRegistry;
pub use domain::case::{Case, CaseId, CaseStatus, StepChange, TransitionOutcome};
pub use domain::document::ProcessDocument;
pub use domain::event::{CaseTarget, Event, EventName};
pub use domain::process::{ProcessBuilder, ProcessDefinition, ProcessName, StartHandler};
pub use domain::repository::{CaseRepository, EventBus, EventHandler, SubscriptionHandle};
pub use domain::step::{Step, StepKind, StepName};
pub use domain::transition::{Transition, TransitionTable, TransitionTarget, END};
