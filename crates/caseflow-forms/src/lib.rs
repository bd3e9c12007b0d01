//!
//! Caseflow Forms - multi-page application form flows
//!
//! A flow is an ordered list of tasks, each an ordered list of question
//! pages. Page completion is never stored: it is read from the record by
//! asking whether it validates under the context named after the page.
//! Navigation between pages walks the page list and skips pages whose
//! applicability predicate rejects the record.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Error types
pub mod error;

/// Previous/next navigation around a page
pub mod evaluator;

/// Flows and their builder
pub mod flow;

/// Question pages
pub mod page;

/// The record a flow is filled in against
pub mod record;

/// Routes, locations and routers
pub mod routing;

/// Tasks and task status
pub mod task;

// Re-export key types
pub use error::FormError;
pub use evaluator::{NavigationMode, TaskEvaluator};
pub use flow::{FormFlow, FormFlowBuilder, TaskBuilder};
pub use page::{Applicability, QuestionPage};
pub use record::FormRecord;
pub use routing::{Location, PageRoute, PathRouter, Route, Router};
pub use task::{Task, TaskStatus};
