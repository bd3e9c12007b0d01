//! YAML process documents.
//!
//! A document declares the topology of a process (steps, start step,
//! transitions, start event names). Start handlers are code, so they are
//! attached to the builder returned by [`ProcessDocument::into_builder`].
//!
//! ```yaml
//! name: licence
//! case_type: LicenceCase
//! start: collect_info
//! steps:
//!   - name: collect_info
//!     kind: applicant_task
//!   - name: process_data
//!     kind: system_process
//!     handler: ProcessDataJob
//! transitions:
//!   - { from: collect_info, on: form_submitted, to: process_data }
//!   - { from: process_data, on: processing_complete, to: end }
//! start_events:
//!   - application_started
//! ```

use crate::domain::process::{ProcessBuilder, ProcessDefinition};
use crate::domain::step::{Step, StepKind};
use crate::domain::transition::TransitionTarget;
use crate::CoreError;
use serde::{Deserialize, Serialize};

/// Serialized form of a process topology
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessDocument {
    /// Process name
    pub name: String,

    /// Case type the process drives
    pub case_type: String,

    /// Step new cases begin at
    pub start: String,

    /// Steps in declaration order
    pub steps: Vec<StepDocument>,

    /// Transition rules
    #[serde(default)]
    pub transitions: Vec<TransitionDocument>,

    /// Events that create new cases
    #[serde(default)]
    pub start_events: Vec<String>,
}

/// A step entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDocument {
    /// Step name
    pub name: String,

    /// Actor kind
    pub kind: StepKind,

    /// Optional handler reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
}

/// A transition entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionDocument {
    /// Source step
    pub from: String,

    /// Triggering event
    pub on: String,

    /// Target step, or `end`
    pub to: String,
}

impl ProcessDocument {
    /// Parse a YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self, CoreError> {
        let document: ProcessDocument = serde_yaml::from_str(yaml)?;
        if document.name.trim().is_empty() {
            return Err(CoreError::DocumentError(
                "Process name must not be empty".to_string(),
            ));
        }
        Ok(document)
    }

    /// Serialize back to YAML
    pub fn to_yaml(&self) -> Result<String, CoreError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Describe an existing definition
    pub fn from_definition(definition: &ProcessDefinition) -> Self {
        Self {
            name: definition.name().to_string(),
            case_type: definition.case_type().to_string(),
            start: definition
                .initial_step()
                .map(ToString::to_string)
                .unwrap_or_default(),
            steps: definition
                .steps()
                .iter()
                .map(|s| StepDocument {
                    name: s.name.to_string(),
                    kind: s.kind,
                    handler: s.handler.clone(),
                })
                .collect(),
            transitions: definition
                .transitions()
                .iter()
                .map(|t| TransitionDocument {
                    from: t.from.to_string(),
                    on: t.event.to_string(),
                    to: match &t.to {
                        TransitionTarget::End => crate::domain::transition::END.to_string(),
                        TransitionTarget::Step(step) => step.to_string(),
                    },
                })
                .collect(),
            start_events: definition
                .start_events()
                .into_iter()
                .map(|e| e.0)
                .collect(),
        }
    }

    /// Load the topology into a builder; start handlers still need attaching
    pub fn into_builder(self) -> ProcessBuilder {
        let mut builder = ProcessDefinition::builder(self.name, self.case_type).start(self.start);

        for step in self.steps {
            let mut s = Step::new(step.name, step.kind);
            s.handler = step.handler;
            builder = builder.step(s);
        }

        for t in self.transitions {
            builder = builder.transition(t.from, t.on, TransitionTarget::parse(&t.to));
        }

        for event in self.start_events {
            builder = builder.declare_start_event(event);
        }

        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::case::Case;
    use crate::domain::event::EventName;
    use crate::domain::step::StepName;

    const YAML: &str = r#"
name: licence
case_type: LicenceCase
start: collect_info
steps:
  - name: collect_info
    kind: applicant_task
  - name: process_data
    kind: system_process
    handler: ProcessDataJob
transitions:
  - { from: collect_info, on: form_submitted, to: process_data }
  - { from: process_data, on: processing_complete, to: end }
start_events:
  - application_started
"#;

    #[test]
    fn test_parse_document() {
        let document = ProcessDocument::from_yaml(YAML).unwrap();
        assert_eq!(document.name, "licence");
        assert_eq!(document.steps.len(), 2);
        assert_eq!(document.steps[1].handler.as_deref(), Some("ProcessDataJob"));
        assert_eq!(document.transitions[1].to, "end");
        assert_eq!(document.start_events, vec!["application_started"]);
    }

    #[test]
    fn test_document_requires_start_handlers() {
        let document = ProcessDocument::from_yaml(YAML).unwrap();
        let err = document.into_builder().build().unwrap_err();
        assert_eq!(
            err,
            CoreError::StartHandlerMissing("application_started".to_string())
        );
    }

    #[test]
    fn test_document_into_definition() {
        let definition = ProcessDocument::from_yaml(YAML)
            .unwrap()
            .into_builder()
            .start_event("application_started", |_| Ok(Case::new("licence")))
            .build()
            .unwrap();

        assert_eq!(definition.initial_step(), Some(&StepName::from("collect_info")));
        assert!(definition
            .transitions()
            .lookup(
                &StepName::from("process_data"),
                &EventName::from("processing_complete")
            )
            .map(TransitionTarget::is_end)
            .unwrap_or(false));
    }

    #[test]
    fn test_document_round_trips_through_definition() {
        let definition = ProcessDocument::from_yaml(YAML)
            .unwrap()
            .into_builder()
            .start_event("application_started", |_| Ok(Case::new("licence")))
            .build()
            .unwrap();

        let document = ProcessDocument::from_definition(&definition);
        assert_eq!(document, ProcessDocument::from_yaml(YAML).unwrap());
        assert!(document.to_yaml().unwrap().contains("processing_complete"));
    }

    #[test]
    fn test_invalid_documents() {
        let err = ProcessDocument::from_yaml("name: [").unwrap_err();
        assert_eq!(err.error_code(), "ERR_DOCUMENT");

        let err = ProcessDocument::from_yaml("name: ' '\ncase_type: C\nstart: a\nsteps: []\n")
            .unwrap_err();
        assert!(matches!(err, CoreError::DocumentError(ref msg) if msg.contains("empty")));
    }
}
