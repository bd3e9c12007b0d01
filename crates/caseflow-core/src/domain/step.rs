use serde::{Deserialize, Serialize};

string_id!(
    /// Value object: Step name, unique within a process
    StepName
);

/// The actor responsible for a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    /// Work done by the applicant
    ApplicantTask,

    /// Work done by a member of staff
    StaffTask,

    /// Work done automatically by the system
    SystemProcess,

    /// Work done by an external organisation
    ThirdPartyTask,
}

impl StepKind {
    /// All kinds, in diagram styling order
    pub const ALL: [StepKind; 4] = [
        StepKind::ApplicantTask,
        StepKind::StaffTask,
        StepKind::SystemProcess,
        StepKind::ThirdPartyTask,
    ];

    /// Human readable label shown to users waiting on this step
    pub fn label(&self) -> &'static str {
        match self {
            StepKind::ApplicantTask => "Applicant task",
            StepKind::StaffTask => "Staff task",
            StepKind::SystemProcess => "System process",
            StepKind::ThirdPartyTask => "Third party task",
        }
    }

    /// Style class used when exporting diagrams
    pub fn class_name(&self) -> &'static str {
        match self {
            StepKind::ApplicantTask => "applicant_task",
            StepKind::StaffTask => "staff_task",
            StepKind::SystemProcess => "system_process",
            StepKind::ThirdPartyTask => "third_party_task",
        }
    }
}

/// A unit of work in a business process.
///
/// The handler is an opaque reference (a job, form or component name)
/// resolved by whatever executes the step; the state machine never calls it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Step name
    pub name: StepName,

    /// Who performs the step
    pub kind: StepKind,

    /// Reference to the implementation of the step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
}

impl Step {
    /// Create a step without a handler reference
    pub fn new(name: impl Into<StepName>, kind: StepKind) -> Self {
        Self {
            name: name.into(),
            kind,
            handler: None,
        }
    }

    /// Attach a handler reference
    pub fn with_handler(mut self, handler: impl Into<String>) -> Self {
        self.handler = Some(handler.into());
        self
    }

    /// Shorthand for an applicant task
    pub fn applicant_task(name: impl Into<StepName>) -> Self {
        Self::new(name, StepKind::ApplicantTask)
    }

    /// Shorthand for a staff task
    pub fn staff_task(name: impl Into<StepName>) -> Self {
        Self::new(name, StepKind::StaffTask)
    }

    /// Shorthand for a system process
    pub fn system_process(name: impl Into<StepName>) -> Self {
        Self::new(name, StepKind::SystemProcess)
    }

    /// Shorthand for a third party task
    pub fn third_party_task(name: impl Into<StepName>) -> Self {
        Self::new(name, StepKind::ThirdPartyTask)
    }
}
