//! Mermaid flowchart export.
//!
//! One line per step declaring its kind, one line per transition as
//! `from -->|event| to`, then a style class per step kind. The `end`
//! sentinel is written as `END` because `end` is a Mermaid keyword.

use crate::domain::process::ProcessDefinition;
use crate::domain::step::StepKind;
use crate::domain::transition::{TransitionTarget, END};
use std::fmt::Write;

const INDENT: &str = "    ";

fn node_name(name: &str) -> String {
    if name == END {
        END.to_uppercase()
    } else {
        name.to_string()
    }
}

fn style(kind: StepKind) -> &'static str {
    match kind {
        StepKind::ApplicantTask => "fill:#d2e2f1,stroke:#1d70b8,color:#0b0c0c",
        StepKind::StaffTask => "fill:#fff7bf,stroke:#ffdd00,color:#0b0c0c",
        StepKind::SystemProcess => "fill:#f3f2f1,stroke:#505a5f,color:#0b0c0c",
        StepKind::ThirdPartyTask => "fill:#e2d7ec,stroke:#4c2c92,color:#0b0c0c",
    }
}

/// Render a process definition as Mermaid flowchart text
pub fn render(definition: &ProcessDefinition) -> String {
    let mut out = String::from("flowchart TD\n");

    for step in definition.steps() {
        let name = node_name(step.name.as_str());
        let _ = writeln!(
            out,
            "{INDENT}{name}[\"{name}\"]:::{}",
            step.kind.class_name()
        );
    }

    for transition in definition.transitions().iter() {
        let to = match &transition.to {
            TransitionTarget::End => node_name(END),
            TransitionTarget::Step(step) => node_name(step.as_str()),
        };
        let _ = writeln!(
            out,
            "{INDENT}{} -->|{}| {}",
            node_name(transition.from.as_str()),
            transition.event,
            to
        );
    }

    for kind in StepKind::ALL {
        let _ = writeln!(out, "{INDENT}classDef {} {}", kind.class_name(), style(kind));
    }

    out
}

#[cfg(test)]
mod tests {
    use crate::domain::process::ProcessDefinition;
    use crate::domain::step::Step;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_process() {
        let definition = ProcessDefinition::builder("licence", "LicenceCase")
            .step(Step::applicant_task("collect_info"))
            .step(Step::staff_task("process_data"))
            .start("collect_info")
            .transition("collect_info", "form_submitted", "process_data")
            .transition("process_data", "processing_complete", "end")
            .build()
            .unwrap();

        let expected = "\
flowchart TD
    collect_info[\"collect_info\"]:::applicant_task
    process_data[\"process_data\"]:::staff_task
    collect_info -->|form_submitted| process_data
    process_data -->|processing_complete| END
    classDef applicant_task fill:#d2e2f1,stroke:#1d70b8,color:#0b0c0c
    classDef staff_task fill:#fff7bf,stroke:#ffdd00,color:#0b0c0c
    classDef system_process fill:#f3f2f1,stroke:#505a5f,color:#0b0c0c
    classDef third_party_task fill:#e2d7ec,stroke:#4c2c92,color:#0b0c0c
";
        assert_eq!(definition.to_diagram(), expected);
    }

    #[test]
    fn test_render_is_pure() {
        let definition = ProcessDefinition::builder("p", "Case")
            .step(Step::system_process("only"))
            .start("only")
            .build()
            .unwrap();
        assert_eq!(definition.to_diagram(), definition.to_diagram());
    }
}
