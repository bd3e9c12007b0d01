use caseflow_core::{
    BusinessProcess, Case, CaseStatus, CaseTarget, CoreError, Event, EventBus, ProcessDefinition,
    ProcessName, Step, StepName,
};
use caseflow_forms::{FormFlow, FormRecord, PathRouter};
use caseflow_state_inmemory::InMemoryProvider;
use std::collections::HashSet;

struct Application {
    form_id: String,
    answered: HashSet<&'static str>,
}

impl FormRecord for Application {
    fn record_id(&self) -> String {
        self.form_id.clone()
    }

    fn is_valid_in(&self, context: &str) -> bool {
        self.answered.contains(context)
    }
}

fn application_flow() -> FormFlow<Application> {
    FormFlow::builder("licence_application")
        .end_page("check_answers")
        .unwrap()
        .task("personal_info", |t| t.question_page("name").question_page("dob"))
        .build()
        .unwrap()
}

fn licence_process() -> ProcessDefinition {
    ProcessDefinition::builder("licence", "LicenceCase")
        .step(Step::applicant_task("collect_info"))
        .step(Step::staff_task("review"))
        .start("collect_info")
        .transition("collect_info", "form_submitted", "review")
        .transition("review", "approved", "end")
        .start_event("application_started", |event| match &event.target {
            CaseTarget::ApplicationForm(form_id) => {
                Ok(Case::new("licence").for_application_form(form_id.clone()))
            }
            other => Err(CoreError::InvalidEvent(other.to_string())),
        })
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_completing_the_form_moves_the_case_to_review() {
    let provider = InMemoryProvider::new();
    let bus = provider.bus();
    let _process = BusinessProcess::define(
        licence_process(),
        provider.case_repository(),
        provider.event_bus(),
    )
    .await
    .unwrap();

    let flow = application_flow();
    let router = PathRouter::new("applications");
    let mut application = Application {
        form_id: "form-77".to_string(),
        answered: HashSet::new(),
    };

    bus.publish(Event::for_application_form("application_started", "form-77"))
        .await
        .unwrap();

    for page in ["name", "dob"] {
        application.answered.insert(page);
        let next = flow.next_path_after(page, &application, &router).unwrap();
        if flow.completed(&application) {
            assert_eq!(next.as_str(), "/applications/form-77/check_answers");
            bus.publish(Event::for_application_form("form_submitted", "form-77"))
                .await
                .unwrap();
        } else {
            assert_eq!(next.as_str(), "/applications/form-77/dob/edit");
        }
    }

    let cases = provider
        .cases()
        .list_for_process(&ProcessName::from("licence"))
        .await;
    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0].current_step, Some(StepName::from("review")));

    bus.publish(Event::for_case("approved", cases[0].id.clone()))
        .await
        .unwrap();
    let closed = provider
        .cases()
        .list_for_process(&ProcessName::from("licence"))
        .await;
    assert_eq!(closed[0].status, CaseStatus::Closed);
}
