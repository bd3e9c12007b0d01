use caseflow_forms::{
    FormFlow, FormRecord, NavigationMode, PathRouter, Router, TaskStatus,
};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

#[derive(Default)]
struct LicenceApplication {
    id: u32,
    valid: HashSet<String>,
    has_partner: bool,
}

impl LicenceApplication {
    fn answer(&mut self, page: &str) {
        self.valid.insert(page.to_string());
    }
}

impl FormRecord for LicenceApplication {
    fn record_id(&self) -> String {
        self.id.to_string()
    }

    fn is_valid_in(&self, context: &str) -> bool {
        self.valid.contains(context)
    }
}

fn licence_flow() -> FormFlow<LicenceApplication> {
    FormFlow::builder("licence_application")
        .end_page("check_answers")
        .unwrap()
        .task("personal_info", |t| t.question_page("name").question_page("dob"))
        .task("household", |t| {
            t.question_page("has_partner")
                .page(
                    caseflow_forms::QuestionPage::new("partner_name")
                        .needed_when(|r: &LicenceApplication| r.has_partner),
                )
                .question_page_with_fields("dependants", ["count", "ages"])
        })
        .build()
        .unwrap()
}

#[test]
fn test_personal_info_progress() {
    let flow = licence_flow();
    let router = PathRouter::new("applications");
    let task = &flow.tasks()[0];
    let mut record = LicenceApplication {
        id: 12,
        ..Default::default()
    };

    assert!(!task.started(&record));
    assert_eq!(task.status(&record), TaskStatus::NotStarted);

    record.answer("name");
    assert!(task.started(&record));
    assert!(!task.completed(&record));
    assert_eq!(
        task.path(&record, &router).unwrap().as_str(),
        "/applications/12/dob/edit"
    );

    record.answer("dob");
    assert_eq!(task.status(&record), TaskStatus::Completed);
    assert!(!flow.completed(&record));
}

#[test]
fn test_household_skips_partner_page_for_single_applicants() {
    let flow = licence_flow();
    let router = PathRouter::new("applications");
    let single = LicenceApplication {
        id: 5,
        ..Default::default()
    };

    assert_eq!(
        flow.next_path_after("has_partner", &single, &router)
            .unwrap()
            .as_str(),
        "/applications/5/dependants/edit"
    );
    assert_eq!(
        flow.prev_path_before("dependants", &single, &router)
            .unwrap()
            .as_str(),
        "/applications/5/has_partner/edit"
    );

    let couple = LicenceApplication {
        id: 6,
        has_partner: true,
        ..Default::default()
    };
    assert_eq!(
        flow.next_path_after("has_partner", &couple, &router)
            .unwrap()
            .as_str(),
        "/applications/6/partner_name/edit"
    );
}

#[test]
fn test_last_page_leads_to_end_page_and_first_page_to_overview() {
    let flow = licence_flow();
    let router = PathRouter::new("applications");
    let record = LicenceApplication {
        id: 9,
        ..Default::default()
    };

    assert_eq!(
        flow.next_path_after("dependants", &record, &router)
            .unwrap()
            .as_str(),
        "/applications/9/check_answers"
    );
    assert_eq!(
        flow.prev_path_before("name", &record, &router)
            .unwrap()
            .as_str(),
        "/applications/9"
    );
    assert_eq!(
        flow.evaluator("dob", &record)
            .unwrap()
            .update_path(&router)
            .as_str(),
        "/applications/9/dob"
    );
}

#[test]
fn test_sequential_flow_visits_every_page() {
    let flow = FormFlow::builder("sequential")
        .navigation(NavigationMode::Sequential)
        .task("household", |t| {
            t.question_page("has_partner")
                .page(
                    caseflow_forms::QuestionPage::new("partner_name")
                        .needed_when(|r: &LicenceApplication| r.has_partner),
                )
                .question_page("dependants")
        })
        .build()
        .unwrap();
    let router = PathRouter::new("applications");
    let record = LicenceApplication {
        id: 1,
        ..Default::default()
    };

    assert_eq!(
        flow.next_path_after("has_partner", &record, &router)
            .unwrap()
            .as_str(),
        "/applications/1/partner_name/edit"
    );
}

#[test]
fn test_completed_flow_and_routes() {
    let flow = licence_flow();
    let mut record = LicenceApplication {
        id: 2,
        ..Default::default()
    };
    for context in flow.contexts() {
        record.answer(context);
    }
    assert!(flow.completed(&record));
    assert_eq!(
        Router::<LicenceApplication>::overview(&PathRouter::new("applications"), &record).as_str(),
        "/applications/2"
    );

    let routes = flow.generated_routes();
    let identifiers: Vec<String> = routes.iter().map(|r| r.edit.identifier()).collect();
    assert_eq!(
        identifiers,
        vec![
            "edit_name",
            "edit_dob",
            "edit_has_partner",
            "edit_partner_name",
            "edit_dependants"
        ]
    );

    let json = serde_json::to_value(&routes[0]).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "page": "name",
            "edit": { "kind": "edit", "name": "name" },
            "update": { "kind": "update", "name": "name" }
        })
    );
    assert_eq!(
        serde_json::to_string(&TaskStatus::InProgress).unwrap(),
        "\"in_progress\""
    );
}
