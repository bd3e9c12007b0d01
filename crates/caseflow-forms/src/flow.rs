use crate::error::FormError;
use crate::evaluator::{NavigationMode, TaskEvaluator};
use crate::page::QuestionPage;
use crate::record::FormRecord;
use crate::routing::{Location, PageRoute, Route, Router};
use crate::task::Task;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Collects the pages of one task, in call order
pub struct TaskBuilder<R> {
    name: String,
    pages: Vec<QuestionPage<R>>,
}

impl<R> TaskBuilder<R> {
    fn new(name: String) -> Self {
        Self {
            name,
            pages: Vec::new(),
        }
    }

    /// Append a page whose single field shares its name
    pub fn question_page(self, name: impl Into<String>) -> Self {
        self.page(QuestionPage::new(name))
    }

    /// Append a page submitting the given fields
    pub fn question_page_with_fields<I, S>(self, name: impl Into<String>, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.page(QuestionPage::new(name).with_fields(fields))
    }

    /// Append a fully configured page
    pub fn page(mut self, page: QuestionPage<R>) -> Self {
        self.pages.push(page);
        self
    }

    fn build(self) -> Task<R> {
        Task::new(self.name, self.pages)
    }
}

/// Builder for [`FormFlow`]
pub struct FormFlowBuilder<R> {
    name: String,
    tasks: Vec<Task<R>>,
    start_page: Option<String>,
    end_page: Option<String>,
    navigation: NavigationMode,
}

impl<R> FormFlowBuilder<R> {
    /// Start an empty flow
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
            start_page: None,
            end_page: None,
            navigation: NavigationMode::default(),
        }
    }

    /// Open a task; pages added inside `define` belong to it
    pub fn task<F>(mut self, name: impl Into<String>, define: F) -> Self
    where
        F: FnOnce(TaskBuilder<R>) -> TaskBuilder<R>,
    {
        let task = define(TaskBuilder::new(name.into())).build();
        self.tasks.push(task);
        self
    }

    /// Identifier of the page shown before the first task. May be set once.
    pub fn start_page(mut self, identifier: impl Into<String>) -> Result<Self, FormError> {
        let identifier = identifier.into();
        if let Some(existing) = &self.start_page {
            return Err(FormError::StartPageAlreadySet(existing.clone()));
        }
        self.start_page = Some(identifier);
        Ok(self)
    }

    /// Identifier of the page shown after the last task. May be set once.
    pub fn end_page(mut self, identifier: impl Into<String>) -> Result<Self, FormError> {
        let identifier = identifier.into();
        if let Some(existing) = &self.end_page {
            return Err(FormError::EndPageAlreadySet(existing.clone()));
        }
        self.end_page = Some(identifier);
        Ok(self)
    }

    /// Page-to-page navigation mode for every task of the flow
    pub fn navigation(mut self, mode: NavigationMode) -> Self {
        self.navigation = mode;
        self
    }

    /// Freeze the flow
    pub fn build(self) -> Result<FormFlow<R>, FormError> {
        if self.tasks.is_empty() {
            return Err(FormError::EmptyFlow(self.name));
        }

        let mut task_names = HashSet::new();
        let mut contexts = Vec::new();
        let mut seen_pages = HashSet::new();
        for task in &self.tasks {
            if !task_names.insert(task.name()) {
                return Err(FormError::DuplicateTask(task.name().to_string()));
            }
            for page in task.pages() {
                if !seen_pages.insert(page.name()) {
                    return Err(FormError::DuplicatePage(page.name().to_string()));
                }
                contexts.push(page.name().to_string());
            }
        }

        debug!(
            flow = %self.name,
            tasks = self.tasks.len(),
            pages = contexts.len(),
            "Form flow built"
        );

        Ok(FormFlow {
            name: self.name,
            tasks: self.tasks,
            contexts,
            start_page: self.start_page,
            end_page: self.end_page,
            navigation: self.navigation,
        })
    }
}

/// An immutable, ordered set of tasks making up a multi-page form
pub struct FormFlow<R> {
    name: String,
    tasks: Vec<Task<R>>,
    contexts: Vec<String>,
    start_page: Option<String>,
    end_page: Option<String>,
    navigation: NavigationMode,
}

impl<R> Clone for FormFlow<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            tasks: self.tasks.clone(),
            contexts: self.contexts.clone(),
            start_page: self.start_page.clone(),
            end_page: self.end_page.clone(),
            navigation: self.navigation,
        }
    }
}

impl<R> fmt::Debug for FormFlow<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormFlow")
            .field("name", &self.name)
            .field("tasks", &self.tasks)
            .field("start_page", &self.start_page)
            .field("end_page", &self.end_page)
            .field("navigation", &self.navigation)
            .finish()
    }
}

impl<R> FormFlow<R> {
    /// Start building a flow
    pub fn builder(name: impl Into<String>) -> FormFlowBuilder<R> {
        FormFlowBuilder::new(name)
    }

    /// Flow name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Tasks in order
    pub fn tasks(&self) -> &[Task<R>] {
        &self.tasks
    }

    /// Every page, in task order then page order
    pub fn pages(&self) -> Vec<&QuestionPage<R>> {
        self.tasks.iter().flat_map(|t| t.pages()).collect()
    }

    /// Validation context names, one per page
    pub fn contexts(&self) -> &[String] {
        &self.contexts
    }

    /// Edit and update routes for every page
    pub fn generated_routes(&self) -> Vec<PageRoute> {
        self.pages()
            .into_iter()
            .map(|page| PageRoute {
                page: page.name().to_string(),
                edit: page.edit_route(),
                update: page.update_route(),
            })
            .collect()
    }

    /// Configured start page identifier
    pub fn start_page(&self) -> Option<&str> {
        self.start_page.as_deref()
    }

    /// Configured end page identifier
    pub fn end_page(&self) -> Option<&str> {
        self.end_page.as_deref()
    }

    /// Navigation mode used by evaluators of this flow
    pub fn navigation(&self) -> NavigationMode {
        self.navigation
    }

    /// The task containing a page
    pub fn task_for_page(&self, page: &str) -> Option<&Task<R>> {
        self.tasks.iter().find(|t| t.page_index(page).is_some())
    }
}

impl<R: FormRecord> FormFlow<R> {
    /// Every task is complete
    pub fn completed(&self, record: &R) -> bool {
        self.tasks.iter().all(|t| t.completed(record))
    }

    /// Where the flow begins: the configured start page, else the record overview
    pub fn start_path(&self, record: &R, router: &dyn Router<R>) -> Location {
        Self::resolve(self.start_page.as_deref(), record, router)
    }

    /// Where the flow ends: the configured end page, else the record overview
    pub fn end_path(&self, record: &R, router: &dyn Router<R>) -> Location {
        Self::resolve(self.end_page.as_deref(), record, router)
    }

    fn resolve(identifier: Option<&str>, record: &R, router: &dyn Router<R>) -> Location {
        match identifier {
            Some(id) => router.locate(&Route::Named(id.to_string()), record),
            None => router.overview(record),
        }
    }

    /// Navigation view for a named page
    pub fn evaluator<'a>(
        &'a self,
        page: &str,
        record: &'a R,
    ) -> Result<TaskEvaluator<'a, R>, FormError> {
        let task = self
            .task_for_page(page)
            .ok_or_else(|| FormError::UnknownPage(page.to_string()))?;
        Ok(TaskEvaluator::for_page(task, record, page)?.with_mode(self.navigation))
    }

    /// Location after submitting `page`; the flow's end once the task is exhausted
    pub fn next_path_after(
        &self,
        page: &str,
        record: &R,
        router: &dyn Router<R>,
    ) -> Result<Location, FormError> {
        let evaluator = self.evaluator(page, record)?;
        Ok(evaluator
            .next_path(router)
            .unwrap_or_else(|| self.end_path(record, router)))
    }

    /// Location of the "back" link on `page`; the flow's start at the top of a task
    pub fn prev_path_before(
        &self,
        page: &str,
        record: &R,
        router: &dyn Router<R>,
    ) -> Result<Location, FormError> {
        let evaluator = self.evaluator(page, record)?;
        Ok(evaluator
            .prev_path(router)
            .unwrap_or_else(|| self.start_path(record, router)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::PathRouter;
    use pretty_assertions::assert_eq;

    struct Record;

    impl FormRecord for Record {
        fn record_id(&self) -> String {
            "3".to_string()
        }

        fn is_valid_in(&self, context: &str) -> bool {
            context == "name"
        }
    }

    fn flow() -> FormFlow<Record> {
        FormFlow::builder("licence_application")
            .task("personal_info", |t| t.question_page("name").question_page("dob"))
            .task("address", |t| {
                t.question_page_with_fields("home_address", ["line_1", "postcode"])
            })
            .build()
            .unwrap()
    }

    #[test]
    fn test_pages_and_contexts_follow_declaration_order() {
        let flow = flow();
        let names: Vec<&str> = flow.pages().into_iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["name", "dob", "home_address"]);
        assert_eq!(flow.contexts(), &["name", "dob", "home_address"]);
        assert_eq!(flow.tasks().len(), 2);
        assert_eq!(
            flow.pages()[2].fields(),
            &["line_1".to_string(), "postcode".to_string()]
        );
    }

    #[test]
    fn test_generated_routes() {
        let routes = flow().generated_routes();
        assert_eq!(routes.len(), 3);
        assert_eq!(
            routes[1],
            PageRoute {
                page: "dob".to_string(),
                edit: Route::Edit("dob".to_string()),
                update: Route::Update("dob".to_string()),
            }
        );
        assert_eq!(routes[1].edit.identifier(), "edit_dob");
    }

    #[test]
    fn test_start_and_end_page_may_only_be_set_once() {
        let builder = FormFlow::<Record>::builder("f").start_page("intro").unwrap();
        assert_eq!(
            builder.start_page("again").err(),
            Some(FormError::StartPageAlreadySet("intro".to_string()))
        );

        let builder = FormFlow::<Record>::builder("f").end_page("declaration").unwrap();
        assert_eq!(
            builder.end_page("again").err(),
            Some(FormError::EndPageAlreadySet("declaration".to_string()))
        );
    }

    #[test]
    fn test_build_rejects_invalid_flows() {
        assert_eq!(
            FormFlow::<Record>::builder("empty").build().err(),
            Some(FormError::EmptyFlow("empty".to_string()))
        );

        let duplicate_page = FormFlow::<Record>::builder("f")
            .task("one", |t| t.question_page("name"))
            .task("two", |t| t.question_page("name"))
            .build();
        assert_eq!(
            duplicate_page.err(),
            Some(FormError::DuplicatePage("name".to_string()))
        );

        let duplicate_task = FormFlow::<Record>::builder("f")
            .task("one", |t| t.question_page("a"))
            .task("one", |t| t.question_page("b"))
            .build();
        assert_eq!(
            duplicate_task.err(),
            Some(FormError::DuplicateTask("one".to_string()))
        );
    }

    #[test]
    fn test_start_and_end_paths() {
        let router = PathRouter::new("apps");
        let defaults = flow();
        assert_eq!(defaults.start_path(&Record, &router).as_str(), "/apps/3");
        assert_eq!(defaults.end_path(&Record, &router).as_str(), "/apps/3");

        let configured = FormFlow::builder("f")
            .start_page("before_you_start")
            .unwrap()
            .end_page("check_answers")
            .unwrap()
            .task("personal_info", |t| t.question_page("name"))
            .build()
            .unwrap();
        assert_eq!(
            configured.start_path(&Record, &router).as_str(),
            "/apps/3/before_you_start"
        );
        assert_eq!(
            configured.end_path(&Record, &router).as_str(),
            "/apps/3/check_answers"
        );
        assert_eq!(configured.start_page(), Some("before_you_start"));
    }

    #[test]
    fn test_flow_level_navigation_falls_through_to_flow_edges() {
        let flow = flow();
        let router = PathRouter::new("apps");

        assert_eq!(
            flow.next_path_after("name", &Record, &router).unwrap().as_str(),
            "/apps/3/dob/edit"
        );
        assert_eq!(
            flow.next_path_after("dob", &Record, &router).unwrap().as_str(),
            "/apps/3"
        );
        assert_eq!(
            flow.prev_path_before("name", &Record, &router).unwrap().as_str(),
            "/apps/3"
        );
        assert!(matches!(
            flow.next_path_after("missing", &Record, &router),
            Err(FormError::UnknownPage(_))
        ));
    }

    #[test]
    fn test_task_lookup_and_completion() {
        let flow = flow();
        assert_eq!(flow.task_for_page("dob").map(|t| t.name()), Some("personal_info"));
        assert!(flow.task_for_page("nope").is_none());
        assert!(!flow.completed(&Record));

        let evaluator = flow.evaluator("dob", &Record).unwrap();
        assert_eq!(evaluator.current_index(), 1);
    }
}
