use crate::error::FormError;
use crate::page::QuestionPage;
use crate::record::FormRecord;
use crate::routing::{Location, Router};
use crate::task::Task;
use serde::{Deserialize, Serialize};

/// How previous/next pages are chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationMode {
    /// Walk the page list and skip pages that do not apply to the record
    #[default]
    SkipInapplicable,

    /// Plain `index ± 1`, ignoring applicability
    Sequential,
}

/// Request-scoped navigation view over one page of a task
pub struct TaskEvaluator<'a, R> {
    task: &'a Task<R>,
    record: &'a R,
    current: usize,
    mode: NavigationMode,
}

impl<'a, R: FormRecord> TaskEvaluator<'a, R> {
    /// Evaluate navigation around `pages[current]`
    pub fn new(task: &'a Task<R>, record: &'a R, current: usize) -> Result<Self, FormError> {
        if current >= task.pages().len() {
            return Err(FormError::UnknownPage(format!(
                "index {} in task {}",
                current,
                task.name()
            )));
        }
        Ok(Self {
            task,
            record,
            current,
            mode: NavigationMode::default(),
        })
    }

    /// Evaluate navigation around the named page
    pub fn for_page(task: &'a Task<R>, record: &'a R, page: &str) -> Result<Self, FormError> {
        let current = task
            .page_index(page)
            .ok_or_else(|| FormError::UnknownPage(page.to_string()))?;
        Self::new(task, record, current)
    }

    /// Switch navigation mode
    pub fn with_mode(mut self, mode: NavigationMode) -> Self {
        self.mode = mode;
        self
    }

    /// The task being navigated
    pub fn task(&self) -> &'a Task<R> {
        self.task
    }

    /// Index of the current page
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// The current page
    pub fn current_page(&self) -> &'a QuestionPage<R> {
        &self.task.pages()[self.current]
    }

    /// The next page to show, if any
    pub fn next_page(&self) -> Option<&'a QuestionPage<R>> {
        let pages = self.task.pages();
        match self.mode {
            NavigationMode::SkipInapplicable => pages[self.current + 1..]
                .iter()
                .find(|p| p.needed(self.record)),
            NavigationMode::Sequential => pages.get(self.current + 1),
        }
    }

    /// The previous page to show, if any
    pub fn prev_page(&self) -> Option<&'a QuestionPage<R>> {
        let pages = self.task.pages();
        match self.mode {
            NavigationMode::SkipInapplicable => pages[..self.current]
                .iter()
                .rev()
                .find(|p| p.needed(self.record)),
            NavigationMode::Sequential => self
                .current
                .checked_sub(1)
                .and_then(|i| pages.get(i)),
        }
    }

    /// Edit location of the next page; `None` at the end of the task
    pub fn next_path(&self, router: &dyn Router<R>) -> Option<Location> {
        self.next_page()
            .map(|p| router.locate(&p.edit_route(), self.record))
    }

    /// Edit location of the previous page; `None` at the start of the task
    pub fn prev_path(&self, router: &dyn Router<R>) -> Option<Location> {
        self.prev_page()
            .map(|p| router.locate(&p.edit_route(), self.record))
    }

    /// Submission target for the current page
    pub fn update_path(&self, router: &dyn Router<R>) -> Location {
        router.locate(&self.current_page().update_route(), self.record)
    }
}
