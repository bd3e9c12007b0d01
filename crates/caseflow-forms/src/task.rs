use crate::page::QuestionPage;
use crate::record::FormRecord;
use crate::routing::{Location, Router};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Progress of a task as shown on a task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// No page is complete
    NotStarted,

    /// Some but not all pages are complete
    InProgress,

    /// Every page is complete
    Completed,
}

/// A named, ordered group of question pages
pub struct Task<R> {
    name: String,
    pages: Vec<QuestionPage<R>>,
}

impl<R> Clone for Task<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            pages: self.pages.clone(),
        }
    }
}

impl<R> fmt::Debug for Task<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("pages", &self.pages)
            .finish()
    }
}

impl<R> Task<R> {
    /// Create a task from its pages
    pub fn new(name: impl Into<String>, pages: Vec<QuestionPage<R>>) -> Self {
        Self {
            name: name.into(),
            pages,
        }
    }

    /// Task name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Pages in order
    pub fn pages(&self) -> &[QuestionPage<R>] {
        &self.pages
    }

    /// Position of a page within the task
    pub fn page_index(&self, page: &str) -> Option<usize> {
        self.pages.iter().position(|p| p.name() == page)
    }
}

impl<R: FormRecord> Task<R> {
    /// Any page is complete
    pub fn started(&self, record: &R) -> bool {
        self.pages.iter().any(|p| p.completed(record))
    }

    /// Every page is complete; vacuously true for a task without pages
    pub fn completed(&self, record: &R) -> bool {
        self.pages.iter().all(|p| p.completed(record))
    }

    /// Task list status
    pub fn status(&self, record: &R) -> TaskStatus {
        if self.completed(record) {
            TaskStatus::Completed
        } else if self.started(record) {
            TaskStatus::InProgress
        } else {
            TaskStatus::NotStarted
        }
    }

    /// Entry point into the task.
    ///
    /// Unstarted and finished tasks open on their first page; a task in
    /// progress resumes at its first incomplete page that applies to the
    /// record. A task without pages has no entry point.
    pub fn path(&self, record: &R, router: &dyn Router<R>) -> Option<Location> {
        let first = self.pages.first()?;

        let page = if !self.started(record) || self.completed(record) {
            first
        } else {
            self.pages
                .iter()
                .find(|p| !p.completed(record) && p.needed(record))
                .unwrap_or(first)
        };

        Some(router.locate(&page.edit_route(), record))
    }
}
