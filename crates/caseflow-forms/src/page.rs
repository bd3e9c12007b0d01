use crate::record::FormRecord;
use crate::routing::Route;
use std::fmt;
use std::sync::Arc;

/// Decides whether a page applies to a record
pub type Applicability<R> = Arc<dyn Fn(&R) -> bool + Send + Sync>;

/// One navigable, independently validated page of a form
pub struct QuestionPage<R> {
    name: String,
    fields: Vec<String>,
    applicability: Option<Applicability<R>>,
}

impl<R> Clone for QuestionPage<R> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            fields: self.fields.clone(),
            applicability: self.applicability.clone(),
        }
    }
}

impl<R> fmt::Debug for QuestionPage<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuestionPage")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("conditional", &self.applicability.is_some())
            .finish()
    }
}

impl<R> QuestionPage<R> {
    /// A page whose single field shares its name
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            fields: vec![name.clone()],
            name,
            applicability: None,
        }
    }

    /// Replace the page's fields. An empty list keeps the default `[name]`.
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if !fields.is_empty() {
            self.fields = fields;
        }
        self
    }

    /// Only show the page when the predicate holds for the record
    pub fn needed_when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&R) -> bool + Send + Sync + 'static,
    {
        self.applicability = Some(Arc::new(predicate));
        self
    }

    /// Page name, also its validation context
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field identifiers submitted by the page
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Whether the page has an applicability predicate
    pub fn is_conditional(&self) -> bool {
        self.applicability.is_some()
    }

    /// Whether the page should be shown for this record
    pub fn needed(&self, record: &R) -> bool {
        self.applicability
            .as_ref()
            .map_or(true, |predicate| predicate(record))
    }

    /// Route rendering the page
    pub fn edit_route(&self) -> Route {
        Route::Edit(self.name.clone())
    }

    /// Route receiving the page's submission
    pub fn update_route(&self) -> Route {
        Route::Update(self.name.clone())
    }
}

impl<R: FormRecord> QuestionPage<R> {
    /// Whether the record is valid under this page's context. Never cached.
    pub fn completed(&self, record: &R) -> bool {
        record.is_valid_in(&self.name)
    }
}
