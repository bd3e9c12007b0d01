//! Navigation identifiers and the collaborator that turns them into locations.

use crate::record::FormRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A navigation identifier within a flow
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum Route {
    /// Form for a question page
    Edit(String),

    /// Submission target for a question page
    Update(String),

    /// Any other configured identifier (start page, end page, ...)
    Named(String),
}

impl Route {
    /// Flat identifier, e.g. `edit_name`
    pub fn identifier(&self) -> String {
        match self {
            Route::Edit(page) => format!("edit_{}", page),
            Route::Update(page) => format!("update_{}", page),
            Route::Named(id) => id.clone(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier())
    }
}

/// Edit and update routes for one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRoute {
    /// Page name
    pub page: String,

    /// Route rendering the page
    pub edit: Route,

    /// Route receiving the page's submission
    pub update: Route,
}

/// A concrete navigable location
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(pub String);

impl Location {
    /// Borrow the location string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Location {
    fn from(value: &str) -> Self {
        Location(value.to_string())
    }
}

/// Resolves routes for a record into locations
pub trait Router<R> {
    /// Location of a route for this record
    fn locate(&self, route: &Route, record: &R) -> Location;

    /// The record's overview (task list) location
    fn overview(&self, record: &R) -> Location;
}

/// Router producing REST-style paths under a base segment:
///
/// - `Edit(page)` → `/<base>/<id>/<page>/edit`
/// - `Update(page)` → `/<base>/<id>/<page>`
/// - `Named(id)` → `/<base>/<id>/<identifier>`
/// - overview → `/<base>/<id>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathRouter {
    base: String,
}

impl PathRouter {
    /// Create a router rooted at `base` (leading/trailing slashes are ignored)
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_matches('/').to_string(),
        }
    }

    fn root<R: FormRecord>(&self, record: &R) -> String {
        if self.base.is_empty() {
            format!("/{}", record.record_id())
        } else {
            format!("/{}/{}", self.base, record.record_id())
        }
    }
}

impl<R: FormRecord> Router<R> for PathRouter {
    fn locate(&self, route: &Route, record: &R) -> Location {
        let root = self.root(record);
        match route {
            Route::Edit(page) => Location(format!("{}/{}/edit", root, page)),
            Route::Update(page) => Location(format!("{}/{}", root, page)),
            Route::Named(id) => Location(format!("{}/{}", root, id)),
        }
    }

    fn overview(&self, record: &R) -> Location {
        Location(self.root(record))
    }
}
