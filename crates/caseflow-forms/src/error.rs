use thiserror::Error;

/// Errors raised while defining or querying a form flow
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    /// `start_page` was called twice
    #[error("Start page already set: {0}")]
    StartPageAlreadySet(String),

    /// `end_page` was called twice
    #[error("End page already set: {0}")]
    EndPageAlreadySet(String),

    /// Two pages share a name, so their validation contexts would collide
    #[error("Duplicate page: {0}")]
    DuplicatePage(String),

    /// Two tasks share a name
    #[error("Duplicate task: {0}")]
    DuplicateTask(String),

    /// A page name is not part of the flow
    #[error("Unknown page: {0}")]
    UnknownPage(String),

    /// The flow has no tasks
    #[error("Flow has no tasks: {0}")]
    EmptyFlow(String),
}

impl FormError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            FormError::StartPageAlreadySet(_) => "ERR_FORM_START_PAGE_SET",
            FormError::EndPageAlreadySet(_) => "ERR_FORM_END_PAGE_SET",
            FormError::DuplicatePage(_) => "ERR_FORM_DUPLICATE_PAGE",
            FormError::DuplicateTask(_) => "ERR_FORM_DUPLICATE_TASK",
            FormError::UnknownPage(_) => "ERR_FORM_UNKNOWN_PAGE",
            FormError::EmptyFlow(_) => "ERR_FORM_EMPTY",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_and_codes() {
        let err = FormError::StartPageAlreadySet("intro".to_string());
        assert_eq!(err.to_string(), "Start page already set: intro");
        assert_eq!(err.error_code(), "ERR_FORM_START_PAGE_SET");

        let err = FormError::UnknownPage("nope".to_string());
        assert_eq!(err.to_string(), "Unknown page: nope");
        assert_eq!(err.error_code(), "ERR_FORM_UNKNOWN_PAGE");
    }
}
