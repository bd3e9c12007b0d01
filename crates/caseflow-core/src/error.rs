use thiserror::Error;

/// Core error type for the caseflow runtime
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Process definition is inconsistent (unknown step, missing start step, ...)
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A step name is not present in the step registry
    #[error("Step not found: {0}")]
    StepNotFound(String),

    /// A start event arrived but no start handler is registered for it
    #[error("Start handler missing for event: {0}")]
    StartHandlerMissing(String),

    /// Case not found
    #[error("Case not found: {0}")]
    CaseNotFound(String),

    /// Event is malformed for the process handling it
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// Event bus error
    #[error("Event bus error: {0}")]
    EventBusError(String),

    /// State store error
    #[error("State store error: {0}")]
    StateStoreError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Process document could not be read
    #[error("Process document error: {0}")]
    DocumentError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl CoreError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            CoreError::ConfigurationError(_) => "ERR_CONFIGURATION",
            CoreError::StepNotFound(_) => "ERR_STEP_NOT_FOUND",
            CoreError::StartHandlerMissing(_) => "ERR_START_HANDLER_MISSING",
            CoreError::CaseNotFound(_) => "ERR_CASE_NOT_FOUND",
            CoreError::InvalidEvent(_) => "ERR_INVALID_EVENT",
            CoreError::EventBusError(_) => "ERR_EVENT_BUS",
            CoreError::StateStoreError(_) => "ERR_STATE_STORE",
            CoreError::SerializationError(_) => "ERR_SERIALIZATION",
            CoreError::DocumentError(_) => "ERR_DOCUMENT",
            CoreError::Other(_) => "ERR_OTHER",
        }
    }

    /// Whether the error is a programmer/configuration mistake rather than a runtime failure
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            CoreError::ConfigurationError(_)
                | CoreError::StepNotFound(_)
                | CoreError::StartHandlerMissing(_)
        )
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::SerializationError(err.to_string())
    }
}

impl From<serde_yaml::Error> for CoreError {
    fn from(err: serde_yaml::Error) -> Self {
        CoreError::DocumentError(err.to_string())
    }
}

impl From<String> for CoreError {
    fn from(err: String) -> Self {
        CoreError::Other(err)
    }
}

impl From<&str> for CoreError {
    fn from(err: &str) -> Self {
        CoreError::Other(err.to_string())
    }
}
