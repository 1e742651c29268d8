use std::time::Duration;

use crate::hook::HookEvent;

/// Result type alias for pipeline operations
pub type HookflowResult<T> = Result<T, HookflowError>;

/// Main error type for the hook pipeline
#[derive(Debug, thiserror::Error)]
pub enum HookflowError {
    /// Registration-time configuration errors
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// An event name outside the closed set
    #[error("Unknown hook event '{name}'. Use: pre-command, post-command, on-error, on-deploy")]
    UnknownEvent { name: String },

    /// Executor configuration could not be decoded
    #[error("Invalid executor configuration: {0}")]
    Config(#[from] serde_json::Error),
}

/// Errors raised while populating the registry.
///
/// These surface synchronously from `register`, before any command runs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Hook with id '{id}' is already registered for event '{event}'")]
    DuplicateId { id: String, event: HookEvent },
}

/// A handler invocation that did not produce a verdict.
///
/// Collected by the executor into `ExecutionResult::errors`, never propagated.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HookError {
    /// The handler returned an error
    #[error("{message}")]
    Failed { message: String },

    /// The handler panicked while executing
    #[error("Hook panicked: {message}")]
    Panicked { message: String },

    /// The handler exceeded its time budget
    #[error("Hook timed out after {timeout:?}")]
    TimedOut { timeout: Duration },
}

impl HookError {
    /// Create a failure with the given message
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Failed { message } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<String> for HookError {
    fn from(message: String) -> Self {
        Self::failed(message)
    }
}

impl<'a> From<&'a str> for HookError {
    fn from(message: &'a str) -> Self {
        Self::failed(message)
    }
}

impl From<std::io::Error> for HookError {
    fn from(error: std::io::Error) -> Self {
        Self::failed(error.to_string())
    }
}

impl From<serde_json::Error> for HookError {
    fn from(error: serde_json::Error) -> Self {
        Self::failed(format!("JSON error: {}", error))
    }
}

// Macro for returning handler failures from `Hook::execute`
#[macro_export]
macro_rules! hook_error {
    ($msg:expr) => {
        Err($crate::error::HookError::failed($msg))
    };
    ($fmt:expr, $($arg:tt)*) => {
        Err($crate::error::HookError::failed(format!($fmt, $($arg)*)))
    };
}
