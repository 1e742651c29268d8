use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::HookError;

/// Verdict of a single hook for one context
#[derive(Debug, Clone, PartialEq)]
pub enum HookResult {
    /// No objection, no side data
    Continue,
    /// Veto: the rest of the run is skipped
    Block { message: String },
    /// Side data merged into the run's modifications
    Modify { data: Map<String, Value> },
}

impl HookResult {
    /// Shorthand for `Continue`.
    pub fn continue_() -> Self {
        HookResult::Continue
    }

    /// Shorthand for `Block { message }`.
    pub fn block(message: impl Into<String>) -> Self {
        HookResult::Block {
            message: message.into(),
        }
    }

    /// Shorthand for `Modify { data }`.
    pub fn modify(data: Map<String, Value>) -> Self {
        HookResult::Modify { data }
    }

    /// Build a `Modify` verdict from a JSON value, which must be an object.
    pub fn modify_value(data: Value) -> Result<Self, HookError> {
        match data {
            Value::Object(data) => Ok(HookResult::Modify { data }),
            other => Err(HookError::failed(format!(
                "Modify payload must be a JSON object, found: {}",
                other
            ))),
        }
    }
}

/// A hook invocation that failed instead of producing a verdict
#[derive(Debug, Clone, PartialEq)]
pub struct HookFailure {
    pub hook: String,
    pub error: HookError,
}

/// Aggregated outcome of one run
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub run_id: Uuid,
    pub blocked: bool,
    /// Id of the hook that blocked, only when `blocked`
    pub blocking_hook: Option<String>,
    /// Message of the blocking hook, only when `blocked`
    pub message: Option<String>,
    pub modifications: Map<String, Value>,
    pub errors: Vec<HookFailure>,
    /// Ids of the hooks invoked, in invocation order
    pub executed: Vec<String>,
}

impl ExecutionResult {
    pub(crate) fn new(run_id: Uuid) -> Self {
        Self {
            run_id,
            blocked: false,
            blocking_hook: None,
            message: None,
            modifications: Map::new(),
            errors: Vec::new(),
            executed: Vec::new(),
        }
    }

    pub(crate) fn record_block(&mut self, hook: &str, message: String) {
        self.blocked = true;
        self.blocking_hook = Some(hook.to_string());
        self.message = Some(message);
    }

    /// Shallow merge: a later hook's key overwrites an earlier one's.
    pub(crate) fn merge_modifications(&mut self, data: Map<String, Value>) {
        self.modifications.extend(data);
    }

    pub(crate) fn record_failure(&mut self, hook: &str, error: HookError) {
        self.errors.push(HookFailure {
            hook: hook.to_string(),
            error,
        });
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The blocking hook and its message, if the run was vetoed
    pub fn blocking(&self) -> Option<(&str, &str)> {
        match (&self.blocking_hook, &self.message) {
            (Some(hook), Some(message)) if self.blocked => Some((hook.as_str(), message.as_str())),
            _ => None,
        }
    }
}
