use std::time::Duration;

use serde::Deserialize;
use serde_json::Value;
use smart_default::SmartDefault;

use crate::error::HookflowResult;

/// Executor settings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, SmartDefault)]
#[serde(default, rename_all = "camelCase")]
pub struct ExecutorConfig {
    /// Time budget applied to hooks that do not declare their own. `None` waits forever.
    pub default_timeout_ms: Option<u64>,
    /// Hook ids the user turned off; they are neither invoked nor reported as executed
    pub disabled_hooks: Vec<String>,
}

impl ExecutorConfig {
    pub fn from_value(value: Value) -> HookflowResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn with_default_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn disable(mut self, id: impl Into<String>) -> Self {
        self.disabled_hooks.push(id.into());
        self
    }

    pub fn default_timeout(&self) -> Option<Duration> {
        self.default_timeout_ms.map(Duration::from_millis)
    }

    pub fn is_disabled(&self, id: &str) -> bool {
        self.disabled_hooks.iter().any(|it| it == id)
    }
}
