use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::hook::HookEvent;

/// Per-invocation input handed to every hook of one run.
///
/// Built fresh by the command router for each invocation. The executor shares
/// it between hooks read-only; hooks report changes through their verdict.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HookContext {
    pub event: HookEvent,
    pub command: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub framework_root: PathBuf,
    /// The failure being reported, only for `on-error` runs
    pub error: Option<String>,
    /// Auxiliary payload, e.g. the command's output for `post-command`
    pub data: Option<Value>,
}

impl HookContext {
    pub fn new(event: HookEvent, command: impl Into<String>) -> Self {
        Self {
            event,
            command: command.into(),
            args: Vec::new(),
            cwd: PathBuf::new(),
            framework_root: PathBuf::new(),
            error: None,
            data: None,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = cwd.into();
        self
    }

    pub fn with_framework_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.framework_root = root.into();
        self
    }

    pub fn with_error(mut self, error: impl ToString) -> Self {
        self.error = Some(error.to_string());
        self
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn framework_root(&self) -> &Path {
        &self.framework_root
    }
}
