//! Lifecycle hooks for observing and vetoing command invocations.
//!
//! Extensions implement [`Hook`] and are registered once in a
//! [`registry::HookRegistry`]. For every lifecycle moment the command router
//! calls [`executor::HookExecutor::execute`], which walks the matching hooks in
//! ascending priority order and folds their verdicts into one
//! [`result::ExecutionResult`].

use std::str::FromStr;
use std::time::Duration;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::{HookError, HookflowError};
use crate::hook::context::HookContext;
use crate::hook::filter::HookFilter;
use crate::hook::result::HookResult;

pub mod config;
pub mod context;
pub mod executor;
pub mod filter;
pub mod priority;
pub mod registry;
pub mod result;

/// Lifecycle moments a hook can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HookEvent {
    /// Before a command is dispatched
    #[display("pre-command")]
    PreCommand,
    /// After a command completed successfully
    #[display("post-command")]
    PostCommand,
    /// When a command failed
    #[display("on-error")]
    OnError,
    /// When a deployment-style action occurs
    #[display("on-deploy")]
    OnDeploy,
}

impl HookEvent {
    pub const ALL: [HookEvent; 4] = [
        HookEvent::PreCommand,
        HookEvent::PostCommand,
        HookEvent::OnError,
        HookEvent::OnDeploy,
    ];
}

impl FromStr for HookEvent {
    type Err = HookflowError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|event| event.to_string() == name)
            .ok_or_else(|| HookflowError::UnknownEvent {
                name: name.to_string(),
            })
    }
}

/// The contract every extension implements.
///
/// `id` must be unique across the whole registry, whatever the event.
/// Lower `priority` runs earlier.
#[async_trait::async_trait]
pub trait Hook: Send + Sync {
    fn id(&self) -> &str;

    fn event(&self) -> HookEvent;

    fn priority(&self) -> i32 {
        priority::DEFAULT
    }

    /// Restricts the commands this hook runs for. `None` matches every command.
    fn filter(&self) -> Option<&HookFilter> {
        None
    }

    /// Time budget for a single invocation, overriding the executor default.
    ///
    /// An overrun is cancelled at its next `.await`. Blocking code cannot be
    /// preempted: the executor waits for it to return before the next hook
    /// starts, and only then records the timeout.
    fn timeout(&self) -> Option<Duration> {
        None
    }

    /// Produce a verdict for one invocation.
    ///
    /// Returning `Err` does not stop the pipeline: the executor records the
    /// failure and moves on to the next hook.
    async fn execute(&self, context: &HookContext) -> Result<HookResult, HookError>;
}
