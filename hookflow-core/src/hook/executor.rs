use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::HookError;
use crate::event::channel::{PipelineEventChannel, PipelineEventKind};
use crate::hook::config::ExecutorConfig;
use crate::hook::context::HookContext;
use crate::hook::registry::SharedRegistry;
use crate::hook::result::{ExecutionResult, HookResult};
use crate::hook::{Hook, HookEvent};

/// Runs one ordered walk over the hooks matching an event and command.
///
/// Hooks run strictly one after another. A `Block` verdict ends the run, a
/// failing hook is recorded in `errors` and the walk goes on, `Modify`
/// payloads are shallow-merged with later hooks winning.
pub struct HookExecutor {
    registry: SharedRegistry,
    config: ExecutorConfig,
    channel: Option<PipelineEventChannel>,
}

impl HookExecutor {
    pub fn new(registry: SharedRegistry) -> Self {
        Self {
            registry,
            config: ExecutorConfig::default(),
            channel: None,
        }
    }

    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_channel(mut self, channel: PipelineEventChannel) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub async fn execute(&self, event: HookEvent, context: HookContext) -> ExecutionResult {
        let run_id = Uuid::new_v4();
        let mut result = ExecutionResult::new(run_id);

        if context.event != event {
            log::warn!(
                "Executing '{}' hooks with a context built for '{}' (command '{}')",
                event,
                context.event,
                context.command
            );
        }

        // The read guard is released before any hook runs: hooks registered
        // from now on are not part of this run.
        let worklist: Vec<Arc<dyn Hook>> = {
            let registry = self.registry.read().await;
            registry.get_handlers(event, Some(context.command.as_str()))
        }
        .into_iter()
        .filter(|hook| {
            let disabled = self.config.is_disabled(hook.id());
            if disabled {
                log::debug!("Skipping disabled hook '{}'", hook.id());
            }
            !disabled
        })
        .collect();

        if worklist.is_empty() {
            return result;
        }

        let started = Instant::now();
        self.emit(
            run_id,
            PipelineEventKind::RunStarted {
                event,
                command: context.command.clone(),
                hooks: worklist.len(),
            },
        );

        let context = Arc::new(context);
        for hook in worklist {
            let id = hook.id().to_string();
            result.executed.push(id.clone());
            self.emit(
                run_id,
                PipelineEventKind::HookTriggered {
                    hook: id.clone(),
                    priority: hook.priority(),
                },
            );
            log::debug!("Running hook '{}' for '{}' ({})", id, context.command, event);

            let hook_started = Instant::now();
            let outcome = self.invoke(hook, context.clone()).await;
            let duration_ms = elapsed_ms(hook_started);

            match outcome {
                Ok(verdict) => {
                    self.emit(
                        run_id,
                        PipelineEventKind::HookCompleted {
                            hook: id.clone(),
                            duration_ms,
                        },
                    );
                    match verdict {
                        HookResult::Continue => {}
                        HookResult::Block { message } => {
                            log::info!("Hook '{}' blocked '{}': {}", id, context.command, message);
                            self.emit(
                                run_id,
                                PipelineEventKind::RunBlocked {
                                    hook: id.clone(),
                                    message: message.clone(),
                                },
                            );
                            result.record_block(&id, message);
                            return result;
                        }
                        HookResult::Modify { data } => {
                            log::debug!("Hook '{}' contributed {} modification(s)", id, data.len());
                            result.merge_modifications(data);
                        }
                    }
                }
                Err(error) => {
                    log::warn!("Hook '{}' failed on '{}': {}", id, context.command, error);
                    self.emit(
                        run_id,
                        PipelineEventKind::HookFailed {
                            hook: id.clone(),
                            error: error.to_string(),
                            duration_ms,
                        },
                    );
                    result.record_failure(&id, error);
                }
            }
        }

        self.emit(
            run_id,
            PipelineEventKind::RunCompleted {
                executed: result.executed.len(),
                errors: result.errors.len(),
                duration_ms: elapsed_ms(started),
            },
        );
        result
    }

    /// Run a single hook in its own task and wait for it, so a panic or an
    /// overrun becomes a `HookError` instead of tearing down the run.
    ///
    /// The task is aborted if the run is dropped while the hook is pending.
    async fn invoke(
        &self,
        hook: Arc<dyn Hook>,
        context: Arc<HookContext>,
    ) -> Result<HookResult, HookError> {
        let timeout = hook.timeout().or_else(|| self.config.default_timeout());
        let mut task = AbortOnDrop(tokio::spawn(async move { hook.execute(&context).await }));

        let joined = match timeout {
            Some(timeout) => match tokio::time::timeout(timeout, &mut task.0).await {
                Ok(joined) => joined,
                Err(_elapsed) => {
                    task.0.abort();
                    // The next hook must not start while this one is still running.
                    let _ = (&mut task.0).await;
                    return Err(HookError::TimedOut { timeout });
                }
            },
            None => (&mut task.0).await,
        };

        match joined {
            Ok(outcome) => outcome,
            Err(error) if error.is_panic() => Err(HookError::Panicked {
                message: panic_message(error.into_panic()),
            }),
            Err(error) => Err(HookError::failed(error.to_string())),
        }
    }

    fn emit(&self, run_id: Uuid, kind: PipelineEventKind) {
        if let Some(channel) = &self.channel {
            channel.emit(run_id, kind);
        }
    }
}

/// Aborts the hook task when the owning run is dropped
struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
