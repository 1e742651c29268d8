pub mod error;
pub mod event;
pub mod hook;

pub use error::{HookError, HookflowError, HookflowResult, RegistryError};
pub use event::channel::{PipelineEvent, PipelineEventChannel, PipelineEventKind};
pub use hook::config::ExecutorConfig;
pub use hook::context::HookContext;
pub use hook::executor::HookExecutor;
pub use hook::filter::HookFilter;
pub use hook::registry::{HookRegistry, SharedRegistry};
pub use hook::result::{ExecutionResult, HookFailure, HookResult};
pub use hook::{Hook, HookEvent};
