use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::hook::HookEvent;

/// Channel reporting pipeline progress to an observer
#[derive(Debug, Clone)]
pub struct PipelineEventChannel {
    sender: mpsc::UnboundedSender<PipelineEvent>,
}

impl PipelineEventChannel {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PipelineEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }

    /// Send an event. A closed receiver is not an error for the run.
    pub fn emit(&self, run_id: Uuid, kind: PipelineEventKind) {
        let event = PipelineEvent {
            id: Uuid::new_v4(),
            run_id,
            timestamp: Utc::now(),
            kind,
        };
        if self.sender.send(event).is_err() {
            log::trace!("Pipeline event receiver dropped, event discarded");
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineEvent {
    pub id: Uuid,
    pub run_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub kind: PipelineEventKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEventKind {
    RunStarted {
        event: HookEvent,
        command: String,
        hooks: usize,
    },
    HookTriggered {
        hook: String,
        priority: i32,
    },
    HookCompleted {
        hook: String,
        duration_ms: u64,
    },
    HookFailed {
        hook: String,
        error: String,
        duration_ms: u64,
    },
    RunBlocked {
        hook: String,
        message: String,
    },
    RunCompleted {
        executed: usize,
        errors: usize,
        duration_ms: u64,
    },
}

impl PipelineEvent {
    pub fn is_error(&self) -> bool {
        matches!(self.kind, PipelineEventKind::HookFailed { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            PipelineEventKind::RunBlocked { .. } | PipelineEventKind::RunCompleted { .. }
        )
    }

    pub fn duration(&self) -> Option<u64> {
        match &self.kind {
            PipelineEventKind::HookCompleted { duration_ms, .. } => Some(*duration_ms),
            PipelineEventKind::HookFailed { duration_ms, .. } => Some(*duration_ms),
            PipelineEventKind::RunCompleted { duration_ms, .. } => Some(*duration_ms),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn emitted_events_carry_run_id() {
        let (channel, mut receiver) = PipelineEventChannel::new();
        let run_id = Uuid::new_v4();
        channel.emit(
            run_id,
            PipelineEventKind::HookFailed {
                hook: "tracer".to_string(),
                error: "boom".to_string(),
                duration_ms: 3,
            },
        );

        let event = receiver.recv().await.unwrap();
        assert_eq!(event.run_id, run_id);
        assert!(event.is_error());
        assert!(!event.is_terminal());
        assert_eq!(event.duration(), Some(3));
    }

    #[test]
    fn closed_receiver_is_ignored() {
        let (channel, receiver) = PipelineEventChannel::new();
        drop(receiver);
        channel.emit(
            Uuid::new_v4(),
            PipelineEventKind::RunCompleted {
                executed: 0,
                errors: 0,
                duration_ms: 0,
            },
        );
    }
}
