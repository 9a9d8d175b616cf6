//! Status notices emitted to the host while a request is handled.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A progress or warning notice shown by the host next to the chat turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEvent {
    pub description: String,
    pub done: bool,
}

impl StatusEvent {
    pub fn progress(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            done: false,
        }
    }

    pub fn finished(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            done: true,
        }
    }
}

/// Event envelope understood by the host's event emitter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum HostEvent {
    Status(StatusEvent),
}

impl From<StatusEvent> for HostEvent {
    fn from(event: StatusEvent) -> Self {
        Self::Status(event)
    }
}

/// Callback receiving status events.
pub type StatusSink = Arc<dyn Fn(StatusEvent) + Send + Sync>;
