//! Shared test helpers: recording backend and suggester mocks.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::StreamExt;

use fal_pipe::config::PipeConfig;
use fal_pipe::error::PipeError;
use fal_pipe::models::ModelRegistry;
use fal_pipe::pipe::Pipe;
use fal_pipe::provider::{Arguments, ImageBackend, TagSuggester};
use fal_pipe::types::{ChatMessage, GenerationOutput, PipeRequest, StatusEvent, StatusSink};

/// Backend that records calls and replays a canned result once.
pub struct MockBackend {
    result: Mutex<Option<Result<GenerationOutput, PipeError>>>,
    calls: Mutex<Vec<(String, Arguments)>>,
}

impl MockBackend {
    pub fn returning(output: serde_json::Value) -> Arc<Self> {
        Arc::new(Self {
            result: Mutex::new(Some(GenerationOutput::from_response(output))),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(error: PipeError) -> Arc<Self> {
        Arc::new(Self {
            result: Mutex::new(Some(Err(error))),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<(String, Arguments)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageBackend for MockBackend {
    fn provider_name(&self) -> &str {
        "mock"
    }

    async fn generate(
        &self,
        path: &str,
        arguments: &Arguments,
    ) -> Result<GenerationOutput, PipeError> {
        self.calls
            .lock()
            .unwrap()
            .push((path.to_string(), arguments.clone()));
        self.result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(PipeError::InvalidArgument("no canned result".into())))
    }
}

/// Suggester that records the conversations it was given.
#[derive(Default)]
pub struct MockSuggester {
    pub seen: Mutex<Vec<Vec<ChatMessage>>>,
}

#[async_trait]
impl TagSuggester for MockSuggester {
    async fn suggest_tags(&self, messages: &[ChatMessage]) -> String {
        self.seen.lock().unwrap().push(messages.to_vec());
        r#"{"tags": ["Nature"]}"#.to_string()
    }
}

pub fn keyed_config() -> PipeConfig {
    PipeConfig::builder().fal_key("test-key").build()
}

pub fn pipe_with(
    config: PipeConfig,
    backend: Arc<MockBackend>,
    suggester: Arc<MockSuggester>,
) -> Pipe {
    Pipe::new(config, ModelRegistry::builtin().clone(), backend, suggester).unwrap()
}

/// Run a request to completion, returning reply chunks and status events.
pub async fn run(pipe: &Pipe, request: PipeRequest) -> (Vec<String>, Vec<StatusEvent>) {
    let statuses = Arc::new(Mutex::new(Vec::new()));
    let recorded = statuses.clone();
    let sink: StatusSink = Arc::new(move |event: StatusEvent| recorded.lock().unwrap().push(event));
    let chunks = pipe.handle(request, Some(sink)).collect::<Vec<_>>().await;
    let statuses = statuses.lock().unwrap().clone();
    (chunks, statuses)
}
