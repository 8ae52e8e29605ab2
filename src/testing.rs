//! In-process test doubles for the service, sleeper and media sources.

use crate::config::ApiKey;
use crate::error::{FramecraftError, RemoteError, Result};
use crate::media::MediaSource;
use crate::service::{ContentRequest, ContentResponse, GenerationService, VideoJobRequest};
use crate::video::{JobHandle, Sleeper, VideoJob};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Shared, ordered record of everything the doubles observed.
#[derive(Debug, Clone, Default)]
pub struct Trace(Arc<Mutex<Vec<String>>>);

impl Trace {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.events().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

pub fn remote(status: u16, canonical: &str) -> FramecraftError {
    let body = format!(r#"{{"error": {{"code": {status}, "message": "scripted failure", "status": "{canonical}"}}}}"#);
    RemoteError::from_http(status, &body, None).into()
}

/// A [`GenerationService`] that replays scripted answers in order.
#[derive(Default)]
pub struct ScriptedService {
    content: Mutex<VecDeque<Result<ContentResponse>>>,
    submit: Mutex<VecDeque<Result<VideoJob>>>,
    refresh: Mutex<VecDeque<Result<VideoJob>>>,
    content_requests: Mutex<Vec<ContentRequest>>,
    video_requests: Mutex<Vec<VideoJobRequest>>,
    trace: Trace,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trace(mut self, trace: Trace) -> Self {
        self.trace = trace;
        self
    }

    pub fn with_content(self, answer: Result<ContentResponse>) -> Self {
        self.content.lock().unwrap().push_back(answer);
        self
    }

    pub fn with_submit(self, answer: Result<VideoJob>) -> Self {
        self.submit.lock().unwrap().push_back(answer);
        self
    }

    pub fn with_refresh(self, answer: Result<VideoJob>) -> Self {
        self.refresh.lock().unwrap().push_back(answer);
        self
    }

    pub fn content_requests(&self) -> Vec<ContentRequest> {
        self.content_requests.lock().unwrap().clone()
    }

    pub fn video_requests(&self) -> Vec<VideoJobRequest> {
        self.video_requests.lock().unwrap().clone()
    }
}

fn unscripted(what: &str) -> FramecraftError {
    FramecraftError::NoResult(format!("unscripted {what} call"))
}

#[async_trait]
impl GenerationService for ScriptedService {
    async fn generate_content(
        &self,
        _key: &ApiKey,
        request: ContentRequest,
    ) -> Result<ContentResponse> {
        self.trace.push("content");
        self.content_requests.lock().unwrap().push(request);
        let next = self.content.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(unscripted("content")))
    }

    async fn submit_video(&self, key: &ApiKey, request: VideoJobRequest) -> Result<VideoJob> {
        self.trace.push(format!("submit key={}", key.expose()));
        self.video_requests.lock().unwrap().push(request);
        let next = self.submit.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(unscripted("submit")))
    }

    async fn refresh_video(&self, _key: &ApiKey, handle: &JobHandle) -> Result<VideoJob> {
        self.trace.push(format!("refresh {handle}"));
        let next = self.refresh.lock().unwrap().pop_front();
        next.unwrap_or_else(|| Err(unscripted("refresh")))
    }
}

/// A sleeper that returns immediately and records each requested delay.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    trace: Trace,
    delays: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new(trace: Trace) -> Self {
        Self {
            trace,
            delays: Arc::default(),
        }
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.trace.push(format!("sleep {}s", duration.as_secs()));
        self.delays.lock().unwrap().push(duration);
    }
}

/// An in-memory source that counts how often it is read.
pub struct CountingSource {
    bytes: Vec<u8>,
    media_type: String,
    reads: AtomicUsize,
}

impl CountingSource {
    pub fn new(bytes: Vec<u8>, media_type: &str) -> Self {
        Self {
            bytes,
            media_type: media_type.to_string(),
            reads: AtomicUsize::new(0),
        }
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MediaSource for CountingSource {
    fn media_type(&self) -> &str {
        &self.media_type
    }

    async fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.bytes.clone())
    }
}
