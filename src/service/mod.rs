//! The remote generation service boundary.

mod gemini;

pub use gemini::GeminiService;

use crate::config::ApiKey;
use crate::error::Result;
use crate::media::MediaPayload;
use crate::video::{JobHandle, VideoJob, VideoOptions};
use async_trait::async_trait;

/// Operations the generation client needs from the remote service.
///
/// Every call takes the credential explicitly.
#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Runs a single content-generation request.
    async fn generate_content(
        &self,
        key: &ApiKey,
        request: ContentRequest,
    ) -> Result<ContentResponse>;

    /// Creates a video job and returns its first snapshot.
    async fn submit_video(&self, key: &ApiKey, request: VideoJobRequest) -> Result<VideoJob>;

    /// Fetches a fresh snapshot of a video job.
    async fn refresh_video(&self, key: &ApiKey, handle: &JobHandle) -> Result<VideoJob>;
}

/// Response modality requested from a content-generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    /// Text output.
    Text,
    /// Image output.
    Image,
}

impl Modality {
    /// Returns the wire value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "TEXT",
            Self::Image => "IMAGE",
        }
    }
}

/// A fragment of request or response content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Part {
    /// Plain text.
    Text(String),
    /// Inline binary data.
    InlineData(MediaPayload),
}

impl Part {
    /// Returns the inline payload, if this is a data part.
    pub fn inline_data(&self) -> Option<&MediaPayload> {
        match self {
            Self::InlineData(payload) => Some(payload),
            Self::Text(_) => None,
        }
    }
}

/// A content-generation request.
#[derive(Debug, Clone)]
pub struct ContentRequest {
    /// Model identifier.
    pub model: String,
    /// Ordered input parts.
    pub parts: Vec<Part>,
    /// Requested output modalities.
    pub response_modalities: Vec<Modality>,
}

/// The content returned by a content-generation call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentResponse {
    /// Parts of the first candidate, in order.
    pub parts: Vec<Part>,
    /// Why the candidate stopped, if reported.
    pub finish_reason: Option<String>,
    /// Why the prompt was blocked, if it was.
    pub block_reason: Option<String>,
}

/// A video job creation request.
#[derive(Debug, Clone)]
pub struct VideoJobRequest {
    /// Model identifier.
    pub model: String,
    /// Text instruction.
    pub prompt: String,
    /// Primary (first frame) image.
    pub start_frame: MediaPayload,
    /// Last-frame hint.
    pub last_frame: MediaPayload,
    /// Output options.
    pub options: VideoOptions,
}
