//! Generative Language REST API implementation of [`GenerationService`].

use crate::config::{ApiKey, Config, DEFAULT_BASE_URL};
use crate::error::{parse_retry_after, FramecraftError, RemoteError, Result};
use crate::media::MediaPayload;
use crate::service::{
    ContentRequest, ContentResponse, GenerationService, Part, VideoJobRequest,
};
use crate::video::{GeneratedVideo, JobError, JobHandle, VideoFile, VideoJob, VideoUrl};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// HTTP client for Gemini image generation and Veo long-running jobs.
#[derive(Debug, Clone)]
pub struct GeminiService {
    client: reqwest::Client,
    base_url: String,
}

impl Default for GeminiService {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl GeminiService {
    /// Creates a service rooted at `base_url` (e.g. `.../v1beta`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Creates a service using an existing HTTP client.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Creates a service for the endpoint named in `config`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.base_url())
    }

    /// Returns the REST base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Downloads a finished video.
    pub async fn download(&self, url: &VideoUrl) -> Result<Vec<u8>> {
        if url.location().starts_with("gs://") {
            return Err(FramecraftError::NoResult(format!(
                "video is stored at a Cloud Storage URI ({}) that cannot be fetched over HTTP",
                url.location()
            )));
        }

        let response = self.client.get(url.as_str()).send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let retry_after = parse_retry_after(response.headers()).map(std::time::Duration::from_secs);
        let text = response.text().await.unwrap_or_default();
        Err(RemoteError::from_http(status.as_u16(), &text, retry_after).into())
    }

    async fn post_json<B, R>(&self, url: &str, key: &ApiKey, body: &B) -> Result<R>
    where
        B: Serialize + Sync,
        R: for<'de> Deserialize<'de>,
    {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", key.expose())
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl GenerationService for GeminiService {
    async fn generate_content(
        &self,
        key: &ApiKey,
        request: ContentRequest,
    ) -> Result<ContentResponse> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, request.model
        );
        let body = GeminiRequest::from_content_request(&request);
        let response: GeminiResponse = self.post_json(&url, key, &body).await?;
        Ok(response.into_content_response())
    }

    async fn submit_video(&self, key: &ApiKey, request: VideoJobRequest) -> Result<VideoJob> {
        let url = format!(
            "{}/models/{}:predictLongRunning",
            self.base_url, request.model
        );
        let body = VeoRequest::from_job_request(&request);
        let operation: VeoOperation = self.post_json(&url, key, &body).await?;
        Ok(operation.into_job())
    }

    async fn refresh_video(&self, key: &ApiKey, handle: &JobHandle) -> Result<VideoJob> {
        let url = format!("{}/{}", self.base_url, handle.as_str());
        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", key.expose())
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        let operation: VeoOperation = response.json().await?;
        Ok(operation.into_job())
    }
}

// ── generateContent wire format ─────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GeminiConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    parts: Vec<GeminiRequestPart>,
}

/// A part in a Gemini request - text or inline data.
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum GeminiRequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: MediaPayload,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiConfig {
    response_modalities: Vec<&'static str>,
}

impl GeminiRequest {
    fn from_content_request(req: &ContentRequest) -> Self {
        let parts = req
            .parts
            .iter()
            .map(|part| match part {
                Part::Text(text) => GeminiRequestPart::Text { text: text.clone() },
                Part::InlineData(payload) => GeminiRequestPart::InlineData {
                    inline_data: payload.clone(),
                },
            })
            .collect();

        Self {
            contents: vec![GeminiContent { parts }],
            generation_config: GeminiConfig {
                response_modalities: req.response_modalities.iter().map(|m| m.as_str()).collect(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPartResponse {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

impl GeminiResponse {
    fn into_content_response(self) -> ContentResponse {
        let block_reason = self.prompt_feedback.and_then(|f| f.block_reason);
        let Some(candidate) = self.candidates.into_iter().next() else {
            return ContentResponse {
                block_reason,
                ..ContentResponse::default()
            };
        };

        let parts = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|part| match (part.inline_data, part.text) {
                (Some(inline), _) => Some(Part::InlineData(MediaPayload::from_encoded(
                    inline.data,
                    inline.mime_type,
                ))),
                (None, Some(text)) => Some(Part::Text(text)),
                (None, None) => None,
            })
            .collect();

        ContentResponse {
            parts,
            finish_reason: candidate.finish_reason,
            block_reason,
        }
    }
}

// ── predictLongRunning wire format ──────────────────────────────────────────

#[derive(Debug, Serialize)]
struct VeoRequest {
    instances: Vec<VeoInstance>,
    parameters: VeoParameters,
}

/// Media payload wrapping `inlineData`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VeoMediaData {
    inline_data: MediaPayload,
}

#[derive(Debug, Serialize)]
struct VeoInstance {
    prompt: String,
    image: VeoMediaData,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VeoParameters {
    aspect_ratio: &'static str,
    resolution: &'static str,
    number_of_videos: u32,
    last_frame: VeoMediaData,
}

impl VeoRequest {
    fn from_job_request(req: &VideoJobRequest) -> Self {
        Self {
            instances: vec![VeoInstance {
                prompt: req.prompt.clone(),
                image: VeoMediaData {
                    inline_data: req.start_frame.clone(),
                },
            }],
            parameters: VeoParameters {
                aspect_ratio: req.options.aspect_ratio.as_str(),
                resolution: req.options.resolution.as_str(),
                number_of_videos: req.options.count,
                last_frame: VeoMediaData {
                    inline_data: req.last_frame.clone(),
                },
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct VeoOperation {
    name: String,
    #[serde(default)]
    done: Option<bool>,
    #[serde(default)]
    response: Option<VeoVideoResponse>,
    #[serde(default)]
    error: Option<VeoError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VeoVideoResponse {
    #[serde(default)]
    generate_video_response: Option<VeoGenerateVideoResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VeoGenerateVideoResponse {
    #[serde(default)]
    generated_samples: Vec<VeoGeneratedSample>,
    #[serde(default)]
    rai_media_filtered_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct VeoGeneratedSample {
    #[serde(default)]
    video: Option<VeoVideo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VeoVideo {
    #[serde(default)]
    uri: Option<String>,
    #[serde(default)]
    mime_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VeoError {
    #[serde(default)]
    code: Option<i32>,
    #[serde(default)]
    message: Option<String>,
}

impl VeoOperation {
    fn into_job(self) -> VideoJob {
        let generated = self.response.and_then(|r| r.generate_video_response);
        let filtered_count = generated
            .as_ref()
            .and_then(|g| g.rai_media_filtered_count)
            .unwrap_or(0);
        let generated_videos = generated
            .map(|g| g.generated_samples)
            .unwrap_or_default()
            .into_iter()
            .map(|sample| GeneratedVideo {
                video: sample.video.map(|v| VideoFile {
                    uri: v.uri,
                    mime_type: v.mime_type,
                }),
            })
            .collect();

        VideoJob {
            handle: JobHandle::new(self.name),
            done: self.done.unwrap_or(false),
            generated_videos,
            filtered_count,
            error: self.error.map(|e| JobError {
                code: e.code,
                message: e.message,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::Modality;
    use crate::video::VideoOptions;

    fn png() -> MediaPayload {
        MediaPayload::from_bytes(&[0x89, 0x50, 0x4E, 0x47], "image/png")
    }

    fn jpeg() -> MediaPayload {
        MediaPayload::from_bytes(&[0xFF, 0xD8, 0xFF], "image/jpeg")
    }

    #[test]
    fn test_content_request_serialization() {
        let req = ContentRequest {
            model: "gemini-2.5-flash-image".into(),
            parts: vec![Part::InlineData(png()), Part::Text("Add a hat".into())],
            response_modalities: vec![Modality::Image],
        };
        let json = serde_json::to_value(GeminiRequest::from_content_request(&req)).unwrap();

        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], png().data());
        assert_eq!(parts[1]["text"], "Add a hat");
        assert_eq!(json["generationConfig"]["responseModalities"][0], "IMAGE");
        assert!(json.get("generation_config").is_none());
    }

    #[test]
    fn test_response_keeps_part_order() {
        let json = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "Here is your image"},
                        {"inlineData": {"mimeType": "image/png", "data": "iVBORw0KGgo="}},
                        {}
                    ]
                },
                "finishReason": "STOP"
            }]
        }"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        let content = resp.into_content_response();

        assert_eq!(content.parts.len(), 2);
        assert_eq!(content.parts[0], Part::Text("Here is your image".into()));
        let inline = content.parts[1].inline_data().unwrap();
        assert_eq!(inline.mime_type(), "image/png");
        assert_eq!(inline.data(), "iVBORw0KGgo=");
        assert_eq!(content.finish_reason.as_deref(), Some("STOP"));
    }

    #[test]
    fn test_response_prompt_blocked() {
        let json = r#"{
            "candidates": [],
            "promptFeedback": {"blockReason": "SAFETY"}
        }"#;
        let resp: GeminiResponse = serde_json::from_str(json).unwrap();
        let content = resp.into_content_response();
        assert!(content.parts.is_empty());
        assert_eq!(content.block_reason.as_deref(), Some("SAFETY"));
    }

    #[test]
    fn test_video_request_serialization() {
        let req = VideoJobRequest {
            model: "veo-3.1-fast-generate-preview".into(),
            prompt: "sunrise time-lapse".into(),
            start_frame: png(),
            last_frame: jpeg(),
            options: VideoOptions::default(),
        };
        let json = serde_json::to_value(VeoRequest::from_job_request(&req)).unwrap();

        let instance = &json["instances"][0];
        assert_eq!(instance["prompt"], "sunrise time-lapse");
        assert_eq!(instance["image"]["inlineData"]["mimeType"], "image/png");
        assert_eq!(instance["image"]["inlineData"]["data"], png().data());

        let params = &json["parameters"];
        assert_eq!(params["lastFrame"]["inlineData"]["mimeType"], "image/jpeg");
        assert_eq!(params["lastFrame"]["inlineData"]["data"], jpeg().data());
        assert_eq!(params["numberOfVideos"], 1);
        assert_eq!(params["resolution"], "720p");
        assert_eq!(params["aspectRatio"], "16:9");
    }

    #[test]
    fn test_operation_not_done() {
        let json = r#"{"name": "models/veo/operations/123"}"#;
        let op: VeoOperation = serde_json::from_str(json).unwrap();
        let job = op.into_job();
        assert_eq!(job.handle.as_str(), "models/veo/operations/123");
        assert!(!job.done);
        assert!(job.generated_videos.is_empty());
        assert!(job.error.is_none());
    }

    #[test]
    fn test_operation_done_with_video() {
        let json = r#"{
            "name": "operations/123",
            "done": true,
            "response": {
                "@type": "type.googleapis.com/google.ai.generativelanguage.v1beta.PredictLongRunningResponse",
                "generateVideoResponse": {
                    "generatedSamples": [{
                        "video": {"uri": "https://example.com/files/abc:download?alt=media"}
                    }]
                }
            }
        }"#;
        let op: VeoOperation = serde_json::from_str(json).unwrap();
        let job = op.into_job();
        assert!(job.done);
        assert_eq!(
            job.result_uri(),
            Some("https://example.com/files/abc:download?alt=media")
        );
    }

    #[test]
    fn test_operation_filtered() {
        let json = r#"{
            "name": "operations/123",
            "done": true,
            "response": {
                "generateVideoResponse": {"raiMediaFilteredCount": 1}
            }
        }"#;
        let job = serde_json::from_str::<VeoOperation>(json).unwrap().into_job();
        assert_eq!(job.filtered_count, 1);
        assert_eq!(job.result_uri(), None);
    }

    #[test]
    fn test_operation_with_error() {
        let json = r#"{
            "name": "operations/123",
            "done": true,
            "error": {"code": 8, "message": "Quota exceeded"}
        }"#;
        let job = serde_json::from_str::<VeoOperation>(json).unwrap().into_job();
        let err = job.error.unwrap();
        assert_eq!(err.code, Some(8));
        assert_eq!(err.message.as_deref(), Some("Quota exceeded"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let service = GeminiService::new("http://localhost:1234/v1beta/");
        assert_eq!(service.base_url(), "http://localhost:1234/v1beta");
    }

    #[tokio::test]
    async fn test_download_rejects_gcs_uri() {
        let service = GeminiService::default();
        let key = ApiKey::new("test-key").unwrap();
        let url = VideoUrl::with_key("gs://bucket/video.mp4", &key);

        let err = service.download(&url).await.unwrap_err();
        assert!(
            err.to_string().contains("Cloud Storage"),
            "Expected GCS error, got: {err}"
        );
    }
}
