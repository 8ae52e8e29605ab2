//! Long-running video job snapshots and the pure rules for polling them.

use crate::config::ApiKey;
use crate::error::{FramecraftError, RemoteError, Result};
use std::fmt;
use std::time::Duration;

/// Fixed delay between status checks.
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Opaque handle of a remote operation (e.g. `models/veo/operations/abc`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle(String);

impl JobHandle {
    /// Wraps an operation name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the operation name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Output resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Resolution {
    /// 1280x720.
    #[default]
    Hd,
    /// 1920x1080.
    FullHd,
}

impl Resolution {
    /// Returns the wire value (e.g. "720p").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hd => "720p",
            Self::FullHd => "1080p",
        }
    }
}

/// Video aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectRatio {
    /// 16:9 landscape.
    #[default]
    Landscape,
    /// 9:16 portrait.
    Portrait,
}

impl AspectRatio {
    /// Returns the wire value (e.g. "16:9").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
        }
    }
}

/// Generation options sent with a job.
///
/// [`GenerationClient::generate_video`](crate::GenerationClient::generate_video)
/// always uses the defaults: one 720p 16:9 video.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoOptions {
    /// Output resolution.
    pub resolution: Resolution,
    /// Output aspect ratio.
    pub aspect_ratio: AspectRatio,
    /// Number of videos to generate.
    pub count: u32,
}

impl Default for VideoOptions {
    fn default() -> Self {
        Self {
            resolution: Resolution::Hd,
            aspect_ratio: AspectRatio::Landscape,
            count: 1,
        }
    }
}

/// Location of one generated video.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoFile {
    /// Download URI.
    pub uri: Option<String>,
    /// MIME type, when reported.
    pub mime_type: Option<String>,
}

/// One entry of a finished job's output.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedVideo {
    /// The video location, if the service produced one.
    pub video: Option<VideoFile>,
}

/// Error reported inside an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobError {
    /// Numeric `google.rpc.Code`.
    pub code: Option<i32>,
    /// Service message.
    pub message: Option<String>,
}

/// Point-in-time state of a remote video job.
///
/// Never mutated locally: each status check yields a new snapshot that
/// replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoJob {
    /// Handle used to refresh the job.
    pub handle: JobHandle,
    /// Whether the job has finished.
    pub done: bool,
    /// Outputs, present once done.
    pub generated_videos: Vec<GeneratedVideo>,
    /// Number of outputs removed by safety filters.
    pub filtered_count: u32,
    /// Operation-level error.
    pub error: Option<JobError>,
}

impl VideoJob {
    /// A snapshot of a job that is still running.
    pub fn pending(handle: JobHandle) -> Self {
        Self {
            handle,
            done: false,
            generated_videos: Vec::new(),
            filtered_count: 0,
            error: None,
        }
    }

    /// A finished snapshot with a single output at `uri`.
    pub fn completed(handle: JobHandle, uri: impl Into<String>) -> Self {
        Self {
            done: true,
            generated_videos: vec![GeneratedVideo {
                video: Some(VideoFile {
                    uri: Some(uri.into()),
                    mime_type: None,
                }),
            }],
            ..Self::pending(handle)
        }
    }

    /// The first generated video's URI.
    pub fn result_uri(&self) -> Option<&str> {
        self.generated_videos
            .first()?
            .video
            .as_ref()?
            .uri
            .as_deref()
            .filter(|uri| !uri.is_empty())
    }
}

/// The next status check to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollStep {
    /// 1-based attempt number.
    pub attempt: u32,
    /// Wait before refreshing.
    pub delay: Duration,
}

/// Delay before the given attempt. Constant, no backoff.
pub fn poll_delay(_attempt: u32) -> Duration {
    POLL_INTERVAL
}

/// Decides whether another status check is needed.
///
/// Returns `None` once the snapshot is done; a finished job is never polled
/// again.
pub fn next_poll(snapshot: &VideoJob, completed_polls: u32) -> Option<PollStep> {
    if snapshot.done {
        return None;
    }
    let attempt = completed_polls + 1;
    Some(PollStep {
        attempt,
        delay: poll_delay(attempt),
    })
}

/// Fails fast on an operation error reported by a snapshot.
pub fn check_job_error(snapshot: &VideoJob) -> Result<()> {
    match &snapshot.error {
        Some(err) => Err(RemoteError::from_operation(err.code, err.message.as_deref()).into()),
        None => Ok(()),
    }
}

/// Extracts the result URI from a finished snapshot.
pub fn resolve_result(snapshot: &VideoJob) -> Result<String> {
    check_job_error(snapshot)?;

    if let Some(uri) = snapshot.result_uri() {
        return Ok(uri.to_string());
    }
    if snapshot.filtered_count > 0 {
        return Err(FramecraftError::NoResult(format!(
            "video was removed by safety filters ({} filtered)",
            snapshot.filtered_count
        )));
    }
    Err(FramecraftError::NoResult(
        "video generation completed but no video URI was returned".into(),
    ))
}

/// A playable video URL carrying the credential as a query parameter.
///
/// `Debug` hides the key; `Display` and [`VideoUrl::as_str`] give the full URL.
#[derive(Clone, PartialEq, Eq)]
pub struct VideoUrl {
    url: String,
    key_start: usize,
}

impl VideoUrl {
    /// Appends `&key=<credential>` to a result URI.
    pub fn with_key(uri: &str, key: &ApiKey) -> Self {
        let prefix = format!("{uri}&key=");
        let key_start = prefix.len();
        Self {
            url: prefix + key.expose(),
            key_start,
        }
    }

    /// Returns the full URL.
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Returns the URI as reported by the service, without the key.
    pub fn location(&self) -> &str {
        &self.url[..self.key_start - "&key=".len()]
    }

    /// Consumes the URL, returning the full string.
    pub fn into_string(self) -> String {
        self.url
    }
}

impl fmt::Display for VideoUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

impl fmt::Debug for VideoUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VideoUrl({}&key=[REDACTED])", self.location())
    }
}
