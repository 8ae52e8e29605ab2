//! First/last-frame video generation.
//!
//! The job itself is a plain value ([`VideoJob`]) and every polling decision
//! is a pure function over it; [`GenerationClient::generate_video`] drives
//! those functions against a [`GenerationService`] and a [`Sleeper`].
//!
//! [`GenerationClient::generate_video`]: crate::GenerationClient::generate_video
//! [`GenerationService`]: crate::service::GenerationService

mod generator;
mod job;
mod progress;
mod sleep;

pub use job::{
    check_job_error, next_poll, poll_delay, resolve_result, AspectRatio, GeneratedVideo,
    JobError, JobHandle, PollStep, Resolution, VideoFile, VideoJob, VideoOptions, VideoUrl,
    POLL_INTERVAL,
};
pub use progress::{NoProgress, Progress, ProgressSink};
pub use sleep::{Sleeper, TokioSleeper};
