//! First/last-frame video generation: submit a job, poll it, resolve the URL.

use crate::client::GenerationClient;
use crate::error::Result;
use crate::media::{self, MediaSource};
use crate::service::{GenerationService, VideoJobRequest};
use crate::video::job::{
    check_job_error, next_poll, resolve_result, VideoJob, VideoOptions, VideoUrl,
};
use crate::video::progress::{Progress, ProgressSink};

/// Where a single generation run currently is.
///
/// Completion and failure leave the loop by returning.
#[derive(Debug)]
enum JobState {
    Submitting,
    Waiting { job: VideoJob, polls: u32 },
    Done(VideoJob),
}

impl<S: GenerationService> GenerationClient<S> {
    /// Generates a video that starts at `start_frame` and ends at `end_frame`.
    ///
    /// Submits one job with fixed options (one 720p 16:9 video), then checks
    /// its status every 10 seconds until the service reports it done. There
    /// is no timeout; drop the future to stop waiting. Remote errors abort
    /// immediately and are never retried.
    ///
    /// `progress` receives, in order: preparing, initiating, in progress, one
    /// "checking status" message per attempt, and finalizing.
    pub async fn generate_video(
        &self,
        start_frame: &(impl MediaSource + ?Sized),
        end_frame: &(impl MediaSource + ?Sized),
        instruction: &str,
        progress: &dyn ProgressSink,
    ) -> Result<VideoUrl> {
        let key = self.credential()?;
        let emit = |stage: Progress| progress.report(&stage.to_string());

        let mut state = JobState::Submitting;
        loop {
            state = match state {
                JobState::Submitting => {
                    emit(Progress::PreparingImages);
                    let start_frame = media::encode(start_frame).await?;
                    let last_frame = media::encode(end_frame).await?;

                    emit(Progress::Initiating);
                    let request = VideoJobRequest {
                        model: self.config.video_model().to_string(),
                        prompt: instruction.to_string(),
                        start_frame,
                        last_frame,
                        options: VideoOptions::default(),
                    };
                    let job = self.service.submit_video(key, request).await?;
                    tracing::debug!(operation = %job.handle, "video job submitted");

                    emit(Progress::InProgress);
                    JobState::Waiting { job, polls: 0 }
                }
                JobState::Waiting { job, polls } => {
                    if !job.done {
                        if let Err(err) = check_job_error(&job) {
                            tracing::warn!(operation = %job.handle, "video job failed: {err}");
                            return Err(err);
                        }
                    }
                    match next_poll(&job, polls) {
                        None => JobState::Done(job),
                        Some(step) => {
                            emit(Progress::CheckingStatus {
                                attempt: step.attempt,
                            });
                            self.sleeper.sleep(step.delay).await;
                            tracing::debug!(
                                operation = %job.handle,
                                attempt = step.attempt,
                                "polling video job"
                            );
                            let job = self.service.refresh_video(key, &job.handle).await?;
                            JobState::Waiting {
                                job,
                                polls: step.attempt,
                            }
                        }
                    }
                }
                JobState::Done(job) => {
                    emit(Progress::Finalizing);
                    let uri = resolve_result(&job).inspect_err(|err| {
                        tracing::warn!(operation = %job.handle, "video job ended without a video: {err}");
                    })?;
                    tracing::info!(operation = %job.handle, "video job complete");
                    return Ok(VideoUrl::with_key(&uri, key));
                }
            };
        }
    }
}
