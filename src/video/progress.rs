//! Progress reporting for video generation.

use std::fmt;

/// A lifecycle stage of a video generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// Input frames are being read and encoded.
    PreparingImages,
    /// The job is being submitted.
    Initiating,
    /// The job was accepted and is running remotely.
    InProgress,
    /// A status check is about to run.
    CheckingStatus {
        /// 1-based attempt number.
        attempt: u32,
    },
    /// The job finished; the result is being resolved.
    Finalizing,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PreparingImages => f.write_str("Preparing images..."),
            Self::Initiating => f.write_str("Initiating video generation..."),
            Self::InProgress => {
                f.write_str("Generation in progress. This may take a few minutes...")
            }
            Self::CheckingStatus { attempt } => {
                write!(f, "Checking status (attempt {attempt})...")
            }
            Self::Finalizing => f.write_str("Finalizing video..."),
        }
    }
}

/// Receives human-readable progress messages.
///
/// Fire-and-forget: the generator never waits on or inspects the sink.
/// Implemented for any `Fn(&str) + Send + Sync` closure.
pub trait ProgressSink: Send + Sync {
    /// Called once per lifecycle point.
    fn report(&self, message: &str);
}

impl<F> ProgressSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn report(&self, message: &str) {
        self(message)
    }
}

/// A sink that discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _message: &str) {}
}
