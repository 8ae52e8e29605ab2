#![warn(missing_docs)]
//! Framecraft - image editing and first/last-frame video generation.
//!
//! This crate wraps Google's Generative Language API behind a small client
//! with two operations: a single-shot image edit and a long-running video
//! job that is submitted once and polled until it finishes.
//!
//! # Quick Start - Image Edit
//!
//! ```no_run
//! use framecraft::{GenerationClient, MediaFile};
//!
//! #[tokio::main]
//! async fn main() -> framecraft::Result<()> {
//!     let client = GenerationClient::from_env();
//!     let photo = MediaFile::open("cat.png")?;
//!     let edited = client.edit_image(&photo, "Give the cat a tiny hat").await?;
//!     edited.save("cat-hat.png")?;
//!     Ok(())
//! }
//! ```
//!
//! # Quick Start - Video
//!
//! ```no_run
//! use framecraft::{GenerationClient, MediaFile};
//!
//! #[tokio::main]
//! async fn main() -> framecraft::Result<()> {
//!     let client = GenerationClient::from_env();
//!     let start = MediaFile::open("dawn.png")?;
//!     let end = MediaFile::open("noon.png")?;
//!     let progress = |msg: &str| eprintln!("{msg}");
//!     let url = client
//!         .generate_video(&start, &end, "sunrise time-lapse", &progress)
//!         .await?;
//!     println!("{}", url.location());
//!     Ok(())
//! }
//! ```
//!
//! # Configuration
//!
//! [`Config::from_env`] reads the API key from `GEMINI_API_KEY` or
//! `GOOGLE_API_KEY`, and optional overrides from `FRAMECRAFT_BASE_URL`,
//! `FRAMECRAFT_IMAGE_MODEL` and `FRAMECRAFT_VIDEO_MODEL`. A client can be built
//! without a key; every operation fails with [`FramecraftError::Auth`] before
//! touching any file when none is set.
//!
//! # Features
//!
//! - `cli` (default): the `framecraft` command-line binary

mod client;
pub mod config;
mod edit;
mod error;
pub mod media;
pub mod service;
pub mod video;

#[cfg(test)]
mod testing;

pub use client::{GenerationClient, GenerationClientBuilder};
pub use config::{ApiKey, Config};
pub use edit::EditedImage;
pub use error::{
    parse_retry_after, sanitize_error_message, FramecraftError, RemoteError, RemoteReason,
    Result,
};
pub use media::{ImageFormat, MediaBytes, MediaFile, MediaPayload, MediaSource};
pub use service::{GeminiService, GenerationService};
pub use video::{
    JobHandle, NoProgress, Progress, ProgressSink, Sleeper, VideoJob, VideoOptions, VideoUrl,
};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::config::{ApiKey, Config};
    pub use crate::error::{FramecraftError, Result};
    pub use crate::media::{MediaBytes, MediaFile, MediaSource};
    pub use crate::video::{ProgressSink, VideoUrl};
    pub use crate::{EditedImage, GenerationClient};
}
