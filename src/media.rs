//! Input media handling: format detection and base64 payload encoding.

use crate::error::{FramecraftError, Result};
use async_trait::async_trait;
use base64::Engine;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Supported image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// PNG format (lossless).
    #[default]
    Png,
    /// JPEG format (lossy).
    Jpeg,
    /// WebP format.
    WebP,
}

impl ImageFormat {
    /// Returns the MIME type for this format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::WebP => "image/webp",
        }
    }

    /// Attempts to detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Attempts to detect format from a MIME type.
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/webp" => Some(Self::WebP),
            _ => None,
        }
    }

    /// Detects image format from magic bytes.
    pub fn from_magic_bytes(data: &[u8]) -> Option<Self> {
        if data.len() < 12 {
            return None;
        }

        // PNG: 89 50 4E 47 0D 0A 1A 0A
        if data.starts_with(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        // WebP: RIFF....WEBP
        if data.starts_with(b"RIFF") && &data[8..12] == b"WEBP" {
            return Some(Self::WebP);
        }

        None
    }
}

/// Base64 media content paired with its declared MIME type.
///
/// Immutable once created; produced by [`encode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaPayload {
    mime_type: String,
    data: String,
}

impl MediaPayload {
    /// Encodes raw bytes under the given MIME type.
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Wraps content that is already base64 encoded, as returned by the
    /// service in inline data parts.
    pub fn from_encoded(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Returns the base64 content.
    pub fn data(&self) -> &str {
        &self.data
    }

    /// Returns the declared MIME type.
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Decodes the content back to raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.data)
            .map_err(|e| FramecraftError::Encoding(format!("invalid base64 payload: {e}")))
    }

    /// Returns the payload as a data URL.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// A readable input with a declared media type.
#[async_trait]
pub trait MediaSource: Send + Sync {
    /// The declared MIME type, used verbatim in the payload.
    fn media_type(&self) -> &str;

    /// Reads the full contents.
    async fn read_bytes(&self) -> std::io::Result<Vec<u8>>;

    /// Short description used in error messages.
    fn describe(&self) -> String {
        "media input".to_string()
    }
}

/// A file on disk.
#[derive(Debug, Clone)]
pub struct MediaFile {
    path: PathBuf,
    media_type: String,
}

impl MediaFile {
    /// Creates a file source with an explicit MIME type.
    pub fn new(path: impl Into<PathBuf>, media_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            media_type: media_type.into(),
        }
    }

    /// Creates a file source, declaring its type from the file extension.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(ImageFormat::from_extension)
            .ok_or_else(|| {
                FramecraftError::Encoding(format!(
                    "cannot determine image type of {} (expected .png, .jpg or .webp)",
                    path.display()
                ))
            })?;
        Ok(Self::new(path, format.mime_type()))
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl MediaSource for MediaFile {
    fn media_type(&self) -> &str {
        &self.media_type
    }

    async fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        tokio::fs::read(&self.path).await
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory bytes.
#[derive(Debug, Clone)]
pub struct MediaBytes {
    bytes: Vec<u8>,
    media_type: String,
}

impl MediaBytes {
    /// Wraps bytes with an explicit MIME type.
    pub fn new(bytes: impl Into<Vec<u8>>, media_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            media_type: media_type.into(),
        }
    }

    /// Wraps bytes, declaring their type from the magic bytes.
    pub fn sniffed(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        let format = ImageFormat::from_magic_bytes(&bytes)
            .ok_or_else(|| FramecraftError::Encoding("unknown image format".into()))?;
        Ok(Self::new(bytes, format.mime_type()))
    }
}

#[async_trait]
impl MediaSource for MediaBytes {
    fn media_type(&self) -> &str {
        &self.media_type
    }

    async fn read_bytes(&self) -> std::io::Result<Vec<u8>> {
        Ok(self.bytes.clone())
    }

    fn describe(&self) -> String {
        format!("{} bytes of {}", self.bytes.len(), self.media_type)
    }
}

/// Reads a source once and encodes it into a [`MediaPayload`].
///
/// The declared type is copied into the payload unchanged, surrounding
/// whitespace included. An empty or blank type or a failed read is an
/// [`FramecraftError::Encoding`] error; no partial payload is produced.
pub async fn encode(source: &(impl MediaSource + ?Sized)) -> Result<MediaPayload> {
    let media_type = source.media_type();
    if media_type.trim().is_empty() {
        return Err(FramecraftError::Encoding(format!(
            "{} has no declared media type",
            source.describe()
        )));
    }

    let bytes = source.read_bytes().await.map_err(|e| {
        FramecraftError::Encoding(format!("failed to read {}: {}", source.describe(), e))
    })?;

    Ok(MediaPayload::from_bytes(&bytes, media_type))
}
