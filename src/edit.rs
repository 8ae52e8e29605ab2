//! Single-shot image editing.

use crate::client::GenerationClient;
use crate::error::{FramecraftError, Result};
use crate::media::{self, ImageFormat, MediaPayload, MediaSource};
use crate::service::{ContentRequest, ContentResponse, GenerationService, Modality, Part};
use std::path::Path;

/// An edited image as returned by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "edited image should be saved or displayed"]
pub struct EditedImage {
    payload: MediaPayload,
}

impl EditedImage {
    /// Returns the base64 image data.
    pub fn data(&self) -> &str {
        self.payload.data()
    }

    /// Returns the MIME type reported by the service.
    pub fn mime_type(&self) -> &str {
        self.payload.mime_type()
    }

    /// Returns the image format, when the MIME type is a known one.
    pub fn format(&self) -> Option<ImageFormat> {
        ImageFormat::from_mime_type(self.mime_type())
    }

    /// Decodes the image bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        self.payload.decode()
    }

    /// Returns the image as a data URL, ready for display.
    pub fn to_data_url(&self) -> String {
        self.payload.to_data_url()
    }

    /// Decodes and writes the image to `path`.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.decode()?)?;
        Ok(())
    }
}

impl<S: GenerationService> GenerationClient<S> {
    /// Applies a natural-language edit to an image.
    ///
    /// Makes exactly one remote call and never retries. Fails with
    /// [`FramecraftError::Auth`] before reading the file when no key is
    /// configured, and with [`FramecraftError::NoResult`] when the response
    /// carries no inline image.
    pub async fn edit_image(
        &self,
        image: &(impl MediaSource + ?Sized),
        instruction: &str,
    ) -> Result<EditedImage> {
        let key = self.credential()?;
        let payload = media::encode(image).await?;

        let request = ContentRequest {
            model: self.config.image_model().to_string(),
            parts: vec![Part::InlineData(payload), Part::Text(instruction.to_string())],
            response_modalities: vec![Modality::Image],
        };

        tracing::debug!(model = %request.model, "requesting image edit");
        let response = self.service.generate_content(key, request).await?;
        first_image(response)
    }
}

fn first_image(response: ContentResponse) -> Result<EditedImage> {
    let reason = response
        .block_reason
        .as_deref()
        .map(|r| format!(" (prompt blocked: {r})"))
        .or_else(|| {
            response
                .finish_reason
                .as_deref()
                .filter(|r| *r != "STOP")
                .map(|r| format!(" (finish reason: {r})"))
        })
        .unwrap_or_default();

    response
        .parts
        .into_iter()
        .find_map(|part| match part {
            Part::InlineData(payload) => Some(EditedImage { payload }),
            Part::Text(_) => None,
        })
        .ok_or_else(|| FramecraftError::NoResult(format!("no image data found in response{reason}")))
}
