//! Image editing example - applies a text instruction to an existing image.
//!
//! Run with: `cargo run --example edit_image -- <input_image.png>`
//!
//! Requires `GEMINI_API_KEY` (or `GOOGLE_API_KEY`) environment variable.

use framecraft::{GenerationClient, MediaFile};

#[tokio::main]
async fn main() -> framecraft::Result<()> {
    let input_path = std::env::args()
        .nth(1)
        .expect("Usage: edit_image <input_image.png>");

    let client = GenerationClient::from_env();
    let input = MediaFile::open(input_path)?;

    let image = client
        .edit_image(&input, "Make the colors more vibrant and add a warm sunset glow")
        .await?;
    image.save("edited.png")?;
    println!("Edited image saved to edited.png ({})", image.mime_type());

    Ok(())
}
