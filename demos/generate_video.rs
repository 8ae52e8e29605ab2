//! First/last-frame video example.
//!
//! Run with: `cargo run --example generate_video -- <start.png> <end.png>`
//!
//! Requires `GEMINI_API_KEY` (or `GOOGLE_API_KEY`) environment variable.

use framecraft::{GenerationClient, MediaFile};

#[tokio::main]
async fn main() -> framecraft::Result<()> {
    let mut args = std::env::args().skip(1);
    let (Some(start), Some(end)) = (args.next(), args.next()) else {
        eprintln!("Usage: generate_video <start.png> <end.png>");
        std::process::exit(2);
    };

    let client = GenerationClient::from_env();
    let start = MediaFile::open(start)?;
    let end = MediaFile::open(end)?;

    let progress = |msg: &str| println!("{msg}");
    let url = client
        .generate_video(&start, &end, "A smooth time-lapse between the two frames", &progress)
        .await?;

    let bytes = client.service().download(&url).await?;
    tokio::fs::write("output.mp4", &bytes).await?;
    println!("Generated video: output.mp4 ({} bytes)", bytes.len());

    Ok(())
}
