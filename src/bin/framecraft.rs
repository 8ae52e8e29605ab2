//! CLI for Framecraft - image edits and first/last-frame videos.

use clap::{Args, Parser, Subcommand};
use framecraft::{Config, GenerationClient, MediaFile};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "framecraft")]
#[command(about = "Edit images and generate videos between two frames via the Gemini API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a natural-language edit to an image
    Edit(EditArgs),

    /// Generate a video that moves from a start frame to an end frame
    Video(VideoArgs),

    /// Show the resolved configuration
    Config,
}

#[derive(Args)]
struct EditArgs {
    /// Image to edit
    input: PathBuf,

    /// What to change
    prompt: String,

    /// Output file path
    #[arg(short, long)]
    output: PathBuf,
}

#[derive(Args)]
struct VideoArgs {
    /// What should happen between the two frames
    prompt: String,

    /// First frame of the video
    #[arg(long)]
    start: PathBuf,

    /// Last frame of the video
    #[arg(long)]
    end: PathBuf,

    /// Download the finished video to this path instead of printing its URL
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("framecraft=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();

    match cli.command {
        Commands::Edit(args) => edit_image(config, args, cli.json).await?,
        Commands::Video(args) => generate_video(config, args, cli.json).await?,
        Commands::Config => show_config(&config, cli.json)?,
    }

    Ok(())
}

async fn edit_image(config: Config, args: EditArgs, json_output: bool) -> anyhow::Result<()> {
    let client = GenerationClient::builder().config(config).build();
    let input = MediaFile::open(&args.input)?;

    let started = std::time::Instant::now();
    let image = client.edit_image(&input, &args.prompt).await?;
    image.save(&args.output)?;
    let size = image.decode()?.len();

    if json_output {
        let result = serde_json::json!({
            "type": "image",
            "success": true,
            "input": args.input.display().to_string(),
            "output": args.output.display().to_string(),
            "size_bytes": size,
            "mime_type": image.mime_type(),
            "model": client.config().image_model(),
            "duration_ms": started.elapsed().as_millis() as u64,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "Edited image: {} ({} bytes, {})",
            args.output.display(),
            size,
            image.mime_type()
        );
    }

    Ok(())
}

async fn generate_video(config: Config, args: VideoArgs, json_output: bool) -> anyhow::Result<()> {
    let client = GenerationClient::builder().config(config).build();
    let start = MediaFile::open(&args.start)?;
    let end = MediaFile::open(&args.end)?;

    let started = std::time::Instant::now();
    let progress = |msg: &str| eprintln!("{msg}");
    let url = client
        .generate_video(&start, &end, &args.prompt, &progress)
        .await?;

    let size = match &args.output {
        Some(path) => {
            let bytes = client.service().download(&url).await?;
            tokio::fs::write(path, &bytes).await?;
            Some(bytes.len())
        }
        None => None,
    };

    if json_output {
        let result = serde_json::json!({
            "type": "video",
            "success": true,
            "url": url.as_str(),
            "output": args.output.as_ref().map(|p| p.display().to_string()),
            "size_bytes": size,
            "model": client.config().video_model(),
            "duration_ms": started.elapsed().as_millis() as u64,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        match (&args.output, size) {
            (Some(path), Some(size)) => {
                println!("Generated video: {} ({} bytes)", path.display(), size)
            }
            _ => println!("{url}"),
        }
        println!("Generation time: {}s", started.elapsed().as_secs());
    }

    Ok(())
}

fn show_config(config: &Config, json_output: bool) -> anyhow::Result<()> {
    let key_set = config.api_key().is_some();

    if json_output {
        let result = serde_json::json!({
            "base_url": config.base_url(),
            "image_model": config.image_model(),
            "video_model": config.video_model(),
            "api_key_set": key_set,
            "api_key_env": framecraft::config::API_KEY_ENV_VARS,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let status = if key_set { "✓" } else { "✗" };
        println!("Base URL:    {}", config.base_url());
        println!("Image model: {}", config.image_model());
        println!("Video model: {}", config.video_model());
        println!(
            "API key:     {} ({})",
            status,
            framecraft::config::API_KEY_ENV_VARS.join(" or ")
        );
    }

    Ok(())
}
