//! Shotbox CLI: deliver a captured image through the configured upload backends.
//!
//! Backends come from UPLOAD_BACKENDS_FILE, or the ingestion server at
//! UPLOAD_SERVER_URL when unset.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use shotbox_cli::{backend_summaries, capture_name, exit_code, init_tracing};
use shotbox_core::UploaderConfig;
use shotbox_uploader::{resolve_descriptors, UploadSession};

#[derive(Parser)]
#[command(name = "shotbox", about = "Shotbox capture upload client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload an image file, trying each backend in priority order
    Upload {
        /// Path to the captured image
        file: std::path::PathBuf,
        /// Filename announced to backends (defaults to the file's name)
        #[arg(long)]
        name: Option<String>,
        /// Report failure instead of saving locally when every backend fails
        #[arg(long)]
        no_fallback: bool,
    },
    /// List configured backends in priority order
    Backends,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = UploaderConfig::from_env().context("Invalid uploader configuration")?;

    match cli.command {
        Commands::Upload {
            file,
            name,
            no_fallback,
        } => {
            let data = tokio::fs::read(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let filename = name.unwrap_or_else(|| capture_name(&file));

            let session = UploadSession::from_config(&config, !no_fallback)?;
            session.capture(data, filename);

            let status = session.deliver().await;
            print_json(&status)?;

            let code = exit_code(&status);
            if code != 0 {
                std::process::exit(code);
            }
        }
        Commands::Backends => {
            let descriptors =
                resolve_descriptors(&config).context("Failed to load upload backends")?;
            print_json(&backend_summaries(&descriptors))?;
        }
    }

    Ok(())
}
