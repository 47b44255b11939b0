//! Subterfuge - subtitle translation and extraction
//!
//! Entry point for the command line tool: translates SRT files through the
//! Google translate endpoint in batches and extracts subtitle tracks with ffmpeg.

use anyhow::Result;
use std::path::Path;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_appender::{non_blocking, rolling};

use subterfuge::cli::{Args, Commands};
use subterfuge::config::Config;
use subterfuge::error::SubterfugeError;
use subterfuge::output::OutputMode;
use subterfuge::progress::{ConsoleProgress, NoProgress};
use subterfuge::workflow::{TranslateRequest, Workflow};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Setup logging to both console and file
    setup_logging(args.verbose)?;

    match args.command {
        Commands::Translate { input, from, to, mode, force } => {
            let workflow = Workflow::new(load_config(args.config.as_deref())?)?;
            let request = TranslateRequest {
                from,
                to,
                mode: OutputMode::parse(&mode)?,
                force,
            };

            let output = workflow.translate_file(&input, &request, &ConsoleProgress::new()).await?;
            println!("✓ Translated file saved to {}", output.display());
        }
        Commands::Batch { input_dir, from, to, mode, force } => {
            let workflow = Workflow::new(load_config(args.config.as_deref())?)?;
            let request = TranslateRequest {
                from,
                to,
                mode: OutputMode::parse(&mode)?,
                force,
            };

            let summary = workflow.translate_directory(&input_dir, &request, &NoProgress).await?;
            println!(
                "Translated {} files, {} failed",
                summary.translated.len(),
                summary.failed.len()
            );
            for (path, reason) in &summary.failed {
                println!("  ✗ {}: {}", path.display(), reason);
            }
        }
        Commands::Extract { input, track, translate_to, from, mode } => {
            let workflow = Workflow::new(load_config(args.config.as_deref())?)?;
            match translate_to {
                Some(to) => {
                    let request = TranslateRequest {
                        from,
                        to,
                        mode: OutputMode::parse(&mode)?,
                        force: false,
                    };
                    let (extracted, translated) = workflow
                        .extract_and_translate(&input, track, &request, &ConsoleProgress::new())
                        .await?;
                    println!("✓ Extracted track {} to {}", track, extracted.display());
                    if let Some(translated) = translated {
                        println!("✓ Translated file saved to {}", translated.display());
                    }
                }
                None => {
                    let extracted = workflow.extract(&input, track).await?;
                    println!("✓ Extracted track {} to {}", track, extracted.display());
                }
            }
        }
        Commands::InitConfig { path } => {
            if path.exists() {
                return Err(SubterfugeError::DestinationExists(path.display().to_string()).into());
            }
            Config::default().save_to_file(&path)?;
            println!("Default configuration written to {}", path.display());
        }
    }

    Ok(())
}

/// Load the configuration from `--config`, `./config.toml`, or defaults
fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let config = match config_path {
        Some(config_path) => Config::from_file(config_path)?,
        None => {
            // Try to load config.toml from current directory first
            if Path::new("config.toml").exists() {
                info!("Found config.toml in current directory, loading...");
                Config::from_file("config.toml")?
            } else {
                Config::default()
            }
        }
    };
    Ok(config)
}

/// Setup logging to both console and file
fn setup_logging(verbose: bool) -> Result<()> {
    let log_dir = std::env::current_dir()?.join(".subterfuge").join("log");
    std::fs::create_dir_all(&log_dir)?;

    // Set up file appender with daily rotation
    let file_appender = rolling::daily(&log_dir, "subterfuge.log");
    let (non_blocking_file, guard) = non_blocking(file_appender);
    // Keep the guard alive for the duration of the program
    std::mem::forget(guard);

    let log_level = if verbose { Level::DEBUG } else { Level::INFO };

    let console_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_file)
        .with_target(false)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}
