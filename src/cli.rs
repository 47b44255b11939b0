use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Translate a single SRT file
    Translate {
        /// Input subtitle file
        input: PathBuf,

        /// Source language, or "auto" to detect it
        #[arg(short = 's', long, default_value = "auto")]
        from: String,

        /// Target language
        #[arg(short = 't', long, default_value = "en")]
        to: String,

        /// Output mode: create or replace
        #[arg(short, long, default_value = "create")]
        mode: String,

        /// Translate even if source and target language are the same
        /// (without it, an input already in the target language is refused)
        #[arg(long)]
        force: bool,
    },

    /// Translate every SRT file under a directory
    Batch {
        /// Input directory containing subtitle files
        input_dir: PathBuf,

        /// Source language, or "auto" to detect it
        #[arg(short = 's', long, default_value = "auto")]
        from: String,

        /// Target language
        #[arg(short = 't', long, default_value = "en")]
        to: String,

        /// Output mode: create or replace
        #[arg(short, long, default_value = "create")]
        mode: String,

        /// Translate even if source and target language are the same
        /// (without it, an input already in the target language is refused)
        #[arg(long)]
        force: bool,
    },

    /// Extract a subtitle track from a video file
    Extract {
        /// Input video file
        input: PathBuf,

        /// Subtitle track index (0-based among subtitle streams)
        #[arg(long, default_value = "0")]
        track: usize,

        /// Translate the extracted track into this language
        #[arg(long)]
        translate_to: Option<String>,

        /// Source language for translation, or "auto"
        #[arg(short = 's', long, default_value = "auto")]
        from: String,

        /// Output mode for the translated file: create or replace
        #[arg(short, long, default_value = "create")]
        mode: String,
    },

    /// Write the default configuration to a file
    InitConfig {
        /// Destination path
        #[arg(default_value = "config.toml")]
        path: PathBuf,
    },
}
