//! Command-line interface for fal-pipe.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// fal.ai image generation pipe
#[derive(Parser, Debug)]
#[command(name = "fal-pipe", version, about = "fal.ai image generation with prompt tags")]
pub struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the available models
    Models,
    /// Parse prompt tags without generating
    Parse(ParseArgs),
    /// Generate an image
    Generate(GenerateArgs),
}

/// Arguments for `fal-pipe parse`.
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Model id (e.g. falai-flux-2)
    #[arg(short, long)]
    pub model: String,

    /// Base width override
    #[arg(long)]
    pub width: Option<u32>,

    /// Base height override
    #[arg(long)]
    pub height: Option<u32>,

    /// Prompt, tags included
    pub prompt: String,
}

/// Arguments for `fal-pipe generate`.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[arg(short, long, default_value = "falai-flux-2")]
    pub model: String,

    /// Prompt, tags included
    pub prompt: String,
}
