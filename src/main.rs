//! fal-pipe CLI binary entry point.

use std::io::Write;
use std::sync::Arc;

use clap::Parser;
use fal_pipe::cli::{Cli, Commands, GenerateArgs, ParseArgs};
use fal_pipe::config::PipeConfig;
use fal_pipe::models::ModelSelector;
use fal_pipe::pipe::Pipe;
use fal_pipe::tags::parse_prompt_tags;
use fal_pipe::types::{BaseDimensions, ChatMessage, PipeRequest, StatusEvent};
use futures::StreamExt;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .init();

    let result = match PipeConfig::load(cli.config.as_deref()) {
        Ok(config) => match cli.command {
            Commands::Models => handle_models(config),
            Commands::Parse(args) => handle_parse(config, args),
            Commands::Generate(args) => handle_generate(config, args).await,
        },
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn handle_models(config: PipeConfig) -> Result<(), Box<dyn std::error::Error>> {
    let registry = config.registry()?;
    for model in registry.models() {
        let tags = model
            .tag_rules
            .iter()
            .map(|rule| format!("--{}", rule.tag))
            .collect::<Vec<_>>()
            .join(" ");
        println!("{:<26} {:<28} {}", model.id, model.path, tags);
    }
    Ok(())
}

fn handle_parse(config: PipeConfig, args: ParseArgs) -> Result<(), Box<dyn std::error::Error>> {
    let registry = config.registry()?;
    let model = ModelSelector::resolve(&registry, &args.model)?;
    let base = BaseDimensions::new(
        args.width.unwrap_or(config.width),
        args.height.unwrap_or(config.height),
    )?;

    let parsed = parse_prompt_tags(&args.prompt, model, base);
    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(())
}

async fn handle_generate(
    config: PipeConfig,
    args: GenerateArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let pipe = Pipe::from_config(config)?;
    let request = PipeRequest::new(args.model, vec![ChatMessage::user(args.prompt)]);

    let sink = Arc::new(|event: StatusEvent| {
        let marker = if event.done { "✓" } else { "…" };
        eprintln!("{marker} {}", event.description);
    });

    let mut replies = pipe.handle(request, Some(sink));
    let mut stdout = std::io::stdout();
    while let Some(chunk) = replies.next().await {
        write!(stdout, "{chunk}")?;
        stdout.flush()?;
    }
    println!();
    Ok(())
}
