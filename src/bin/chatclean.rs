//! Job runner: load the configuration, initialize the pipeline, normalize a
//! message CSV and print the cleaned content, one message per line.

use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use chatclean::{config::PipelineConfig, message::read_messages, ExecutionMode};
use clap::Parser;

const DEFAULT_CONFIG_PATH: &str = "config/pipeline.json";

#[derive(Parser)]
#[command(name = "chatclean", version, about = "Normalize chat messages for topic modeling")]
struct Cli {
    /// Path to JSON config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH, value_name = "FILE")]
    config: PathBuf,

    /// Fan the linguistic analysis out over a worker pool
    #[arg(long)]
    parallel: bool,

    /// Worker pool size (defaults to the number of logical CPUs)
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Print each kept message as a JSON line instead of its content only
    #[arg(long)]
    json: bool,

    /// Message CSV: name, content, create_at, channel, sender_role, sender_id
    messages: PathBuf,
}

fn load_config(cli: &Cli) -> Result<PipelineConfig> {
    let mut config = if cli.config.exists() {
        PipelineConfig::from_file(&cli.config)?
    } else {
        log::info!("Config file {} not found; using defaults", cli.config.display());
        PipelineConfig::default()
    };
    if cli.parallel {
        config.execution = ExecutionMode::Parallel;
    }
    if cli.workers.is_some() {
        config.workers = cli.workers;
    }
    Ok(config)
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let pipeline = config.build_pipeline().context("Failed to initialize pipeline")?;

    let messages = read_messages(&cli.messages)
        .with_context(|| format!("Cannot read messages from {}", cli.messages.display()))?;
    if let Some(first) = messages.first() {
        log::info!("Merchant: {}", first.name);
    }

    for message in config.batch_runner(&pipeline).run(messages) {
        if cli.json {
            println!("{}", serde_json::to_string(&message)?);
        } else {
            println!("{}", message.content);
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
