//! Notification Daemon
//!
//! Reads conversation batches from the message change stream, assembles them
//! into notification groups and posts them to the configured output.

mod config;
mod diagnostics;
mod input;
mod sink;

use anyhow::{Context, Result};
use clap::Parser;
use config::{Config, OutputFormat};
use diagnostics::{Cli, DiagnosticCommand};
use futures::StreamExt;
use notification_assembler::{NotificationPipeline, NotificationRenderer, NotificationSink};
use sink::{JsonLinesSink, RenderedLogSink};
use std::sync::Arc;
use tracing::{info, warn};

fn handle_diagnostic_command(cli: &Cli, command: &DiagnosticCommand) -> Result<()> {
    match command {
        DiagnosticCommand::Version => {
            println!("notification-daemon {}", env!("CARGO_PKG_VERSION"));
        }
        DiagnosticCommand::DumpConfig => {
            let path = cli.config_path();
            let config = Config::load(&path).context("Failed to load configuration")?;
            println!("# {}", path.display());
            println!(
                "{}",
                toml::to_string_pretty(&config).context("Failed to serialize config")?
            );
        }
    }
    Ok(())
}

fn build_sink(config: &Config) -> Arc<dyn NotificationSink> {
    match config.output.format {
        OutputFormat::Json => Arc::new(JsonLinesSink::new(tokio::io::stdout())),
        OutputFormat::Rendered => Arc::new(RenderedLogSink::new(NotificationRenderer::new(
            config.render.clone(),
        ))),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(command) = &cli.command {
        return handle_diagnostic_command(&cli, command);
    }

    diagnostics::init_logging(&cli).context("Failed to initialize logging")?;

    info!("Starting notification daemon...");

    let config = Config::load(&cli.config_path()).context("Failed to load configuration")?;
    info!("Output format: {:?}", config.output.format);
    info!(
        "Max messages per conversation: {}",
        config.assembly.max_messages_per_conversation
    );

    let pipeline = Arc::new(NotificationPipeline::new(
        config.assembly.clone(),
        build_sink(&config),
    ));
    let (sender, task) = pipeline.clone().spawn(config.output.queue_depth);

    let reader = input::open(&cli.input).await?;
    let batches = input::batches(reader);
    let mut batches = std::pin::pin!(batches);

    while let Some(batch) = batches.next().await {
        if let Err(e) = sender.submit(batch).await {
            warn!("{}", e.user_message());
            break;
        }
    }
    drop(sender);

    let result = task.await.context("Notification pipeline task panicked")?;
    let stats = pipeline.stats();
    info!(
        "Done: {} batches received, {} posted, {} groups, {} messages, {} sink errors",
        stats.batches_received,
        stats.batches_posted,
        stats.conversations_posted,
        stats.messages_posted,
        stats.sink_errors
    );

    result.context("Notification pipeline failed")
}
