//! Command Line and Logging
//!
//! CLI definition and logging bootstrap for the notification daemon.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

/// Notification daemon command-line interface
#[derive(Parser, Debug)]
#[command(name = "notification-daemon")]
#[command(about = "Assembles conversation notifications from a message change stream", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// JSON-lines input of conversation batches ("-" for stdin)
    #[arg(short, long, value_name = "PATH", default_value = "-")]
    pub input: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(short, long, value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Enable JSON structured logging
    #[arg(long)]
    pub json_logs: bool,

    /// Leave timestamps out of log lines
    #[arg(long)]
    pub no_timestamps: bool,

    /// Diagnostic subcommand
    #[command(subcommand)]
    pub command: Option<DiagnosticCommand>,
}

impl Cli {
    /// Configuration path from the flag or the default location
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::Config::default_path)
    }

    pub fn timestamps(&self) -> bool {
        !self.no_timestamps
    }

    /// Filter directive for `--log-level`
    ///
    /// The level applies to the daemon and the assembler library; everything
    /// else (tokio internals and the like) stays at `warn`.
    pub fn log_directive(&self) -> Result<String> {
        let level = self.log_level.parse::<Level>().with_context(|| {
            format!(
                "Invalid log level '{}'. Valid levels: error, warn, info, debug, trace",
                self.log_level
            )
        })?;
        let level = level.as_str().to_lowercase();

        Ok(format!(
            "warn,notification_daemon={},notification_assembler={}",
            level, level
        ))
    }
}

/// Diagnostic commands
#[derive(Subcommand, Debug)]
pub enum DiagnosticCommand {
    /// Show daemon version
    Version,

    /// Show the effective configuration
    DumpConfig,
}

/// Initialize logging based on CLI configuration
///
/// `RUST_LOG` takes precedence over `--log-level`. Logs go to stderr so
/// stdout stays free for JSON output.
pub fn init_logging(cli: &Cli) -> Result<()> {
    let directive = cli.log_directive()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&directive))
        .context("Failed to create log filter")?;

    // Source locations only in JSON logs
    let subscriber = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_file(cli.json_logs)
        .with_line_number(cli.json_logs);

    match (cli.json_logs, cli.timestamps()) {
        (true, true) => subscriber.json().init(),
        (true, false) => subscriber.without_time().json().init(),
        (false, true) => subscriber.init(),
        (false, false) => subscriber.without_time().init(),
    }

    info!(
        "Logging initialized: filter={}, json={}, timestamps={}",
        directive,
        cli.json_logs,
        cli.timestamps()
    );

    Ok(())
}
