//! `marginalia` binary.
//!
//! Loads a JSON snapshot of an in-memory database, runs one tagging command
//! against it, and writes the snapshot back when the command changed it.

mod app;
mod cli;
mod config;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use cli::Cli;
use config::{CliConfig, DEFAULT_DATABASE, LogConfig};

/// Environment variable holding `EnvFilter` directives.
const LOG_ENV: &str = "MARGINALIA_LOG";

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	let cwd = std::env::current_dir().context("failed to read the working directory")?;
	let config = CliConfig::discover(cli.config.as_deref(), &cwd).context("failed to load configuration")?;
	setup_tracing(&config.log, cli.verbose)?;

	let database = cli
		.database
		.or_else(|| config.database.clone())
		.unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE));
	tracing::debug!(database = %database.display(), "using snapshot");

	let stdout = std::io::stdout();
	app::execute(cli.command, &database, &config.tags, &mut stdout.lock())
}

fn setup_tracing(log: &LogConfig, verbose: bool) -> anyhow::Result<()> {
	use std::fs::OpenOptions;
	use std::sync::Mutex;

	use tracing_subscriber::EnvFilter;
	use tracing_subscriber::prelude::*;

	let filter = match EnvFilter::try_from_env(LOG_ENV) {
		Ok(filter) => filter,
		Err(_) => {
			let directives = log.filter.as_deref().unwrap_or(if verbose { "debug" } else { "info" });
			EnvFilter::try_new(directives).with_context(|| format!("invalid log filter {directives:?}"))?
		}
	};

	if let Some(path) = &log.file {
		let file = OpenOptions::new()
			.create(true)
			.append(true)
			.open(path)
			.with_context(|| format!("failed to open log file {}", path.display()))?;
		let file_layer = tracing_subscriber::fmt::layer()
			.with_writer(Mutex::new(file))
			.with_ansi(false)
			.with_target(true);
		tracing_subscriber::registry().with(filter).with(file_layer).try_init()?;
		tracing::debug!(path = %path.display(), "tracing initialized");
		return Ok(());
	}

	let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false);
	tracing_subscriber::registry().with(filter).with(stderr_layer).try_init()?;
	Ok(())
}
