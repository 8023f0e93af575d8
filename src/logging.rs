//! File logging for the terminal host.
//!
//! The alternate screen owns stdout and stderr while the UI runs, so records
//! go to `<cache dir>/seekbox.log`. `RUST_LOG` overrides the configured level.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use env_logger::{Builder, Env, Target};
use log::LevelFilter;

pub const LOG_FILE_NAME: &str = "seekbox.log";

/// Install the global logger. Returns the path of the log file.
pub fn initialize(dir: &Path, level: LevelFilter) -> Result<PathBuf> {
	fs::create_dir_all(dir)
		.with_context(|| format!("failed to create log directory {}", dir.display()))?;
	let path = dir.join(LOG_FILE_NAME);
	let file = File::create(&path)
		.with_context(|| format!("failed to open log file {}", path.display()))?;

	builder(level)
		.target(Target::Pipe(Box::new(file)))
		.try_init()
		.context("logger already initialised")?;
	Ok(path)
}

fn builder(level: LevelFilter) -> Builder {
	let mut builder = Builder::new();
	builder.filter_level(level);
	builder.parse_env(Env::default());
	builder.format_timestamp_millis();
	builder
}
