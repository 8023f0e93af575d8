use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Error, Result, anyhow};
use log::LevelFilter;
use serde::Deserialize;

use crate::app_dirs;
use crate::cli::CliArgs;

use super::resolved::{ConfigSources, ResolvedConfig};

mod catalog;
mod ui;

use catalog::CatalogSection;
use ui::UiSection;

/// Mirror of the configuration file before CLI overrides and validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct RawConfig {
	search: SearchSection,
	catalog: CatalogSection,
	ui: UiSection,
	history: HistorySection,
	log: LogSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct SearchSection {
	debounce_ms: Option<u64>,
	min_query_len: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct HistorySection {
	enabled: Option<bool>,
	dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct LogSection {
	level: Option<String>,
}

impl RawConfig {
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		if let Some(value) = cli.debounce_ms {
			self.search.debounce_ms = Some(value);
		}
		if let Some(value) = cli.min_query_len {
			self.search.min_query_len = Some(value);
		}
		if let Some(value) = cli.history {
			self.history.enabled = Some(value);
		}
		if let Some(level) = cli.log_level.clone() {
			self.log.level = Some(level);
		}
		self.catalog.apply_cli_overrides(cli);
		self.ui.apply_cli_overrides(cli);
	}

	/// Fill defaults and validate.
	pub(super) fn resolve(self, cli: &CliArgs) -> Result<ResolvedConfig> {
		let mut sources = ConfigSources::default();
		sources.track(
			"search.min_query_len",
			cli.min_query_len.is_some(),
			self.search.min_query_len.is_some(),
		);
		sources.track(
			"catalog.fail_status",
			cli.fail_status.is_some(),
			self.catalog.fail_status.is_some(),
		);

		let mut tuning = seekbox_engine::SearchTuning::default();
		if let Some(value) = self.search.debounce_ms {
			tuning.debounce_ms = value;
		}
		if let Some(value) = self.search.min_query_len {
			tuning.min_query_len = value;
		}

		let history_dir = match self.history.enabled {
			Some(false) => None,
			_ => Some(match self.history.dir {
				Some(dir) => dir,
				None => app_dirs::get_data_dir()?,
			}),
		};

		let log_level = match self.log.level.as_deref() {
			Some(level) => parse_level(level)?,
			None => LevelFilter::Info,
		};

		let catalog = self.catalog.resolve();
		let ui = self.ui.resolve()?;

		let config = ResolvedConfig {
			mode: ui.mode,
			title: ui.title,
			initial_query: ui.initial_query,
			tuning,
			catalog,
			customer: ui.customer,
			kinds: ui.kinds,
			cached: ui.cached,
			history_dir,
			log_level,
		};

		config.validate(&sources).map_err(Error::new)?;

		Ok(config)
	}
}

fn parse_level(value: &str) -> Result<LevelFilter> {
	LevelFilter::from_str(value.trim()).map_err(|_| anyhow!("unknown log level '{value}'"))
}
