use std::path::PathBuf;
use std::time::Duration;

use log::LevelFilter;
use seekbox_catalog::Faults;
use seekbox_engine::SearchTuning;
use seekbox_source_api::{EntityKind, TransportError};

mod errors;
mod summary;
mod validation;

pub(crate) use errors::ConfigError;
pub(crate) use validation::{ConfigSources, SettingSource};

/// Field mounted by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
	Omnibox,
	Customer,
	Location,
}

impl Mode {
	pub fn as_str(self) -> &'static str {
		match self {
			Mode::Omnibox => "omnibox",
			Mode::Customer => "customer",
			Mode::Location => "location",
		}
	}

	pub(crate) fn default_title(self) -> &'static str {
		match self {
			Mode::Omnibox => "Search",
			Mode::Customer => "Customer",
			Mode::Location => "Location",
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogSettings {
	/// `None` uses the built-in demo catalog.
	pub path: Option<PathBuf>,
	pub latency: Duration,
	pub failure: Option<TransportError>,
}

impl CatalogSettings {
	pub fn faults(&self) -> Faults {
		let faults = Faults::none().with_latency(self.latency);
		match &self.failure {
			Some(err) => faults.failing(err.clone()),
			None => faults,
		}
	}
}

/// Application-ready configuration derived from CLI flags, config files,
/// the environment and defaults.
#[derive(Debug)]
pub struct ResolvedConfig {
	pub mode: Mode,
	pub title: String,
	pub initial_query: String,
	pub tuning: SearchTuning,
	pub catalog: CatalogSettings,
	/// Scoping customer for the location picker.
	pub customer: Option<u64>,
	/// Omnibox category filter; empty searches everything.
	pub kinds: Vec<EntityKind>,
	/// Customer picker filters a cached full list instead of searching.
	pub cached: bool,
	/// `None` keeps search history in memory only.
	pub history_dir: Option<PathBuf>,
	pub log_level: LevelFilter,
}

impl ResolvedConfig {
	pub(super) fn validate(&self, sources: &ConfigSources) -> Result<(), ConfigError> {
		validation::validate(self, sources)
	}

	pub fn print_summary(&self) {
		summary::print_summary(self);
	}
}

#[cfg(test)]
impl Default for ResolvedConfig {
	fn default() -> Self {
		Self {
			mode: Mode::Omnibox,
			title: Mode::Omnibox.default_title().to_string(),
			initial_query: String::new(),
			tuning: SearchTuning::default(),
			catalog: CatalogSettings::default(),
			customer: None,
			kinds: Vec::new(),
			cached: false,
			history_dir: None,
			log_level: LevelFilter::Info,
		}
	}
}
