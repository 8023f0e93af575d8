use std::collections::HashMap;
use std::env;
use std::fmt;

use seekbox_source_api::TransportError;

use super::{ConfigError, ResolvedConfig};

const MIN_QUERY_LEN: &str = "search.min_query_len";
const FAIL_STATUS: &str = "catalog.fail_status";

/// Where a validated value came from, for error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SettingSource {
	CliFlag(String),
	Environment(String),
	ConfigKey(String),
}

impl fmt::Display for SettingSource {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::CliFlag(flag) => write!(f, "CLI flag `{flag}`"),
			Self::Environment(var) => write!(f, "environment variable `{var}`"),
			Self::ConfigKey(key) => write!(f, "configuration key `{key}`"),
		}
	}
}

/// Origins of the settings that validation can reject, keyed by config key.
#[derive(Debug, Default, Clone)]
pub(crate) struct ConfigSources {
	origins: HashMap<&'static str, SettingSource>,
}

impl ConfigSources {
	/// Remember where `key` was set. The CLI flag and environment variable
	/// names are derived from the key (`search.min_query_len` maps to
	/// `--min-query-len` and `SEEKBOX__SEARCH__MIN_QUERY_LEN`).
	pub(crate) fn track(&mut self, key: &'static str, from_cli: bool, present: bool) {
		if !present {
			return;
		}
		let origin = if from_cli {
			SettingSource::CliFlag(cli_flag(key))
		} else {
			let var = env_var(key);
			if env::var_os(&var).is_some() {
				SettingSource::Environment(var)
			} else {
				SettingSource::ConfigKey(key.to_string())
			}
		};
		self.origins.insert(key, origin);
	}

	pub(crate) fn with(mut self, key: &'static str, origin: SettingSource) -> Self {
		self.origins.insert(key, origin);
		self
	}

	pub(crate) fn origin(&self, key: &'static str) -> SettingSource {
		self.origins
			.get(key)
			.cloned()
			.unwrap_or_else(|| SettingSource::ConfigKey(key.to_string()))
	}
}

fn cli_flag(key: &str) -> String {
	let field = key.rsplit('.').next().unwrap_or(key);
	format!("--{}", field.replace('_', "-"))
}

fn env_var(key: &str) -> String {
	format!("SEEKBOX__{}", key.replace('.', "__").to_uppercase())
}

pub(super) fn validate(config: &ResolvedConfig, sources: &ConfigSources) -> Result<(), ConfigError> {
	if config.tuning.min_query_len == 0 {
		return Err(ConfigError::invalid(
			MIN_QUERY_LEN,
			"0",
			sources.origin(MIN_QUERY_LEN),
			"must be at least 1",
		));
	}

	if let Some(TransportError::Status { status, .. }) = &config.catalog.failure
		&& !(400..=599).contains(status)
	{
		return Err(ConfigError::invalid(
			FAIL_STATUS,
			status.to_string(),
			sources.origin(FAIL_STATUS),
			"must be an HTTP error status (400-599)",
		));
	}

	Ok(())
}
