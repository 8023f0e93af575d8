use anyhow::{Result, bail};
use seekbox_source_api::EntityKind;
use serde::Deserialize;

use super::super::resolved::Mode;
use crate::cli::CliArgs;

/// Which field the host mounts and how it is seeded.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct UiSection {
	pub(super) mode: Option<String>,
	pub(super) title: Option<String>,
	pub(super) initial_query: Option<String>,
	pub(super) customer: Option<u64>,
	pub(super) kinds: Option<Vec<String>>,
	pub(super) cached: Option<bool>,
}

pub(super) struct UiResolution {
	pub(super) mode: Mode,
	pub(super) title: String,
	pub(super) initial_query: String,
	pub(super) customer: Option<u64>,
	pub(super) kinds: Vec<EntityKind>,
	pub(super) cached: bool,
}

impl UiSection {
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		if let Some(mode) = cli.mode {
			self.mode = Some(mode.as_str().to_string());
		}
		if let Some(title) = cli.title.clone() {
			self.title = Some(title);
		}
		if let Some(query) = cli.initial_query.clone() {
			self.initial_query = Some(query);
		}
		if let Some(customer) = cli.customer {
			self.customer = Some(customer);
		}
		if let Some(kinds) = &cli.kinds {
			self.kinds = Some(kinds.iter().map(|kind| kind.as_str().to_string()).collect());
		}
		if let Some(cached) = cli.cached {
			self.cached = Some(cached);
		}
	}

	pub(super) fn resolve(self) -> Result<UiResolution> {
		let mode = match self.mode.as_deref() {
			Some(value) => parse_mode(value)?,
			None => Mode::Omnibox,
		};
		let title = self
			.title
			.map(|title| title.trim().to_string())
			.filter(|title| !title.is_empty())
			.unwrap_or_else(|| mode.default_title().to_string());
		let kinds = match self.kinds {
			Some(values) => parse_kinds(&values)?,
			None => Vec::new(),
		};

		Ok(UiResolution {
			mode,
			title,
			initial_query: self.initial_query.unwrap_or_default(),
			customer: self.customer,
			kinds,
			cached: self.cached.unwrap_or(false),
		})
	}
}

pub(super) fn parse_mode(value: &str) -> Result<Mode> {
	match value.trim().to_ascii_lowercase().as_str() {
		"omnibox" | "global" => Ok(Mode::Omnibox),
		"customer" | "customers" => Ok(Mode::Customer),
		"location" | "locations" => Ok(Mode::Location),
		other => bail!("unknown mode '{other}'"),
	}
}

/// Blank entries are skipped and duplicates collapse.
pub(super) fn parse_kinds(values: &[String]) -> Result<Vec<EntityKind>> {
	let mut kinds = Vec::new();
	for value in values {
		let kind = match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
			"" => continue,
			"customer" | "customers" => EntityKind::Customer,
			"work_item" | "work_items" => EntityKind::WorkItem,
			other => bail!("unknown search category '{other}'"),
		};
		if !kinds.contains(&kind) {
			kinds.push(kind);
		}
	}
	Ok(kinds)
}
