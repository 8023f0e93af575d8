use std::path::PathBuf;
use std::time::Duration;

use seekbox_source_api::TransportError;
use serde::Deserialize;

use super::super::resolved::CatalogSettings;
use crate::cli::CliArgs;

/// Where records come from and how the simulated transport behaves.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub(super) struct CatalogSection {
	pub(super) path: Option<PathBuf>,
	pub(super) latency_ms: Option<u64>,
	pub(super) fail_status: Option<u16>,
	pub(super) fail_detail: Option<String>,
}

impl CatalogSection {
	pub(super) fn apply_cli_overrides(&mut self, cli: &CliArgs) {
		if let Some(path) = cli.catalog.clone() {
			self.path = Some(path);
		}
		if let Some(value) = cli.latency_ms {
			self.latency_ms = Some(value);
		}
		if let Some(value) = cli.fail_status {
			self.fail_status = Some(value);
		}
		if let Some(detail) = cli.fail_detail.clone() {
			self.fail_detail = Some(detail);
		}
	}

	pub(super) fn resolve(self) -> CatalogSettings {
		let detail = self
			.fail_detail
			.map(|detail| detail.trim().to_string())
			.filter(|detail| !detail.is_empty());
		CatalogSettings {
			path: self.path,
			latency: Duration::from_millis(self.latency_ms.unwrap_or(0)),
			failure: self.fail_status.map(|status| TransportError::Status { status, detail }),
		}
	}
}
