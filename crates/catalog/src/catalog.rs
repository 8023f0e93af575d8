use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::records::{Customer, Location, WorkItem};

const DEMO: &str = include_str!("../data/demo.json");

#[derive(Debug, Error)]
pub enum CatalogError {
	#[error("failed to read catalog {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid catalog: {0}")]
	Json(#[from] serde_json::Error),
}

/// Every record the directories can answer with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
	#[serde(default)]
	pub customers: Vec<Customer>,
	#[serde(default)]
	pub work_items: Vec<WorkItem>,
	#[serde(default)]
	pub locations: Vec<Location>,
}

impl Catalog {
	pub fn from_json(json: &str) -> Result<Self, CatalogError> {
		Ok(serde_json::from_str(json)?)
	}

	pub fn load(path: &Path) -> Result<Self, CatalogError> {
		let json = fs::read_to_string(path).map_err(|source| CatalogError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_json(&json)
	}

	/// Built-in sample data.
	pub fn demo() -> Result<Self, CatalogError> {
		Self::from_json(DEMO)
	}

	#[must_use]
	pub fn customer(&self, id: u64) -> Option<&Customer> {
		self.customers.iter().find(|customer| customer.id == id)
	}
}
