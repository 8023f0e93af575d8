use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

/// Failures while reading or writing persisted history.
#[derive(Debug, Error)]
pub enum HistoryError {
	#[error("failed to access {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	#[error("history is not a JSON list of strings: {0}")]
	Json(#[from] serde_json::Error),
}

/// Key/value storage behind a [`RecentSearchStore`](super::RecentSearchStore).
pub trait HistoryBackend: Send {
	/// Stored value for `key`, or `None` when nothing was saved yet.
	fn read(&self, key: &str) -> Result<Option<String>, HistoryError>;

	fn write(&self, key: &str, value: &str) -> Result<(), HistoryError>;

	/// Drop the value for `key`; removing a missing key is not an error.
	fn remove(&self, key: &str) -> Result<(), HistoryError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
	dir: PathBuf,
}

impl JsonFileBackend {
	#[must_use]
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	#[must_use]
	pub fn dir(&self) -> &Path {
		&self.dir
	}

	/// File that holds the value for `key`.
	#[must_use]
	pub fn path_for(&self, key: &str) -> PathBuf {
		self.dir.join(format!("{key}.json"))
	}
}

fn io_error(path: &Path, source: io::Error) -> HistoryError {
	HistoryError::Io {
		path: path.to_path_buf(),
		source,
	}
}

impl HistoryBackend for JsonFileBackend {
	fn read(&self, key: &str) -> Result<Option<String>, HistoryError> {
		let path = self.path_for(key);
		match fs::read_to_string(&path) {
			Ok(contents) => Ok(Some(contents)),
			Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
			Err(err) => Err(io_error(&path, err)),
		}
	}

	fn write(&self, key: &str, value: &str) -> Result<(), HistoryError> {
		fs::create_dir_all(&self.dir).map_err(|err| io_error(&self.dir, err))?;
		let path = self.path_for(key);
		fs::write(&path, value).map_err(|err| io_error(&path, err))
	}

	fn remove(&self, key: &str) -> Result<(), HistoryError> {
		let path = self.path_for(key);
		match fs::remove_file(&path) {
			Ok(()) => Ok(()),
			Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
			Err(err) => Err(io_error(&path, err)),
		}
	}
}

/// Process-local backend. Clones share the same storage, so a test can keep
/// a handle and inspect what a store persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
	values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryBackend {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Backend pre-populated with a raw value.
	#[must_use]
	pub fn with_value(key: &str, value: &str) -> Self {
		let backend = Self::default();
		backend.values.lock().insert(key.to_string(), value.to_string());
		backend
	}

	/// Raw stored value for `key`.
	#[must_use]
	pub fn raw(&self, key: &str) -> Option<String> {
		self.values.lock().get(key).cloned()
	}
}

impl HistoryBackend for MemoryBackend {
	fn read(&self, key: &str) -> Result<Option<String>, HistoryError> {
		Ok(self.raw(key))
	}

	fn write(&self, key: &str, value: &str) -> Result<(), HistoryError> {
		self.values.lock().insert(key.to_string(), value.to_string());
		Ok(())
	}

	fn remove(&self, key: &str) -> Result<(), HistoryError> {
		self.values.lock().remove(key);
		Ok(())
	}
}
