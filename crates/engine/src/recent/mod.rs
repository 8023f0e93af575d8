//! Bounded, persisted history of successful omnibox queries.

mod backend;

use log::warn;

pub use backend::{HistoryBackend, HistoryError, JsonFileBackend, MemoryBackend};

use crate::MIN_QUERY_LEN;

/// Storage key of the history list.
pub const RECENT_SEARCHES_KEY: &str = "globalSearch_recentSearches";

/// Number of queries kept.
pub const MAX_RECENT_SEARCHES: usize = 5;

/// Distinct past queries, most recent first.
///
/// Persistence problems never escape the store: they are logged and the
/// in-memory list keeps working.
pub struct RecentSearchStore {
	entries: Vec<String>,
	backend: Box<dyn HistoryBackend>,
}

impl std::fmt::Debug for RecentSearchStore {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("RecentSearchStore")
			.field("entries", &self.entries)
			.finish_non_exhaustive()
	}
}

impl RecentSearchStore {
	/// Hydrate from `backend`. Missing or malformed data yields an empty list.
	pub fn load(backend: impl HistoryBackend + 'static) -> Self {
		let entries = match read_entries(&backend) {
			Ok(entries) => entries,
			Err(err) => {
				warn!("ignoring unreadable search history: {err}");
				Vec::new()
			}
		};
		Self {
			entries,
			backend: Box::new(backend),
		}
	}

	/// Store that forgets everything when dropped.
	#[must_use]
	pub fn ephemeral() -> Self {
		Self::load(MemoryBackend::new())
	}

	#[must_use]
	pub fn entries(&self) -> &[String] {
		&self.entries
	}

	#[must_use]
	pub fn get(&self, index: usize) -> Option<&str> {
		self.entries.get(index).map(String::as_str)
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Move `query` to the front, dropping any earlier copy and the oldest
	/// entries past the bound.
	pub fn record(&mut self, query: &str) {
		if query.trim().chars().count() < MIN_QUERY_LEN {
			return;
		}

		self.entries.retain(|entry| entry != query);
		self.entries.insert(0, query.to_string());
		self.entries.truncate(MAX_RECENT_SEARCHES);
		self.persist();
	}

	pub fn clear(&mut self) {
		self.entries.clear();
		if let Err(err) = self.backend.remove(RECENT_SEARCHES_KEY) {
			warn!("failed to clear search history: {err}");
		}
	}

	fn persist(&self) {
		let result = serde_json::to_string(&self.entries)
			.map_err(HistoryError::from)
			.and_then(|encoded| self.backend.write(RECENT_SEARCHES_KEY, &encoded));
		if let Err(err) = result {
			warn!("failed to save search history: {err}");
		}
	}
}

fn read_entries(backend: &dyn HistoryBackend) -> Result<Vec<String>, HistoryError> {
	let Some(raw) = backend.read(RECENT_SEARCHES_KEY)? else {
		return Ok(Vec::new());
	};
	let mut entries: Vec<String> = serde_json::from_str(&raw)?;
	entries.truncate(MAX_RECENT_SEARCHES);
	Ok(entries)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn duplicate_record_keeps_a_single_entry() {
		let mut store = RecentSearchStore::ephemeral();
		store.record("ab");
		store.record("ab");
		assert_eq!(store.entries(), ["ab"]);
	}

	#[test]
	fn repeated_query_moves_to_front() {
		let mut store = RecentSearchStore::ephemeral();
		store.record("smith");
		store.record("jones");
		store.record("smith");
		assert_eq!(store.entries(), ["smith", "jones"]);
	}

	#[test]
	fn bound_keeps_the_most_recent_five() {
		let mut store = RecentSearchStore::ephemeral();
		for query in ["q1", "q2", "q3", "q4", "q5", "q6"] {
			store.record(query);
		}
		assert_eq!(store.entries(), ["q6", "q5", "q4", "q3", "q2"]);
	}

	#[test]
	fn short_queries_are_not_recorded() {
		let mut store = RecentSearchStore::ephemeral();
		store.record("a");
		store.record("  b  ");
		store.record("");
		assert!(store.is_empty());
	}

	#[test]
	fn records_persist_as_a_json_list() {
		let backend = MemoryBackend::new();
		let mut store = RecentSearchStore::load(backend.clone());
		store.record("ab");
		store.record("cd");
		assert_eq!(
			backend.raw(RECENT_SEARCHES_KEY).as_deref(),
			Some(r#"["cd","ab"]"#)
		);

		let reloaded = RecentSearchStore::load(backend);
		assert_eq!(reloaded.entries(), ["cd", "ab"]);
	}

	#[test]
	fn malformed_backing_loads_empty() {
		let backend = MemoryBackend::with_value(RECENT_SEARCHES_KEY, "{not json");
		assert!(RecentSearchStore::load(backend).is_empty());

		let wrong_shape = MemoryBackend::with_value(RECENT_SEARCHES_KEY, r#"{"q": 1}"#);
		assert!(RecentSearchStore::load(wrong_shape).is_empty());
	}

	#[test]
	fn oversized_backing_is_truncated() {
		let backend = MemoryBackend::with_value(
			RECENT_SEARCHES_KEY,
			r#"["a1","a2","a3","a4","a5","a6","a7"]"#,
		);
		assert_eq!(RecentSearchStore::load(backend).len(), MAX_RECENT_SEARCHES);
	}

	#[test]
	fn clear_removes_the_backing() {
		let backend = MemoryBackend::new();
		let mut store = RecentSearchStore::load(backend.clone());
		store.record("ab");
		store.clear();
		assert!(store.is_empty());
		assert!(backend.raw(RECENT_SEARCHES_KEY).is_none());
	}

	#[test]
	fn history_survives_in_a_file() {
		let dir = tempfile::tempdir().unwrap();
		{
			let mut store = RecentSearchStore::load(JsonFileBackend::new(dir.path()));
			store.record("harbour");
		}
		let store = RecentSearchStore::load(JsonFileBackend::new(dir.path()));
		assert_eq!(store.get(0), Some("harbour"));
	}
}
