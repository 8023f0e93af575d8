use std::time::Duration;

use serde::Deserialize;

use crate::{DEFAULT_DEBOUNCE_MS, MIN_QUERY_LEN};

/// Timing and threshold knobs shared by every engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchTuning {
	/// Quiet period, in milliseconds, before a keystroke issues a search.
	pub debounce_ms: u64,
	/// Minimum trimmed query length for a remote search.
	pub min_query_len: usize,
}

impl Default for SearchTuning {
	fn default() -> Self {
		Self {
			debounce_ms: DEFAULT_DEBOUNCE_MS,
			min_query_len: MIN_QUERY_LEN,
		}
	}
}

impl SearchTuning {
	#[must_use]
	pub fn debounce(&self) -> Duration {
		Duration::from_millis(self.debounce_ms)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn partial_sections_keep_defaults() {
		let tuning: SearchTuning = serde_json::from_str(r#"{"debounce_ms": 120}"#).unwrap();
		assert_eq!(tuning.debounce(), Duration::from_millis(120));
		assert_eq!(tuning.min_query_len, MIN_QUERY_LEN);
	}
}
