//! Asynchronous type-ahead engines.
//!
//! Three engines share the same building blocks:
//!
//! - [`SearchSession`] turns a burst of query changes into a single
//!   collaborator call and discards anything a newer query superseded.
//! - [`highlight`] keeps the keyboard highlight inside the current result set.
//! - [`RecentSearchStore`] remembers successful omnibox queries across runs.
//!
//! [`AutocompleteEngine`] resolves a single entity, [`GroupedAutocompleteEngine`]
//! adds labeled groups and a create-new entry, and [`OmniboxSearchEngine`]
//! federates one query across categories.
//!
//! Engines are driven from one thread. Collaborator calls run on the ambient
//! tokio runtime, and their results are applied when the host calls `pump`
//! (non-blocking) or awaits `settle`.

pub mod autocomplete;
pub mod callbacks;
pub mod config;
pub mod grouped;
pub mod highlight;
pub mod keys;
pub mod omnibox;
pub mod query;
pub mod recent;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use autocomplete::{AutocompleteEngine, Preseed};
pub use callbacks::{CreateRequest, DisplayFn};
pub use config::SearchTuning;
pub use grouped::{GroupedAutocompleteEngine, SENTINEL_GROUP};
pub use highlight::Highlight;
pub use keys::NavKey;
pub use omnibox::{
	GENERIC_FAILURE, OmniboxEntry, OmniboxPhase, OmniboxSearchEngine, OmniboxTarget,
};
pub use recent::{
	HistoryBackend, HistoryError, JsonFileBackend, MAX_RECENT_SEARCHES, MemoryBackend,
	RECENT_SEARCHES_KEY, RecentSearchStore,
};
pub use session::{SearchSession, Settlement};

/// Default quiet period before a keystroke turns into a collaborator call.
pub const DEFAULT_DEBOUNCE_MS: u64 = 300;

/// Minimum trimmed query length that may reach a collaborator.
pub const MIN_QUERY_LEN: usize = 2;
