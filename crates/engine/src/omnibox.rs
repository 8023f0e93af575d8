//! Federated search across customers and work items, with search history.

use std::sync::Arc;

use log::{debug, error};
use seekbox_source_api::{EntityKind, ItemId, OmniboxBundle, OmniboxSource, Record};

use crate::config::SearchTuning;
use crate::highlight::Highlight;
use crate::keys::NavKey;
use crate::query::{meets_threshold, normalize};
use crate::recent::RecentSearchStore;
use crate::session::{SearchSession, Settlement};

/// Banner text for failures that carry no explanation of their own.
pub const GENERIC_FAILURE: &str = "Search failed. Please try again.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OmniboxPhase {
	#[default]
	Idle,
	/// Waiting out the debounce window.
	Debouncing,
	Searching,
	Succeeded,
	/// The outstanding search was dropped before it settled.
	Cancelled,
	Failed,
}

/// Where the host should navigate after a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OmniboxTarget {
	Customer(ItemId),
	WorkItem(ItemId),
	/// The full results page for a query.
	AllResults(String),
}

/// One navigable row of the result panel.
#[derive(Debug, Clone, PartialEq)]
pub enum OmniboxEntry<'a, C, W> {
	Customer(&'a C),
	WorkItem(&'a W),
}

impl<C: Record, W: Record> OmniboxEntry<'_, C, W> {
	#[must_use]
	pub fn label(&self) -> String {
		match self {
			Self::Customer(customer) => customer.label(),
			Self::WorkItem(work_item) => work_item.label(),
		}
	}

	#[must_use]
	pub fn target(&self) -> OmniboxTarget {
		match self {
			Self::Customer(customer) => OmniboxTarget::Customer(customer.id()),
			Self::WorkItem(work_item) => OmniboxTarget::WorkItem(work_item.id()),
		}
	}
}

type Bundle<S> = OmniboxBundle<<S as OmniboxSource>::Customer, <S as OmniboxSource>::WorkItem>;

pub struct OmniboxSearchEngine<S: OmniboxSource> {
	source: Arc<S>,
	kinds: Vec<EntityKind>,
	tuning: SearchTuning,
	recent: RecentSearchStore,
	on_navigate: Box<dyn FnMut(OmniboxTarget)>,

	query: String,
	/// Query of the outstanding search, recorded into history on success.
	searched: Option<String>,
	results: Bundle<S>,
	highlight: Highlight,
	open: bool,
	phase: OmniboxPhase,
	banner: Option<String>,
	search: SearchSession<Bundle<S>>,
}

impl<S: OmniboxSource> OmniboxSearchEngine<S> {
	pub fn new(
		source: Arc<S>,
		recent: RecentSearchStore,
		on_navigate: impl FnMut(OmniboxTarget) + 'static,
	) -> Self {
		let tuning = SearchTuning::default();
		Self {
			source,
			kinds: Vec::new(),
			tuning,
			recent,
			on_navigate: Box::new(on_navigate),
			query: String::new(),
			searched: None,
			results: OmniboxBundle::default(),
			highlight: Highlight::default(),
			open: false,
			phase: OmniboxPhase::Idle,
			banner: None,
			search: SearchSession::new(tuning.debounce()),
		}
	}

	#[must_use]
	pub fn with_tuning(mut self, tuning: SearchTuning) -> Self {
		self.tuning = tuning;
		self.search = SearchSession::new(tuning.debounce());
		self
	}

	/// Restrict searches to `kinds`; an empty list searches every category.
	#[must_use]
	pub fn with_kinds(mut self, kinds: Vec<EntityKind>) -> Self {
		self.kinds = kinds;
		self
	}

	/// Change the category filter, re-running the current query at once.
	pub fn set_kinds(&mut self, kinds: Vec<EntityKind>) {
		if kinds == self.kinds {
			return;
		}
		self.kinds = kinds;
		if self.meets_threshold() {
			self.highlight.clear();
			let query = normalize(&self.query).to_string();
			self.start(query, true);
		}
	}

	pub fn set_query(&mut self, text: impl Into<String>) {
		self.query = text.into();
		self.highlight.clear();

		if self.meets_threshold() {
			self.open = true;
			let query = normalize(&self.query).to_string();
			self.start(query, false);
			return;
		}

		self.phase = OmniboxPhase::Idle;
		self.cancel_outstanding();
		self.results = OmniboxBundle::default();
		self.banner = None;
	}

	/// Clear button: empty the input and drop every result.
	pub fn clear_query(&mut self) {
		self.set_query(String::new());
	}

	pub fn focus(&mut self) {
		if self.meets_threshold() || !self.recent.is_empty() {
			self.open = true;
		}
	}

	pub fn blur(&mut self) {
		self.close();
	}

	pub fn click_outside(&mut self) {
		self.close();
	}

	/// Returns `true` when the key was consumed. Tab closes the panel but is
	/// left for the host to move focus.
	pub fn handle_key(&mut self, key: NavKey) -> bool {
		if !self.open {
			return false;
		}

		let count = self.row_count();
		match key {
			NavKey::Down => {
				self.highlight.next(count);
				true
			}
			NavKey::Up => {
				self.highlight.previous(count);
				true
			}
			NavKey::Enter => self.enter(),
			NavKey::Escape => {
				self.close();
				true
			}
			NavKey::Tab => {
				self.close();
				false
			}
		}
	}

	fn enter(&mut self) -> bool {
		let highlighted = self.highlight.index();
		if self.showing_recent() {
			return match highlighted {
				Some(index) => self.select_recent(index),
				None => false,
			};
		}
		if let Some(index) = highlighted {
			return self.select_entry(index);
		}
		if self.meets_threshold() {
			let query = normalize(&self.query).to_string();
			self.cancel_outstanding();
			self.close();
			(self.on_navigate)(OmniboxTarget::AllResults(query));
			return true;
		}
		false
	}

	pub fn hover(&mut self, index: usize) {
		self.highlight.set(index, self.row_count());
	}

	/// Navigate to the result row at `index`.
	pub fn select_entry(&mut self, index: usize) -> bool {
		let Some(target) = self.entry(index).map(|entry| entry.target()) else {
			return false;
		};
		self.cancel_outstanding();
		self.close();
		(self.on_navigate)(target);
		true
	}

	/// Re-run the stored query at `index` without waiting for the debounce.
	pub fn select_recent(&mut self, index: usize) -> bool {
		let Some(query) = self.recent.get(index).map(str::to_string) else {
			return false;
		};
		self.query.clone_from(&query);
		self.highlight.clear();
		self.open = true;
		self.start(normalize(&query).to_string(), true);
		true
	}

	pub fn clear_recent(&mut self) {
		let was_showing = self.showing_recent();
		self.recent.clear();
		if was_showing {
			self.highlight.clear();
		}
	}

	pub fn dismiss_error(&mut self) {
		self.banner = None;
	}

	/// Cancel any outstanding search. Dropping the engine does the same.
	pub fn shutdown(&mut self) {
		self.cancel_outstanding();
		self.close();
	}

	pub fn pump(&mut self) -> bool {
		let mut changed = false;
		while let Some(settlement) = self.search.try_next() {
			self.apply(settlement);
			changed = true;
		}
		changed
	}

	pub async fn settle(&mut self) {
		while let Some(settlement) = self.search.next().await {
			self.apply(settlement);
		}
	}

	#[must_use]
	pub fn query(&self) -> &str {
		&self.query
	}

	#[must_use]
	pub fn phase(&self) -> OmniboxPhase {
		self.phase
	}

	#[must_use]
	pub fn is_loading(&self) -> bool {
		self.phase == OmniboxPhase::Searching
	}

	#[must_use]
	pub fn is_open(&self) -> bool {
		self.open
	}

	#[must_use]
	pub fn results(&self) -> &Bundle<S> {
		&self.results
	}

	#[must_use]
	pub fn kinds(&self) -> &[EntityKind] {
		&self.kinds
	}

	/// Dismissible failure message.
	#[must_use]
	pub fn error(&self) -> Option<&str> {
		self.banner.as_deref()
	}

	#[must_use]
	pub fn recent(&self) -> &RecentSearchStore {
		&self.recent
	}

	#[must_use]
	pub fn highlighted(&self) -> Option<usize> {
		self.highlight.index()
	}

	/// Whether the panel lists search history instead of results.
	#[must_use]
	pub fn showing_recent(&self) -> bool {
		!self.meets_threshold() && !self.recent.is_empty()
	}

	/// Result rows in navigation order: customers, then work items.
	pub fn entries(&self) -> impl Iterator<Item = OmniboxEntry<'_, S::Customer, S::WorkItem>> {
		self.results
			.customers
			.iter()
			.map(OmniboxEntry::Customer)
			.chain(self.results.work_items.iter().map(OmniboxEntry::WorkItem))
	}

	#[must_use]
	pub fn entry(&self, index: usize) -> Option<OmniboxEntry<'_, S::Customer, S::WorkItem>> {
		let customers = self.results.customers.len();
		if index < customers {
			return self.results.customers.get(index).map(OmniboxEntry::Customer);
		}
		self.results
			.work_items
			.get(index - customers)
			.map(OmniboxEntry::WorkItem)
	}

	fn meets_threshold(&self) -> bool {
		meets_threshold(&self.query, self.tuning.min_query_len)
	}

	fn row_count(&self) -> usize {
		if self.showing_recent() {
			self.recent.len()
		} else {
			self.results.flat_len()
		}
	}

	fn close(&mut self) {
		self.open = false;
		self.highlight.clear();
	}

	fn start(&mut self, query: String, immediate: bool) {
		let kinds = self.kinds.clone();
		let source = Arc::clone(&self.source);
		self.searched = Some(query.clone());
		let fetch = move || async move { source.omnibox_search(&query, &kinds).await };
		if immediate {
			self.search.submit_now(fetch);
		} else {
			self.search.submit(fetch);
		}
		self.phase = OmniboxPhase::Debouncing;
	}

	/// Drop the outstanding search, if any, and mark the phase cancelled.
	fn cancel_outstanding(&mut self) {
		if !self.search.is_pending() {
			return;
		}
		self.search.cancel();
		self.searched = None;
		self.phase = OmniboxPhase::Cancelled;
	}

	fn apply(&mut self, settlement: Settlement<Bundle<S>>) {
		match settlement {
			Settlement::Started => {
				self.phase = OmniboxPhase::Searching;
				self.banner = None;
			}
			Settlement::Resolved(bundle) => {
				self.phase = OmniboxPhase::Succeeded;
				let searched = self.searched.take();
				if let Some(query) = searched.filter(|_| bundle.total_count > 0) {
					self.recent.record(&query);
				}
				debug!("omnibox search returned {} rows", bundle.flat_len());
				self.results = bundle;
				self.highlight.reclamp(self.row_count());
			}
			Settlement::Failed(err) => {
				self.phase = OmniboxPhase::Failed;
				self.searched = None;
				error!("omnibox search for {:?} failed: {err}", normalize(&self.query));
				self.banner = Some(err.detail().unwrap_or(GENERIC_FAILURE).to_string());
				self.results = OmniboxBundle::default();
				self.highlight.clear();
			}
		}
	}
}
