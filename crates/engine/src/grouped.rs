//! Type-ahead selector whose results arrive in labeled groups.
//!
//! Keystrokes of two or more characters are debounced. Clearing the input,
//! focusing an empty input and changing the scoping context fetch right away
//! so the defaults for the new scope show up without a delay.

use std::sync::Arc;

use log::warn;
use seekbox_source_api::{Group, GroupedResults, GroupedSource, Record};

use crate::callbacks::{CreateFn, CreateRequest, DisplayFn, SelectFn, label_display};
use crate::config::SearchTuning;
use crate::highlight::Highlight;
use crate::keys::NavKey;
use crate::query::{meets_threshold, normalize};
use crate::session::{SearchSession, Settlement};

/// Group that receives a sentinel the engine appends itself.
pub const SENTINEL_GROUP: &str = "Other";

pub struct GroupedAutocompleteEngine<S: GroupedSource> {
	source: Arc<S>,
	context: S::Context,
	tuning: SearchTuning,
	display: DisplayFn<S::Item>,
	on_select: SelectFn<S::Item>,
	on_create: Option<CreateFn>,

	query: String,
	results: GroupedResults<S::Item>,
	highlight: Highlight,
	open: bool,
	searching: bool,
	selected: Option<S::Item>,
	search: SearchSession<GroupedResults<S::Item>>,
}

impl<S: GroupedSource> GroupedAutocompleteEngine<S> {
	pub fn new(
		source: Arc<S>,
		context: S::Context,
		on_select: impl FnMut(&S::Item) + 'static,
	) -> Self {
		let tuning = SearchTuning::default();
		Self {
			source,
			context,
			tuning,
			display: label_display(),
			on_select: Box::new(on_select),
			on_create: None,
			query: String::new(),
			results: GroupedResults::default(),
			highlight: Highlight::default(),
			open: false,
			searching: false,
			selected: None,
			search: SearchSession::new(tuning.debounce()),
		}
	}

	#[must_use]
	pub fn with_tuning(mut self, tuning: SearchTuning) -> Self {
		self.tuning = tuning;
		self.search = SearchSession::new(tuning.debounce());
		self
	}

	#[must_use]
	pub fn with_display(
		mut self,
		display: impl Fn(&S::Item) -> String + Send + Sync + 'static,
	) -> Self {
		self.display = Arc::new(display);
		self
	}

	/// Callback for the create-new flow started from the sentinel row.
	#[must_use]
	pub fn on_create_new(mut self, on_create: impl FnMut(CreateRequest) + 'static) -> Self {
		self.on_create = Some(Box::new(on_create));
		self
	}

	/// Show `value` as the current selection without firing `on_select`.
	pub fn preseed(&mut self, value: Option<S::Item>) {
		match value {
			Some(item) => {
				self.query = (self.display)(&item);
				self.selected = Some(item);
			}
			None => {
				self.query.clear();
				self.selected = None;
			}
		}
	}

	pub fn set_query(&mut self, text: impl Into<String>) {
		self.query = text.into();
		self.open = true;

		let trimmed = normalize(&self.query);
		if trimmed.is_empty() {
			self.fetch_now();
		} else if meets_threshold(trimmed, self.tuning.min_query_len) {
			let query = trimmed.to_string();
			let context = self.context.clone();
			let source = Arc::clone(&self.source);
			self.search.submit(move || async move {
				source.grouped_search(&query, &context).await
			});
		} else {
			self.search.cancel();
			self.searching = false;
			self.results = GroupedResults::default();
			self.highlight.clear();
		}
	}

	pub fn focus(&mut self) {
		self.open = true;
		if normalize(&self.query).is_empty() {
			self.fetch_now();
		}
	}

	pub fn blur(&mut self) {
		self.open = false;
	}

	/// Change the scoping parameters. A different value refetches at once.
	pub fn set_context(&mut self, context: S::Context) {
		if context == self.context {
			return;
		}
		self.context = context;
		self.fetch_now();
	}

	#[must_use]
	pub fn context(&self) -> &S::Context {
		&self.context
	}

	/// Returns `true` when the key was consumed.
	pub fn handle_key(&mut self, key: NavKey) -> bool {
		let count = self.results.flat_len();
		if !self.open {
			if key == NavKey::Down && count > 0 {
				self.open = true;
				self.highlight.set(0, count);
				return true;
			}
			return false;
		}

		match key {
			NavKey::Down if count > 0 => {
				self.highlight.next(count);
				true
			}
			NavKey::Up if count > 0 => {
				self.highlight.previous(count);
				true
			}
			NavKey::Enter => match self.highlight.index() {
				Some(index) => self.select_at(index),
				None => false,
			},
			NavKey::Escape => {
				self.open = false;
				true
			}
			NavKey::Tab => {
				self.open = false;
				false
			}
			NavKey::Up | NavKey::Down => false,
		}
	}

	pub fn hover(&mut self, index: usize) {
		self.highlight.set(index, self.results.flat_len());
	}

	/// Commit the flattened row at `index`.
	///
	/// The sentinel row starts the create flow instead of selecting.
	pub fn select_at(&mut self, index: usize) -> bool {
		let Some(item) = self.results.flat_get(index).cloned() else {
			return false;
		};
		self.search.cancel();
		self.searching = false;
		self.open = false;

		if item.is_create_new() {
			let name = normalize(&self.query);
			let request = if name.is_empty() {
				CreateRequest::Blank
			} else {
				CreateRequest::FromQuery(name.to_string())
			};
			if let Some(on_create) = self.on_create.as_mut() {
				on_create(request);
			}
			return true;
		}

		self.commit(item);
		true
	}

	/// Select the record the host created after a sentinel selection.
	pub fn complete_creation(&mut self, item: S::Item) {
		self.commit(item);
	}

	fn commit(&mut self, item: S::Item) {
		self.query = (self.display)(&item);
		(self.on_select)(&item);
		self.selected = Some(item);
		self.open = false;
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
	pub fn results(&self) -> &GroupedResults<S::Item> {
		&self.results
	}

	#[must_use]
	pub fn highlighted(&self) -> Option<usize> {
		self.highlight.index()
	}

	#[must_use]
	pub fn highlighted_item(&self) -> Option<&S::Item> {
		self.highlight
			.index()
			.and_then(|index| self.results.flat_get(index))
	}

	#[must_use]
	pub fn is_open(&self) -> bool {
		self.open
	}

	#[must_use]
	pub fn is_loading(&self) -> bool {
		self.searching
	}

	#[must_use]
	pub fn selected(&self) -> Option<&S::Item> {
		self.selected.as_ref()
	}

	#[must_use]
	pub fn display(&self, item: &S::Item) -> String {
		(self.display)(item)
	}

	/// Zero-delay fetch with the current query, or the defaults when it is
	/// too short.
	fn fetch_now(&mut self) {
		let trimmed = normalize(&self.query);
		let query = if meets_threshold(trimmed, self.tuning.min_query_len) {
			trimmed.to_string()
		} else {
			String::new()
		};
		let context = self.context.clone();
		let source = Arc::clone(&self.source);
		self.search.submit_now(move || async move {
			source.grouped_search(&query, &context).await
		});
	}

	fn apply(&mut self, settlement: Settlement<GroupedResults<S::Item>>) {
		match settlement {
			Settlement::Started => self.searching = true,
			Settlement::Resolved(results) => {
				self.searching = false;
				self.results = with_sentinel(results, || self.source.sentinel());
				self.highlight.reset_to_first(self.results.flat_len());
			}
			Settlement::Failed(err) => {
				self.searching = false;
				warn!("grouped search for {:?} failed: {err}", normalize(&self.query));
				self.results = GroupedResults::default();
				self.highlight.clear();
			}
		}
	}
}

/// Ensure a response without real matches still offers the create-new row.
fn with_sentinel<T: Record>(
	mut results: GroupedResults<T>,
	sentinel: impl FnOnce() -> T,
) -> GroupedResults<T> {
	if results.has_real_items() || results.has_sentinel() {
		return results;
	}
	let sentinel = sentinel();
	match results.groups.last_mut() {
		Some(group) if group.label == SENTINEL_GROUP => group.items.push(sentinel),
		_ => results.groups.push(Group::new(SENTINEL_GROUP, vec![sentinel])),
	}
	results
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use seekbox_source_api::TransportError;
	use tokio::time;

	use super::*;
	use crate::testing::{Person, PlacesSource, Recorder, groups, person, sentinel};

	fn engine(
		source: &Arc<PlacesSource>,
	) -> (
		GroupedAutocompleteEngine<PlacesSource>,
		Recorder<Person>,
		Recorder<CreateRequest>,
	) {
		let picked = Recorder::new();
		let created = Recorder::new();
		let engine = GroupedAutocompleteEngine::new(Arc::clone(source), None, picked.ref_sink())
			.on_create_new(created.sink());
		(engine, picked, created)
	}

	#[tokio::test(start_paused = true)]
	async fn results_flatten_in_group_order() {
		let source = Arc::new(PlacesSource::new());
		source.respond(
			"ma",
			groups(&[
				("Shops", &[person(1, "Main St")]),
				("Customer Addresses", &[person(2, "Maple Rd"), person(3, "Marsh Ln")]),
				("Other", &[sentinel()]),
			]),
		);
		let (mut engine, picked, _) = engine(&source);

		engine.set_query("ma");
		engine.settle().await;
		assert_eq!(engine.results().flat_len(), 4);
		assert_eq!(engine.results().groups[2].items, [sentinel()]);

		engine.handle_key(NavKey::Down);
		engine.handle_key(NavKey::Down);
		assert_eq!(engine.highlighted_item(), Some(&person(3, "Marsh Ln")));
		engine.handle_key(NavKey::Enter);
		assert_eq!(picked.seen(), [person(3, "Marsh Ln")]);
		assert_eq!(engine.query(), "Marsh Ln");
	}

	#[tokio::test(start_paused = true)]
	async fn empty_response_gets_one_sentinel() {
		let source = Arc::new(PlacesSource::new());
		source.respond("zz", groups(&[("Shops", &[])]));
		let (mut engine, _, _) = engine(&source);

		engine.set_query("zz");
		engine.settle().await;
		let flat: Vec<_> = engine.results().iter_flat().cloned().collect();
		assert_eq!(flat, [sentinel()]);
		assert_eq!(engine.results().groups.last().map(|g| g.label.as_str()), Some("Other"));
	}

	#[tokio::test(start_paused = true)]
	async fn sentinel_starts_creation_instead_of_selecting() {
		let source = Arc::new(PlacesSource::new());
		source.respond("12 harbour", groups(&[("Other", &[sentinel()])]));
		let (mut engine, picked, created) = engine(&source);

		engine.set_query("12 harbour ");
		engine.settle().await;
		assert!(engine.handle_key(NavKey::Enter));
		assert!(!engine.is_open());
		assert!(picked.seen().is_empty());
		assert_eq!(created.seen(), [CreateRequest::FromQuery("12 harbour".into())]);

		engine.complete_creation(person(40, "12 Harbour Rd"));
		assert_eq!(picked.seen(), [person(40, "12 Harbour Rd")]);
		assert_eq!(engine.query(), "12 Harbour Rd");
		assert_eq!(created.seen().len(), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn empty_query_and_focus_fetch_defaults_immediately() {
		let source = Arc::new(PlacesSource::new());
		source.respond("", groups(&[("Shops", &[person(1, "Main St")])]));
		let (mut engine, _, _) = engine(&source);

		engine.focus();
		let started = time::Instant::now();
		engine.settle().await;
		assert!(started.elapsed() < Duration::from_millis(300));
		assert_eq!(source.calls(), [""]);
		assert_eq!(engine.results().flat_len(), 1);

		engine.set_query("ma");
		engine.set_query("");
		engine.settle().await;
		assert_eq!(source.calls(), ["", ""]);
	}

	#[tokio::test(start_paused = true)]
	async fn single_character_cancels_and_clears() {
		let source = Arc::new(PlacesSource::new());
		source.respond("ma", groups(&[("Shops", &[person(1, "Main St")])]));
		let (mut engine, _, _) = engine(&source);

		engine.set_query("ma");
		engine.settle().await;
		engine.set_query("mai");
		engine.set_query("m");
		assert!(engine.results().groups.is_empty());
		assert_eq!(engine.highlighted(), None);

		time::sleep(Duration::from_secs(1)).await;
		assert!(!engine.pump());
		assert_eq!(source.calls(), ["ma"]);
	}

	#[tokio::test(start_paused = true)]
	async fn context_change_refetches_without_debounce() {
		let source = Arc::new(PlacesSource::new());
		source.respond("ma@9", groups(&[("Customer Addresses", &[person(5, "Maple Rd")])]));
		let (mut engine, _, _) = engine(&source);

		engine.set_query("ma");
		engine.set_context(Some(9));
		engine.set_context(Some(9));
		let started = time::Instant::now();
		engine.settle().await;
		assert!(started.elapsed() < Duration::from_millis(300));
		assert_eq!(source.calls(), ["ma@9"]);
		assert_eq!(engine.results().flat_len(), 1);
	}

	#[tokio::test(start_paused = true)]
	async fn failure_clears_results() {
		let source = Arc::new(PlacesSource::new());
		source.fail(
			"ma",
			TransportError::Status {
				status: 500,
				detail: None,
			},
		);
		let (mut engine, _, _) = engine(&source);
		engine.preseed(Some(person(2, "Depot")));

		engine.set_query("ma");
		engine.settle().await;
		assert!(engine.results().groups.is_empty());
		assert_eq!(engine.selected(), Some(&person(2, "Depot")));
	}

	#[test]
	fn server_sentinel_is_not_duplicated() {
		let results = groups(&[("Other", &[sentinel()])]);
		let normalized = with_sentinel(results, || panic!("sentinel requested"));
		assert_eq!(normalized.flat_len(), 1);
	}
}
