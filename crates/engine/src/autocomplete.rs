//! Type-ahead selector for a single foreign-entity field.

use std::sync::Arc;

use log::{debug, warn};
use seekbox_source_api::{CorpusSource, ItemId, SearchSource};

use crate::callbacks::{CreateFn, CreateRequest, DisplayFn, SelectFn, label_display};
use crate::config::SearchTuning;
use crate::highlight::Highlight;
use crate::keys::NavKey;
use crate::query::{contains_ignore_case, meets_threshold, normalize};
use crate::session::{SearchSession, Settlement};

/// Initial value of the field.
#[derive(Debug, Clone)]
pub enum Preseed<T> {
	/// A fully loaded record.
	Record(T),
	/// An identifier resolved through `get_detail`.
	Id(ItemId),
	/// Draft name of a record that is being created; only fills the text.
	Draft(String),
}

enum Strategy<T> {
	Server,
	Corpus { cache: Option<Vec<T>> },
}

pub struct AutocompleteEngine<S: SearchSource> {
	source: Arc<S>,
	strategy: Strategy<S::Item>,
	tuning: SearchTuning,
	display: DisplayFn<S::Item>,
	on_select: SelectFn<S::Item>,
	on_create_new: Option<CreateFn>,
	allow_custom_create: bool,

	query: String,
	results: Vec<S::Item>,
	highlight: Highlight,
	open: bool,
	searching: bool,
	selected: Option<S::Item>,

	search: SearchSession<Vec<S::Item>>,
	corpus: SearchSession<Vec<S::Item>>,
	detail: SearchSession<S::Item>,
}

impl<S: SearchSource> AutocompleteEngine<S> {
	/// Engine that sends every qualifying query to `source.search`.
	pub fn server(source: Arc<S>, on_select: impl FnMut(&S::Item) + 'static) -> Self {
		Self::build(source, Strategy::Server, on_select)
	}

	fn build(
		source: Arc<S>,
		strategy: Strategy<S::Item>,
		on_select: impl FnMut(&S::Item) + 'static,
	) -> Self {
		let tuning = SearchTuning::default();
		Self {
			source,
			strategy,
			tuning,
			display: label_display(),
			on_select: Box::new(on_select),
			on_create_new: None,
			allow_custom_create: false,
			query: String::new(),
			results: Vec::new(),
			highlight: Highlight::default(),
			open: false,
			searching: false,
			selected: None,
			search: SearchSession::new(tuning.debounce()),
			corpus: SearchSession::new(tuning.debounce()),
			detail: SearchSession::new(tuning.debounce()),
		}
	}

	#[must_use]
	pub fn with_tuning(mut self, tuning: SearchTuning) -> Self {
		self.tuning = tuning;
		self.search = SearchSession::new(tuning.debounce());
		self
	}

	/// Replace the text projection used for the input and corpus filtering.
	#[must_use]
	pub fn with_display(
		mut self,
		display: impl Fn(&S::Item) -> String + Send + Sync + 'static,
	) -> Self {
		self.display = Arc::new(display);
		self
	}

	#[must_use]
	pub fn on_create_new(mut self, on_create_new: impl FnMut(CreateRequest) + 'static) -> Self {
		self.on_create_new = Some(Box::new(on_create_new));
		self
	}

	#[must_use]
	pub fn allow_custom_create(mut self, allow: bool) -> Self {
		self.allow_custom_create = allow;
		self
	}

	pub fn preseed(&mut self, value: Preseed<S::Item>) {
		match value {
			Preseed::Record(item) => {
				self.detail.cancel();
				self.query = (self.display)(&item);
				self.selected = Some(item);
			}
			Preseed::Id(id) => {
				let source = Arc::clone(&self.source);
				self.detail
					.submit_now(move || async move { source.get_detail(&id).await });
			}
			Preseed::Draft(name) => {
				self.detail.cancel();
				self.query = name;
				self.selected = None;
			}
		}
	}

	/// Apply a keystroke's worth of text change.
	///
	/// User input supersedes an unresolved preseeded id.
	pub fn set_query(&mut self, text: impl Into<String>) {
		self.detail.cancel();
		self.query = text.into();
		self.open = true;
		self.refresh();
	}

	/// Focus the input; with a loaded corpus this opens the full list.
	pub fn focus(&mut self) {
		let all = match &self.strategy {
			Strategy::Corpus { cache: Some(cache) } => Some(cache.clone()),
			_ => None,
		};
		if let Some(all) = all {
			self.open = true;
			if self.query.is_empty() {
				self.replace_results(all);
			}
		}
	}

	pub fn blur(&mut self) {
		self.open = false;
	}

	/// Returns `true` when the key was consumed.
	pub fn handle_key(&mut self, key: NavKey) -> bool {
		let count = self.results.len();
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
		self.highlight.set(index, self.results.len());
	}

	/// Commit the row at `index`. Returns `false` when there is no such row.
	pub fn select_at(&mut self, index: usize) -> bool {
		let Some(item) = self.results.get(index).cloned() else {
			return false;
		};
		self.search.cancel();
		self.detail.cancel();
		self.searching = false;
		self.query = (self.display)(&item);
		(self.on_select)(&item);
		self.selected = Some(item);
		self.open = false;
		true
	}

	/// Whether the host should offer a blank "create new" row.
	#[must_use]
	pub fn offers_create_new(&self) -> bool {
		self.on_create_new.is_some() && self.results.is_empty() && !self.is_loading()
	}

	/// Whether the host should offer "create <query>".
	#[must_use]
	pub fn offers_custom_create(&self) -> bool {
		self.offers_create_new() && self.allow_custom_create && !normalize(&self.query).is_empty()
	}

	pub fn create_new(&mut self) -> bool {
		if !self.offers_create_new() {
			return false;
		}
		self.fire_create(CreateRequest::Blank)
	}

	pub fn create_from_query(&mut self) -> bool {
		if !self.offers_custom_create() {
			return false;
		}
		let name = normalize(&self.query).to_string();
		self.fire_create(CreateRequest::FromQuery(name))
	}

	fn fire_create(&mut self, request: CreateRequest) -> bool {
		let Some(on_create_new) = self.on_create_new.as_mut() else {
			return false;
		};
		on_create_new(request);
		self.open = false;
		true
	}

	/// Apply every settlement already delivered. Returns `true` if anything
	/// changed.
	pub fn pump(&mut self) -> bool {
		let mut changed = false;
		while let Some(settlement) = self.corpus.try_next() {
			self.apply_corpus(settlement);
			changed = true;
		}
		while let Some(settlement) = self.detail.try_next() {
			self.apply_detail(settlement);
			changed = true;
		}
		while let Some(settlement) = self.search.try_next() {
			self.apply_search(settlement);
			changed = true;
		}
		changed
	}

	/// Drive outstanding work until nothing is pending.
	pub async fn settle(&mut self) {
		loop {
			tokio::select! {
				Some(settlement) = self.corpus.next(), if self.corpus.is_pending() => {
					self.apply_corpus(settlement);
				}
				Some(settlement) = self.detail.next(), if self.detail.is_pending() => {
					self.apply_detail(settlement);
				}
				Some(settlement) = self.search.next(), if self.search.is_pending() => {
					self.apply_search(settlement);
				}
				else => break,
			}
		}
	}

	#[must_use]
	pub fn query(&self) -> &str {
		&self.query
	}

	#[must_use]
	pub fn results(&self) -> &[S::Item] {
		&self.results
	}

	#[must_use]
	pub fn highlighted(&self) -> Option<usize> {
		self.highlight.index()
	}

	#[must_use]
	pub fn is_open(&self) -> bool {
		self.open
	}

	/// A search is in flight or the corpus is still loading.
	#[must_use]
	pub fn is_loading(&self) -> bool {
		self.searching || self.corpus.is_pending()
	}

	#[must_use]
	pub fn selected(&self) -> Option<&S::Item> {
		self.selected.as_ref()
	}

	#[must_use]
	pub fn display(&self, item: &S::Item) -> String {
		(self.display)(item)
	}

	/// Whether queries are being filtered against a loaded corpus.
	#[must_use]
	pub fn has_corpus(&self) -> bool {
		matches!(self.strategy, Strategy::Corpus { cache: Some(_) })
	}

	fn refresh(&mut self) {
		let filtered = match &self.strategy {
			Strategy::Corpus { cache: Some(cache) } => Some(self.filter_corpus(cache)),
			_ => None,
		};
		if let Some(filtered) = filtered {
			self.search.cancel();
			self.searching = false;
			self.replace_results(filtered);
			return;
		}

		if !meets_threshold(&self.query, self.tuning.min_query_len) {
			self.search.cancel();
			self.searching = false;
			self.results.clear();
			self.highlight.clear();
			return;
		}

		let query = normalize(&self.query).to_string();
		let source = Arc::clone(&self.source);
		self.search
			.submit(move || async move { source.search(&query).await });
	}

	fn filter_corpus(&self, cache: &[S::Item]) -> Vec<S::Item> {
		if !meets_threshold(&self.query, self.tuning.min_query_len) {
			return cache.to_vec();
		}
		let needle = normalize(&self.query);
		cache
			.iter()
			.filter(|item| contains_ignore_case(&(self.display)(item), needle))
			.cloned()
			.collect()
	}

	fn replace_results(&mut self, results: Vec<S::Item>) {
		self.results = results;
		self.highlight.reset_to_first(self.results.len());
	}

	fn apply_search(&mut self, settlement: Settlement<Vec<S::Item>>) {
		match settlement {
			Settlement::Started => self.searching = true,
			Settlement::Resolved(items) => {
				self.searching = false;
				self.replace_results(items);
			}
			Settlement::Failed(err) => {
				self.searching = false;
				warn!("search for {:?} failed: {err}", normalize(&self.query));
				self.results.clear();
				self.highlight.clear();
			}
		}
	}

	fn apply_corpus(&mut self, settlement: Settlement<Vec<S::Item>>) {
		match settlement {
			Settlement::Started => {}
			Settlement::Resolved(items) => {
				debug!("corpus loaded with {} records", items.len());
				if let Strategy::Corpus { cache } = &mut self.strategy {
					*cache = Some(items);
				}
				self.refresh();
			}
			Settlement::Failed(err) => {
				warn!("failed to load corpus, staying on server search: {err}");
			}
		}
	}

	fn apply_detail(&mut self, settlement: Settlement<S::Item>) {
		match settlement {
			Settlement::Started => {}
			Settlement::Resolved(item) => {
				self.query = (self.display)(&item);
				self.selected = Some(item);
			}
			Settlement::Failed(err) => warn!("failed to resolve preseeded record: {err}"),
		}
	}
}

impl<S: CorpusSource> AutocompleteEngine<S> {
	/// Engine that loads the whole corpus once and filters it locally.
	///
	/// Until the corpus arrives, queries fall back to `source.search`.
	pub fn with_corpus(source: Arc<S>, on_select: impl FnMut(&S::Item) + 'static) -> Self {
		let mut engine = Self::build(source, Strategy::Corpus { cache: None }, on_select);
		let source = Arc::clone(&engine.source);
		engine
			.corpus
			.submit_now(move || async move { source.fetch_all().await });
		engine
	}
}

#[cfg(test)]
mod tests {
	use std::time::Duration;

	use seekbox_source_api::TransportError;
	use tokio::time;

	use super::*;
	use crate::testing::{PeopleSource, Person, Recorder, person};

	fn people() -> Vec<Person> {
		vec![
			person(1, "Smith"),
			person(2, "Smithers"),
			person(3, "Jones"),
		]
	}

	#[tokio::test(start_paused = true)]
	async fn server_query_selects_with_keyboard() {
		let source = Arc::new(PeopleSource::new());
		source.respond("sm", vec![person(1, "Smith")]);
		let picked = Recorder::new();
		let mut engine = AutocompleteEngine::server(Arc::clone(&source), picked.ref_sink());

		engine.set_query("sm");
		assert!(source.calls().is_empty());
		time::sleep(Duration::from_millis(299)).await;
		assert!(source.calls().is_empty());

		engine.settle().await;
		assert_eq!(source.calls(), ["sm"]);
		assert_eq!(engine.results(), [person(1, "Smith")]);
		assert_eq!(engine.highlighted(), Some(0));

		assert!(engine.handle_key(NavKey::Down));
		assert_eq!(engine.highlighted(), Some(0));
		assert!(engine.handle_key(NavKey::Enter));
		assert_eq!(picked.seen(), [person(1, "Smith")]);
		assert_eq!(engine.query(), "Smith");
		assert!(!engine.is_open());
		assert_eq!(engine.selected(), Some(&person(1, "Smith")));
	}

	#[tokio::test(start_paused = true)]
	async fn short_query_cancels_and_clears() {
		let source = Arc::new(PeopleSource::new());
		source.respond("sm", vec![person(1, "Smith")]);
		let mut engine = AutocompleteEngine::server(Arc::clone(&source), |_| {});

		engine.set_query("sm");
		engine.settle().await;
		assert_eq!(engine.results().len(), 1);

		engine.set_query("smi");
		engine.set_query(" s ");
		assert!(engine.results().is_empty());
		assert_eq!(engine.highlighted(), None);

		time::sleep(Duration::from_secs(1)).await;
		assert!(!engine.pump());
		assert_eq!(source.calls(), ["sm"]);
	}

	#[tokio::test(start_paused = true)]
	async fn slow_response_for_an_older_query_is_dropped() {
		let source = Arc::new(PeopleSource::new());
		source
			.respond("ab", vec![person(1, "Abbot")])
			.delay("ab", Duration::from_secs(2))
			.respond("abc", vec![person(2, "Abcde")]);
		let mut engine = AutocompleteEngine::server(Arc::clone(&source), |_| {});

		engine.set_query("ab");
		time::sleep(Duration::from_millis(400)).await;
		engine.pump();
		assert!(engine.is_loading());

		engine.set_query("abc");
		engine.settle().await;
		assert_eq!(engine.results(), [person(2, "Abcde")]);

		time::sleep(Duration::from_secs(5)).await;
		engine.pump();
		assert_eq!(engine.results(), [person(2, "Abcde")]);
		assert!(!engine.is_loading());
	}

	#[tokio::test(start_paused = true)]
	async fn failure_empties_results_but_keeps_the_selection() {
		let source = Arc::new(PeopleSource::new());
		source.fail("zz", TransportError::Network("offline".into()));
		let mut engine = AutocompleteEngine::server(Arc::clone(&source), |_| {});
		engine.preseed(Preseed::Record(person(7, "Kept")));

		engine.set_query("zz");
		engine.settle().await;
		assert!(engine.results().is_empty());
		assert!(!engine.is_loading());
		assert_eq!(engine.selected(), Some(&person(7, "Kept")));
	}

	#[tokio::test(start_paused = true)]
	async fn corpus_filters_locally() {
		let source = Arc::new(PeopleSource::new().with_corpus(people()));
		let mut engine = AutocompleteEngine::with_corpus(Arc::clone(&source), |_| {});
		assert!(engine.is_loading());
		engine.settle().await;
		assert!(engine.has_corpus());

		engine.focus();
		assert!(engine.is_open());
		assert_eq!(engine.results().len(), 3);

		engine.set_query("SMITH");
		assert_eq!(engine.results(), [person(1, "Smith"), person(2, "Smithers")]);
		engine.set_query("j");
		assert_eq!(engine.results().len(), 3);

		time::sleep(Duration::from_secs(1)).await;
		assert_eq!(source.calls(), ["fetch_all"]);
	}

	#[tokio::test(start_paused = true)]
	async fn corpus_falls_back_to_server_until_loaded() {
		let source = Arc::new(PeopleSource::new().with_corpus(people()));
		source
			.delay("fetch_all", Duration::from_secs(5))
			.respond("jo", vec![person(3, "Jones")]);
		let mut engine = AutocompleteEngine::with_corpus(Arc::clone(&source), |_| {});

		engine.set_query("jo");
		time::sleep(Duration::from_millis(500)).await;
		engine.pump();
		assert_eq!(engine.results(), [person(3, "Jones")]);
		assert!(!engine.has_corpus());

		engine.settle().await;
		assert!(engine.has_corpus());
		assert_eq!(engine.results(), [person(3, "Jones")]);
		assert_eq!(source.calls(), ["fetch_all", "jo"]);
	}

	#[tokio::test(start_paused = true)]
	async fn preseeded_id_resolves_without_selecting() {
		let source = Arc::new(PeopleSource::new().with_corpus(people()));
		let picked = Recorder::new();
		let mut engine = AutocompleteEngine::server(Arc::clone(&source), picked.ref_sink());

		engine.preseed(Preseed::Id(ItemId::Number(3)));
		engine.settle().await;
		assert_eq!(engine.query(), "Jones");
		assert_eq!(engine.selected(), Some(&person(3, "Jones")));
		assert!(picked.seen().is_empty());
		assert!(!engine.is_open());
	}

	#[tokio::test(start_paused = true)]
	async fn late_preseed_detail_never_overrides_the_user() {
		let source = Arc::new(PeopleSource::new().with_corpus(people()));
		source
			.delay("detail:3", Duration::from_secs(2))
			.respond("sm", vec![person(1, "Smith")]);
		let picked = Recorder::new();
		let mut engine = AutocompleteEngine::server(Arc::clone(&source), picked.ref_sink());

		engine.preseed(Preseed::Id(ItemId::Number(3)));
		engine.set_query("sm");
		time::sleep(Duration::from_millis(400)).await;
		engine.pump();
		assert!(engine.handle_key(NavKey::Enter));
		engine.settle().await;

		time::sleep(Duration::from_secs(5)).await;
		assert!(!engine.pump());
		assert_eq!(engine.query(), "Smith");
		assert_eq!(engine.selected(), Some(&person(1, "Smith")));
		assert_eq!(picked.seen(), [person(1, "Smith")]);
	}

	#[tokio::test(start_paused = true)]
	async fn draft_preseed_fills_text_and_clears_selection() {
		let source = Arc::new(PeopleSource::new().with_corpus(people()));
		source.delay("detail:3", Duration::from_secs(1));
		let mut engine = AutocompleteEngine::server(Arc::clone(&source), |_| {});

		engine.preseed(Preseed::Record(person(7, "Kept")));
		engine.preseed(Preseed::Id(ItemId::Number(3)));
		engine.preseed(Preseed::Draft("Acme Ltd".into()));
		engine.settle().await;
		time::sleep(Duration::from_secs(2)).await;
		engine.pump();

		assert_eq!(engine.query(), "Acme Ltd");
		assert!(engine.selected().is_none());
		assert!(!engine.is_open());
		assert!(engine.results().is_empty());
	}

	#[tokio::test(start_paused = true)]
	async fn closed_panel_reopens_on_arrow_down() {
		let source = Arc::new(PeopleSource::new());
		source.respond("jo", people());
		let mut engine = AutocompleteEngine::server(Arc::clone(&source), |_| {})
			.with_display(|person: &Person| person.name.to_uppercase());

		engine.set_query("jo");
		engine.settle().await;
		engine.handle_key(NavKey::Down);
		assert!(engine.handle_key(NavKey::Escape));
		assert!(!engine.is_open());
		assert!(engine.selected().is_none());

		assert!(engine.handle_key(NavKey::Down));
		assert!(engine.is_open());
		assert_eq!(engine.highlighted(), Some(0));

		engine.hover(2);
		engine.handle_key(NavKey::Enter);
		assert_eq!(engine.query(), "JONES");
	}

	#[tokio::test(start_paused = true)]
	async fn empty_results_offer_creation() {
		let source = Arc::new(PeopleSource::new());
		let created = Recorder::new();
		let mut engine = AutocompleteEngine::server(Arc::clone(&source), |_| {})
			.on_create_new(created.sink())
			.allow_custom_create(true)
			.with_tuning(SearchTuning {
				debounce_ms: 50,
				..SearchTuning::default()
			});

		engine.set_query("Acme Ltd ");
		engine.settle().await;
		assert_eq!(source.calls(), ["Acme Ltd"]);
		assert!(engine.offers_custom_create());
		assert!(engine.create_from_query());
		assert!(engine.create_new());
		assert_eq!(
			created.seen(),
			[
				CreateRequest::FromQuery("Acme Ltd".into()),
				CreateRequest::Blank
			]
		);
	}
}
