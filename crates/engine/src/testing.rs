//! Scripted collaborators for engine unit tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use seekbox_source_api::{
	CorpusSource, EntityKind, Group, GroupedResults, GroupedSource, ItemId, OmniboxBundle,
	OmniboxSource, Record, SearchSource, TransportError,
};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Person {
	pub id: ItemId,
	pub name: String,
}

impl Record for Person {
	fn id(&self) -> ItemId {
		self.id.clone()
	}

	fn label(&self) -> String {
		self.name.clone()
	}
}

pub(crate) fn person(id: u64, name: &str) -> Person {
	Person {
		id: ItemId::Number(id),
		name: name.to_string(),
	}
}

pub(crate) fn sentinel() -> Person {
	Person {
		id: ItemId::create_new(),
		name: "Other address...".to_string(),
	}
}

#[derive(Default)]
struct Script<R> {
	responses: HashMap<String, R>,
	latency: HashMap<String, Duration>,
	failures: HashMap<String, TransportError>,
	calls: Vec<String>,
}

/// Answers queries from a script and logs every call it receives.
pub(crate) struct Scripted<R> {
	script: Arc<Mutex<Script<R>>>,
	corpus: Vec<Person>,
}

impl<R> Clone for Scripted<R> {
	fn clone(&self) -> Self {
		Self {
			script: Arc::clone(&self.script),
			corpus: self.corpus.clone(),
		}
	}
}

impl<R: Clone + Default + Send + 'static> Scripted<R> {
	pub(crate) fn new() -> Self {
		Self {
			script: Arc::new(Mutex::new(Script {
				responses: HashMap::new(),
				latency: HashMap::new(),
				failures: HashMap::new(),
				calls: Vec::new(),
			})),
			corpus: Vec::new(),
		}
	}

	pub(crate) fn with_corpus(mut self, corpus: Vec<Person>) -> Self {
		self.corpus = corpus;
		self
	}

	pub(crate) fn respond(&self, query: &str, response: R) -> &Self {
		self.script.lock().responses.insert(query.to_string(), response);
		self
	}

	pub(crate) fn delay(&self, query: &str, latency: Duration) -> &Self {
		self.script.lock().latency.insert(query.to_string(), latency);
		self
	}

	pub(crate) fn fail(&self, query: &str, err: TransportError) -> &Self {
		self.script.lock().failures.insert(query.to_string(), err);
		self
	}

	pub(crate) fn calls(&self) -> Vec<String> {
		self.script.lock().calls.clone()
	}

	fn answer(&self, key: String) -> impl Future<Output = Result<R, TransportError>> + Send + use<R> {
		let script = Arc::clone(&self.script);
		async move {
			let (latency, failure, response) = {
				let mut script = script.lock();
				script.calls.push(key.clone());
				(
					script.latency.get(&key).copied().unwrap_or_default(),
					script.failures.get(&key).cloned(),
					script.responses.get(&key).cloned().unwrap_or_default(),
				)
			};
			if !latency.is_zero() {
				tokio::time::sleep(latency).await;
			}
			match failure {
				Some(err) => Err(err),
				None => Ok(response),
			}
		}
	}
}

pub(crate) type PeopleSource = Scripted<Vec<Person>>;

impl SearchSource for PeopleSource {
	type Item = Person;

	fn search(
		&self,
		query: &str,
	) -> impl Future<Output = Result<Vec<Person>, TransportError>> + Send {
		self.answer(query.to_string())
	}

	fn get_detail(&self, id: &ItemId) -> impl Future<Output = Result<Person, TransportError>> + Send {
		let found = self.corpus.iter().find(|person| &person.id == id).cloned();
		let id = id.clone();
		let lookup = self.answer(format!("detail:{id}"));
		async move {
			lookup.await?;
			found.ok_or(TransportError::Status {
				status: 404,
				detail: Some(format!("no record {id}")),
			})
		}
	}
}

impl CorpusSource for PeopleSource {
	fn fetch_all(&self) -> impl Future<Output = Result<Vec<Person>, TransportError>> + Send {
		let corpus = self.corpus.clone();
		let lookup = self.answer("fetch_all".to_string());
		async move {
			lookup.await?;
			Ok(corpus)
		}
	}
}

pub(crate) type PlacesSource = Scripted<GroupedResults<Person>>;

impl GroupedSource for PlacesSource {
	type Item = Person;
	type Context = Option<u64>;

	fn grouped_search(
		&self,
		query: &str,
		context: &Option<u64>,
	) -> impl Future<Output = Result<GroupedResults<Person>, TransportError>> + Send {
		let key = match context {
			Some(customer) => format!("{query}@{customer}"),
			None => query.to_string(),
		};
		self.answer(key)
	}

	fn sentinel(&self) -> Person {
		sentinel()
	}
}

pub(crate) fn groups(groups: &[(&str, &[Person])]) -> GroupedResults<Person> {
	GroupedResults::new(
		groups
			.iter()
			.map(|(label, items)| Group::new(*label, items.to_vec()))
			.collect(),
	)
}

pub(crate) type Bundle = OmniboxBundle<Person, Person>;

pub(crate) type DirectorySource = Scripted<Bundle>;

impl OmniboxSource for DirectorySource {
	type Customer = Person;
	type WorkItem = Person;

	fn omnibox_search(
		&self,
		query: &str,
		kinds: &[EntityKind],
	) -> impl Future<Output = Result<Bundle, TransportError>> + Send {
		let key = if kinds.is_empty() {
			query.to_string()
		} else {
			let names: Vec<_> = kinds.iter().map(|kind| kind.as_str()).collect();
			format!("{query}[{}]", names.join(","))
		};
		self.answer(key)
	}
}

pub(crate) fn bundle(customers: &[Person], work_items: &[Person]) -> Bundle {
	OmniboxBundle {
		customers: customers.to_vec(),
		work_items: work_items.to_vec(),
		total_count: customers.len() + work_items.len(),
	}
}

/// Collects everything a callback receives.
pub(crate) struct Recorder<T>(Rc<RefCell<Vec<T>>>);

impl<T> Clone for Recorder<T> {
	fn clone(&self) -> Self {
		Self(Rc::clone(&self.0))
	}
}

impl<T: Clone + 'static> Recorder<T> {
	pub(crate) fn new() -> Self {
		Self(Rc::new(RefCell::new(Vec::new())))
	}

	pub(crate) fn sink(&self) -> impl FnMut(T) + 'static {
		let seen = Rc::clone(&self.0);
		move |value| seen.borrow_mut().push(value)
	}

	pub(crate) fn ref_sink(&self) -> impl FnMut(&T) + 'static {
		let seen = Rc::clone(&self.0);
		move |value: &T| seen.borrow_mut().push(value.clone())
	}

	pub(crate) fn seen(&self) -> Vec<T> {
		self.0.borrow().clone()
	}
}
