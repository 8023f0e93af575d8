//! Adapters that put the three engines behind one interface for the event
//! loop and the renderer.

use std::cell::RefCell;
use std::rc::Rc;

use seekbox_catalog::{Customer, CustomerDirectory, GlobalIndex, Location, LocationDirectory};
use seekbox_engine::{
	AutocompleteEngine, GroupedAutocompleteEngine, NavKey, OmniboxEntry, OmniboxSearchEngine,
};
use seekbox_source_api::{AnnotationKind, Record};

use super::Selection;

/// Written by engine callbacks, read by the event loop after each key.
pub(crate) type SelectionSlot = Rc<RefCell<Option<Selection>>>;

/// One line of the result panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Row {
	Header(String),
	Item {
		label: String,
		detail: Option<String>,
		highlighted: bool,
		create: bool,
	},
	Hint(String),
}

impl Row {
	fn item(record: &impl Record, label: String, highlighted: bool) -> Self {
		let detail = record
			.annotations()
			.into_iter()
			.map(|annotation| match annotation.kind {
				AnnotationKind::Shop => format!("shop: {}", annotation.text),
				AnnotationKind::Customer => format!("customer: {}", annotation.text),
				AnnotationKind::Address | AnnotationKind::Detail => annotation.text,
			})
			.reduce(|joined, next| format!("{joined} · {next}"));
		Row::Item {
			label,
			detail,
			highlighted,
			create: record.is_create_new(),
		}
	}
}

pub(crate) trait SearchField {
	fn query(&self) -> &str;
	fn set_query(&mut self, text: String);
	fn focus(&mut self);
	/// Returns `true` when the engine consumed the key.
	fn handle_key(&mut self, key: NavKey) -> bool;
	/// Enter that no row claimed.
	fn fallback_enter(&mut self) -> bool {
		false
	}
	/// Apply settled collaborator calls. Returns `true` when state changed.
	fn pump(&mut self) -> bool;
	fn is_open(&self) -> bool;
	fn is_loading(&self) -> bool;
	fn rows(&self) -> Vec<Row>;
	fn banner(&self) -> Option<&str> {
		None
	}
	fn dismiss_banner(&mut self) {}
	fn clear_history(&mut self) {}
}

pub(crate) struct CustomerField {
	engine: AutocompleteEngine<CustomerDirectory>,
}

impl CustomerField {
	pub(crate) fn new(engine: AutocompleteEngine<CustomerDirectory>) -> Self {
		Self { engine }
	}

	pub(crate) fn on_select(slot: &SelectionSlot) -> impl FnMut(&Customer) + 'static {
		let slot = Rc::clone(slot);
		move |customer: &Customer| {
			*slot.borrow_mut() = Some(Selection::Record {
				field: "customer",
				id: customer.id(),
				label: customer.full_name(),
			});
		}
	}
}

impl SearchField for CustomerField {
	fn query(&self) -> &str {
		self.engine.query()
	}

	fn set_query(&mut self, text: String) {
		self.engine.set_query(text);
	}

	fn focus(&mut self) {
		self.engine.focus();
	}

	fn handle_key(&mut self, key: NavKey) -> bool {
		self.engine.handle_key(key)
	}

	fn fallback_enter(&mut self) -> bool {
		self.engine.create_from_query() || self.engine.create_new()
	}

	fn pump(&mut self) -> bool {
		self.engine.pump()
	}

	fn is_open(&self) -> bool {
		self.engine.is_open()
	}

	fn is_loading(&self) -> bool {
		self.engine.is_loading()
	}

	fn rows(&self) -> Vec<Row> {
		if !self.engine.is_open() {
			return Vec::new();
		}
		let highlighted = self.engine.highlighted();
		let mut rows: Vec<_> = self
			.engine
			.results()
			.iter()
			.enumerate()
			.map(|(index, customer)| {
				Row::item(customer, self.engine.display(customer), highlighted == Some(index))
			})
			.collect();
		if self.engine.offers_custom_create() {
			rows.push(Row::Hint(format!(
				"Enter: create \"{}\"",
				self.engine.query().trim()
			)));
		} else if self.engine.offers_create_new() {
			rows.push(Row::Hint("Enter: create new customer".to_string()));
		}
		rows
	}
}

pub(crate) struct LocationField {
	engine: GroupedAutocompleteEngine<LocationDirectory>,
}

impl LocationField {
	pub(crate) fn new(engine: GroupedAutocompleteEngine<LocationDirectory>) -> Self {
		Self { engine }
	}

	pub(crate) fn on_select(slot: &SelectionSlot) -> impl FnMut(&Location) + 'static {
		let slot = Rc::clone(slot);
		move |location: &Location| {
			*slot.borrow_mut() = Some(Selection::Record {
				field: "location",
				id: location.id(),
				label: location.label(),
			});
		}
	}
}

impl SearchField for LocationField {
	fn query(&self) -> &str {
		self.engine.query()
	}

	fn set_query(&mut self, text: String) {
		self.engine.set_query(text);
	}

	fn focus(&mut self) {
		self.engine.focus();
	}

	fn handle_key(&mut self, key: NavKey) -> bool {
		self.engine.handle_key(key)
	}

	fn pump(&mut self) -> bool {
		self.engine.pump()
	}

	fn is_open(&self) -> bool {
		self.engine.is_open()
	}

	fn is_loading(&self) -> bool {
		self.engine.is_loading()
	}

	fn rows(&self) -> Vec<Row> {
		if !self.engine.is_open() {
			return Vec::new();
		}
		let highlighted = self.engine.highlighted();
		let mut rows = Vec::new();
		let mut index = 0;
		for group in &self.engine.results().groups {
			rows.push(Row::Header(group.label.clone()));
			for location in &group.items {
				rows.push(Row::item(
					location,
					self.engine.display(location),
					highlighted == Some(index),
				));
				index += 1;
			}
		}
		rows
	}
}

pub(crate) struct OmniboxField {
	engine: OmniboxSearchEngine<GlobalIndex>,
}

impl OmniboxField {
	pub(crate) fn new(engine: OmniboxSearchEngine<GlobalIndex>) -> Self {
		Self { engine }
	}

	pub(crate) fn on_navigate(
		slot: &SelectionSlot,
	) -> impl FnMut(seekbox_engine::OmniboxTarget) + 'static {
		let slot = Rc::clone(slot);
		move |target| {
			*slot.borrow_mut() = Some(Selection::Navigate(target));
		}
	}
}

impl SearchField for OmniboxField {
	fn query(&self) -> &str {
		self.engine.query()
	}

	fn set_query(&mut self, text: String) {
		self.engine.set_query(text);
	}

	fn focus(&mut self) {
		self.engine.focus();
	}

	fn handle_key(&mut self, key: NavKey) -> bool {
		self.engine.handle_key(key)
	}

	fn pump(&mut self) -> bool {
		self.engine.pump()
	}

	fn is_open(&self) -> bool {
		self.engine.is_open()
	}

	fn is_loading(&self) -> bool {
		self.engine.is_loading()
	}

	fn rows(&self) -> Vec<Row> {
		if !self.engine.is_open() {
			return Vec::new();
		}
		let highlighted = self.engine.highlighted();
		if self.engine.showing_recent() {
			let mut rows = vec![Row::Header("Recent searches".to_string())];
			rows.extend(self.engine.recent().entries().iter().enumerate().map(
				|(index, query)| Row::Item {
					label: query.clone(),
					detail: None,
					highlighted: highlighted == Some(index),
					create: false,
				},
			));
			rows.push(Row::Hint("Ctrl-R: clear recent searches".to_string()));
			return rows;
		}

		let mut rows = Vec::new();
		let mut current = None;
		for (index, entry) in self.engine.entries().enumerate() {
			let heading = match entry {
				OmniboxEntry::Customer(_) => "Customers",
				OmniboxEntry::WorkItem(_) => "Work items",
			};
			if current != Some(heading) {
				rows.push(Row::Header(heading.to_string()));
				current = Some(heading);
			}
			let label = entry.label();
			let is_highlighted = highlighted == Some(index);
			rows.push(match entry {
				OmniboxEntry::Customer(customer) => Row::item(customer, label, is_highlighted),
				OmniboxEntry::WorkItem(item) => Row::item(item, label, is_highlighted),
			});
		}
		if self.engine.results().total_count == 0
			&& !self.engine.is_loading()
			&& self.engine.query().trim().chars().count() >= seekbox_engine::MIN_QUERY_LEN
			&& self.engine.error().is_none()
		{
			rows.push(Row::Hint("No matches".to_string()));
		} else if !rows.is_empty() && highlighted.is_none() {
			rows.push(Row::Hint("Enter with no row selected: see all results".to_string()));
		}
		rows
	}

	fn banner(&self) -> Option<&str> {
		self.engine.error()
	}

	fn dismiss_banner(&mut self) {
		self.engine.dismiss_error();
	}

	fn clear_history(&mut self) {
		self.engine.clear_recent();
	}
}
