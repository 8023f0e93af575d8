//! Terminal front end that mounts one search field.
//!
//! The engines run their collaborator calls on a tokio runtime owned by
//! [`run`]; the event loop applies their results by pumping each frame.

mod event_loop;
mod fields;
mod input;
mod render;

use std::rc::Rc;
use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;
use seekbox_catalog::{Catalog, CustomerDirectory, GlobalIndex, LocationDirectory};
use seekbox_engine::{
	AutocompleteEngine, CreateRequest, GroupedAutocompleteEngine, JsonFileBackend, NavKey,
	OmniboxSearchEngine, OmniboxTarget, RecentSearchStore,
};
use seekbox_source_api::ItemId;
use throbber_widgets_tui::ThrobberState;

use crate::settings::{Mode, ResolvedConfig};

use fields::{CustomerField, LocationField, OmniboxField, SearchField, SelectionSlot};
use input::KeyAction;

/// What the user committed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Selection {
	Record {
		field: &'static str,
		id: ItemId,
		label: String,
	},
	Create {
		field: &'static str,
		request: CreateRequest,
	},
	Navigate(OmniboxTarget),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchOutcome {
	pub(crate) accepted: bool,
	pub(crate) query: String,
	pub(crate) selection: Option<Selection>,
}

/// Mount the configured field and drive it until the user commits or quits.
pub(crate) fn run(settings: &ResolvedConfig) -> Result<SearchOutcome> {
	let catalog = Arc::new(load_catalog(settings)?);
	let runtime = tokio::runtime::Builder::new_multi_thread()
		.worker_threads(2)
		.thread_name("seekbox-search")
		.enable_time()
		.build()
		.context("failed to start the search runtime")?;
	let _guard = runtime.enter();

	let slot = SelectionSlot::default();
	let field = build_field(settings, catalog, &slot);
	let mut app = App::new(field, settings.title.clone(), slot);
	app.seed(&settings.initial_query);
	app.run()
}

fn load_catalog(settings: &ResolvedConfig) -> Result<Catalog> {
	match &settings.catalog.path {
		Some(path) => Catalog::load(path)
			.with_context(|| format!("failed to load catalog {}", path.display())),
		None => Catalog::demo().context("built-in catalog is invalid"),
	}
}

fn on_create(slot: &SelectionSlot, field: &'static str) -> impl FnMut(CreateRequest) + 'static {
	let slot = Rc::clone(slot);
	move |request| {
		*slot.borrow_mut() = Some(Selection::Create { field, request });
	}
}

fn build_field(
	settings: &ResolvedConfig,
	catalog: Arc<Catalog>,
	slot: &SelectionSlot,
) -> Box<dyn SearchField> {
	let faults = settings.catalog.faults();
	info!("mounting the {} field", settings.mode.as_str());

	match settings.mode {
		Mode::Customer => {
			let directory = Arc::new(CustomerDirectory::new(catalog).with_faults(faults));
			let on_select = CustomerField::on_select(slot);
			let engine = if settings.cached {
				AutocompleteEngine::with_corpus(directory, on_select)
			} else {
				AutocompleteEngine::server(directory, on_select)
			};
			let engine = engine
				.with_tuning(settings.tuning)
				.on_create_new(on_create(slot, "customer"))
				.allow_custom_create(true);
			Box::new(CustomerField::new(engine))
		}
		Mode::Location => {
			let directory = Arc::new(LocationDirectory::new(catalog).with_faults(faults));
			let engine = GroupedAutocompleteEngine::new(
				directory,
				settings.customer,
				LocationField::on_select(slot),
			)
			.with_tuning(settings.tuning)
			.on_create_new(on_create(slot, "location"));
			Box::new(LocationField::new(engine))
		}
		Mode::Omnibox => {
			let index = Arc::new(GlobalIndex::new(catalog).with_faults(faults));
			let recent = match &settings.history_dir {
				Some(dir) => RecentSearchStore::load(JsonFileBackend::new(dir)),
				None => RecentSearchStore::ephemeral(),
			};
			let engine = OmniboxSearchEngine::new(index, recent, OmniboxField::on_navigate(slot))
				.with_tuning(settings.tuning)
				.with_kinds(settings.kinds.clone());
			Box::new(OmniboxField::new(engine))
		}
	}
}

pub(crate) struct App {
	field: Box<dyn SearchField>,
	title: String,
	slot: SelectionSlot,
	pub(crate) throbber_state: ThrobberState,
}

impl App {
	pub(crate) fn new(mut field: Box<dyn SearchField>, title: String, slot: SelectionSlot) -> Self {
		field.focus();
		Self {
			field,
			title,
			slot,
			throbber_state: ThrobberState::default(),
		}
	}

	/// Type `query` as if the user had entered it.
	pub(crate) fn seed(&mut self, query: &str) {
		if !query.is_empty() {
			self.field.set_query(query.to_string());
		}
	}

	pub(crate) fn pump(&mut self) -> bool {
		self.field.pump()
	}

	/// Returns the outcome once the user commits or quits.
	pub(crate) fn apply(&mut self, action: KeyAction) -> Option<SearchOutcome> {
		match action {
			KeyAction::Nav(key) => {
				if !self.field.handle_key(key) {
					match key {
						NavKey::Enter => {
							self.field.fallback_enter();
						}
						NavKey::Escape => return Some(self.cancelled()),
						NavKey::Up | NavKey::Down | NavKey::Tab => {}
					}
				}
			}
			KeyAction::Insert(ch) => {
				let mut query = self.field.query().to_string();
				query.push(ch);
				self.field.set_query(query);
			}
			KeyAction::Backspace => {
				let mut query = self.field.query().to_string();
				if query.pop().is_some() {
					self.field.set_query(query);
				}
			}
			KeyAction::ClearQuery => self.field.set_query(String::new()),
			KeyAction::DismissBanner => self.field.dismiss_banner(),
			KeyAction::ClearHistory => self.field.clear_history(),
			KeyAction::Quit => return Some(self.cancelled()),
			KeyAction::Ignore => {}
		}

		let selection = self.slot.borrow_mut().take()?;
		info!("committed {selection:?}");
		Some(SearchOutcome {
			accepted: true,
			query: self.field.query().to_string(),
			selection: Some(selection),
		})
	}

	fn cancelled(&self) -> SearchOutcome {
		SearchOutcome {
			accepted: false,
			query: self.field.query().to_string(),
			selection: None,
		}
	}
}
