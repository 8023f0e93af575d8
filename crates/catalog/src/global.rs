use std::future::Future;
use std::sync::Arc;

use log::debug;
use seekbox_source_api::{EntityKind, OmniboxBundle, OmniboxSource, TransportError};

use crate::catalog::Catalog;
use crate::faults::Faults;
use crate::matches_any;
use crate::records::{Customer, WorkItem};

/// Rows per category in an omnibox response.
pub const CATEGORY_LIMIT: usize = 5;

/// Federated customer and work item search behind the omnibox.
#[derive(Debug, Clone)]
pub struct GlobalIndex {
	catalog: Arc<Catalog>,
	faults: Faults,
}

impl GlobalIndex {
	#[must_use]
	pub fn new(catalog: Arc<Catalog>) -> Self {
		Self {
			catalog,
			faults: Faults::none(),
		}
	}

	#[must_use]
	pub fn with_faults(mut self, faults: Faults) -> Self {
		self.faults = faults;
		self
	}

	fn lookup(&self, query: &str, kinds: &[EntityKind]) -> OmniboxBundle<Customer, WorkItem> {
		let query = query.trim();
		if query.chars().count() < 2 {
			return OmniboxBundle::default();
		}

		let customers: Vec<_> = if EntityKind::Customer.admitted_by(kinds) {
			self.catalog
				.customers
				.iter()
				.filter(|customer| matches_any(&customer.haystacks(), query))
				.take(CATEGORY_LIMIT)
				.cloned()
				.collect()
		} else {
			Vec::new()
		};

		let work_items: Vec<_> = if EntityKind::WorkItem.admitted_by(kinds) {
			self.catalog
				.work_items
				.iter()
				.filter(|item| matches_any(&item.haystacks(), query))
				.take(CATEGORY_LIMIT)
				.cloned()
				.collect()
		} else {
			Vec::new()
		};

		let total_count = customers.len() + work_items.len();
		OmniboxBundle {
			customers,
			work_items,
			total_count,
		}
	}
}

impl OmniboxSource for GlobalIndex {
	type Customer = Customer;
	type WorkItem = WorkItem;

	fn omnibox_search(
		&self,
		query: &str,
		kinds: &[EntityKind],
	) -> impl Future<Output = Result<OmniboxBundle<Customer, WorkItem>, TransportError>> + Send
	{
		async move {
			self.faults.inject().await?;
			let bundle = self.lookup(query, kinds);
			debug!("omnibox {query:?} matched {} rows", bundle.total_count);
			Ok(bundle)
		}
	}
}
