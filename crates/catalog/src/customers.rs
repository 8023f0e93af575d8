use std::future::Future;
use std::sync::Arc;

use log::debug;
use seekbox_source_api::{CorpusSource, ItemId, SearchSource, TransportError};

use crate::catalog::Catalog;
use crate::faults::Faults;
use crate::records::Customer;
use crate::{matches_any, not_found};

/// Rows returned by one customer search.
pub const CUSTOMER_SEARCH_LIMIT: usize = 10;

/// Customer lookup for single-entity pickers. The corpus is small enough to
/// hand over in full.
#[derive(Debug, Clone)]
pub struct CustomerDirectory {
	catalog: Arc<Catalog>,
	faults: Faults,
}

impl CustomerDirectory {
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

	fn find(&self, query: &str) -> Vec<Customer> {
		self.catalog
			.customers
			.iter()
			.filter(|customer| matches_any(&customer.haystacks(), query))
			.take(CUSTOMER_SEARCH_LIMIT)
			.cloned()
			.collect()
	}
}

impl SearchSource for CustomerDirectory {
	type Item = Customer;

	fn search(
		&self,
		query: &str,
	) -> impl Future<Output = Result<Vec<Customer>, TransportError>> + Send {
		async move {
			self.faults.inject().await?;
			let found = self.find(query.trim());
			debug!("customer search {query:?} matched {}", found.len());
			Ok(found)
		}
	}

	fn get_detail(
		&self,
		id: &ItemId,
	) -> impl Future<Output = Result<Customer, TransportError>> + Send {
		async move {
			self.faults.inject().await?;
			let ItemId::Number(number) = id else {
				return Err(not_found("customer", id));
			};
			self.catalog
				.customer(*number)
				.cloned()
				.ok_or_else(|| not_found("customer", id))
		}
	}
}

impl CorpusSource for CustomerDirectory {
	fn fetch_all(&self) -> impl Future<Output = Result<Vec<Customer>, TransportError>> + Send {
		async move {
			self.faults.inject().await?;
			Ok(self.catalog.customers.clone())
		}
	}
}
