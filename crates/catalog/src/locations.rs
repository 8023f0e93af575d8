//! Grouped location lookup for drop-off and pickup fields.
//!
//! Saved addresses of the scoping customer are listed even for an empty
//! query. Typed queries additionally match shops and freeform locations. The
//! "Other address..." row is always appended to the last group.

use std::future::Future;
use std::sync::Arc;

use seekbox_source_api::{Group, GroupedResults, GroupedSource, TransportError};

use crate::catalog::Catalog;
use crate::faults::Faults;
use crate::matches_any;
use crate::records::{Location, LocationKind};

pub const SHOPS: &str = "Shops";
pub const CUSTOMER_ADDRESSES: &str = "Customer Addresses";
pub const OTHER: &str = "Other";

/// Rows per group.
pub const GROUP_LIMIT: usize = 10;

#[derive(Debug, Clone)]
pub struct LocationDirectory {
	catalog: Arc<Catalog>,
	faults: Faults,
	min_query_len: usize,
}

impl LocationDirectory {
	#[must_use]
	pub fn new(catalog: Arc<Catalog>) -> Self {
		Self {
			catalog,
			faults: Faults::none(),
			min_query_len: 2,
		}
	}

	#[must_use]
	pub fn with_faults(mut self, faults: Faults) -> Self {
		self.faults = faults;
		self
	}

	fn lookup(&self, query: &str, customer: Option<u64>) -> GroupedResults<Location> {
		let query = query.trim();
		let searching = query.chars().count() >= self.min_query_len;
		let matching = |location: &&Location| {
			!searching || matches_any(&[location.name.clone(), location.address.clone()], query)
		};

		let of_kind = |kind: LocationKind| {
			self.catalog
				.locations
				.iter()
				.filter(move |location| location.kind == kind)
		};

		let shops = if searching {
			of_kind(LocationKind::Shop)
				.filter(matching)
				.take(GROUP_LIMIT)
				.cloned()
				.collect()
		} else {
			Vec::new()
		};

		let saved = match customer {
			Some(customer) => of_kind(LocationKind::Customer)
				.filter(|location| location.customer_id == Some(customer))
				.filter(matching)
				.take(GROUP_LIMIT)
				.cloned()
				.collect(),
			None => Vec::new(),
		};

		let mut other: Vec<Location> = if searching {
			of_kind(LocationKind::Freeform)
				.filter(matching)
				.take(GROUP_LIMIT)
				.cloned()
				.collect()
		} else {
			Vec::new()
		};
		other.push(Location::create_new());

		let groups = [
			Group::new(SHOPS, shops),
			Group::new(CUSTOMER_ADDRESSES, saved),
			Group::new(OTHER, other),
		]
		.into_iter()
		.filter(|group| !group.items.is_empty())
		.collect();
		GroupedResults::new(groups)
	}
}

impl GroupedSource for LocationDirectory {
	type Item = Location;
	/// Owning customer whose saved addresses are offered.
	type Context = Option<u64>;

	fn grouped_search(
		&self,
		query: &str,
		context: &Option<u64>,
	) -> impl Future<Output = Result<GroupedResults<Location>, TransportError>> + Send {
		async move {
			self.faults.inject().await?;
			Ok(self.lookup(query, *context))
		}
	}

	fn sentinel(&self) -> Location {
		Location::create_new()
	}
}

#[cfg(test)]
mod tests {
	use seekbox_source_api::Record;

	use super::*;

	fn directory() -> LocationDirectory {
		LocationDirectory::new(Arc::new(Catalog::demo().unwrap()))
	}

	fn labels(results: &GroupedResults<Location>) -> Vec<(String, Vec<String>)> {
		results
			.groups
			.iter()
			.map(|group| {
				(
					group.label.clone(),
					group.items.iter().map(Record::label).collect(),
				)
			})
			.collect()
	}

	#[tokio::test]
	async fn empty_query_lists_saved_addresses_and_the_sentinel() {
		let results = directory().grouped_search("", &Some(1)).await.unwrap();
		assert_eq!(
			labels(&results),
			[
				(
					CUSTOMER_ADDRESSES.to_string(),
					vec!["Home".to_string(), "Office".to_string()]
				),
				(OTHER.to_string(), vec!["Other address...".to_string()]),
			]
		);
	}

	#[tokio::test]
	async fn typed_query_matches_shops_and_freeform() {
		let results = directory().grouped_search("mar", &None).await.unwrap();
		assert_eq!(
			labels(&results),
			[
				(SHOPS.to_string(), vec!["Marina Service Point".to_string()]),
				(
					OTHER.to_string(),
					vec!["Marketplace stall".to_string(), "Other address...".to_string()]
				),
			]
		);
		assert!(results.has_sentinel());
	}

	#[tokio::test]
	async fn saved_addresses_are_scoped_to_the_customer() {
		let results = directory().grouped_search("ma", &Some(3)).await.unwrap();
		assert!(
			results
				.iter_flat()
				.all(|location| location.customer_id.is_none() || location.customer_id == Some(3))
		);
		let none = directory().grouped_search("dune", &Some(1)).await.unwrap();
		assert_eq!(none.flat_len(), 1);
		assert!(!none.has_real_items());
	}
}
