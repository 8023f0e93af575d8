//! In-memory directories over a JSON catalog.
//!
//! Each directory implements one collaborator capability from
//! `seekbox-source-api`, so the engines can be driven end to end without a
//! server. [`Faults`] adds latency or a fixed failure to every call.

pub mod catalog;
pub mod customers;
pub mod faults;
pub mod global;
pub mod locations;
pub mod records;

pub use catalog::{Catalog, CatalogError};
pub use customers::CustomerDirectory;
pub use faults::Faults;
pub use global::GlobalIndex;
pub use locations::LocationDirectory;
pub use records::{Customer, Location, LocationKind, WorkItem};

use seekbox_source_api::{ItemId, TransportError};

/// Case-insensitive substring match against any of `haystacks`.
pub(crate) fn matches_any(haystacks: &[String], needle: &str) -> bool {
	let needle = needle.to_lowercase();
	haystacks
		.iter()
		.any(|haystack| haystack.to_lowercase().contains(&needle))
}

pub(crate) fn not_found(entity: &str, id: &ItemId) -> TransportError {
	TransportError::Status {
		status: 404,
		detail: Some(format!("No {entity} with id {id}.")),
	}
}
