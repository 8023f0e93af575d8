//! Capabilities the host application provides to the engines.
//!
//! Every method returns a `Send` future so engines can run the call on a
//! tokio task and drop it on cancellation.

use std::fmt::Debug;
use std::future::Future;

use crate::error::TransportError;
use crate::item::{ItemId, Record};
use crate::results::{EntityKind, GroupedResults, OmniboxBundle};

/// Free-text lookup for a single entity type.
pub trait SearchSource: Send + Sync + 'static {
	type Item: Record;

	/// Records matching `query`, in relevance order.
	fn search(
		&self,
		query: &str,
	) -> impl Future<Output = Result<Vec<Self::Item>, TransportError>> + Send;

	/// Resolve a bare identifier into the full record.
	fn get_detail(
		&self,
		id: &ItemId,
	) -> impl Future<Output = Result<Self::Item, TransportError>> + Send;
}

/// Optional capability: the whole corpus is small enough to filter locally.
pub trait CorpusSource: SearchSource {
	fn fetch_all(&self) -> impl Future<Output = Result<Vec<Self::Item>, TransportError>> + Send;
}

/// Lookup whose results are partitioned into labeled groups.
pub trait GroupedSource: Send + Sync + 'static {
	type Item: Record;
	/// Scoping parameters (for example the owning customer).
	type Context: Clone + PartialEq + Debug + Send + Sync + 'static;

	fn grouped_search(
		&self,
		query: &str,
		context: &Self::Context,
	) -> impl Future<Output = Result<GroupedResults<Self::Item>, TransportError>> + Send;

	/// The create-new entry offered when nothing matches.
	fn sentinel(&self) -> Self::Item;
}

/// Federated lookup across customers and work items.
pub trait OmniboxSource: Send + Sync + 'static {
	type Customer: Record;
	type WorkItem: Record;

	/// Search every category admitted by `kinds` (all of them when empty).
	fn omnibox_search(
		&self,
		query: &str,
		kinds: &[EntityKind],
	) -> impl Future<Output = Result<OmniboxBundle<Self::Customer, Self::WorkItem>, TransportError>>
	+ Send;
}
