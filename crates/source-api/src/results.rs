use serde::{Deserialize, Serialize};

use crate::item::Record;

/// A labeled partition of a grouped response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group<T> {
	pub label: String,
	#[serde(default = "Vec::new")]
	pub items: Vec<T>,
}

impl<T> Group<T> {
	#[must_use]
	pub fn new(label: impl Into<String>, items: Vec<T>) -> Self {
		Self {
			label: label.into(),
			items,
		}
	}
}

/// Response of a grouped search: groups in server order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedResults<T> {
	#[serde(default = "Vec::new")]
	pub groups: Vec<Group<T>>,
}

impl<T> Default for GroupedResults<T> {
	fn default() -> Self {
		Self { groups: Vec::new() }
	}
}

impl<T> GroupedResults<T> {
	#[must_use]
	pub fn new(groups: Vec<Group<T>>) -> Self {
		Self { groups }
	}

	/// Items in display order: groups concatenated, each preserving its own
	/// order.
	pub fn iter_flat(&self) -> impl Iterator<Item = &T> {
		self.groups.iter().flat_map(|group| group.items.iter())
	}

	/// Number of entries across all groups.
	#[must_use]
	pub fn flat_len(&self) -> usize {
		self.groups.iter().map(|group| group.items.len()).sum()
	}

	/// Entry at a position of the flattened sequence.
	#[must_use]
	pub fn flat_get(&self, index: usize) -> Option<&T> {
		self.iter_flat().nth(index)
	}
}

impl<T: Record> GroupedResults<T> {
	/// Whether any entry besides the create-new sentinel is present.
	#[must_use]
	pub fn has_real_items(&self) -> bool {
		self.iter_flat().any(|item| !item.is_create_new())
	}

	/// Whether the create-new sentinel is already present.
	#[must_use]
	pub fn has_sentinel(&self) -> bool {
		self.iter_flat().any(Record::is_create_new)
	}
}

/// Categories an omnibox search can be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
	Customer,
	WorkItem,
}

impl EntityKind {
	/// Wire name of the category.
	#[must_use]
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Customer => "customer",
			Self::WorkItem => "work_item",
		}
	}

	/// Whether `kinds` admits this category. An empty filter admits
	/// everything.
	#[must_use]
	pub fn admitted_by(self, kinds: &[EntityKind]) -> bool {
		kinds.is_empty() || kinds.contains(&self)
	}
}

/// Federated omnibox response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OmniboxBundle<C, W> {
	#[serde(default = "Vec::new")]
	pub customers: Vec<C>,
	#[serde(default = "Vec::new")]
	pub work_items: Vec<W>,
	#[serde(default)]
	pub total_count: usize,
}

impl<C, W> Default for OmniboxBundle<C, W> {
	fn default() -> Self {
		Self {
			customers: Vec::new(),
			work_items: Vec::new(),
			total_count: 0,
		}
	}
}

impl<C, W> OmniboxBundle<C, W> {
	/// Number of entries the panel can navigate.
	#[must_use]
	pub fn flat_len(&self) -> usize {
		self.customers.len() + self.work_items.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.flat_len() == 0
	}
}
