use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier reserved for the synthetic "create new" entry.
pub const CREATE_NEW_ID: &str = "new";

/// Identifier of a record as handed out by a collaborator.
///
/// Most entities use numeric keys, but some synthetic entries (for example a
/// customer's primary address that is not yet a stored location) are keyed by
/// strings, so both shapes are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
	Number(u64),
	Text(String),
}

impl ItemId {
	/// Identifier of the create-new sentinel.
	#[must_use]
	pub fn create_new() -> Self {
		Self::Text(CREATE_NEW_ID.to_string())
	}

	/// Whether this identifier marks the create-new sentinel rather than an
	/// entity.
	#[must_use]
	pub fn is_create_new(&self) -> bool {
		matches!(self, Self::Text(text) if text == CREATE_NEW_ID)
	}
}

impl From<u64> for ItemId {
	fn from(value: u64) -> Self {
		Self::Number(value)
	}
}

impl From<&str> for ItemId {
	fn from(value: &str) -> Self {
		Self::Text(value.to_string())
	}
}

impl From<String> for ItemId {
	fn from(value: String) -> Self {
		Self::Text(value)
	}
}

impl fmt::Display for ItemId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Number(value) => write!(f, "{value}"),
			Self::Text(value) => f.write_str(value),
		}
	}
}

/// Which secondary line an [`Annotation`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnnotationKind {
	Address,
	Shop,
	Customer,
	Detail,
}

/// Secondary text attached to a record, rendered under its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
	pub kind: AnnotationKind,
	pub text: String,
}

impl Annotation {
	#[must_use]
	pub fn new(kind: AnnotationKind, text: impl Into<String>) -> Self {
		Self {
			kind,
			text: text.into(),
		}
	}
}

/// A record that can appear in a result set.
///
/// Engines only need an identity and a default label; everything else about
/// the record stays opaque to them.
pub trait Record: Clone + Send + Sync + 'static {
	/// Stable identifier of the record.
	fn id(&self) -> ItemId;

	/// Default display projection.
	fn label(&self) -> String {
		format!("#{}", self.id())
	}

	/// Extra lines describing the record (address, owning shop, ...).
	fn annotations(&self) -> Vec<Annotation> {
		Vec::new()
	}

	/// Whether this entry is the create-new sentinel.
	fn is_create_new(&self) -> bool {
		self.id().is_create_new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[derive(Clone)]
	struct Bare(ItemId);

	impl Record for Bare {
		fn id(&self) -> ItemId {
			self.0.clone()
		}
	}

	#[test]
	fn ids_deserialize_from_numbers_and_strings() {
		let ids: Vec<ItemId> = serde_json::from_str(r#"[12, "customer-address-4", "new"]"#).unwrap();
		assert_eq!(ids[0], ItemId::Number(12));
		assert_eq!(ids[1], ItemId::from("customer-address-4"));
		assert!(ids[2].is_create_new());
		assert!(!ids[1].is_create_new());
	}

	#[test]
	fn numeric_new_is_not_the_sentinel() {
		assert!(!ItemId::Number(0).is_create_new());
		assert!(ItemId::create_new().is_create_new());
	}

	#[test]
	fn default_label_uses_the_identifier() {
		assert_eq!(Bare(ItemId::Number(7)).label(), "#7");
		assert!(Bare(ItemId::create_new()).is_create_new());
	}
}
