//! Entity shapes stored in a catalog file.

use seekbox_source_api::{Annotation, AnnotationKind, ItemId, Record};
use serde::{Deserialize, Serialize};

/// Label of the create-new location row.
pub const NEW_LOCATION_LABEL: &str = "Other address...";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
	pub id: u64,
	pub first_name: String,
	#[serde(default)]
	pub last_name: Option<String>,
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub phone_number: Option<String>,
	#[serde(default)]
	pub address: Option<String>,
}

impl Customer {
	#[must_use]
	pub fn full_name(&self) -> String {
		match self.last_name.as_deref() {
			Some(last) if !last.is_empty() => format!("{} {last}", self.first_name),
			_ => self.first_name.clone(),
		}
	}

	/// Texts a free-text query is matched against.
	pub(crate) fn haystacks(&self) -> Vec<String> {
		let mut fields = vec![self.full_name(), self.id.to_string()];
		fields.extend(self.email.iter().cloned());
		fields.extend(self.phone_number.iter().cloned());
		fields
	}
}

impl Record for Customer {
	fn id(&self) -> ItemId {
		ItemId::Number(self.id)
	}

	fn label(&self) -> String {
		self.full_name()
	}

	fn annotations(&self) -> Vec<Annotation> {
		let mut lines = Vec::new();
		if let Some(address) = &self.address {
			lines.push(Annotation::new(AnnotationKind::Address, address));
		}
		if let Some(email) = &self.email {
			lines.push(Annotation::new(AnnotationKind::Detail, email));
		}
		lines
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
	pub id: u64,
	pub reference_id: String,
	pub status: String,
	#[serde(default)]
	pub description: String,
	#[serde(default)]
	pub customer_id: Option<u64>,
	#[serde(default)]
	pub customer_name: Option<String>,
}

impl WorkItem {
	pub(crate) fn haystacks(&self) -> Vec<String> {
		let mut fields = vec![self.reference_id.clone(), self.description.clone()];
		fields.extend(self.customer_name.iter().cloned());
		fields
	}
}

impl Record for WorkItem {
	fn id(&self) -> ItemId {
		ItemId::Number(self.id)
	}

	fn label(&self) -> String {
		format!("{} ({})", self.reference_id, self.status)
	}

	fn annotations(&self) -> Vec<Annotation> {
		let mut lines = Vec::new();
		if let Some(customer) = &self.customer_name {
			lines.push(Annotation::new(AnnotationKind::Customer, customer));
		}
		if !self.description.is_empty() {
			lines.push(Annotation::new(AnnotationKind::Detail, &self.description));
		}
		lines
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationKind {
	Shop,
	Customer,
	Freeform,
	/// The create-new row.
	New,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
	pub id: ItemId,
	pub name: String,
	pub kind: LocationKind,
	#[serde(default)]
	pub address: String,
	#[serde(default)]
	pub shop_name: Option<String>,
	#[serde(default)]
	pub customer_id: Option<u64>,
	#[serde(default)]
	pub customer_name: Option<String>,
}

impl Location {
	/// The "Other address..." row that starts the create flow.
	#[must_use]
	pub fn create_new() -> Self {
		Self {
			id: ItemId::create_new(),
			name: NEW_LOCATION_LABEL.to_string(),
			kind: LocationKind::New,
			address: String::new(),
			shop_name: None,
			customer_id: None,
			customer_name: None,
		}
	}
}

impl Record for Location {
	fn id(&self) -> ItemId {
		self.id.clone()
	}

	fn label(&self) -> String {
		self.name.clone()
	}

	fn annotations(&self) -> Vec<Annotation> {
		let mut lines = Vec::new();
		if !self.address.is_empty() {
			lines.push(Annotation::new(AnnotationKind::Address, &self.address));
		}
		if let Some(shop) = self.shop_name.as_ref().filter(|shop| **shop != self.name) {
			lines.push(Annotation::new(AnnotationKind::Shop, shop));
		}
		if let Some(customer) = &self.customer_name {
			lines.push(Annotation::new(AnnotationKind::Customer, customer));
		}
		lines
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn customer_without_last_name_uses_first_name() {
		let customer: Customer =
			serde_json::from_str(r#"{"id": 6, "first_name": "Tomasz", "last_name": null}"#).unwrap();
		assert_eq!(customer.label(), "Tomasz");
		assert!(customer.annotations().is_empty());
	}

	#[test]
	fn new_location_is_the_sentinel() {
		let sentinel = Location::create_new();
		assert!(sentinel.is_create_new());
		assert_eq!(sentinel.label(), NEW_LOCATION_LABEL);
	}

	#[test]
	fn location_annotations_skip_redundant_shop_name() {
		let shop = Location {
			id: ItemId::Number(1),
			name: "Main Street Workshop".into(),
			kind: LocationKind::Shop,
			address: "10 Main St".into(),
			shop_name: Some("Main Street Workshop".into()),
			customer_id: None,
			customer_name: None,
		};
		assert_eq!(
			shop.annotations(),
			[Annotation::new(AnnotationKind::Address, "10 Main St")]
		);
	}

	#[test]
	fn work_item_label_carries_status() {
		let item: WorkItem = serde_json::from_str(
			r#"{"id": 1, "reference_id": "WI-1", "status": "New", "customer_name": "Anna Smith"}"#,
		)
		.unwrap();
		assert_eq!(item.label(), "WI-1 (New)");
		assert_eq!(item.annotations()[0].kind, AnnotationKind::Customer);
	}
}
