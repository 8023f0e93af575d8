use std::sync::Arc;

use seekbox_source_api::Record;

/// Display projection supplied by the host form.
pub type DisplayFn<T> = Arc<dyn Fn(&T) -> String + Send + Sync>;

/// Invoked with the record the user committed.
pub type SelectFn<T> = Box<dyn FnMut(&T)>;

/// Invoked when the user asks to create a record instead of picking one.
pub type CreateFn = Box<dyn FnMut(CreateRequest)>;

/// What the user asked to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateRequest {
	/// Open an empty creation form.
	Blank,
	/// Create a record prefilled from the typed query.
	FromQuery(String),
}

/// Projection that falls back to [`Record::label`].
#[must_use]
pub fn label_display<T: Record>() -> DisplayFn<T> {
	Arc::new(|item: &T| item.label())
}
