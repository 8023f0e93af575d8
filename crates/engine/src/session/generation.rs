//! Generation tracking for search submissions.
//!
//! Every submission takes the next value of a monotonically increasing
//! counter. Work tagged with an older value is stale and must not reach the
//! result set.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared counter of search generations.
#[derive(Debug, Default, Clone)]
pub(crate) struct SearchGeneration {
	current: Arc<AtomicU64>,
}

impl SearchGeneration {
	/// Start a new generation and return a guard bound to it.
	pub(crate) fn next(&self) -> GenerationGuard {
		let id = self.current.fetch_add(1, Ordering::AcqRel) + 1;
		GenerationGuard {
			id,
			current: Arc::clone(&self.current),
		}
	}

	/// Advance without starting work, making every outstanding guard stale.
	pub(crate) fn invalidate(&self) {
		self.current.fetch_add(1, Ordering::AcqRel);
	}

	pub(crate) fn current_id(&self) -> u64 {
		self.current.load(Ordering::Acquire)
	}
}

/// Ties a unit of work to the generation it was started under.
#[derive(Debug, Clone)]
pub(crate) struct GenerationGuard {
	id: u64,
	current: Arc<AtomicU64>,
}

impl GenerationGuard {
	/// Whether a newer generation has started since this guard was issued.
	pub(crate) fn is_stale(&self) -> bool {
		self.current.load(Ordering::Acquire) != self.id
	}

	pub(crate) fn id(&self) -> u64 {
		self.id
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn newer_generations_stale_older_guards() {
		let generation = SearchGeneration::default();
		assert_eq!(generation.current_id(), 0);

		let first = generation.next();
		assert_eq!(first.id(), 1);
		assert!(!first.is_stale());

		let second = generation.next();
		assert!(first.is_stale());
		assert!(!second.is_stale());
		assert_eq!(generation.current_id(), 2);
	}

	#[test]
	fn invalidate_stales_without_issuing() {
		let generation = SearchGeneration::default();
		let guard = generation.next();
		generation.invalidate();
		assert!(guard.is_stale());
		assert_eq!(generation.current_id(), 2);
	}

	#[test]
	fn clones_share_the_counter() {
		let generation = SearchGeneration::default();
		let clone = generation.clone();
		let guard = generation.next();
		let _ = clone.next();
		assert!(guard.is_stale());
	}
}
