//! Keyboard highlight over a result set that can change underneath it.

/// Clamp a previous highlight into a result set of `count` entries.
///
/// An empty result set clears the highlight. A set index is pulled back to
/// the last entry when the set shrank; an unset highlight stays unset.
#[must_use]
pub fn reclamp(previous: Option<usize>, count: usize) -> Option<usize> {
	if count == 0 {
		return None;
	}
	previous.map(|index| index.min(count - 1))
}

/// Highlight position within the flattened result set of an engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Highlight {
	index: Option<usize>,
}

impl Highlight {
	/// Currently highlighted position.
	#[must_use]
	pub const fn index(self) -> Option<usize> {
		self.index
	}

	pub fn clear(&mut self) {
		self.index = None;
	}

	/// Highlight `index` if it addresses one of `count` entries.
	pub fn set(&mut self, index: usize, count: usize) -> bool {
		if index < count {
			self.index = Some(index);
			true
		} else {
			false
		}
	}

	/// Reset for a fresh result set: first entry, or nothing when empty.
	pub fn reset_to_first(&mut self, count: usize) {
		self.index = (count > 0).then_some(0);
	}

	/// Re-apply [`reclamp`] after the result set changed size.
	pub fn reclamp(&mut self, count: usize) {
		self.index = reclamp(self.index, count);
	}

	/// Move down, wrapping from the last entry to the first. An unset
	/// highlight lands on the first entry.
	pub fn next(&mut self, count: usize) {
		if count == 0 {
			self.index = None;
			return;
		}
		self.index = Some(match self.index {
			Some(index) if index + 1 < count => index + 1,
			_ => 0,
		});
	}

	/// Move up, wrapping from the first entry (or from unset) to the last.
	pub fn previous(&mut self, count: usize) {
		if count == 0 {
			self.index = None;
			return;
		}
		self.index = Some(match self.index {
			Some(index) if index > 0 && index < count => index - 1,
			_ => count - 1,
		});
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn reclamp_handles_every_shape() {
		assert_eq!(reclamp(Some(3), 0), None);
		assert_eq!(reclamp(None, 0), None);
		assert_eq!(reclamp(None, 4), None);
		assert_eq!(reclamp(Some(2), 4), Some(2));
		assert_eq!(reclamp(Some(9), 4), Some(3));
	}

	#[test]
	fn shrink_never_leaves_a_dangling_index() {
		let mut highlight = Highlight::default();
		assert!(highlight.set(6, 7));
		for count in (0..7).rev() {
			highlight.reclamp(count);
			match highlight.index() {
				Some(index) => assert!(index < count),
				None => assert_eq!(count, 0),
			}
		}
	}

	#[test]
	fn down_wraps_from_last_to_first() {
		let mut highlight = Highlight::default();
		let visited: Vec<_> = (0..4)
			.map(|_| {
				highlight.next(3);
				highlight.index()
			})
			.collect();
		assert_eq!(visited, [Some(0), Some(1), Some(2), Some(0)]);
	}

	#[test]
	fn up_wraps_from_first_to_last() {
		let mut highlight = Highlight::default();
		highlight.previous(3);
		assert_eq!(highlight.index(), Some(2));

		highlight.set(0, 3);
		highlight.previous(3);
		assert_eq!(highlight.index(), Some(2));

		highlight.previous(3);
		assert_eq!(highlight.index(), Some(1));
	}

	#[test]
	fn out_of_range_set_is_rejected() {
		let mut highlight = Highlight::default();
		assert!(!highlight.set(3, 3));
		assert_eq!(highlight.index(), None);
	}

	#[test]
	fn stepping_an_empty_set_clears() {
		let mut highlight = Highlight::default();
		highlight.set(1, 2);
		highlight.next(0);
		assert_eq!(highlight.index(), None);
	}
}
