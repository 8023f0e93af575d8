/// Strip the whitespace that never matters for matching.
#[must_use]
pub fn normalize(query: &str) -> &str {
	query.trim()
}

/// Whether `query` is long enough to reach a collaborator.
#[must_use]
pub fn meets_threshold(query: &str, min_len: usize) -> bool {
	normalize(query).chars().count() >= min_len
}

/// Case-insensitive substring match used by the local corpus filter.
#[must_use]
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
	haystack.to_lowercase().contains(&needle.to_lowercase())
}
