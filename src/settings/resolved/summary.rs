use super::ResolvedConfig;

pub(super) fn print_summary(config: &ResolvedConfig) {
	for line in summary_lines(config) {
		println!("{line}");
	}
}

fn summary_lines(config: &ResolvedConfig) -> Vec<String> {
	let mut lines = vec![
		"Effective configuration:".to_string(),
		format!("  Mode: {}", config.mode.as_str()),
		format!("  Prompt title: {}", config.title),
		format!("  Debounce: {} ms", config.tuning.debounce_ms),
		format!("  Minimum query length: {}", config.tuning.min_query_len),
	];
	match &config.catalog.path {
		Some(path) => lines.push(format!("  Catalog: {}", path.display())),
		None => lines.push("  Catalog: (built-in demo data)".to_string()),
	}
	if !config.catalog.latency.is_zero() {
		lines.push(format!("  Latency: {} ms", config.catalog.latency.as_millis()));
	}
	if let Some(err) = &config.catalog.failure {
		lines.push(format!("  Simulated failure: {err}"));
	}
	if !config.initial_query.is_empty() {
		lines.push(format!("  Initial query: {}", config.initial_query));
	}
	if let Some(customer) = config.customer {
		lines.push(format!("  Customer: {customer}"));
	}
	if config.kinds.is_empty() {
		lines.push("  Categories: (all)".to_string());
	} else {
		let kinds: Vec<_> = config.kinds.iter().map(|kind| kind.as_str()).collect();
		lines.push(format!("  Categories: {}", kinds.join(", ")));
	}
	lines.push(format!("  Cached customers: {}", bool_to_word(config.cached)));
	match &config.history_dir {
		Some(dir) => lines.push(format!("  History: {}", dir.display())),
		None => lines.push("  History: (not persisted)".to_string()),
	}
	lines.push(format!("  Log level: {}", config.log_level));
	lines
}

fn bool_to_word(value: bool) -> &'static str {
	if value { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
	use std::path::PathBuf;

	use seekbox_source_api::EntityKind;

	use super::*;

	#[test]
	fn summary_lists_optional_settings_only_when_set() {
		let mut config = ResolvedConfig::default();
		let plain = summary_lines(&config);
		assert!(plain.iter().any(|line| line.contains("built-in demo data")));
		assert!(!plain.iter().any(|line| line.contains("Latency")));

		config.kinds = vec![EntityKind::WorkItem];
		config.history_dir = Some(PathBuf::from("/tmp/seekbox"));
		let lines = summary_lines(&config);
		assert!(lines.contains(&"  Categories: work_item".to_string()));
		assert!(lines.iter().any(|line| line.ends_with("/tmp/seekbox")));
	}
}
