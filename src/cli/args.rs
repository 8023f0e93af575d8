use std::fmt::Write;
use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Effects};
use clap::builder::{BoolishValueParser, Styles};
use clap::{ArgAction, ColorChoice, Parser, ValueEnum};

use crate::app_dirs;

/// Version banner with the directories the binary reads and writes.
fn long_version() -> &'static str {
	let describe = |dir: anyhow::Result<PathBuf>| match dir {
		Ok(path) => path.display().to_string(),
		Err(err) => format!("unavailable ({err})"),
	};

	let mut details = format!("seekbox {}", env!("CARGO_PKG_VERSION"));
	let _ = writeln!(details);
	let _ = writeln!(details, "config directory: {}", describe(app_dirs::get_config_dir()));
	let _ = writeln!(details, "data directory: {}", describe(app_dirs::get_data_dir()));
	let _ = writeln!(details, "log directory: {}", describe(app_dirs::get_cache_dir()));

	Box::leak(details.into_boxed_str())
}

fn cli_styles() -> Styles {
	Styles::styled()
		.header(AnsiColor::Green.on_default().effects(Effects::BOLD))
		.usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
		.literal(AnsiColor::Cyan.on_default())
		.placeholder(AnsiColor::Yellow.on_default())
}

pub(crate) fn parse_cli() -> CliArgs {
	CliArgs::parse()
}

/// Command-line arguments accepted by the `seekbox` binary.
#[derive(Parser, Debug)]
#[command(
	name = "seekbox",
	version,
	long_version = long_version(),
	about = "Type-ahead pickers and an omnibox over a record catalog",
	color = ColorChoice::Auto,
	styles = cli_styles()
)]
pub(crate) struct CliArgs {
	#[arg(
		short,
		long = "config",
		value_name = "FILE",
		env = "SEEKBOX_CONFIG",
		action = ArgAction::Append,
		help = "Additional configuration file to merge (default: none)"
	)]
	pub(crate) config: Vec<PathBuf>,
	#[arg(
		short = 'n',
		long = "no-config",
		help = "Skip loading default configuration files (default: disabled)"
	)]
	pub(crate) no_config: bool,
	#[arg(
		short = 'm',
		long,
		value_enum,
		help = "Choose which search field to open (default: omnibox)"
	)]
	pub(crate) mode: Option<ModeArg>,
	#[arg(
		short = 't',
		long,
		value_name = "TITLE",
		help = "Set the input prompt title (default: derived from the mode)"
	)]
	pub(crate) title: Option<String>,
	#[arg(
		short = 'q',
		long,
		value_name = "QUERY",
		help = "Provide an initial search query (default: empty)"
	)]
	pub(crate) initial_query: Option<String>,
	#[arg(
		long = "debounce-ms",
		value_name = "MS",
		help = "Quiet period before a keystroke is searched (default: 300)"
	)]
	pub(crate) debounce_ms: Option<u64>,
	#[arg(
		long = "min-query-len",
		value_name = "NUM",
		help = "Minimum query length that reaches the catalog (default: 2)"
	)]
	pub(crate) min_query_len: Option<usize>,
	#[arg(
		long,
		value_name = "FILE",
		help = "Load records from a JSON catalog (default: built-in demo data)"
	)]
	pub(crate) catalog: Option<PathBuf>,
	#[arg(
		long = "latency-ms",
		value_name = "MS",
		help = "Delay every catalog call (default: 0)"
	)]
	pub(crate) latency_ms: Option<u64>,
	#[arg(
		long = "fail-status",
		value_name = "CODE",
		help = "Fail every catalog call with this HTTP status (default: disabled)"
	)]
	pub(crate) fail_status: Option<u16>,
	#[arg(
		long = "fail-detail",
		value_name = "TEXT",
		help = "Detail text carried by simulated failures (default: none)"
	)]
	pub(crate) fail_detail: Option<String>,
	#[arg(
		long,
		value_name = "ID",
		help = "Customer whose saved addresses the location picker offers (default: none)"
	)]
	pub(crate) customer: Option<u64>,
	#[arg(
		long,
		value_delimiter = ',',
		value_name = "KIND",
		value_enum,
		help = "Comma-separated omnibox categories (default: all)"
	)]
	pub(crate) kinds: Option<Vec<KindArg>>,
	#[arg(
		long,
		value_parser = BoolishValueParser::new(),
		help = "Filter customers from a locally cached list (default: disabled)"
	)]
	pub(crate) cached: Option<bool>,
	#[arg(
		long,
		value_parser = BoolishValueParser::new(),
		help = "Remember successful omnibox searches (default: enabled)"
	)]
	pub(crate) history: Option<bool>,
	#[arg(
		long = "log-level",
		value_name = "LEVEL",
		help = "Log level written to the log file (default: info)"
	)]
	pub(crate) log_level: Option<String>,
	#[arg(
		short = 'p',
		long = "print-config",
		help = "Print the resolved configuration before running (default: disabled)"
	)]
	pub(crate) print_config: bool,
	#[arg(short = 'o', long = "output", value_enum, default_value_t = OutputFormat::Plain, help = "Choose how to print the result")]
	pub(crate) output: OutputFormat,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum ModeArg {
	Omnibox,
	Customer,
	Location,
}

impl ModeArg {
	/// Name used by configuration files.
	pub(crate) fn as_str(self) -> &'static str {
		match self {
			ModeArg::Omnibox => "omnibox",
			ModeArg::Customer => "customer",
			ModeArg::Location => "location",
		}
	}
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum KindArg {
	Customer,
	#[value(name = "work_item", alias = "work-item")]
	WorkItem,
}

impl KindArg {
	pub(crate) fn as_str(self) -> &'static str {
		match self {
			KindArg::Customer => "customer",
			KindArg::WorkItem => "work_item",
		}
	}
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
	Plain,
	Json,
}

#[cfg(test)]
mod tests {
	use clap::CommandFactory;

	use super::*;

	#[test]
	fn command_definition_is_consistent() {
		CliArgs::command().debug_assert();
	}

	#[test]
	fn defaults_leave_overrides_unset() {
		let parsed = CliArgs::parse_from(["seekbox"]);
		assert_eq!(parsed.output, OutputFormat::Plain);
		assert!(parsed.mode.is_none());
		assert!(parsed.min_query_len.is_none());
	}

	#[test]
	fn kinds_accept_a_comma_separated_list() {
		let parsed = CliArgs::parse_from(["seekbox", "--kinds", "work_item,customer", "-m", "omnibox"]);
		assert_eq!(parsed.kinds, Some(vec![KindArg::WorkItem, KindArg::Customer]));
		assert_eq!(parsed.mode, Some(ModeArg::Omnibox));
	}
}
