mod app_dirs;
mod cli;
mod host;
mod logging;
mod settings;

use anyhow::Result;
use cli::{OutputFormat, parse_cli, print_json, print_plain};
use log::info;
use settings::ResolvedConfig;

fn main() -> Result<()> {
	let cli = parse_cli();
	let resolved = settings::load(&cli)?;

	if cli.print_config {
		resolved.print_summary();
	}

	let log_dir = app_dirs::get_cache_dir()?;
	let log_file = logging::initialize(&log_dir, resolved.log_level)?;
	info!("seekbox {} logging to {}", env!("CARGO_PKG_VERSION"), log_file.display());

	run_search(cli.output, &resolved)
}

/// Run the mounted field and print the outcome in the chosen format.
fn run_search(format: OutputFormat, settings: &ResolvedConfig) -> Result<()> {
	let outcome = host::run(settings)?;

	match format {
		OutputFormat::Plain => print_plain(&outcome),
		OutputFormat::Json => print_json(&outcome)?,
	}

	Ok(())
}
