use anyhow::{Context, Result};

use super::raw::RawConfig;
use super::resolved::ResolvedConfig;
use super::sources::build_config;
use crate::cli::CliArgs;

/// Resolve the effective settings. Later layers win: defaults, config files,
/// `SEEKBOX__*` variables, then CLI flags.
pub fn load(cli: &CliArgs) -> Result<ResolvedConfig> {
	let mut raw: RawConfig = build_config(cli)?
		.try_deserialize()
		.context("configuration does not match the expected shape")?;
	raw.apply_cli_overrides(cli);
	raw.resolve(cli)
}
