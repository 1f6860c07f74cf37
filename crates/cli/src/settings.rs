//! Config resolution: explicit `--config`, else `./scrubgrid.toml` when it
//! exists, else built-in defaults. `--blacklist` / `SGRID_BLACKLIST` replace
//! the configured source before validation.

use std::path::Path;

use scrubgrid_engine::ScrubConfig;

use crate::CliError;

pub const DEFAULT_CONFIG_FILE: &str = "scrubgrid.toml";

fn read(config: Option<&Path>) -> Result<ScrubConfig, CliError> {
    match config {
        Some(path) => {
            log::debug!("config: {}", path.display());
            Ok(ScrubConfig::load(path)?)
        }
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.is_file() {
                log::debug!("config: {} (working directory)", path.display());
                Ok(ScrubConfig::load(path)?)
            } else {
                log::debug!("config: built-in defaults");
                Ok(ScrubConfig::default())
            }
        }
    }
}

/// Load, apply the source override, validate.
pub fn load(config: Option<&Path>, blacklist: Option<&str>) -> Result<ScrubConfig, CliError> {
    let mut cfg = read(config)?;
    if let Some(source) = blacklist {
        cfg.blacklist.source = source.to_string();
    }
    cfg.validate()?;
    Ok(cfg)
}

// ============================================================================
// validate
// ============================================================================

pub fn cmd_validate(config: Option<&Path>) -> Result<(), CliError> {
    let path = config.unwrap_or_else(|| Path::new(DEFAULT_CONFIG_FILE));
    if config.is_none() && !path.is_file() {
        return Err(CliError::args(format!("no {DEFAULT_CONFIG_FILE} in the working directory"))
            .with_hint("pass --config <path>"));
    }

    let cfg = ScrubConfig::load(path)?;
    cfg.validate()?;

    println!("{}: ok", path.display());
    println!("  blacklist  {}", cfg.blacklist.source);
    println!(
        "  columns    blacklist [{}, {}], input [{}, {}]",
        cfg.blacklist.company_column,
        cfg.blacklist.email_column,
        cfg.input.company_column,
        cfg.input.email_column
    );
    println!("  output     {} ({})", cfg.output.file, cfg.output.format);
    Ok(())
}
