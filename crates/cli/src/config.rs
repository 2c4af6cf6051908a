// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Period catalog loading.

use std::path::{Path, PathBuf};

use evalcycle_domain::{DomainError, PeriodCatalog, PeriodConfig};
use tracing::{debug, info};

/// Errors raised while reading the period configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Cannot read period file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Period file {} is not valid JSON: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid period configuration: {0}")]
    Invalid(#[from] DomainError),
}

/// Parses a JSON array of periods into a validated catalog.
///
/// # Errors
///
/// Returns `ConfigError::Parse` for malformed JSON and
/// `ConfigError::Invalid` when a period fails validation.
pub fn parse_periods(json: &str, origin: &Path) -> Result<PeriodCatalog, ConfigError> {
    let periods: Vec<PeriodConfig> =
        serde_json::from_str(json).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
    debug!(count = periods.len(), "Parsed period configuration");
    Ok(PeriodCatalog::from_periods(periods)?)
}

/// Loads the period catalog from `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_periods(path: &Path) -> Result<PeriodCatalog, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let catalog = parse_periods(&json, path)?;
    info!(path = %path.display(), periods = catalog.iter().count(), "Loaded period catalog");
    Ok(catalog)
}
