//! Configuration loading with defaults

use std::collections::BTreeSet;
use std::path::Path;

use crate::errors::{CadastreError, Result};
use crate::fs;
use crate::schemas::Config;

/// Load configuration from the store, falling back to defaults.
///
/// If config.json exists, it is read and merged with defaults field by field.
/// If it doesn't exist, the default configuration is returned. The result is
/// checked with [`validate_config`].
///
/// # Arguments
/// * `root` - Path to the store root (the directory holding `.cadastre/`)
pub fn load_config(root: &Path) -> Result<Config> {
    let config = fs::read_config(root)?;
    validate_config(&config)?;
    Ok(config)
}

/// Reject settings the workflow cannot run with
pub fn validate_config(config: &Config) -> Result<()> {
    if config.demo_password.is_empty() {
        return Err(CadastreError::ConfigError(
            "demo_password must not be empty".to_string(),
        ));
    }
    if config.permit_validity_years == 0 {
        return Err(CadastreError::ConfigError(
            "permit_validity_years must be at least 1".to_string(),
        ));
    }
    if config.expiring_window_days < 0 {
        return Err(CadastreError::ConfigError(format!(
            "expiring_window_days must not be negative, got {}",
            config.expiring_window_days
        )));
    }

    for (procedure_type, pipeline) in &config.pipelines {
        if pipeline.is_empty() {
            return Err(CadastreError::ConfigError(format!(
                "pipeline for {} is empty",
                procedure_type
            )));
        }
        let mut seen = BTreeSet::new();
        if let Some(dup) = pipeline.iter().find(|step| !seen.insert(**step)) {
            return Err(CadastreError::ConfigError(format!(
                "pipeline for {} lists {} twice",
                procedure_type, dup
            )));
        }
    }
    Ok(())
}
