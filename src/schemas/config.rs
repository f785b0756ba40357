//! Config schema - Configuration for cadastre

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{ProcedureType, StepType};

/// Main configuration, read from `.cadastre/config.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Schema version for forward compatibility
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Password accepted for every seeded account (demo authentication)
    #[serde(default = "default_demo_password")]
    pub demo_password: String,

    /// Horizon, in days, for "expiring soon" permit warnings
    #[serde(default = "default_expiring_window_days")]
    pub expiring_window_days: i64,

    /// Validity of a permit issued from an approved application
    #[serde(default = "default_permit_validity_years")]
    pub permit_validity_years: u32,

    /// Step pipeline per procedure type. Types not listed use the canonical pipeline.
    #[serde(default)]
    pub pipelines: BTreeMap<ProcedureType, Vec<StepType>>,
}

fn default_schema_version() -> u32 {
    1
}

fn default_demo_password() -> String {
    "password".to_string()
}

fn default_expiring_window_days() -> i64 {
    90
}

fn default_permit_validity_years() -> u32 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Config {
            schema_version: 1,
            demo_password: default_demo_password(),
            expiring_window_days: 90,
            permit_validity_years: 5,
            pipelines: BTreeMap::new(),
        }
    }
}
