//! Configuration loading and checks

mod loader;

pub use loader::{load_config, validate_config};
