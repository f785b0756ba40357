//! Cadastre - Case management for mining permits
//!
//! This library provides the core functionality for the cadastre CLI, including:
//! - Schema definitions for permits, procedures, documents and committee decisions
//! - Domain logic for the procedure workflow, its gates and data integrity
//! - Filtering, dashboard statistics and role-based access
//! - A file-backed store and the service every operation goes through

pub mod application;
pub mod auth;
pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod fs;
pub mod schemas;
pub mod search;
pub mod stats;
pub mod store;

// Re-export commonly used types
pub use errors::{CadastreError, Result};
pub use schemas::{Config, Dataset, Permit, Procedure, ProcedureStatus};
pub use store::CadastreService;
