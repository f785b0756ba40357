//! File system utilities for cadastre
//!
//! Provides path resolution and JSON file operations.

mod json;
mod paths;

pub use json::{
    read_config, read_entities, read_json, read_permits, read_procedures, read_session,
    read_substances, read_users, remove_session, write_config, write_entities, write_json,
    write_permit, write_procedure, write_session, write_substances, write_users,
};
pub use paths::{
    find_store_root, get_config_path, get_entities_path, get_permit_path, get_permits_dir,
    get_procedure_path, get_procedures_dir, get_session_path, get_store_dir, get_substances_path,
    get_users_path, resolve_cwd, STORE_DIR_NAME,
};
