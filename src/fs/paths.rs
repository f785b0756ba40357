//! Path resolution utilities for cadastre
//!
//! Provides functions to locate the data store root and construct paths
//! to the files under `.cadastre/`.

use std::path::{Path, PathBuf};

use crate::errors::{CadastreError, Result};

/// Name of the data directory
pub const STORE_DIR_NAME: &str = ".cadastre";

/// Find the directory holding a `.cadastre` data store.
///
/// Walks up the directory tree from the starting directory.
///
/// # Errors
/// * `StoreNotFound` - If no ancestor holds a `.cadastre` directory
pub fn find_store_root(start_cwd: &Path) -> Result<PathBuf> {
    let mut current = start_cwd
        .canonicalize()
        .map_err(|e| CadastreError::StoreNotFound(format!("Cannot resolve path: {}", e)))?;

    loop {
        if get_store_dir(&current).is_dir() {
            return Ok(current);
        }

        match current.parent() {
            Some(parent) if parent != current => {
                current = parent.to_path_buf();
            }
            _ => {
                return Err(CadastreError::StoreNotFound(
                    "Could not find a .cadastre directory; run `cadastre init` first".to_string(),
                ));
            }
        }
    }
}

/// Resolve the current working directory, optionally using an override.
pub fn resolve_cwd(cwd_option: Option<&Path>) -> PathBuf {
    match cwd_option {
        Some(path) => path.to_path_buf(),
        None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
    }
}

pub fn get_store_dir(root: &Path) -> PathBuf {
    root.join(STORE_DIR_NAME)
}

pub fn get_config_path(root: &Path) -> PathBuf {
    get_store_dir(root).join("config.json")
}

pub fn get_entities_path(root: &Path) -> PathBuf {
    get_store_dir(root).join("entities.json")
}

pub fn get_substances_path(root: &Path) -> PathBuf {
    get_store_dir(root).join("substances.json")
}

pub fn get_users_path(root: &Path) -> PathBuf {
    get_store_dir(root).join("users.json")
}

/// The logged-in user, written by `cadastre login`
pub fn get_session_path(root: &Path) -> PathBuf {
    get_store_dir(root).join("session.json")
}

pub fn get_permits_dir(root: &Path) -> PathBuf {
    get_store_dir(root).join("permits")
}

/// One file per permit, named after its code
pub fn get_permit_path(root: &Path, code: &str) -> PathBuf {
    get_permits_dir(root).join(format!("{}.json", code))
}

pub fn get_procedures_dir(root: &Path) -> PathBuf {
    get_store_dir(root).join("procedures")
}

/// One file per procedure, named after its code
pub fn get_procedure_path(root: &Path, code: &str) -> PathBuf {
    get_procedures_dir(root).join(format!("{}.json", code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_store() -> TempDir {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join(STORE_DIR_NAME)).unwrap();
        temp
    }

    #[test]
    fn test_find_store_root_from_root() {
        let temp = setup_store();
        let root = find_store_root(temp.path()).unwrap();
        assert_eq!(root, temp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_find_store_root_from_subdir() {
        let temp = setup_store();
        let subdir = temp.path().join("exports").join("2025");
        std::fs::create_dir_all(&subdir).unwrap();

        let root = find_store_root(&subdir).unwrap();
        assert_eq!(root, temp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_find_store_root_not_found() {
        let temp = TempDir::new().unwrap();

        let result = find_store_root(temp.path());
        assert!(matches!(result, Err(CadastreError::StoreNotFound(_))));
    }

    #[test]
    fn test_store_paths() {
        let root = PathBuf::from("/data");
        assert_eq!(get_config_path(&root), PathBuf::from("/data/.cadastre/config.json"));
        assert_eq!(get_session_path(&root), PathBuf::from("/data/.cadastre/session.json"));
        assert_eq!(
            get_permit_path(&root, "PM-2025-001"),
            PathBuf::from("/data/.cadastre/permits/PM-2025-001.json")
        );
        assert_eq!(
            get_procedure_path(&root, "PR-2025-017"),
            PathBuf::from("/data/.cadastre/procedures/PR-2025-017.json")
        );
    }

    #[test]
    fn test_resolve_cwd_with_override() {
        let path = PathBuf::from("/custom/path");
        assert_eq!(resolve_cwd(Some(&path)), path);
    }
}
