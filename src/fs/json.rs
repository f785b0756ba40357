//! JSON file operations with schema validation
//!
//! Provides functions to read and write JSON files with serde validation.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::auth::Session;
use crate::errors::{CadastreError, Result};
use crate::schemas::{Config, LegalEntity, Permit, Procedure, Substance, User};

use super::paths::{
    get_config_path, get_entities_path, get_permit_path, get_permits_dir, get_procedure_path,
    get_procedures_dir, get_session_path, get_substances_path, get_users_path,
};

/// Read and deserialize a JSON file.
///
/// # Errors
/// * `FileNotFound` - If the file does not exist
/// * `InvalidJson` - If the file contains invalid JSON or does not match the schema
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CadastreError::FileNotFound(format!("File not found: {}", path.display()))
        } else {
            CadastreError::Io(e)
        }
    })?;

    serde_json::from_str(&content).map_err(|e| {
        CadastreError::InvalidJson(format!("Invalid JSON in file {}: {}", path.display(), e))
    })
}

/// Write a value to a JSON file with pretty formatting.
///
/// Uses atomic write (write to temp file, then rename) to avoid partial writes.
pub fn write_json<T: Serialize>(path: &Path, data: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(data)
        .map_err(|e| CadastreError::InvalidJson(e.to_string()))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("json.tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(content.as_bytes())?;
    file.write_all(b"\n")?;
    file.sync_all()?;
    drop(file);

    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Read a JSON array file; a missing file is an empty collection
fn read_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    read_json(path)
}

/// Read every `*.json` file of a directory, in file name order
fn read_dir_json<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut paths: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();
    paths.iter().map(|p| read_json(p)).collect()
}

/// Read the config.json file, or defaults when absent.
pub fn read_config(root: &Path) -> Result<Config> {
    let path = get_config_path(root);
    if !path.exists() {
        return Ok(Config::default());
    }
    read_json(&path)
}

pub fn write_config(root: &Path, config: &Config) -> Result<()> {
    write_json(&get_config_path(root), config)
}

pub fn read_entities(root: &Path) -> Result<Vec<LegalEntity>> {
    read_collection(&get_entities_path(root))
}

pub fn write_entities(root: &Path, entities: &[LegalEntity]) -> Result<()> {
    write_json(&get_entities_path(root), &entities)
}

pub fn read_substances(root: &Path) -> Result<Vec<Substance>> {
    read_collection(&get_substances_path(root))
}

pub fn write_substances(root: &Path, substances: &[Substance]) -> Result<()> {
    write_json(&get_substances_path(root), &substances)
}

pub fn read_users(root: &Path) -> Result<Vec<User>> {
    read_collection(&get_users_path(root))
}

pub fn write_users(root: &Path, users: &[User]) -> Result<()> {
    write_json(&get_users_path(root), &users)
}

/// Read every permit file under `.cadastre/permits/`
pub fn read_permits(root: &Path) -> Result<Vec<Permit>> {
    read_dir_json(&get_permits_dir(root))
}

pub fn write_permit(root: &Path, permit: &Permit) -> Result<()> {
    write_json(&get_permit_path(root, &permit.code), permit)
}

/// Read every procedure file under `.cadastre/procedures/`
pub fn read_procedures(root: &Path) -> Result<Vec<Procedure>> {
    read_dir_json(&get_procedures_dir(root))
}

pub fn write_procedure(root: &Path, procedure: &Procedure) -> Result<()> {
    write_json(&get_procedure_path(root, &procedure.code), procedure)
}

/// Read the persisted session, if someone is logged in
pub fn read_session(root: &Path) -> Result<Option<Session>> {
    let path = get_session_path(root);
    if !path.exists() {
        return Ok(None);
    }
    read_json(&path).map(Some)
}

pub fn write_session(root: &Path, session: &Session) -> Result<()> {
    write_json(&get_session_path(root), session)
}

/// Delete the persisted session. Returns whether one existed.
pub fn remove_session(root: &Path) -> Result<bool> {
    match fs::remove_file(get_session_path(root)) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(CadastreError::Io(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{date, utc_day, ProcedureType, UserRole};
    use tempfile::TempDir;

    fn make_procedure(code: &str) -> Procedure {
        Procedure::new(
            "1".to_string(),
            code.to_string(),
            ProcedureType::Renewal,
            "2".to_string(),
            date(2025, 1, 15),
        )
    }

    #[test]
    fn test_read_json_file_not_found() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nonexistent.json");

        let result: Result<Procedure> = read_json(&path);
        assert!(matches!(result.unwrap_err(), CadastreError::FileNotFound(_)));
    }

    #[test]
    fn test_read_json_invalid_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("invalid.json");
        fs::write(&path, "not valid json {").unwrap();

        let result: Result<Procedure> = read_json(&path);
        assert!(matches!(result.unwrap_err(), CadastreError::InvalidJson(_)));
    }

    #[test]
    fn test_write_json_is_pretty_with_trailing_newline() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("procedure.json");

        write_json(&path, &make_procedure("PR-2025-045")).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.ends_with("}\n"));
        assert!(content.contains("\n  \"code\": \"PR-2025-045\""));
        assert!(!temp.path().join("nested").join("procedure.json.tmp").exists());
    }

    #[test]
    fn test_read_config_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let config = read_config(temp.path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_missing_collection_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(read_entities(temp.path()).unwrap().is_empty());
        assert!(read_permits(temp.path()).unwrap().is_empty());
    }

    #[test]
    fn test_read_write_procedures() {
        let temp = TempDir::new().unwrap();
        write_procedure(temp.path(), &make_procedure("PR-2025-045")).unwrap();
        write_procedure(temp.path(), &make_procedure("PR-2025-017")).unwrap();
        fs::write(get_procedures_dir(temp.path()).join("notes.txt"), "ignored").unwrap();

        let procedures = read_procedures(temp.path()).unwrap();
        let codes: Vec<_> = procedures.iter().map(|p| p.code.as_str()).collect();
        assert_eq!(codes, vec!["PR-2025-017", "PR-2025-045"]);
    }

    #[test]
    fn test_session_lifecycle() {
        let temp = TempDir::new().unwrap();
        assert!(read_session(temp.path()).unwrap().is_none());

        let session = Session {
            user: User {
                id: "2".to_string(),
                email: "agent@cadastre.dz".to_string(),
                name: "Fatima Benaissa".to_string(),
                role: UserRole::CadastreAgent,
                entity_id: None,
            },
            started_at: utc_day(2025, 1, 20),
        };
        write_session(temp.path(), &session).unwrap();
        assert_eq!(read_session(temp.path()).unwrap(), Some(session));

        assert!(remove_session(temp.path()).unwrap());
        assert!(!remove_session(temp.path()).unwrap());
    }
}
