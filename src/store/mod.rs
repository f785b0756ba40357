//! File-backed data store
//!
//! Reference data (users, entities, substances) lives in one file per
//! collection; permits and procedures are aggregates with one file each, so
//! every mutation rewrites exactly the aggregates it touches.

pub mod seed;
mod service;

use std::path::{Path, PathBuf};

use crate::errors::{CadastreError, Result};
use crate::fs;
use crate::schemas::{Config, Dataset, Permit, Procedure};

pub use service::{CadastreService, DocumentRow};

/// Order records by numeric id, falling back to the raw id
fn sort_by_id<T>(records: &mut [T], id: impl Fn(&T) -> &str) {
    records.sort_by(|a, b| {
        let (a, b) = (id(a), id(b));
        match (a.parse::<u64>(), b.parse::<u64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            _ => a.cmp(b),
        }
    });
}

/// The loaded data set and the directory it came from
#[derive(Debug, Clone)]
pub struct Store {
    root: PathBuf,
    pub config: Config,
    pub dataset: Dataset,
}

impl Store {
    /// Load every file of the store at `root`
    pub fn load(root: &Path) -> Result<Self> {
        let config = crate::config::load_config(root)?;
        let mut dataset = Dataset {
            users: fs::read_users(root)?,
            entities: fs::read_entities(root)?,
            substances: fs::read_substances(root)?,
            permits: fs::read_permits(root)?,
            procedures: fs::read_procedures(root)?,
        };
        sort_by_id(&mut dataset.permits, |p| p.id.as_str());
        sort_by_id(&mut dataset.procedures, |p| p.id.as_str());

        tracing::debug!(
            root = %root.display(),
            permits = dataset.permits.len(),
            procedures = dataset.procedures.len(),
            "Loaded store"
        );

        Ok(Store {
            root: root.to_path_buf(),
            config,
            dataset,
        })
    }

    /// Find the store above `cwd` and load it
    pub fn open(cwd: &Path) -> Result<Self> {
        let root = fs::find_store_root(cwd)?;
        Store::load(&root)
    }

    /// Write a fresh store at `root` holding `dataset` and the default config.
    ///
    /// Refuses to overwrite an existing store unless `force` is set; a forced
    /// init replaces the permit and procedure files as well.
    pub fn create(root: &Path, dataset: Dataset, force: bool) -> Result<Self> {
        let dir = fs::get_store_dir(root);
        if dir.exists() {
            if !force {
                return Err(CadastreError::ConfigError(format!(
                    "{} already exists; use --force to reinitialize",
                    dir.display()
                )));
            }
            for stale in [fs::get_permits_dir(root), fs::get_procedures_dir(root)] {
                if stale.exists() {
                    std::fs::remove_dir_all(&stale)?;
                }
            }
            fs::remove_session(root)?;
        }

        let store = Store {
            root: root.to_path_buf(),
            config: Config::default(),
            dataset,
        };
        store.save_all()?;
        tracing::info!(root = %root.display(), "Initialized store");
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn save_all(&self) -> Result<()> {
        fs::write_config(&self.root, &self.config)?;
        fs::write_users(&self.root, &self.dataset.users)?;
        fs::write_entities(&self.root, &self.dataset.entities)?;
        fs::write_substances(&self.root, &self.dataset.substances)?;
        for permit in &self.dataset.permits {
            fs::write_permit(&self.root, permit)?;
        }
        for procedure in &self.dataset.procedures {
            fs::write_procedure(&self.root, procedure)?;
        }
        Ok(())
    }

    /// Persist `procedure`, then replace (or add) it in memory.
    ///
    /// A failed write leaves the in-memory data untouched.
    pub fn commit_procedure(&mut self, procedure: Procedure) -> Result<()> {
        fs::write_procedure(&self.root, &procedure)?;
        tracing::debug!(code = %procedure.code, status = %procedure.status, "Saved procedure");
        match self
            .dataset
            .procedures
            .iter_mut()
            .find(|p| p.id == procedure.id)
        {
            Some(existing) => *existing = procedure,
            None => self.dataset.procedures.push(procedure),
        }
        Ok(())
    }

    /// Persist a procedure together with the permit it was granted, then
    /// update both in memory.
    ///
    /// The procedure file is written first. If the permit write fails, the
    /// previous procedure file is restored and memory is left untouched, so a
    /// retry cannot issue a second permit.
    pub fn commit_issuance(&mut self, procedure: Procedure, permit: Permit) -> Result<()> {
        let previous = self
            .dataset
            .procedures
            .iter()
            .find(|p| p.id == procedure.id)
            .cloned();

        fs::write_procedure(&self.root, &procedure)?;
        if let Err(e) = fs::write_permit(&self.root, &permit) {
            let restored = match &previous {
                Some(previous) => fs::write_procedure(&self.root, previous),
                None => std::fs::remove_file(fs::get_procedure_path(&self.root, &procedure.code))
                    .map_err(CadastreError::from),
            };
            if let Err(rollback) = restored {
                tracing::error!(
                    code = %procedure.code,
                    error = %rollback,
                    "Failed to restore procedure after permit write failure"
                );
            }
            return Err(e);
        }
        tracing::debug!(code = %procedure.code, permit = %permit.code, "Saved issuance");

        self.dataset.permits.push(permit);
        match self
            .dataset
            .procedures
            .iter_mut()
            .find(|p| p.id == procedure.id)
        {
            Some(existing) => *existing = procedure,
            None => self.dataset.procedures.push(procedure),
        }
        Ok(())
    }
}
