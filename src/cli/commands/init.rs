//! Init command - Create a data store filled with demo data

use std::path::Path;

use crate::errors::Result;
use crate::fs::resolve_cwd;
use crate::store::{seed::seed_dataset, Store};

/// Create `.cadastre/` in the working directory
pub async fn run(cwd: Option<&Path>, force: bool) -> Result<()> {
    let root = resolve_cwd(cwd);
    let store = Store::create(&root, seed_dataset(), force)?;

    println!("Initialized cadastre store in {}", store.root().display());
    println!(
        "  {} users, {} entities, {} permits, {} procedures",
        store.dataset.users.len(),
        store.dataset.entities.len(),
        store.dataset.permits.len(),
        store.dataset.procedures.len()
    );
    println!("\nLog in with one of the demo accounts, e.g.:");
    println!("  cadastre login admin@mines.dz {}", store.config.demo_password);
    Ok(())
}
