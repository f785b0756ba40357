//! Login, logout and whoami - Session management

use std::path::Path;

use crate::auth::navigation;
use crate::errors::Result;
use crate::fs::{find_store_root, remove_session, resolve_cwd, write_session};
use crate::store::CadastreService;

use super::open;

/// Authenticate and save the session
pub async fn run(cwd: Option<&Path>, email: &str, password: &str) -> Result<()> {
    let root = find_store_root(&resolve_cwd(cwd))?;
    let service = CadastreService::open(&root)?;
    let session = service.authenticate(email, password).await?;
    write_session(&root, &session)?;

    println!(
        "Logged in as {} ({})",
        session.user.name,
        session.role().label()
    );
    Ok(())
}

/// Delete the saved session
pub async fn logout(cwd: Option<&Path>) -> Result<()> {
    let root = find_store_root(&resolve_cwd(cwd))?;
    if remove_session(&root)? {
        tracing::info!("Logged out");
        println!("Logged out.");
    } else {
        println!("No active session.");
    }
    Ok(())
}

/// Show the session's user and menu
pub async fn whoami(cwd: Option<&Path>) -> Result<()> {
    let session = open(cwd).await?.session;

    println!("{} <{}>", session.user.name, session.user.email);
    println!("Role: {}", session.role().label());
    println!(
        "Since: {}",
        session.started_at.format("%d/%m/%Y %H:%M")
    );
    println!("\nMenu:");
    for item in navigation(session.role()) {
        println!("  {:<24} {}", item.label, item.page);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CadastreError;
    use crate::fs::read_session;
    use crate::store::{seed::seed_dataset, Store};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_login_logout_cycle() {
        let temp = TempDir::new().unwrap();
        Store::create(temp.path(), seed_dataset(), false).unwrap();

        let err = whoami(Some(temp.path())).await.unwrap_err();
        assert!(matches!(err, CadastreError::Unauthenticated));

        run(Some(temp.path()), "AGENT@cadastre.dz", "password").await.unwrap();
        let session = read_session(temp.path()).unwrap().unwrap();
        assert_eq!(session.user.id, "2");
        whoami(Some(temp.path())).await.unwrap();

        logout(Some(temp.path())).await.unwrap();
        assert!(read_session(temp.path()).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_login_keeps_no_session() {
        let temp = TempDir::new().unwrap();
        Store::create(temp.path(), seed_dataset(), false).unwrap();

        let err = run(Some(temp.path()), "admin@mines.dz", "wrong").await.unwrap_err();
        assert!(matches!(err, CadastreError::AuthenticationFailed));
        assert!(read_session(temp.path()).unwrap().is_none());
    }
}
