//! CLI command implementations
//!
//! Every command except `init` and `login` runs against the store found at or
//! above the working directory, on behalf of the session saved by `login`.

pub mod apply;
pub mod check;
pub mod committee;
pub mod documents;
pub mod init;
pub mod login;
pub mod permits;
pub mod procedures;
pub mod reference;
pub mod stats;
pub mod status;
pub mod step;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;

use crate::auth::{authorize, Access, Page, Session};
use crate::errors::{CadastreError, Result};
use crate::fs::{find_store_root, read_session, resolve_cwd};
use crate::store::CadastreService;

/// An opened store and the session acting on it
pub(crate) struct Context {
    pub root: PathBuf,
    pub service: CadastreService,
    pub session: Session,
}

/// Open the store above `cwd` and load the saved session
pub(crate) async fn open(cwd: Option<&Path>) -> Result<Context> {
    let root = find_store_root(&resolve_cwd(cwd))?;
    let saved = read_session(&root)?.ok_or(CadastreError::Unauthenticated)?;
    let service = CadastreService::open(&root)?;
    let session = service.resume_session(&saved).await?;
    tracing::debug!(user = %session.user.email, root = %root.display(), "Opened session");
    Ok(Context {
        root,
        service,
        session,
    })
}

/// Fail with `Forbidden` unless the session may open one of `pages`
pub(crate) fn require_page(session: &Session, pages: &[Page]) -> Result<()> {
    if pages
        .iter()
        .any(|page| authorize(Some(session), *page) == Access::Granted)
    {
        return Ok(());
    }
    let names: Vec<&str> = pages.iter().map(|p| p.path()).collect();
    Err(CadastreError::Forbidden(format!(
        "{} may not open {}",
        session.role().label(),
        names.join(" or ")
    )))
}

/// Parse a vocabulary argument; `""` and `"all"` mean no criterion
pub(crate) fn parse_option<T>(value: Option<&str>) -> Result<Option<T>>
where
    T: FromStr<Err = String>,
{
    crate::search::parse_criterion(value).map_err(CadastreError::Validation)
}

/// Parse a required vocabulary argument
pub(crate) fn parse_value<T>(value: &str) -> Result<T>
where
    T: FromStr<Err = String>,
{
    value.trim().parse().map_err(CadastreError::Validation)
}

/// Parse a `YYYY-MM-DD` date argument
pub(crate) fn parse_date(value: Option<&str>) -> Result<Option<NaiveDate>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(v) => NaiveDate::parse_from_str(v, "%Y-%m-%d")
            .map(Some)
            .map_err(|e| CadastreError::Validation(format!("invalid date {}: {}", v, e))),
    }
}
