//! Check command - Report records that break data invariants

use std::path::Path;

use crate::auth::Page;
use crate::cli::display;
use crate::errors::{CadastreError, Result};

use super::{open, require_page};

pub async fn run(cwd: Option<&Path>) -> Result<()> {
    let ctx = open(cwd).await?;
    require_page(&ctx.session, &[Page::Settings])?;

    let issues = ctx.service.check_integrity().await;
    tracing::info!(root = %ctx.root.display(), issues = issues.len(), "Checked store");
    display::print_issues(&issues);

    if issues.is_empty() {
        Ok(())
    } else {
        Err(CadastreError::SchemaValidation(format!(
            "{} integrity issue(s)",
            issues.len()
        )))
    }
}
