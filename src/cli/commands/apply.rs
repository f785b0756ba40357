//! Apply command - Submit a new permit application

use std::path::Path;

use crate::application::ApplicationDraft;
use crate::domain::current_step;
use crate::errors::Result;
use crate::fs::read_json;

use super::open;

/// Submit the application draft stored in `file` (JSON)
pub async fn run(cwd: Option<&Path>, file: &Path) -> Result<()> {
    let ctx = open(cwd).await?;
    let draft: ApplicationDraft = read_json(file)?;

    let procedure = ctx.service.submit_application(&ctx.session, &draft).await?;
    println!("Application submitted: {}", procedure.code);
    println!("  Documents: {}", procedure.documents.len());
    println!("  Next step: {}", current_step(&procedure).label());
    Ok(())
}
