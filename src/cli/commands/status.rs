//! Suspend and resume - Administrative status changes

use std::path::Path;

use crate::errors::Result;

use super::open;

pub async fn suspend(cwd: Option<&Path>, procedure: &str) -> Result<()> {
    let ctx = open(cwd).await?;
    let next = ctx.service.suspend_procedure(&ctx.session, procedure).await?;
    println!("{}: {}", next.code, next.status.label());
    Ok(())
}

pub async fn resume(cwd: Option<&Path>, procedure: &str) -> Result<()> {
    let ctx = open(cwd).await?;
    let next = ctx.service.resume_procedure(&ctx.session, procedure).await?;
    println!("{}: {}", next.code, next.status.label());
    Ok(())
}
