//! Permits and permit - List and show permits

use std::path::Path;

use chrono::Utc;

use crate::auth::Page;
use crate::cli::display;
use crate::errors::Result;
use crate::search::{text_criterion, PermitFilter};

use super::{open, parse_date, parse_option, require_page};

/// Raw `permits` arguments, as typed
#[derive(Debug, Clone, Default)]
pub struct PermitArgs {
    pub code: Option<String>,
    pub entity: Option<String>,
    pub substance: Option<String>,
    pub status: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl PermitArgs {
    fn into_filter(self) -> Result<PermitFilter> {
        Ok(PermitFilter {
            code: text_criterion(self.code),
            entity: text_criterion(self.entity),
            substance: text_criterion(self.substance),
            status: parse_option(self.status.as_deref())?,
            issued_from: parse_date(self.from.as_deref())?,
            issued_to: parse_date(self.to.as_deref())?,
        })
    }
}

/// List the permits visible to the session
pub async fn run(cwd: Option<&Path>, args: PermitArgs, json: bool) -> Result<()> {
    let ctx = open(cwd).await?;
    require_page(&ctx.session, &[Page::Permits, Page::MyPermits])?;

    let filter = args.into_filter()?;
    let permits = ctx.service.permits(&ctx.session, &filter).await;

    if json {
        return display::print_json(&permits);
    }
    let entities = ctx.service.entities(&ctx.session).await;
    display::print_permits(&permits, &entities, Utc::now().date_naive());
    Ok(())
}

/// Show one permit with its perimeter, substances and procedures
pub async fn show(cwd: Option<&Path>, code: &str, json: bool) -> Result<()> {
    let ctx = open(cwd).await?;
    require_page(&ctx.session, &[Page::PermitDetail])?;

    let permit = ctx.service.permit(&ctx.session, code).await?;
    if json {
        return display::print_json(&permit);
    }

    let entities = ctx.service.entities(&ctx.session).await;
    let substances = ctx.service.substances().await;
    let procedures = ctx.service.procedures_for_permit(&ctx.session, &permit.id).await;
    display::print_permit(
        &permit,
        &entities,
        &substances,
        &procedures,
        Utc::now().date_naive(),
    );
    Ok(())
}
