//! Procedures and procedure - List and show procedures

use std::path::Path;

use crate::auth::Page;
use crate::cli::display;
use crate::errors::Result;
use crate::search::{text_criterion, ProcedureFilter};

use super::{open, parse_option, require_page};

/// List the procedures visible to the session
pub async fn run(
    cwd: Option<&Path>,
    code: Option<String>,
    procedure_type: Option<&str>,
    status: Option<&str>,
    entity: Option<String>,
    json: bool,
) -> Result<()> {
    let ctx = open(cwd).await?;
    require_page(&ctx.session, &[Page::Procedures])?;

    let filter = ProcedureFilter {
        code: text_criterion(code),
        procedure_type: parse_option(procedure_type)?,
        status: parse_option(status)?,
        entity: text_criterion(entity),
    };
    let procedures = ctx.service.procedures(&ctx.session, &filter).await;

    if json {
        return display::print_json(&procedures);
    }
    let entities = ctx.service.entities(&ctx.session).await;
    let config = ctx.service.config().await;
    display::print_procedures(&procedures, &entities, &config);
    Ok(())
}

/// Show one procedure with its steps, documents and decisions
pub async fn show(cwd: Option<&Path>, code: &str, json: bool) -> Result<()> {
    let ctx = open(cwd).await?;
    require_page(&ctx.session, &[Page::ProcedureDetail])?;

    let procedure = ctx.service.procedure(&ctx.session, code).await?;
    if json {
        return display::print_json(&procedure);
    }
    let entities = ctx.service.entities(&ctx.session).await;
    let config = ctx.service.config().await;
    display::print_procedure(&procedure, &entities, &config);
    Ok(())
}
