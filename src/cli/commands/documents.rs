//! Documents and validate-document - Document review

use std::path::Path;

use crate::auth::Page;
use crate::cli::display;
use crate::errors::Result;
use crate::schemas::DocumentStatus;
use crate::search::{text_criterion, DocumentFilter};

use super::{open, parse_option, parse_value, require_page};

/// List documents across the visible procedures, with review counts
pub async fn run(
    cwd: Option<&Path>,
    search: Option<String>,
    status: Option<&str>,
    doc_type: Option<&str>,
    entity: Option<String>,
    json: bool,
) -> Result<()> {
    let ctx = open(cwd).await?;
    require_page(&ctx.session, &[Page::DocumentValidation])?;

    let filter = DocumentFilter {
        search: text_criterion(search),
        status: parse_option(status)?,
        doc_type: parse_option(doc_type)?,
        entity: text_criterion(entity),
    };
    let rows = ctx.service.documents(&ctx.session, &filter).await;

    if json {
        return display::print_json(&rows);
    }
    display::print_documents(&rows);
    Ok(())
}

/// Mark a pending document `valide` or `rejete`
pub async fn validate(
    cwd: Option<&Path>,
    procedure: &str,
    document: &str,
    status: &str,
    comment: Option<String>,
) -> Result<()> {
    let ctx = open(cwd).await?;
    let status: DocumentStatus = parse_value(status)?;

    let reviewed = ctx
        .service
        .submit_document_validation(&ctx.session, procedure, document, status, comment)
        .await?;
    println!(
        "{} ({}): {}",
        reviewed.name,
        reviewed.doc_type.label(),
        reviewed.status.label()
    );
    Ok(())
}
