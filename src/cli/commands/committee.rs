//! Pending and decide - Committee review

use std::path::Path;

use crate::cli::display;
use crate::domain::DecisionSubmission;
use crate::errors::Result;
use crate::schemas::{DecisionType, ProcedureType};

use super::{open, parse_option};

/// List procedures waiting on the committee
pub async fn pending(cwd: Option<&Path>, json: bool) -> Result<()> {
    let ctx = open(cwd).await?;
    let queue = ctx.service.pending_committee_queue(&ctx.session).await?;

    if json {
        return display::print_json(&queue);
    }
    if queue.is_empty() {
        println!("No procedures awaiting a committee decision.");
        return Ok(());
    }
    let entities = ctx.service.entities(&ctx.session).await;
    let config = ctx.service.config().await;
    display::print_procedures(&queue, &entities, &config);
    Ok(())
}

/// Record a committee decision on a procedure
pub async fn decide(
    cwd: Option<&Path>,
    procedure: &str,
    decision: Option<&str>,
    comment: Option<String>,
    note: Option<String>,
) -> Result<()> {
    let ctx = open(cwd).await?;
    let decision: Option<DecisionType> = parse_option(decision)?;
    let submission = DecisionSubmission::new(decision, comment, note);

    let recorded = ctx
        .service
        .submit_committee_decision(&ctx.session, procedure, &submission)
        .await?;
    let next = ctx.service.procedure(&ctx.session, procedure).await?;

    println!(
        "{}: {} - procedure {}",
        next.code,
        recorded.decision.label(),
        next.status.label()
    );
    if next.procedure_type == ProcedureType::Application {
        if let Some(permit_id) = &next.permit_id {
            println!("Issued permit: {}", permit_id);
        }
    }
    Ok(())
}
