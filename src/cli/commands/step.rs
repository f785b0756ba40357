//! Step command - Record an agent's outcome on a pending step

use std::path::Path;

use crate::domain::{current_step, StepOutcome};
use crate::errors::Result;

use super::{open, parse_value};

pub async fn run(
    cwd: Option<&Path>,
    procedure: &str,
    step_id: &str,
    outcome: &str,
    comment: Option<String>,
) -> Result<()> {
    let ctx = open(cwd).await?;
    let outcome: StepOutcome = parse_value(outcome)?;

    let next = ctx
        .service
        .update_step(&ctx.session, procedure, step_id, outcome, comment)
        .await?;
    println!(
        "{}: step {} recorded, procedure {} - {}",
        next.code,
        step_id,
        next.status.label(),
        current_step(&next).label()
    );
    Ok(())
}
