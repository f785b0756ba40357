//! Progress and current-step derivation for display

use crate::schemas::{Procedure, ProcedureStatus, StepType};

/// Share of the pipeline completed, in percent, clamped to [0, 100].
///
/// Counts completed steps against the number of expected steps, so with the
/// canonical pipeline a procedure with 2 completed steps is at 40%.
pub fn progress_percentage(procedure: &Procedure, pipeline: &[StepType]) -> f64 {
    if pipeline.is_empty() {
        return 0.0;
    }
    let completed = procedure.completed_step_count() as f64;
    (completed / pipeline.len() as f64 * 100.0).clamp(0.0, 100.0)
}

/// What a procedure is currently waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentStep {
    /// The first pending step in stored order
    Step(StepType),
    /// No pending step and the procedure is completed
    Finished,
    /// No pending step, procedure not completed
    Waiting,
}

impl CurrentStep {
    pub fn label(&self) -> &'static str {
        match self {
            CurrentStep::Step(step_type) => step_type.label(),
            CurrentStep::Finished => "Terminée",
            CurrentStep::Waiting => "En attente",
        }
    }
}

/// First-match resolution of the current step. List order is the only precedence.
pub fn current_step(procedure: &Procedure) -> CurrentStep {
    match procedure.first_pending_step() {
        Some(step) => CurrentStep::Step(step.step_type),
        None if procedure.status == ProcedureStatus::Completed => CurrentStep::Finished,
        None => CurrentStep::Waiting,
    }
}
