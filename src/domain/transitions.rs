//! State transition logic
//!
//! Pure functions: every transition takes the current procedure by reference
//! and returns the next one, leaving the input untouched.

use chrono::{DateTime, Utc};

use crate::schemas::{Procedure, ProcedureStatus, Step, StepStatus, StepType};

use super::codes::next_id;
use super::states::next_missing_step;
use super::validation::{can_resolve_step, validate_transition, ValidationContext};

/// Result of a state transition attempt
#[derive(Debug)]
pub enum TransitionResult {
    /// Successful transition with the new procedure state
    Success {
        /// The procedure after the transition
        next_procedure: Procedure,
    },
    /// Failed transition with error message
    Error {
        /// Description of why the transition failed
        error: String,
    },
}

impl TransitionResult {
    /// Check if the transition failed
    pub fn is_error(&self) -> bool {
        matches!(self, TransitionResult::Error { .. })
    }

    /// Get the next procedure if the transition was successful
    pub fn procedure(self) -> Option<Procedure> {
        match self {
            TransitionResult::Success { next_procedure } => Some(next_procedure),
            TransitionResult::Error { .. } => None,
        }
    }

    /// Get the error message if the transition failed
    pub fn error(self) -> Option<String> {
        match self {
            TransitionResult::Success { .. } => None,
            TransitionResult::Error { error } => Some(error),
        }
    }

    fn failure(error: impl Into<String>) -> Self {
        TransitionResult::Error {
            error: error.into(),
        }
    }
}

/// Outcome an agent records on a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Approve,
    Reject,
}

impl StepOutcome {
    pub fn status(&self) -> StepStatus {
        match self {
            StepOutcome::Approve => StepStatus::Completed,
            StepOutcome::Reject => StepStatus::Rejected,
        }
    }
}

impl std::str::FromStr for StepOutcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "approve" | "terminee" => Ok(StepOutcome::Approve),
            "reject" | "rejetee" => Ok(StepOutcome::Reject),
            _ => Err(format!("Unknown step outcome: {} (expected approve or reject)", s)),
        }
    }
}

/// An agent's action on one step
#[derive(Debug, Clone)]
pub struct StepUpdate {
    pub outcome: StepOutcome,
    pub comment: Option<String>,
    pub agent_id: Option<String>,
}

/// Status the procedure's steps and decisions call for.
///
/// Only an in-progress procedure moves on its own: rejection wins over
/// completion, and anything short of either stays `en_cours`. Suspended and
/// terminal procedures keep their status.
pub fn derive_status(procedure: &Procedure, pipeline: &[StepType]) -> ProcedureStatus {
    let current = procedure.status;
    if current != ProcedureStatus::InProgress {
        return current;
    }

    let ctx = ValidationContext::from_procedure(procedure, pipeline);
    if validate_transition(current, ProcedureStatus::Rejected, &ctx).valid {
        ProcedureStatus::Rejected
    } else if validate_transition(current, ProcedureStatus::Completed, &ctx).valid {
        ProcedureStatus::Completed
    } else {
        ProcedureStatus::InProgress
    }
}

/// Bring a procedure to rest after a change: re-derive its status and, if it
/// is still in progress with nothing pending, open the next expected step.
pub fn settle(procedure: Procedure, pipeline: &[StepType], now: DateTime<Utc>) -> Procedure {
    let status = derive_status(&procedure, pipeline);
    let procedure = procedure.with_status(status);

    if !procedure.is_in_progress() || procedure.first_pending_step().is_some() {
        return procedure;
    }

    match next_missing_step(&procedure, pipeline) {
        Some(step_type) => {
            let id = next_id(procedure.steps.iter().map(|s| s.id.as_str()));
            let step = Step::new(id, procedure.id.clone(), step_type, now);
            procedure.with_step(step)
        }
        None => procedure,
    }
}

/// Record an agent's outcome on a pending step.
///
/// Stamps `ended_at = now`, then settles the procedure: a rejection rejects
/// it, an approval opens the next pipeline step or completes it.
pub fn apply_step_outcome(
    procedure: &Procedure,
    step_id: &str,
    update: &StepUpdate,
    pipeline: &[StepType],
    now: DateTime<Utc>,
) -> TransitionResult {
    let validation = can_resolve_step(procedure, step_id);
    if !validation.valid {
        return TransitionResult::failure(
            validation
                .reason
                .unwrap_or_else(|| "Step validation failed".to_string()),
        );
    }

    let step = match procedure.step(step_id) {
        Some(step) => step
            .clone()
            .resolved(update.outcome.status(), now)
            .with_comment(update.comment.clone())
            .with_agent(update.agent_id.clone().or_else(|| step.agent_id.clone())),
        None => return TransitionResult::failure(format!("unknown step {}", step_id)),
    };

    let next_procedure = settle(procedure.clone().with_step(step), pipeline, now);
    TransitionResult::Success { next_procedure }
}

/// Apply an administrative status change (suspend or resume).
///
/// Resuming settles the procedure again, since steps may have been resolved
/// while it was suspended.
pub fn apply_status_transition(
    procedure: &Procedure,
    target: ProcedureStatus,
    pipeline: &[StepType],
    now: DateTime<Utc>,
) -> TransitionResult {
    let ctx = ValidationContext::from_procedure(procedure, pipeline);
    let validation = validate_transition(procedure.status, target, &ctx);
    if !validation.valid {
        return TransitionResult::failure(
            validation
                .reason
                .unwrap_or_else(|| "Transition validation failed".to_string()),
        );
    }

    let next_procedure = procedure.clone().with_status(target);
    let next_procedure = if target == ProcedureStatus::InProgress {
        settle(next_procedure, pipeline, now)
    } else {
        next_procedure
    };
    TransitionResult::Success { next_procedure }
}
