//! Validation rules for workflow transitions and permit invariants

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::schemas::{
    DecisionType, PerimeterPoint, Procedure, ProcedureStatus, StepStatus, StepType,
};

use super::states::{get_allowed_next_statuses, requires_committee};

/// Minimum number of vertices of a closed perimeter
pub const MIN_PERIMETER_POINTS: usize = 3;

/// Facts about a procedure that status transitions are validated against
#[derive(Debug, Clone, Default)]
pub struct ValidationContext {
    /// Every pipeline step type has a completed step
    pub all_steps_completed: bool,

    /// At least one step was rejected
    pub any_step_rejected: bool,

    /// The pipeline ends in a committee adjudication
    pub requires_committee: bool,

    /// The authoritative committee decision, if any
    pub decision: Option<DecisionType>,
}

impl ValidationContext {
    /// Collect the transition-relevant facts of `procedure` under `pipeline`
    pub fn from_procedure(procedure: &Procedure, pipeline: &[StepType]) -> Self {
        ValidationContext {
            all_steps_completed: all_steps_completed(procedure, pipeline),
            any_step_rejected: any_step_rejected(procedure),
            requires_committee: requires_committee(pipeline),
            decision: procedure.authoritative_decision().map(|d| d.decision),
        }
    }
}

/// Result of a validation check
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the validation passed
    pub valid: bool,

    /// Reason for failure (if valid is false)
    pub reason: Option<String>,
}

impl ValidationResult {
    /// Create a successful validation result
    pub fn success() -> Self {
        ValidationResult {
            valid: true,
            reason: None,
        }
    }

    /// Create a failed validation result
    pub fn failure(reason: impl Into<String>) -> Self {
        ValidationResult {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// Check that every expected step type has a completed step.
///
/// An empty pipeline never counts as completed.
pub fn all_steps_completed(procedure: &Procedure, pipeline: &[StepType]) -> bool {
    if pipeline.is_empty() {
        return false;
    }
    pipeline.iter().all(|t| {
        procedure
            .steps
            .iter()
            .any(|s| s.step_type == *t && s.status == StepStatus::Completed)
    })
}

/// Check if any step of the procedure was rejected
pub fn any_step_rejected(procedure: &Procedure) -> bool {
    procedure
        .steps
        .iter()
        .any(|s| s.status == StepStatus::Rejected)
}

/// Validate entering the "terminee" status
pub fn can_enter_completed(ctx: &ValidationContext) -> ValidationResult {
    if !ctx.all_steps_completed {
        return ValidationResult::failure("not all pipeline steps are completed");
    }
    if ctx.requires_committee && ctx.decision != Some(DecisionType::Approved) {
        return ValidationResult::failure("committee approval is missing");
    }
    ValidationResult::success()
}

/// Validate entering the "rejetee" status
pub fn can_enter_rejected(ctx: &ValidationContext) -> ValidationResult {
    if ctx.any_step_rejected || ctx.decision == Some(DecisionType::Rejected) {
        return ValidationResult::success();
    }
    ValidationResult::failure("no step or committee decision was rejected")
}

/// Validate a procedure status transition
pub fn validate_transition(
    current: ProcedureStatus,
    target: ProcedureStatus,
    ctx: &ValidationContext,
) -> ValidationResult {
    let allowed = get_allowed_next_statuses(current);
    if !allowed.contains(&target) {
        return ValidationResult::failure(format!(
            "cannot transition from {} to {}",
            current, target
        ));
    }

    match target {
        ProcedureStatus::Completed => can_enter_completed(ctx),
        ProcedureStatus::Rejected => can_enter_rejected(ctx),
        // Administrative acts, independent of step state
        ProcedureStatus::Suspended | ProcedureStatus::InProgress => ValidationResult::success(),
    }
}

/// Validate that an agent may resolve the given step
pub fn can_resolve_step(procedure: &Procedure, step_id: &str) -> ValidationResult {
    if !procedure.is_in_progress() {
        return ValidationResult::failure(format!(
            "procedure {} is {}, not en_cours",
            procedure.code, procedure.status
        ));
    }
    let step = match procedure.step(step_id) {
        Some(step) => step,
        None => {
            return ValidationResult::failure(format!(
                "procedure {} has no step {}",
                procedure.code, step_id
            ))
        }
    };
    if !step.is_pending() {
        return ValidationResult::failure(format!(
            "step {} is already {}",
            step_id, step.status
        ));
    }
    if step.step_type == StepType::CommitteeSubmission {
        return ValidationResult::failure(
            "the committee submission step is resolved by a committee decision",
        );
    }
    ValidationResult::success()
}

/// Validate a permit perimeter: at least 3 points, each order index used once
pub fn validate_perimeter(points: &[PerimeterPoint]) -> ValidationResult {
    if points.len() < MIN_PERIMETER_POINTS {
        return ValidationResult::failure(format!(
            "a perimeter needs at least {} points, found {}",
            MIN_PERIMETER_POINTS,
            points.len()
        ));
    }
    let mut seen = HashSet::new();
    for point in points {
        if !seen.insert(point.order) {
            return ValidationResult::failure(format!(
                "perimeter order {} is used more than once",
                point.order
            ));
        }
    }
    ValidationResult::success()
}

/// Validate that a permit expires strictly after it is issued
pub fn validate_permit_dates(issued_on: NaiveDate, expires_on: NaiveDate) -> ValidationResult {
    if expires_on <= issued_on {
        return ValidationResult::failure(format!(
            "expiration {} is not after issuance {}",
            expires_on, issued_on
        ));
    }
    ValidationResult::success()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CANONICAL_PIPELINE;
    use crate::schemas::{date, utc_day, CommitteeDecision, ProcedureType, Step};

    fn make_procedure(statuses: &[StepStatus]) -> Procedure {
        let mut procedure = Procedure::new(
            "1".to_string(),
            "PR-2025-017".to_string(),
            ProcedureType::Substitution,
            "1".to_string(),
            date(2025, 1, 10),
        );
        for (i, status) in statuses.iter().enumerate() {
            procedure.steps.push(
                Step::new((i + 1).to_string(), "1".to_string(), CANONICAL_PIPELINE[i], utc_day(2025, 1, 10))
                    .resolved(*status, utc_day(2025, 1, 11)),
            );
        }
        procedure
    }

    fn with_decision(procedure: Procedure, decision: DecisionType) -> Procedure {
        procedure.with_decision(CommitteeDecision {
            id: "1".to_string(),
            procedure_id: "1".to_string(),
            decision,
            decided_at: utc_day(2025, 2, 1),
            member_id: "3".to_string(),
            comment: None,
            note: None,
        })
    }

    fn point(order: u32) -> PerimeterPoint {
        PerimeterPoint {
            id: order.to_string(),
            permit_id: "1".to_string(),
            x: 34.52,
            y: 1.34,
            z: 0.0,
            order,
        }
    }

    #[test]
    fn test_all_steps_completed() {
        assert!(!all_steps_completed(&make_procedure(&[]), CANONICAL_PIPELINE));
        assert!(!all_steps_completed(
            &make_procedure(&[StepStatus::Completed, StepStatus::Pending]),
            CANONICAL_PIPELINE
        ));
        assert!(all_steps_completed(&make_procedure(&[StepStatus::Completed; 5]), CANONICAL_PIPELINE));
        assert!(all_steps_completed(
            &make_procedure(&[StepStatus::Completed, StepStatus::Completed]),
            &CANONICAL_PIPELINE[..2]
        ));
    }

    #[test]
    fn test_all_steps_completed_empty_pipeline() {
        assert!(!all_steps_completed(&make_procedure(&[StepStatus::Completed]), &[]));
    }

    #[test]
    fn test_any_step_rejected() {
        assert!(!any_step_rejected(&make_procedure(&[StepStatus::Completed])));
        assert!(any_step_rejected(&make_procedure(&[StepStatus::Completed, StepStatus::Rejected])));
    }

    #[test]
    fn test_can_enter_completed_requires_committee_approval() {
        let steps_done = make_procedure(&[StepStatus::Completed; 5]);
        let ctx = ValidationContext::from_procedure(&steps_done, CANONICAL_PIPELINE);
        let result = can_enter_completed(&ctx);
        assert!(!result.valid);
        assert!(result.reason.unwrap().contains("committee"));

        let approved = with_decision(steps_done, DecisionType::Approved);
        let ctx = ValidationContext::from_procedure(&approved, CANONICAL_PIPELINE);
        assert!(can_enter_completed(&ctx).valid);
    }

    #[test]
    fn test_can_enter_completed_without_committee_in_pipeline() {
        let p = make_procedure(&[StepStatus::Completed, StepStatus::Completed]);
        let ctx = ValidationContext::from_procedure(&p, &CANONICAL_PIPELINE[..2]);
        assert!(can_enter_completed(&ctx).valid);
    }

    #[test]
    fn test_can_enter_rejected() {
        let ctx = ValidationContext::from_procedure(&make_procedure(&[StepStatus::Completed]), CANONICAL_PIPELINE);
        assert!(!can_enter_rejected(&ctx).valid);

        let ctx = ValidationContext::from_procedure(&make_procedure(&[StepStatus::Rejected]), CANONICAL_PIPELINE);
        assert!(can_enter_rejected(&ctx).valid);

        let rejected = with_decision(make_procedure(&[]), DecisionType::Rejected);
        let ctx = ValidationContext::from_procedure(&rejected, CANONICAL_PIPELINE);
        assert!(can_enter_rejected(&ctx).valid);
    }

    #[test]
    fn test_validate_transition_from_terminal() {
        let ctx = ValidationContext::default();
        let result = validate_transition(ProcedureStatus::Completed, ProcedureStatus::InProgress, &ctx);
        assert!(!result.valid);
        assert!(result.reason.unwrap().contains("cannot transition"));
    }

    #[test]
    fn test_validate_transition_suspend_is_unconditional() {
        let ctx = ValidationContext::default();
        assert!(validate_transition(ProcedureStatus::InProgress, ProcedureStatus::Suspended, &ctx).valid);
        assert!(validate_transition(ProcedureStatus::Suspended, ProcedureStatus::InProgress, &ctx).valid);
        assert!(!validate_transition(ProcedureStatus::Suspended, ProcedureStatus::Completed, &ctx).valid);
    }

    #[test]
    fn test_can_resolve_step() {
        let p = make_procedure(&[StepStatus::Completed, StepStatus::Pending]);
        assert!(can_resolve_step(&p, "2").valid);
        assert!(!can_resolve_step(&p, "1").valid);
        assert!(!can_resolve_step(&p, "9").valid);

        let suspended = p.with_status(ProcedureStatus::Suspended);
        let result = can_resolve_step(&suspended, "2");
        assert!(!result.valid);
        assert!(result.reason.unwrap().contains("suspendue"));
    }

    #[test]
    fn test_can_resolve_step_refuses_committee_submission() {
        let mut statuses = vec![StepStatus::Completed; 4];
        statuses.push(StepStatus::Pending);
        let p = make_procedure(&statuses);
        let result = can_resolve_step(&p, "5");
        assert!(!result.valid);
        assert!(result.reason.unwrap().contains("committee decision"));
    }

    #[test]
    fn test_validate_perimeter() {
        assert!(!validate_perimeter(&[point(1), point(2)]).valid);
        assert!(validate_perimeter(&[point(1), point(2), point(3)]).valid);

        let result = validate_perimeter(&[point(1), point(2), point(2)]);
        assert!(!result.valid);
        assert!(result.reason.unwrap().contains("order 2"));
    }

    #[test]
    fn test_validate_permit_dates() {
        assert!(validate_permit_dates(date(2025, 1, 1), date(2030, 1, 1)).valid);
        assert!(!validate_permit_dates(date(2025, 1, 1), date(2025, 1, 1)).valid);
        assert!(!validate_permit_dates(date(2025, 1, 1), date(2024, 1, 1)).valid);
    }
}
