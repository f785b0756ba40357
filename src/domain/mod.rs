//! Domain logic for the procedure workflow, its gates and the data invariants

mod codes;
mod committee;
mod documents;
mod integrity;
mod progress;
mod states;
mod transitions;
mod validation;


pub use codes::{
    is_valid_permit_code, is_valid_procedure_code, next_code, next_id, PERMIT_CODE_PREFIX,
    PROCEDURE_CODE_PREFIX,
};
pub use committee::{
    needs_committee_decision, pending_queue, record_decision, DecisionResult, DecisionSubmission,
};
pub use documents::{
    missing_documents, review_document, tally, DocumentTally, REQUIRED_APPLICATION_DOCUMENTS,
};
pub use integrity::{check_integrity, IntegrityIssue};
pub use progress::{current_step, progress_percentage, CurrentStep};
pub use states::{
    get_allowed_next_statuses, next_missing_step, pipeline_for, requires_committee,
    CANONICAL_PIPELINE,
};
pub use transitions::{
    apply_status_transition, apply_step_outcome, derive_status, settle, StepOutcome, StepUpdate,
    TransitionResult,
};
pub use validation::{
    all_steps_completed, any_step_rejected, can_enter_completed, can_enter_rejected,
    can_resolve_step, validate_perimeter, validate_permit_dates, validate_transition,
    ValidationContext, ValidationResult, MIN_PERIMETER_POINTS,
};
