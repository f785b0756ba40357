//! Committee decision gate
//!
//! A procedure waits for the committee while it is `en_cours` with a pending
//! `soumission_comite` step. A decision resolves that step and settles the
//! procedure.

use chrono::{DateTime, Utc};

use crate::schemas::{CommitteeDecision, DecisionType, Procedure, StepStatus, StepType};

use super::codes::next_id;
use super::transitions::settle;

/// Whether the procedure is in the committee's pending queue
pub fn needs_committee_decision(procedure: &Procedure) -> bool {
    procedure.is_in_progress()
        && procedure
            .steps
            .iter()
            .any(|s| s.step_type == StepType::CommitteeSubmission && s.is_pending())
}

/// Procedures awaiting a committee decision, in input order
pub fn pending_queue<'a>(
    procedures: impl IntoIterator<Item = &'a Procedure>,
) -> Vec<&'a Procedure> {
    procedures
        .into_iter()
        .filter(|p| needs_committee_decision(p))
        .collect()
}

/// A committee member's decision form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecisionSubmission {
    /// Required; `en_attente` is not a decision
    pub decision: Option<DecisionType>,
    pub comment: Option<String>,
    pub note: Option<String>,
}

impl DecisionSubmission {
    /// Blank comment and note are treated as absent
    pub fn new(decision: Option<DecisionType>, comment: Option<String>, note: Option<String>) -> Self {
        DecisionSubmission {
            decision,
            comment: non_blank(comment),
            note: non_blank(note),
        }
    }

    /// The decision value, if the form can be submitted
    pub fn validate(&self) -> Result<DecisionType, String> {
        match self.decision {
            Some(DecisionType::Pending) => {
                Err("en_attente is not a committee decision; choose approuve or rejete".to_string())
            }
            Some(decision) => Ok(decision),
            None => Err("a decision (approuve or rejete) is required".to_string()),
        }
    }

    fn matches(&self, record: &CommitteeDecision, member_id: &str) -> bool {
        self.decision == Some(record.decision)
            && record.member_id == member_id
            && self.comment == record.comment
            && self.note == record.note
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Result of a decision submission
#[derive(Debug)]
pub enum DecisionResult {
    /// A new record was appended
    Recorded {
        next_procedure: Procedure,
        decision: CommitteeDecision,
    },
    /// The same member already submitted this exact decision; nothing changed
    Duplicate { decision: CommitteeDecision },
    Error { error: String },
}

impl DecisionResult {
    pub fn is_error(&self) -> bool {
        matches!(self, DecisionResult::Error { .. })
    }
}

/// Record a committee decision on `procedure`.
///
/// Appends one time-stamped record, resolves the pending committee step
/// (terminee on approval, rejetee on rejection) and re-derives the procedure
/// status. Once the procedure has left the queue, an identical resubmission
/// by the same member returns the existing record.
pub fn record_decision(
    procedure: &Procedure,
    submission: &DecisionSubmission,
    member_id: &str,
    pipeline: &[StepType],
    now: DateTime<Utc>,
) -> DecisionResult {
    let value = match submission.validate() {
        Ok(value) => value,
        Err(error) => return DecisionResult::Error { error },
    };

    if !needs_committee_decision(procedure) {
        if let Some(existing) = procedure
            .decisions
            .iter()
            .find(|d| submission.matches(d, member_id))
        {
            return DecisionResult::Duplicate {
                decision: existing.clone(),
            };
        }
        return DecisionResult::Error {
            error: format!(
                "procedure {} is not awaiting a committee decision",
                procedure.code
            ),
        };
    }

    let step = procedure
        .steps
        .iter()
        .find(|s| s.step_type == StepType::CommitteeSubmission && s.is_pending())
        .cloned();
    let step = match step {
        Some(step) => {
            let status = if value == DecisionType::Approved {
                StepStatus::Completed
            } else {
                StepStatus::Rejected
            };
            step.resolved(status, now)
                .with_comment(submission.comment.clone())
                .with_agent(Some(member_id.to_string()))
        }
        None => {
            return DecisionResult::Error {
                error: format!("procedure {} has no pending committee step", procedure.code),
            }
        }
    };

    let decision = CommitteeDecision {
        id: next_id(procedure.decisions.iter().map(|d| d.id.as_str())),
        procedure_id: procedure.id.clone(),
        decision: value,
        decided_at: now,
        member_id: member_id.to_string(),
        comment: submission.comment.clone(),
        note: submission.note.clone(),
    };

    let next_procedure = settle(
        procedure
            .clone()
            .with_step(step)
            .with_decision(decision.clone()),
        pipeline,
        now,
    );

    DecisionResult::Recorded {
        next_procedure,
        decision,
    }
}
