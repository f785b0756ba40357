//! Step pipelines and the procedure status machine
//!
//! Steps follow a linear pipeline per procedure type:
//! verification_dossier → empietement_check → rapport_police → avis_wali → soumission_comite
//!
//! Procedure statuses: en_cours → {terminee, rejetee, suspendue}, suspendue → en_cours.

use crate::schemas::{Config, Procedure, ProcedureStatus, ProcedureType, StepType};

/// The canonical ordering of approval steps.
///
/// Used for every procedure type the configuration does not override.
pub const CANONICAL_PIPELINE: &[StepType] = &[
    StepType::DossierCheck,
    StepType::EncroachmentCheck,
    StepType::PoliceReport,
    StepType::WaliOpinion,
    StepType::CommitteeSubmission,
];

/// Expected steps for a procedure type under `config`.
pub fn pipeline_for(config: &Config, procedure_type: ProcedureType) -> &[StepType] {
    config
        .pipelines
        .get(&procedure_type)
        .map(Vec::as_slice)
        .unwrap_or(CANONICAL_PIPELINE)
}

/// Whether the pipeline ends in a committee adjudication
pub fn requires_committee(pipeline: &[StepType]) -> bool {
    pipeline.contains(&StepType::CommitteeSubmission)
}

/// First pipeline step type the procedure has no step for yet.
///
/// Returns None once every expected step has been opened.
pub fn next_missing_step(procedure: &Procedure, pipeline: &[StepType]) -> Option<StepType> {
    pipeline
        .iter()
        .copied()
        .find(|t| !procedure.steps.iter().any(|s| s.step_type == *t))
}

/// Returns the statuses a procedure may move to from `current`.
///
/// Completed and rejected procedures are final.
pub fn get_allowed_next_statuses(current: ProcedureStatus) -> Vec<ProcedureStatus> {
    match current {
        ProcedureStatus::InProgress => vec![
            ProcedureStatus::Completed,
            ProcedureStatus::Rejected,
            ProcedureStatus::Suspended,
        ],
        ProcedureStatus::Suspended => vec![ProcedureStatus::InProgress],
        ProcedureStatus::Completed | ProcedureStatus::Rejected => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{date, utc_day, Step};

    #[test]
    fn test_canonical_pipeline_order() {
        assert_eq!(CANONICAL_PIPELINE.len(), 5);
        assert_eq!(CANONICAL_PIPELINE[0], StepType::DossierCheck);
        assert_eq!(CANONICAL_PIPELINE[1], StepType::EncroachmentCheck);
        assert_eq!(CANONICAL_PIPELINE[2], StepType::PoliceReport);
        assert_eq!(CANONICAL_PIPELINE[3], StepType::WaliOpinion);
        assert_eq!(CANONICAL_PIPELINE[4], StepType::CommitteeSubmission);
    }

    #[test]
    fn test_pipeline_for_falls_back_to_canonical() {
        let config = Config::default();
        for t in ProcedureType::ALL {
            assert_eq!(pipeline_for(&config, *t), CANONICAL_PIPELINE);
        }
    }

    #[test]
    fn test_pipeline_for_uses_configured_override() {
        let mut config = Config::default();
        config.pipelines.insert(
            ProcedureType::Renewal,
            vec![StepType::DossierCheck, StepType::CommitteeSubmission],
        );

        assert_eq!(pipeline_for(&config, ProcedureType::Renewal).len(), 2);
        assert_eq!(pipeline_for(&config, ProcedureType::Transfer), CANONICAL_PIPELINE);
    }

    #[test]
    fn test_requires_committee() {
        assert!(requires_committee(CANONICAL_PIPELINE));
        assert!(!requires_committee(&[StepType::DossierCheck, StepType::PoliceReport]));
    }

    #[test]
    fn test_next_missing_step() {
        let mut procedure = Procedure::new(
            "1".to_string(),
            "PR-2025-017".to_string(),
            ProcedureType::Substitution,
            "1".to_string(),
            date(2025, 1, 10),
        );
        assert_eq!(next_missing_step(&procedure, CANONICAL_PIPELINE), Some(StepType::DossierCheck));

        for (i, t) in CANONICAL_PIPELINE.iter().take(3).enumerate() {
            procedure.steps.push(Step::new(i.to_string(), "1".to_string(), *t, utc_day(2025, 1, 10)));
        }
        assert_eq!(next_missing_step(&procedure, CANONICAL_PIPELINE), Some(StepType::WaliOpinion));
        assert_eq!(next_missing_step(&procedure, &CANONICAL_PIPELINE[..3]), None);
    }

    #[test]
    fn test_allowed_next_statuses() {
        assert_eq!(get_allowed_next_statuses(ProcedureStatus::InProgress).len(), 3);
        assert_eq!(
            get_allowed_next_statuses(ProcedureStatus::Suspended),
            vec![ProcedureStatus::InProgress]
        );
        assert!(get_allowed_next_statuses(ProcedureStatus::Completed).is_empty());
    }
}
