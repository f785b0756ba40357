//! New permit applications: the staged draft, its gates, and issuance
//!
//! A draft walks through entity → perimeter → substances → documents →
//! confirmation. Submitting a complete draft opens a `demande` procedure;
//! once that procedure is `terminee` a permit is issued from it.

use chrono::{DateTime, Datelike, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    missing_documents, next_code, next_id, settle, ValidationResult, MIN_PERIMETER_POINTS,
    PERMIT_CODE_PREFIX, PROCEDURE_CODE_PREFIX, REQUIRED_APPLICATION_DOCUMENTS,
};
use crate::errors::{CadastreError, Result};
use crate::schemas::{
    Coordinate, Dataset, Document, DocumentType, PerimeterPoint, Permit, PermitSubstance,
    Procedure, ProcedureStatus, ProcedureType, StepType,
};

/// Stage of the application wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStage {
    Entity,
    Perimeter,
    Substances,
    Documents,
    Confirmation,
}

impl WizardStage {
    pub const ALL: &'static [WizardStage] = &[
        WizardStage::Entity,
        WizardStage::Perimeter,
        WizardStage::Substances,
        WizardStage::Documents,
        WizardStage::Confirmation,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            WizardStage::Entity => "Entité morale",
            WizardStage::Perimeter => "Périmètre",
            WizardStage::Substances => "Substances",
            WizardStage::Documents => "Documents",
            WizardStage::Confirmation => "Confirmation",
        }
    }

    /// 1-based position, as shown in "Étape 2 sur 5"
    pub fn number(&self) -> usize {
        WizardStage::ALL
            .iter()
            .position(|s| s == self)
            .map_or(0, |i| i + 1)
    }
}

/// A document attached to a draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftDocument {
    pub doc_type: DocumentType,
    pub name: String,
    pub file_path: String,
}

/// Everything the applicant fills in, as read from an `apply` file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApplicationDraft {
    #[serde(default)]
    pub entity_id: String,

    #[serde(default)]
    pub coordinates: Vec<Coordinate>,

    #[serde(default)]
    pub substance_ids: Vec<String>,

    #[serde(default)]
    pub documents: Vec<DraftDocument>,
}

/// Check the gate of one stage. Confirmation has no gate of its own.
pub fn validate_stage(
    draft: &ApplicationDraft,
    stage: WizardStage,
    dataset: &Dataset,
) -> ValidationResult {
    match stage {
        WizardStage::Entity => {
            if draft.entity_id.trim().is_empty() {
                ValidationResult::failure("select the applying entity")
            } else if dataset.entity(&draft.entity_id).is_none() {
                ValidationResult::failure(format!("unknown entity {}", draft.entity_id))
            } else {
                ValidationResult::success()
            }
        }
        WizardStage::Perimeter => {
            if draft.coordinates.len() < MIN_PERIMETER_POINTS {
                ValidationResult::failure(format!(
                    "a perimeter needs at least {} points, found {}",
                    MIN_PERIMETER_POINTS,
                    draft.coordinates.len()
                ))
            } else {
                ValidationResult::success()
            }
        }
        WizardStage::Substances => {
            if draft.substance_ids.is_empty() {
                return ValidationResult::failure("select at least one substance");
            }
            match draft
                .substance_ids
                .iter()
                .find(|id| dataset.substance(id).is_none())
            {
                Some(id) => ValidationResult::failure(format!("unknown substance {}", id)),
                None => ValidationResult::success(),
            }
        }
        WizardStage::Documents => {
            let missing = missing_documents(
                draft.documents.iter().map(|d| &d.doc_type),
                REQUIRED_APPLICATION_DOCUMENTS,
            );
            if missing.is_empty() {
                ValidationResult::success()
            } else {
                let labels: Vec<&str> = missing.iter().map(|t| t.label()).collect();
                ValidationResult::failure(format!("missing documents: {}", labels.join(", ")))
            }
        }
        WizardStage::Confirmation => ValidationResult::success(),
    }
}

/// The first stage whose gate fails, with the reason
pub fn first_blocking_stage(
    draft: &ApplicationDraft,
    dataset: &Dataset,
) -> Option<(WizardStage, String)> {
    WizardStage::ALL.iter().find_map(|stage| {
        let result = validate_stage(draft, *stage, dataset);
        match result.reason {
            Some(reason) if !result.valid => Some((*stage, reason)),
            _ => None,
        }
    })
}

/// Build the `demande` procedure for a validated draft.
///
/// The procedure is `en_cours` with no permit, carries the draft's documents
/// as `en_attente`, and has the first pipeline step opened.
pub fn build_application(
    draft: &ApplicationDraft,
    dataset: &Dataset,
    pipeline: &[StepType],
    now: DateTime<Utc>,
) -> Procedure {
    let id = next_id(dataset.procedures.iter().map(|p| p.id.as_str()));
    let code = next_code(
        PROCEDURE_CODE_PREFIX,
        now.year(),
        dataset.procedures.iter().map(|p| p.code.as_str()),
    );

    let mut procedure = Procedure::new(
        id.clone(),
        code,
        ProcedureType::Application,
        draft.entity_id.clone(),
        now.date_naive(),
    );
    procedure.requested_perimeter = draft.coordinates.clone();
    for substance_id in &draft.substance_ids {
        if !procedure.requested_substances.contains(substance_id) {
            procedure.requested_substances.push(substance_id.clone());
        }
    }
    for (i, doc) in draft.documents.iter().enumerate() {
        procedure.documents.push(Document::new(
            (i + 1).to_string(),
            id.clone(),
            doc.doc_type,
            doc.name.clone(),
            doc.file_path.clone(),
            now,
        ));
    }

    settle(procedure, pipeline, now)
}

/// Issue the permit a completed application grants.
///
/// Returns None unless `procedure` is a `terminee` `demande` with no permit yet.
/// A validity the calendar cannot represent is a transition error.
pub fn issue_permit(
    procedure: &Procedure,
    dataset: &Dataset,
    validity_years: u32,
    today: NaiveDate,
) -> Result<Option<Permit>> {
    if procedure.procedure_type != ProcedureType::Application
        || procedure.status != ProcedureStatus::Completed
        || procedure.permit_id.is_some()
    {
        return Ok(None);
    }

    let id = next_id(dataset.permits.iter().map(|p| p.id.as_str()));
    let code = next_code(
        PERMIT_CODE_PREFIX,
        today.year(),
        dataset.permits.iter().map(|p| p.code.as_str()),
    );
    let months = validity_years.max(1).saturating_mul(12);
    let expires_on = today.checked_add_months(Months::new(months)).ok_or_else(|| {
        CadastreError::StateTransition(format!(
            "cannot issue a permit for {}: a validity of {} years runs past the calendar",
            procedure.code, validity_years
        ))
    })?;

    let perimeter = procedure
        .requested_perimeter
        .iter()
        .enumerate()
        .map(|(i, c)| PerimeterPoint {
            id: (i + 1).to_string(),
            permit_id: id.clone(),
            x: c.x,
            y: c.y,
            z: c.z,
            order: i as u32 + 1,
        })
        .collect();
    let substances = procedure
        .requested_substances
        .iter()
        .enumerate()
        .map(|(i, substance_id)| PermitSubstance {
            id: (i + 1).to_string(),
            permit_id: id.clone(),
            substance_id: substance_id.clone(),
            added_on: today,
        })
        .collect();

    Ok(Some(Permit {
        id,
        code,
        entity_id: procedure.entity_id.clone(),
        administrative_status: None,
        issued_on: today,
        expires_on,
        perimeter,
        substances,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CANONICAL_PIPELINE;
    use crate::schemas::{date, utc_day, DocumentStatus, StepStatus};
    use crate::store::seed::seed_dataset;

    fn doc(doc_type: DocumentType) -> DraftDocument {
        DraftDocument {
            doc_type,
            name: format!("{}.pdf", doc_type),
            file_path: format!("/uploads/{}.pdf", doc_type),
        }
    }

    fn complete_draft() -> ApplicationDraft {
        ApplicationDraft {
            entity_id: "3".to_string(),
            coordinates: vec![
                Coordinate { x: 36.36, y: 6.61, z: 0.0 },
                Coordinate { x: 36.37, y: 6.61, z: 0.0 },
                Coordinate { x: 36.37, y: 6.62, z: 0.0 },
            ],
            substance_ids: vec!["2".to_string(), "4".to_string(), "2".to_string()],
            documents: REQUIRED_APPLICATION_DOCUMENTS.iter().map(|t| doc(*t)).collect(),
        }
    }

    #[test]
    fn test_stage_numbers() {
        assert_eq!(WizardStage::Entity.number(), 1);
        assert_eq!(WizardStage::Confirmation.number(), 5);
    }

    #[test]
    fn test_complete_draft_passes_every_stage() {
        let dataset = seed_dataset();
        assert_eq!(first_blocking_stage(&complete_draft(), &dataset), None);
    }

    #[test]
    fn test_first_blocking_stage() {
        let dataset = seed_dataset();

        let blank = ApplicationDraft::default();
        assert_eq!(first_blocking_stage(&blank, &dataset).unwrap().0, WizardStage::Entity);

        let mut draft = complete_draft();
        draft.coordinates.truncate(2);
        let (stage, reason) = first_blocking_stage(&draft, &dataset).unwrap();
        assert_eq!(stage, WizardStage::Perimeter);
        assert!(reason.contains("at least 3"));

        let mut draft = complete_draft();
        draft.substance_ids = vec!["99".to_string()];
        assert_eq!(first_blocking_stage(&draft, &dataset).unwrap().0, WizardStage::Substances);

        let mut draft = complete_draft();
        draft.documents.retain(|d| d.doc_type != DocumentType::CadastralMap);
        let (stage, reason) = first_blocking_stage(&draft, &dataset).unwrap();
        assert_eq!(stage, WizardStage::Documents);
        assert!(reason.contains("Carte cadastrale"));
    }

    #[test]
    fn test_build_application() {
        let dataset = seed_dataset();
        let now = utc_day(2025, 3, 1);
        let procedure = build_application(&complete_draft(), &dataset, CANONICAL_PIPELINE, now);

        assert_eq!(procedure.id, "4");
        assert_eq!(procedure.code, "PR-2025-046");
        assert_eq!(procedure.procedure_type, ProcedureType::Application);
        assert_eq!(procedure.status, ProcedureStatus::InProgress);
        assert_eq!(procedure.permit_id, None);
        assert_eq!(procedure.created_on, date(2025, 3, 1));
        assert_eq!(procedure.requested_substances, vec!["2", "4"]);
        assert_eq!(procedure.documents.len(), 4);
        assert!(procedure.documents.iter().all(|d| d.status == DocumentStatus::Pending));

        assert_eq!(procedure.steps.len(), 1);
        assert_eq!(procedure.steps[0].step_type, StepType::DossierCheck);
        assert_eq!(procedure.steps[0].status, StepStatus::Pending);
    }

    #[test]
    fn test_issue_permit_from_completed_application() {
        let dataset = seed_dataset();
        let procedure = build_application(&complete_draft(), &dataset, CANONICAL_PIPELINE, utc_day(2025, 3, 1));
        assert!(issue_permit(&procedure, &dataset, 5, date(2025, 9, 1)).unwrap().is_none());

        let completed = procedure.with_status(ProcedureStatus::Completed);
        let permit = issue_permit(&completed, &dataset, 5, date(2025, 9, 1)).unwrap().unwrap();

        assert_eq!(permit.id, "4");
        assert_eq!(permit.code, "PM-2025-002");
        assert_eq!(permit.entity_id, "3");
        assert_eq!(permit.issued_on, date(2025, 9, 1));
        assert_eq!(permit.expires_on, date(2030, 9, 1));
        assert_eq!(permit.perimeter.len(), 3);
        assert_eq!(permit.ordered_perimeter()[2].order, 3);
        assert_eq!(permit.substance_ids().collect::<Vec<_>>(), vec!["2", "4"]);

        let linked = completed.with_permit(Some(permit.id.clone()));
        assert!(issue_permit(&linked, &dataset, 5, date(2025, 9, 1)).unwrap().is_none());
    }

    #[test]
    fn test_issue_permit_rejects_unrepresentable_validity() {
        let dataset = seed_dataset();
        let completed = build_application(&complete_draft(), &dataset, CANONICAL_PIPELINE, utc_day(2025, 3, 1))
            .with_status(ProcedureStatus::Completed);

        let err = issue_permit(&completed, &dataset, u32::MAX, date(2025, 9, 1)).unwrap_err();
        assert!(matches!(err, CadastreError::StateTransition(_)));
        assert!(err.to_string().contains("runs past the calendar"));
    }
}
