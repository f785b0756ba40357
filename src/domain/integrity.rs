//! Dataset-wide integrity checks
//!
//! Reports records that break the data model's invariants. Nothing is
//! repaired here; `cadastre check` prints the issues.

use std::collections::HashMap;

use crate::schemas::{Dataset, ProcedureType};

use super::codes::{is_valid_permit_code, is_valid_procedure_code};
use super::validation::{validate_perimeter, validate_permit_dates};

/// One broken invariant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegrityIssue {
    /// Record the issue was found on, e.g. `permit PM-2025-001`
    pub subject: String,
    pub message: String,
}

impl IntegrityIssue {
    fn new(subject: impl Into<String>, message: impl Into<String>) -> Self {
        IntegrityIssue {
            subject: subject.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for IntegrityIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.subject, self.message)
    }
}

/// Check every collection of `dataset`; an empty result means the data is sound
pub fn check_integrity(dataset: &Dataset) -> Vec<IntegrityIssue> {
    let mut issues = Vec::new();

    let mut registry: HashMap<&str, &str> = HashMap::new();
    for entity in &dataset.entities {
        if let Some(first) = registry.insert(entity.registry_number.as_str(), entity.id.as_str()) {
            issues.push(IntegrityIssue::new(
                format!("entity {}", entity.id),
                format!(
                    "registry number {} already used by entity {}",
                    entity.registry_number, first
                ),
            ));
        }
    }

    for user in &dataset.users {
        let subject = format!("user {}", user.email);
        match (&user.entity_id, user.is_operator()) {
            (None, true) => issues.push(IntegrityIssue::new(subject, "operator has no entity")),
            (Some(id), true) if dataset.entity(id).is_none() => {
                issues.push(IntegrityIssue::new(subject, format!("unknown entity {}", id)))
            }
            (Some(_), false) => issues.push(IntegrityIssue::new(
                subject,
                "only operators are attached to an entity",
            )),
            _ => {}
        }
    }

    for permit in &dataset.permits {
        let subject = format!("permit {}", permit.code);
        if !is_valid_permit_code(&permit.code) {
            issues.push(IntegrityIssue::new(&subject, "code does not match PM-YYYY-NNN"));
        }
        if dataset.entity(&permit.entity_id).is_none() {
            issues.push(IntegrityIssue::new(
                &subject,
                format!("unknown entity {}", permit.entity_id),
            ));
        }
        if let Some(reason) = validate_permit_dates(permit.issued_on, permit.expires_on).reason {
            issues.push(IntegrityIssue::new(&subject, reason));
        }
        // An empty perimeter is allowed for permits captured without coordinates
        if !permit.perimeter.is_empty() {
            if let Some(reason) = validate_perimeter(&permit.perimeter).reason {
                issues.push(IntegrityIssue::new(&subject, reason));
            }
        }
        for link in &permit.substances {
            if dataset.substance(&link.substance_id).is_none() {
                issues.push(IntegrityIssue::new(
                    &subject,
                    format!("unknown substance {}", link.substance_id),
                ));
            }
        }
    }

    for procedure in &dataset.procedures {
        let subject = format!("procedure {}", procedure.code);
        if !is_valid_procedure_code(&procedure.code) {
            issues.push(IntegrityIssue::new(&subject, "code does not match PR-YYYY-NNN"));
        }
        if dataset.entity(&procedure.entity_id).is_none() {
            issues.push(IntegrityIssue::new(
                &subject,
                format!("unknown entity {}", procedure.entity_id),
            ));
        }

        let is_application = procedure.procedure_type == ProcedureType::Application;
        match &procedure.permit_id {
            None if !is_application => {
                issues.push(IntegrityIssue::new(&subject, "no permit linked"))
            }
            Some(id) if dataset.permit(id).is_none() => {
                issues.push(IntegrityIssue::new(&subject, format!("unknown permit {}", id)))
            }
            // A completed application is linked to the permit it produced
            Some(_) if is_application && !procedure.status.is_terminal() => issues.push(
                IntegrityIssue::new(&subject, "an open application cannot be linked to a permit"),
            ),
            _ => {}
        }

        for step in &procedure.steps {
            if !step.is_consistent() {
                let ended = if step.ended_at.is_some() { "set" } else { "missing" };
                issues.push(IntegrityIssue::new(
                    &subject,
                    format!("step {} is {} but ended_at is {}", step.id, step.status, ended),
                ));
            }
        }
        for id in &procedure.requested_substances {
            if dataset.substance(id).is_none() {
                issues.push(IntegrityIssue::new(&subject, format!("unknown substance {}", id)));
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::{
        date, utc_day, LegalEntity, PerimeterPoint, Permit, Procedure, Step, StepStatus, StepType,
        User, UserRole,
    };

    fn entity(id: &str, registry: &str) -> LegalEntity {
        LegalEntity {
            id: id.to_string(),
            legal_name: format!("Entity {}", id),
            legal_form: "SARL".to_string(),
            registry_number: registry.to_string(),
            address: "Rue 1, Alger".to_string(),
            email: "contact@example.dz".to_string(),
            phone: "+213 21 00 00 00".to_string(),
            legal_representative: "A. B.".to_string(),
            created_on: date(2020, 1, 1),
        }
    }

    fn permit(code: &str, points: u32) -> Permit {
        Permit {
            id: "1".to_string(),
            code: code.to_string(),
            entity_id: "1".to_string(),
            administrative_status: None,
            issued_on: date(2025, 1, 1),
            expires_on: date(2030, 1, 1),
            perimeter: (1..=points)
                .map(|order| PerimeterPoint {
                    id: order.to_string(),
                    permit_id: "1".to_string(),
                    x: 34.0,
                    y: 1.0,
                    z: 0.0,
                    order,
                })
                .collect(),
            substances: Vec::new(),
        }
    }

    fn sound_dataset() -> Dataset {
        Dataset {
            entities: vec![entity("1", "RC-001")],
            permits: vec![permit("PM-2025-001", 4)],
            ..Dataset::default()
        }
    }

    #[test]
    fn test_sound_dataset_has_no_issues() {
        assert!(check_integrity(&sound_dataset()).is_empty());
    }

    #[test]
    fn test_duplicate_registry_number() {
        let mut dataset = sound_dataset();
        dataset.entities.push(entity("2", "RC-001"));
        let issues = check_integrity(&dataset);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("RC-001"));
    }

    #[test]
    fn test_bad_permit() {
        let mut dataset = sound_dataset();
        let mut bad = permit("PM-25-1", 2);
        bad.expires_on = bad.issued_on;
        dataset.permits = vec![bad];

        let issues = check_integrity(&dataset);
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().all(|i| i.subject == "permit PM-25-1"));
    }

    #[test]
    fn test_procedure_links() {
        let mut dataset = sound_dataset();
        dataset.procedures.push(Procedure::new(
            "1".to_string(),
            "PR-2025-017".to_string(),
            ProcedureType::Substitution,
            "1".to_string(),
            date(2025, 1, 10),
        ));
        dataset.procedures.push(
            Procedure::new(
                "2".to_string(),
                "PR-2025-018".to_string(),
                ProcedureType::Application,
                "1".to_string(),
                date(2025, 1, 10),
            )
            .with_permit(Some("1".to_string())),
        );

        let issues = check_integrity(&dataset);
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].message, "no permit linked");
        assert!(issues[1].message.contains("open application"));
    }

    #[test]
    fn test_inconsistent_step() {
        let mut dataset = sound_dataset();
        let mut step = Step::new("1".to_string(), "1".to_string(), StepType::DossierCheck, utc_day(2025, 1, 10));
        step.status = StepStatus::Completed;
        dataset.procedures.push(
            Procedure::new(
                "1".to_string(),
                "PR-2025-017".to_string(),
                ProcedureType::Substitution,
                "1".to_string(),
                date(2025, 1, 10),
            )
            .with_permit(Some("1".to_string()))
            .with_step(step),
        );

        let issues = check_integrity(&dataset);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].to_string().contains("ended_at is missing"));
    }

    #[test]
    fn test_operator_without_entity() {
        let mut dataset = sound_dataset();
        dataset.users.push(User {
            id: "4".to_string(),
            email: "operateur@minex.dz".to_string(),
            name: "Opérateur".to_string(),
            role: UserRole::Operator,
            entity_id: None,
        });
        let issues = check_integrity(&dataset);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "operator has no entity");
    }
}
