//! Demo data written by `cadastre init`

use crate::schemas::{
    date, utc_day, CommitteeDecision, Dataset, DecisionType, Document, DocumentStatus,
    DocumentType, LegalEntity, PerimeterPoint, Permit, PermitSubstance, Procedure,
    ProcedureStatus, ProcedureType, Step, StepStatus, StepType, Substance, User, UserRole,
};

fn user(id: &str, email: &str, name: &str, role: UserRole, entity_id: Option<&str>) -> User {
    User {
        id: id.to_string(),
        email: email.to_string(),
        name: name.to_string(),
        role,
        entity_id: entity_id.map(str::to_string),
    }
}

#[allow(clippy::too_many_arguments)]
fn entity(
    id: &str,
    legal_name: &str,
    legal_form: &str,
    registry_number: &str,
    address: &str,
    email: &str,
    phone: &str,
    representative: &str,
    created_on: chrono::NaiveDate,
) -> LegalEntity {
    LegalEntity {
        id: id.to_string(),
        legal_name: legal_name.to_string(),
        legal_form: legal_form.to_string(),
        registry_number: registry_number.to_string(),
        address: address.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        legal_representative: representative.to_string(),
        created_on,
    }
}

fn substance(id: &str, name: &str, symbol: &str, family: &str) -> Substance {
    Substance {
        id: id.to_string(),
        name: name.to_string(),
        symbol: symbol.to_string(),
        family: family.to_string(),
    }
}

/// Rectangle of four vertices, numbered from `first_id`
fn perimeter(permit_id: &str, first_id: u32, corners: [(f64, f64); 4]) -> Vec<PerimeterPoint> {
    corners
        .iter()
        .zip(0u32..)
        .map(|(&(x, y), i)| PerimeterPoint {
            id: (first_id + i).to_string(),
            permit_id: permit_id.to_string(),
            x,
            y,
            z: 0.0,
            order: i + 1,
        })
        .collect()
}

fn link(id: &str, permit_id: &str, substance_id: &str, added_on: chrono::NaiveDate) -> PermitSubstance {
    PermitSubstance {
        id: id.to_string(),
        permit_id: permit_id.to_string(),
        substance_id: substance_id.to_string(),
        added_on,
    }
}

fn users() -> Vec<User> {
    vec![
        user("1", "admin@mines.dz", "Ahmed Bencheikh", UserRole::Administrator, None),
        user("2", "agent@cadastre.dz", "Fatima Benaissa", UserRole::CadastreAgent, None),
        user("3", "comite@mines.dz", "Mohamed Zitouni", UserRole::CommitteeMember, None),
        user("4", "contact@minexalgeria.com", "Jean Dubois", UserRole::Operator, Some("1")),
    ]
}

fn entities() -> Vec<LegalEntity> {
    vec![
        entity(
            "1",
            "MINEX ALGERIA SARL",
            "SARL",
            "2023B0145789",
            "Zone Industrielle, Alger",
            "contact@minexalgeria.com",
            "+213 21 45 67 89",
            "Jean Dubois",
            date(2023, 1, 15),
        ),
        entity(
            "2",
            "GOLD MINES CORPORATION",
            "SPA",
            "2022B0234567",
            "Rue des Mines, Oran",
            "info@goldmines.dz",
            "+213 41 23 45 67",
            "Sarah Johnson",
            date(2022, 3, 10),
        ),
        entity(
            "3",
            "COPPER EXTRACTION SARL",
            "SARL",
            "2024B0098765",
            "Boulevard Minier, Constantine",
            "direction@copperext.dz",
            "+213 31 87 65 43",
            "Karim Mansouri",
            date(2024, 2, 20),
        ),
    ]
}

fn substances() -> Vec<Substance> {
    vec![
        substance("1", "Or", "Au", "Métaux précieux"),
        substance("2", "Cuivre", "Cu", "Métaux de base"),
        substance("3", "Argent", "Ag", "Métaux précieux"),
        substance("4", "Zinc", "Zn", "Métaux de base"),
        substance("5", "Plomb", "Pb", "Métaux de base"),
        substance("6", "Fer", "Fe", "Métaux ferreux"),
        substance("7", "Phosphate", "PO4", "Minéraux industriels"),
        substance("8", "Calcaire", "CaCO3", "Matériaux de construction"),
    ]
}

fn permits() -> Vec<Permit> {
    vec![
        Permit {
            id: "1".to_string(),
            code: "PM-2025-001".to_string(),
            entity_id: "1".to_string(),
            administrative_status: None,
            issued_on: date(2025, 1, 1),
            expires_on: date(2030, 1, 1),
            perimeter: perimeter("1", 1, [(34.52, 1.34), (34.53, 1.34), (34.53, 1.35), (34.52, 1.35)]),
            substances: vec![
                link("1", "1", "1", date(2025, 1, 1)),
                link("2", "1", "2", date(2025, 1, 1)),
            ],
        },
        Permit {
            id: "2".to_string(),
            code: "PM-2024-028".to_string(),
            entity_id: "2".to_string(),
            administrative_status: None,
            issued_on: date(2024, 12, 15),
            expires_on: date(2029, 12, 15),
            perimeter: perimeter("2", 5, [(35.12, 2.15), (35.14, 2.15), (35.14, 2.18), (35.12, 2.18)]),
            substances: vec![link("3", "2", "3", date(2024, 12, 15))],
        },
        Permit {
            id: "3".to_string(),
            code: "PM-2024-015".to_string(),
            entity_id: "3".to_string(),
            administrative_status: None,
            issued_on: date(2024, 11, 10),
            expires_on: date(2024, 12, 10),
            perimeter: Vec::new(),
            substances: vec![link("4", "3", "4", date(2024, 11, 10))],
        },
    ]
}

fn substitution_procedure() -> Procedure {
    let step = |id: &str, step_type, start: u32, end: Option<u32>, comment: Option<&str>| {
        let status = if end.is_some() {
            StepStatus::Completed
        } else {
            StepStatus::Pending
        };
        Step::new(id.to_string(), "1".to_string(), step_type, utc_day(2025, 1, start))
            .resolved(status, utc_day(2025, 1, end.unwrap_or(start)))
            .with_comment(comment.map(str::to_string))
            .with_agent(Some("2".to_string()))
    };
    let document = |id: &str, doc_type, name: &str, path: &str, status| {
        Document::new(
            id.to_string(),
            "1".to_string(),
            doc_type,
            name.to_string(),
            path.to_string(),
            utc_day(2025, 1, 10),
        )
        .reviewed(status, None)
    };

    let mut procedure = Procedure::new(
        "1".to_string(),
        "PR-2025-017".to_string(),
        ProcedureType::Substitution,
        "1".to_string(),
        date(2025, 1, 10),
    )
    .with_permit(Some("1".to_string()));

    procedure.steps = vec![
        step(
            "1",
            StepType::DossierCheck,
            10,
            Some(12),
            Some("Dossier complet, tous les documents requis sont présents"),
        ),
        step("2", StepType::EncroachmentCheck, 12, Some(14), Some("Aucun empietement détecté")),
        step("3", StepType::PoliceReport, 14, None, None),
    ];
    procedure.documents = vec![
        document(
            "1",
            DocumentType::TradeRegister,
            "RC_MINEX_ALGERIA.pdf",
            "/documents/rc_minex.pdf",
            DocumentStatus::Valid,
        ),
        document(
            "2",
            DocumentType::Statutes,
            "Statuts_MINEX_2023.pdf",
            "/documents/statuts_minex.pdf",
            DocumentStatus::Valid,
        ),
        document(
            "3",
            DocumentType::TechnicalNote,
            "Note_Technique_Exploitation.pdf",
            "/documents/note_tech.pdf",
            DocumentStatus::Pending,
        ),
    ];
    procedure
}

fn procedures() -> Vec<Procedure> {
    let application = Procedure::new(
        "2".to_string(),
        "PR-2024-234".to_string(),
        ProcedureType::Application,
        "2".to_string(),
        date(2024, 12, 1),
    )
    .with_status(ProcedureStatus::Completed)
    .with_decision(CommitteeDecision {
        id: "1".to_string(),
        procedure_id: "2".to_string(),
        decision: DecisionType::Approved,
        decided_at: utc_day(2024, 12, 20),
        member_id: "3".to_string(),
        comment: Some("Dossier conforme aux exigences réglementaires".to_string()),
        note: Some("Attribution approuvée pour une durée de 5 ans".to_string()),
    });

    let renewal = Procedure::new(
        "3".to_string(),
        "PR-2025-045".to_string(),
        ProcedureType::Renewal,
        "2".to_string(),
        date(2025, 1, 15),
    )
    .with_permit(Some("2".to_string()));

    vec![substitution_procedure(), application, renewal]
}

/// The demo data set: four users (one per role), three entities, eight
/// substances, three permits and three procedures.
pub fn seed_dataset() -> Dataset {
    Dataset {
        users: users(),
        entities: entities(),
        substances: substances(),
        permits: permits(),
        procedures: procedures(),
    }
}
