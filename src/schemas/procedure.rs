//! Procedure schema - the case being worked through the approval pipeline

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{CommitteeDecision, Coordinate, DecisionType, Document};

code_enum! {
    /// Kind of case a procedure handles
    pub enum ProcedureType {
        /// New permit application
        Application => "demande",
        Transfer => "transfert",
        Assignment => "cession",
        Renewal => "renouvellement",
        Substitution => "substitution",
        Merger => "fusion",
        PerimeterExtension => "extension_perimetre",
        SubstanceExtension => "extension_substance",
    }
}

impl ProcedureType {
    pub fn label(&self) -> &'static str {
        match self {
            ProcedureType::Application => "Nouvelle demande",
            ProcedureType::Transfer => "Transfert",
            ProcedureType::Assignment => "Cession",
            ProcedureType::Renewal => "Renouvellement",
            ProcedureType::Substitution => "Substitution",
            ProcedureType::Merger => "Fusion",
            ProcedureType::PerimeterExtension => "Extension périmètre",
            ProcedureType::SubstanceExtension => "Extension substance",
        }
    }

    /// Whether procedures of this type act on an existing permit
    pub fn requires_permit(&self) -> bool {
        *self != ProcedureType::Application
    }
}

code_enum! {
    /// Overall status of a procedure
    pub enum ProcedureStatus {
        InProgress => "en_cours",
        Completed => "terminee",
        Rejected => "rejetee",
        Suspended => "suspendue",
    }
}

impl ProcedureStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ProcedureStatus::InProgress => "En cours",
            ProcedureStatus::Completed => "Terminée",
            ProcedureStatus::Rejected => "Rejetée",
            ProcedureStatus::Suspended => "Suspendue",
        }
    }

    /// Completed and rejected procedures never change again
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcedureStatus::Completed | ProcedureStatus::Rejected)
    }
}

code_enum! {
    /// One stage of the approval pipeline
    pub enum StepType {
        DossierCheck => "verification_dossier",
        EncroachmentCheck => "empietement_check",
        PoliceReport => "rapport_police",
        WaliOpinion => "avis_wali",
        CommitteeSubmission => "soumission_comite",
    }
}

impl StepType {
    pub fn label(&self) -> &'static str {
        match self {
            StepType::DossierCheck => "Vérification dossier",
            StepType::EncroachmentCheck => "Vérification empietement",
            StepType::PoliceReport => "Rapport police",
            StepType::WaliOpinion => "Avis Wali",
            StepType::CommitteeSubmission => "Soumission comité",
        }
    }
}

code_enum! {
    pub enum StepStatus {
        Pending => "en_attente",
        Completed => "terminee",
        Rejected => "rejetee",
    }
}

impl StepStatus {
    pub fn label(&self) -> &'static str {
        match self {
            StepStatus::Pending => "En attente",
            StepStatus::Completed => "Terminée",
            StepStatus::Rejected => "Rejetée",
        }
    }
}

/// One stage of a procedure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub id: String,
    pub procedure_id: String,
    pub step_type: StepType,
    pub status: StepStatus,
    pub started_at: DateTime<Utc>,

    /// Set exactly when the step leaves `en_attente`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Agent in charge of the step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<String>,

    #[serde(default)]
    pub supporting_files: Vec<String>,
}

impl Step {
    /// Create a new pending step
    pub fn new(
        id: String,
        procedure_id: String,
        step_type: StepType,
        started_at: DateTime<Utc>,
    ) -> Self {
        Step {
            id,
            procedure_id,
            step_type,
            status: StepStatus::Pending,
            started_at,
            ended_at: None,
            comment: None,
            agent_id: None,
            supporting_files: Vec::new(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == StepStatus::Pending
    }

    pub fn is_completed(&self) -> bool {
        self.status == StepStatus::Completed
    }

    /// `ended_at` is present iff the step is no longer pending
    pub fn is_consistent(&self) -> bool {
        self.is_pending() == self.ended_at.is_none()
    }

    // ===== IMMUTABLE BUILDER METHODS =====

    /// Return a new Step resolved to `status` at `at`
    pub fn resolved(mut self, status: StepStatus, at: DateTime<Utc>) -> Self {
        self.status = status;
        self.ended_at = if status == StepStatus::Pending {
            None
        } else {
            Some(at)
        };
        self
    }

    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    pub fn with_agent(mut self, agent_id: Option<String>) -> Self {
        self.agent_id = agent_id;
        self
    }
}

/// A case instance acting on a permit or a legal entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Procedure {
    pub id: String,

    /// `PR-YYYY-NNN`
    pub code: String,

    pub procedure_type: ProcedureType,
    pub status: ProcedureStatus,
    pub created_on: NaiveDate,

    /// Permit acted upon. Absent for new applications until a permit is issued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permit_id: Option<String>,

    pub entity_id: String,

    #[serde(default)]
    pub steps: Vec<Step>,

    #[serde(default)]
    pub documents: Vec<Document>,

    #[serde(default)]
    pub decisions: Vec<CommitteeDecision>,

    /// Perimeter requested by a new application
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requested_perimeter: Vec<Coordinate>,

    /// Substance ids requested by a new application
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub requested_substances: Vec<String>,
}

impl Procedure {
    /// Create a new in-progress procedure with no steps
    pub fn new(
        id: String,
        code: String,
        procedure_type: ProcedureType,
        entity_id: String,
        created_on: NaiveDate,
    ) -> Self {
        Procedure {
            id,
            code,
            procedure_type,
            status: ProcedureStatus::InProgress,
            created_on,
            permit_id: None,
            entity_id,
            steps: Vec::new(),
            documents: Vec::new(),
            decisions: Vec::new(),
            requested_perimeter: Vec::new(),
            requested_substances: Vec::new(),
        }
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == ProcedureStatus::InProgress
    }

    pub fn step(&self, step_id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == step_id)
    }

    pub fn document(&self, document_id: &str) -> Option<&Document> {
        self.documents.iter().find(|d| d.id == document_id)
    }

    /// First pending step in stored order
    pub fn first_pending_step(&self) -> Option<&Step> {
        self.steps.iter().find(|s| s.is_pending())
    }

    pub fn completed_step_count(&self) -> usize {
        self.steps.iter().filter(|s| s.is_completed()).count()
    }

    /// The decision that determines the outcome: the latest approve/reject record.
    ///
    /// Ties on `decided_at` go to the record appended last.
    pub fn authoritative_decision(&self) -> Option<&CommitteeDecision> {
        self.decisions
            .iter()
            .filter(|d| d.decision != DecisionType::Pending)
            .fold(None, |latest: Option<&CommitteeDecision>, d| match latest {
                Some(l) if l.decided_at > d.decided_at => Some(l),
                _ => Some(d),
            })
    }

    // ===== IMMUTABLE BUILDER METHODS =====

    /// Return a new Procedure with the given status
    pub fn with_status(mut self, status: ProcedureStatus) -> Self {
        self.status = status;
        self
    }

    /// Return a new Procedure linked to the given permit
    pub fn with_permit(mut self, permit_id: Option<String>) -> Self {
        self.permit_id = permit_id;
        self
    }

    /// Return a new Procedure with `step` replacing the step of the same id, or appended
    pub fn with_step(mut self, step: Step) -> Self {
        match self.steps.iter_mut().find(|s| s.id == step.id) {
            Some(existing) => *existing = step,
            None => self.steps.push(step),
        }
        self
    }

    /// Return a new Procedure with `document` replacing the document of the same id, or appended
    pub fn with_document(mut self, document: Document) -> Self {
        match self.documents.iter_mut().find(|d| d.id == document.id) {
            Some(existing) => *existing = document,
            None => self.documents.push(document),
        }
        self
    }

    /// Return a new Procedure with `decision` appended
    pub fn with_decision(mut self, decision: CommitteeDecision) -> Self {
        self.decisions.push(decision);
        self
    }
}
