//! Document schema - evidence attached to a procedure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

code_enum! {
    pub enum DocumentType {
        AnnexII11 => "annexe_II-11",
        PoliceReport => "rapport_police",
        Statutes => "statuts",
        Map => "carte",
        TradeRegister => "registre_commerce",
        TechnicalNote => "note_technique",
        CadastralMap => "carte_cadastrale",
    }
}

impl DocumentType {
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::AnnexII11 => "Annexe II-11",
            DocumentType::PoliceReport => "Rapport de police",
            DocumentType::Statutes => "Statuts de l'entreprise",
            DocumentType::Map => "Carte",
            DocumentType::TradeRegister => "Registre de commerce",
            DocumentType::TechnicalNote => "Note technique",
            DocumentType::CadastralMap => "Carte cadastrale",
        }
    }
}

code_enum! {
    pub enum DocumentStatus {
        Pending => "en_attente",
        Valid => "valide",
        Rejected => "rejete",
    }
}

impl DocumentStatus {
    pub fn label(&self) -> &'static str {
        match self {
            DocumentStatus::Pending => "En attente",
            DocumentStatus::Valid => "Validé",
            DocumentStatus::Rejected => "Rejeté",
        }
    }

    pub fn is_terminal(&self) -> bool {
        *self != DocumentStatus::Pending
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub procedure_id: String,
    pub doc_type: DocumentType,

    /// Display name, usually the uploaded file name
    pub name: String,

    pub status: DocumentStatus,
    pub uploaded_at: DateTime<Utc>,

    /// Reviewer comment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    pub file_path: String,
}

impl Document {
    /// Create a freshly uploaded, unreviewed document
    pub fn new(
        id: String,
        procedure_id: String,
        doc_type: DocumentType,
        name: String,
        file_path: String,
        uploaded_at: DateTime<Utc>,
    ) -> Self {
        Document {
            id,
            procedure_id,
            doc_type,
            name,
            status: DocumentStatus::Pending,
            uploaded_at,
            comment: None,
            file_path,
        }
    }

    /// Return a new Document with the review outcome applied
    pub fn reviewed(mut self, status: DocumentStatus, comment: Option<String>) -> Self {
        self.status = status;
        self.comment = comment;
        self
    }
}
