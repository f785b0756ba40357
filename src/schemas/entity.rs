//! Legal entities, substances and users

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A company holding permits and initiating procedures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegalEntity {
    pub id: String,

    /// Registered company name (raison sociale)
    pub legal_name: String,

    /// SARL, SPA, ...
    pub legal_form: String,

    /// National trade registry number, unique across entities
    pub registry_number: String,

    pub address: String,
    pub email: String,
    pub phone: String,
    pub legal_representative: String,
    pub created_on: NaiveDate,
}

impl LegalEntity {
    /// Region the entity is based in: the last comma-separated part of its address.
    pub fn region(&self) -> &str {
        self.address
            .rsplit(',')
            .next()
            .map(str::trim)
            .unwrap_or_default()
    }
}

/// A mineral resource type. Reference data, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Substance {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub family: String,
}

code_enum! {
    /// Role of an authenticated user
    pub enum UserRole {
        Administrator => "administrator",
        CadastreAgent => "cadastre_agent",
        CommitteeMember => "committee_member",
        Operator => "operator",
    }
}

impl UserRole {
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Administrator => "Administrateur",
            UserRole::CadastreAgent => "Agent du cadastre",
            UserRole::CommitteeMember => "Membre du comité",
            UserRole::Operator => "Opérateur",
        }
    }
}

/// An actor of the system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: UserRole,

    /// Entity an operator acts for. Required for operators, absent otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
}

impl User {
    pub fn is_operator(&self) -> bool {
        self.role == UserRole::Operator
    }
}
