//! Dataset schema - every collection the store holds, with lookup helpers

use serde::{Deserialize, Serialize};

use super::{Document, LegalEntity, Permit, Procedure, Substance, User};

/// The whole data set, reference data and aggregates together
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(default)]
    pub users: Vec<User>,

    #[serde(default)]
    pub entities: Vec<LegalEntity>,

    #[serde(default)]
    pub substances: Vec<Substance>,

    #[serde(default)]
    pub permits: Vec<Permit>,

    #[serde(default)]
    pub procedures: Vec<Procedure>,
}

impl Dataset {
    pub fn entity(&self, id: &str) -> Option<&LegalEntity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn substance(&self, id: &str) -> Option<&Substance> {
        self.substances.iter().find(|s| s.id == id)
    }

    pub fn user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Permit by id or code
    pub fn permit(&self, key: &str) -> Option<&Permit> {
        self.permits.iter().find(|p| p.id == key || p.code == key)
    }

    /// Procedure by id or code
    pub fn procedure(&self, key: &str) -> Option<&Procedure> {
        self.procedures.iter().find(|p| p.id == key || p.code == key)
    }

    /// Procedures acting on the given permit
    pub fn procedures_for_permit(&self, permit_id: &str) -> Vec<&Procedure> {
        self.procedures
            .iter()
            .filter(|p| p.permit_id.as_deref() == Some(permit_id))
            .collect()
    }

    /// Legal name of an entity, or the raw id when the entity is unknown
    pub fn entity_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.entity(id).map(|e| e.legal_name.as_str()).unwrap_or(id)
    }

    /// Every document of every procedure, paired with its procedure
    pub fn documents(&self) -> Vec<(&Procedure, &Document)> {
        self.procedures
            .iter()
            .flat_map(|p| p.documents.iter().map(move |d| (p, d)))
            .collect()
    }
}
