//! Committee decision schema

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

code_enum! {
    pub enum DecisionType {
        Approved => "approuve",
        Rejected => "rejete",
        /// Placeholder in legacy data; never accepted as a submission
        Pending => "en_attente",
    }
}

impl DecisionType {
    pub fn label(&self) -> &'static str {
        match self {
            DecisionType::Approved => "Approuvé",
            DecisionType::Rejected => "Rejeté",
            DecisionType::Pending => "En attente",
        }
    }
}

/// Binding outcome of a committee review. Append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitteeDecision {
    pub id: String,
    pub procedure_id: String,
    pub decision: DecisionType,
    pub decided_at: DateTime<Utc>,

    /// Deciding committee member
    pub member_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Formal decision note (e.g. granted duration)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_codes() {
        assert_eq!(serde_json::to_string(&DecisionType::Approved).unwrap(), "\"approuve\"");
        assert_eq!("rejete".parse::<DecisionType>().unwrap(), DecisionType::Rejected);
        assert_eq!("en_attente".parse::<DecisionType>().unwrap(), DecisionType::Pending);
    }
}
