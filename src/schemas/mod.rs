//! Schema types for cadastre
//!
//! Rust names are English; serialized enum values keep the administration's
//! own vocabulary (`valide`, `en_cours`, `soumission_comite`, ...).

/// Declares a closed vocabulary enum serialized as its wire code.
///
/// Generates `ALL`, `as_str`, `Display` and `FromStr` from the same table so
/// the three can never disagree.
macro_rules! code_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $code:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            $( $(#[$vmeta])* #[serde(rename = $code)] $variant ),+
        }

        impl $name {
            /// Every value, in declaration order
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The wire code for this value
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $code),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($code => Ok($name::$variant),)+
                    _ => Err(format!("Unknown {}: {}", stringify!($name), s)),
                }
            }
        }
    };
}

mod config;
mod dataset;
mod decision;
mod document;
mod entity;
mod permit;
mod procedure;

pub use config::Config;
pub use dataset::Dataset;
pub use decision::{CommitteeDecision, DecisionType};
pub use document::{Document, DocumentStatus, DocumentType};
pub use entity::{LegalEntity, Substance, User, UserRole};
pub use permit::{
    AdministrativeStatus, Coordinate, PerimeterPoint, Permit, PermitStatus, PermitSubstance,
};
pub use procedure::{Procedure, ProcedureStatus, ProcedureType, Step, StepStatus, StepType};

/// Midnight UTC on the given calendar day; out-of-range input yields the epoch.
pub fn utc_day(year: i32, month: u32, day: u32) -> chrono::DateTime<chrono::Utc> {
    date(year, month, day)
        .and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc()
}

/// A calendar day; out-of-range input yields the epoch.
pub fn date(year: i32, month: u32, day: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
