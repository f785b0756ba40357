//! Permit schema - mining rights, perimeters and authorized substances

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

code_enum! {
    /// Effective status of a permit as shown to users.
    ///
    /// Never stored: see [`Permit::status`].
    pub enum PermitStatus {
        Valid => "valide",
        Expired => "expire",
        Suspended => "suspendu",
        Cancelled => "annule",
        Merged => "fusionne",
    }
}

impl PermitStatus {
    pub fn label(&self) -> &'static str {
        match self {
            PermitStatus::Valid => "Valide",
            PermitStatus::Expired => "Expiré",
            PermitStatus::Suspended => "Suspendu",
            PermitStatus::Cancelled => "Annulé",
            PermitStatus::Merged => "Fusionné",
        }
    }
}

code_enum! {
    /// Status set by an administrative act, overriding the date-derived status
    pub enum AdministrativeStatus {
        Suspended => "suspendu",
        Cancelled => "annule",
        Merged => "fusionne",
    }
}

impl From<AdministrativeStatus> for PermitStatus {
    fn from(status: AdministrativeStatus) -> Self {
        match status {
            AdministrativeStatus::Suspended => PermitStatus::Suspended,
            AdministrativeStatus::Cancelled => PermitStatus::Cancelled,
            AdministrativeStatus::Merged => PermitStatus::Merged,
        }
    }
}

/// A raw coordinate, as captured before it belongs to a permit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

/// One vertex of a permit's boundary polygon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerimeterPoint {
    pub id: String,
    pub permit_id: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,

    /// 1-based position in the polygon
    pub order: u32,
}

/// Authorization of one substance on one permit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermitSubstance {
    pub id: String,
    pub permit_id: String,
    pub substance_id: String,
    pub added_on: NaiveDate,
}

/// A granted mining right
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permit {
    pub id: String,

    /// `PM-YYYY-NNN`
    pub code: String,

    pub entity_id: String,

    /// Suspension, cancellation or merger. `None` means the status follows the dates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub administrative_status: Option<AdministrativeStatus>,

    pub issued_on: NaiveDate,
    pub expires_on: NaiveDate,

    #[serde(default)]
    pub perimeter: Vec<PerimeterPoint>,

    #[serde(default)]
    pub substances: Vec<PermitSubstance>,
}

impl Permit {
    /// Effective status on `today`.
    ///
    /// An administrative status wins; otherwise the permit is expired strictly
    /// after its expiration date and valid up to and including it.
    pub fn status(&self, today: NaiveDate) -> PermitStatus {
        match self.administrative_status {
            Some(status) => status.into(),
            None if today > self.expires_on => PermitStatus::Expired,
            None => PermitStatus::Valid,
        }
    }

    /// Whole days from `today` until expiration, negative once past
    pub fn days_until_expiration(&self, today: NaiveDate) -> i64 {
        (self.expires_on - today).num_days()
    }

    /// Expires within the next `window_days`, not counting already-expired permits
    pub fn expires_within(&self, today: NaiveDate, window_days: i64) -> bool {
        let days = self.days_until_expiration(today);
        days > 0 && days <= window_days
    }

    /// Perimeter points sorted by their order index
    pub fn ordered_perimeter(&self) -> Vec<&PerimeterPoint> {
        let mut points: Vec<_> = self.perimeter.iter().collect();
        points.sort_by_key(|p| p.order);
        points
    }

    pub fn substance_ids(&self) -> impl Iterator<Item = &str> {
        self.substances.iter().map(|s| s.substance_id.as_str())
    }

    // ===== IMMUTABLE BUILDER METHODS =====

    /// Return a new Permit with the given administrative status
    pub fn with_administrative_status(mut self, status: Option<AdministrativeStatus>) -> Self {
        self.administrative_status = status;
        self
    }
}
