//! Dashboard aggregates, computed from the data on every call

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::schemas::{Dataset, Permit, PermitStatus, Procedure, ProcedureStatus, ProcedureType};

/// One bucket of a breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Count<K> {
    pub key: K,
    pub count: usize,
}

/// Back-office dashboard figures
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub total_permits: usize,

    /// Procedures `en_cours`
    pub active_procedures: usize,

    pub expired_permits: usize,
    pub suspended_permits: usize,

    /// Sorted by count, largest first, then by region name
    pub permits_by_region: Vec<Count<String>>,

    pub procedures_by_type: Vec<Count<ProcedureType>>,
    pub permits_by_status: Vec<Count<PermitStatus>>,
}

/// Sorted buckets, largest first; empty buckets never appear
fn into_counts<K: Ord>(map: BTreeMap<K, usize>) -> Vec<Count<K>> {
    let mut counts: Vec<Count<K>> = map
        .into_iter()
        .map(|(key, count)| Count { key, count })
        .collect();
    // Stable sort keeps the key order among equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

/// Compute the dashboard figures on `today`
pub fn dashboard_stats(dataset: &Dataset, today: NaiveDate) -> DashboardStats {
    let mut by_status: BTreeMap<PermitStatus, usize> = BTreeMap::new();
    let mut by_region: BTreeMap<String, usize> = BTreeMap::new();
    for permit in &dataset.permits {
        *by_status.entry(permit.status(today)).or_default() += 1;
        let region = dataset
            .entity(&permit.entity_id)
            .map(|e| e.region())
            .filter(|r| !r.is_empty())
            .unwrap_or("Inconnue");
        *by_region.entry(region.to_string()).or_default() += 1;
    }

    let mut by_type: BTreeMap<ProcedureType, usize> = BTreeMap::new();
    for procedure in &dataset.procedures {
        *by_type.entry(procedure.procedure_type).or_default() += 1;
    }

    DashboardStats {
        total_permits: dataset.permits.len(),
        active_procedures: count_active(&dataset.procedures),
        expired_permits: by_status.get(&PermitStatus::Expired).copied().unwrap_or(0),
        suspended_permits: by_status.get(&PermitStatus::Suspended).copied().unwrap_or(0),
        permits_by_region: into_counts(by_region),
        procedures_by_type: into_counts(by_type),
        permits_by_status: into_counts(by_status),
    }
}

fn count_active<'a>(procedures: impl IntoIterator<Item = &'a Procedure>) -> usize {
    procedures
        .into_iter()
        .filter(|p| p.status == ProcedureStatus::InProgress)
        .count()
}

/// Operator dashboard figures, over the operator's own records
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatorSummary {
    pub total_permits: usize,

    /// Permits whose derived status is `valide`
    pub active_permits: usize,

    pub active_procedures: usize,

    /// Codes of permits expiring within the window, soonest first
    pub expiring_soon: Vec<String>,
}

pub fn operator_summary<'a>(
    permits: &[&'a Permit],
    procedures: &[&'a Procedure],
    today: NaiveDate,
    window_days: i64,
) -> OperatorSummary {
    let mut expiring: Vec<&Permit> = permits
        .iter()
        .copied()
        .filter(|p| p.expires_within(today, window_days))
        .collect();
    expiring.sort_by_key(|p| p.expires_on);

    OperatorSummary {
        total_permits: permits.len(),
        active_permits: permits
            .iter()
            .filter(|p| p.status(today) == PermitStatus::Valid)
            .count(),
        active_procedures: count_active(procedures.iter().copied()),
        expiring_soon: expiring.iter().map(|p| p.code.clone()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::date;
    use crate::store::seed::seed_dataset;

    #[test]
    fn test_dashboard_stats_from_seed() {
        let dataset = seed_dataset();
        let stats = dashboard_stats(&dataset, date(2025, 6, 1));

        assert_eq!(stats.total_permits, 3);
        assert_eq!(stats.active_procedures, 2);
        assert_eq!(stats.expired_permits, 1);
        assert_eq!(stats.suspended_permits, 0);
        assert_eq!(
            stats.permits_by_status,
            vec![
                Count { key: PermitStatus::Valid, count: 2 },
                Count { key: PermitStatus::Expired, count: 1 },
            ]
        );

        let regions: Vec<&str> = stats.permits_by_region.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(regions, vec!["Alger", "Constantine", "Oran"]);
    }

    #[test]
    fn test_by_status_sums_to_total() {
        let dataset = seed_dataset();
        let stats = dashboard_stats(&dataset, date(2031, 1, 1));
        let sum: usize = stats.permits_by_status.iter().map(|c| c.count).sum();
        assert_eq!(sum, stats.total_permits);
        assert_eq!(stats.expired_permits, 3);
    }

    #[test]
    fn test_empty_dataset() {
        let stats = dashboard_stats(&Dataset::default(), date(2025, 6, 1));
        assert_eq!(stats.total_permits, 0);
        assert!(stats.permits_by_region.is_empty());
        assert!(stats.procedures_by_type.is_empty());
    }

    #[test]
    fn test_operator_summary_expiring_window() {
        let dataset = seed_dataset();
        let permits: Vec<&Permit> = dataset.permits.iter().collect();
        let procedures: Vec<&Procedure> = dataset.procedures.iter().collect();

        // PM-2024-028 expires 2029-12-15, PM-2025-001 on 2030-01-01
        let summary = operator_summary(&permits, &procedures, date(2029, 11, 1), 90);
        assert_eq!(summary.expiring_soon, vec!["PM-2024-028", "PM-2025-001"]);
        assert_eq!(summary.active_permits, 2);
        assert_eq!(summary.total_permits, 3);

        // Expiration day itself is day 0: not "expiring", not yet expired
        let summary = operator_summary(&permits, &procedures, date(2030, 1, 1), 90);
        assert!(summary.expiring_soon.is_empty());
        assert_eq!(summary.active_permits, 1);
    }
}
