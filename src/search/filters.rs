use chrono::NaiveDate;

use crate::schemas::{
    Dataset, Document, DocumentStatus, DocumentType, Permit, PermitStatus, Procedure,
    ProcedureStatus, ProcedureType,
};

use super::contains_ci;

/// Lookups the filters resolve names through
#[derive(Debug, Clone, Copy)]
pub struct SearchContext<'a> {
    pub dataset: &'a Dataset,

    /// Day the derived permit status is evaluated on
    pub today: NaiveDate,
}

impl<'a> SearchContext<'a> {
    pub fn new(dataset: &'a Dataset, today: NaiveDate) -> Self {
        SearchContext { dataset, today }
    }

    fn entity_name(&self, entity_id: &str) -> &'a str {
        self.dataset
            .entity(entity_id)
            .map(|e| e.legal_name.as_str())
            .unwrap_or_default()
    }
}

/// Permit search criteria
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PermitFilter {
    pub code: Option<String>,

    /// Substring of the holder's legal name
    pub entity: Option<String>,

    /// Substring of any authorized substance's name
    pub substance: Option<String>,

    /// Exact derived status
    pub status: Option<PermitStatus>,

    /// Issued on or after
    pub issued_from: Option<NaiveDate>,

    /// Issued on or before
    pub issued_to: Option<NaiveDate>,
}

impl PermitFilter {
    pub fn matches(&self, permit: &Permit, ctx: &SearchContext<'_>) -> bool {
        if let Some(code) = &self.code {
            if !contains_ci(&permit.code, code) {
                return false;
            }
        }
        if let Some(entity) = &self.entity {
            if !contains_ci(ctx.entity_name(&permit.entity_id), entity) {
                return false;
            }
        }
        if let Some(substance) = &self.substance {
            let any = permit.substance_ids().any(|id| {
                ctx.dataset
                    .substance(id)
                    .is_some_and(|s| contains_ci(&s.name, substance))
            });
            if !any {
                return false;
            }
        }
        if let Some(status) = self.status {
            if permit.status(ctx.today) != status {
                return false;
            }
        }
        if self.issued_from.is_some_and(|from| permit.issued_on < from) {
            return false;
        }
        if self.issued_to.is_some_and(|to| permit.issued_on > to) {
            return false;
        }
        true
    }

    /// Matching permits, in input order
    pub fn apply<'a>(
        &self,
        permits: impl IntoIterator<Item = &'a Permit>,
        ctx: &SearchContext<'_>,
    ) -> Vec<&'a Permit> {
        permits.into_iter().filter(|p| self.matches(p, ctx)).collect()
    }
}

/// Procedure search criteria
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcedureFilter {
    pub code: Option<String>,
    pub procedure_type: Option<ProcedureType>,
    pub status: Option<ProcedureStatus>,

    /// Substring of the entity's legal name
    pub entity: Option<String>,
}

impl ProcedureFilter {
    pub fn matches(&self, procedure: &Procedure, ctx: &SearchContext<'_>) -> bool {
        self.code
            .as_deref()
            .map_or(true, |code| contains_ci(&procedure.code, code))
            && self
                .procedure_type
                .map_or(true, |t| procedure.procedure_type == t)
            && self.status.map_or(true, |s| procedure.status == s)
            && self
                .entity
                .as_deref()
                .map_or(true, |e| contains_ci(ctx.entity_name(&procedure.entity_id), e))
    }

    pub fn apply<'a>(
        &self,
        procedures: impl IntoIterator<Item = &'a Procedure>,
        ctx: &SearchContext<'_>,
    ) -> Vec<&'a Procedure> {
        procedures
            .into_iter()
            .filter(|p| self.matches(p, ctx))
            .collect()
    }
}

/// Document search criteria, over documents flattened with their procedure
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentFilter {
    /// Substring of the document name or of its procedure's code
    pub search: Option<String>,
    pub status: Option<DocumentStatus>,
    pub doc_type: Option<DocumentType>,

    /// Substring of the procedure entity's legal name
    pub entity: Option<String>,
}

impl DocumentFilter {
    pub fn matches(
        &self,
        procedure: &Procedure,
        document: &Document,
        ctx: &SearchContext<'_>,
    ) -> bool {
        self.search.as_deref().map_or(true, |q| {
            contains_ci(&document.name, q) || contains_ci(&procedure.code, q)
        }) && self.status.map_or(true, |s| document.status == s)
            && self.doc_type.map_or(true, |t| document.doc_type == t)
            && self
                .entity
                .as_deref()
                .map_or(true, |e| contains_ci(ctx.entity_name(&procedure.entity_id), e))
    }

    pub fn apply<'a>(
        &self,
        documents: impl IntoIterator<Item = (&'a Procedure, &'a Document)>,
        ctx: &SearchContext<'_>,
    ) -> Vec<(&'a Procedure, &'a Document)> {
        documents
            .into_iter()
            .filter(|(p, d)| self.matches(p, d, ctx))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::date;
    use crate::store::seed::seed_dataset;

    fn today() -> NaiveDate {
        date(2025, 6, 1)
    }

    fn codes<'a>(permits: &[&'a Permit]) -> Vec<&'a str> {
        permits.iter().map(|p| p.code.as_str()).collect()
    }

    #[test]
    fn test_empty_permit_filter_is_identity() {
        let dataset = seed_dataset();
        let ctx = SearchContext::new(&dataset, today());
        assert_eq!(
            PermitFilter::default().apply(&dataset.permits, &ctx).len(),
            dataset.permits.len()
        );
    }

    #[test]
    fn test_permit_filter_by_code_case_insensitive() {
        let dataset = seed_dataset();
        let ctx = SearchContext::new(&dataset, today());
        let filter = PermitFilter {
            code: Some("pm-2025".to_string()),
            ..Default::default()
        };
        assert_eq!(codes(&filter.apply(&dataset.permits, &ctx)), vec!["PM-2025-001"]);
    }

    #[test]
    fn test_permit_filter_status_and_substance() {
        let dataset = seed_dataset();
        let ctx = SearchContext::new(&dataset, today());
        let filter = PermitFilter {
            status: Some(PermitStatus::Valid),
            substance: Some("Or".to_string()),
            ..Default::default()
        };
        let found = filter.apply(&dataset.permits, &ctx);
        assert!(!found.is_empty());
        for permit in found {
            assert_eq!(permit.status(today()), PermitStatus::Valid);
        }
    }

    #[test]
    fn test_permit_filter_by_entity_name() {
        let dataset = seed_dataset();
        let ctx = SearchContext::new(&dataset, today());
        let filter = PermitFilter {
            entity: Some("minex".to_string()),
            ..Default::default()
        };
        assert_eq!(codes(&filter.apply(&dataset.permits, &ctx)), vec!["PM-2025-001"]);
    }

    #[test]
    fn test_permit_filter_issuance_period_inclusive() {
        let dataset = seed_dataset();
        let ctx = SearchContext::new(&dataset, today());
        let issued = dataset.permits[0].issued_on;
        let filter = PermitFilter {
            issued_from: Some(issued),
            issued_to: Some(issued),
            ..Default::default()
        };
        let found = filter.apply(&dataset.permits, &ctx);
        assert!(found.iter().all(|p| p.issued_on == issued));
        assert!(found.iter().any(|p| p.id == dataset.permits[0].id));
    }

    #[test]
    fn test_procedure_filter() {
        let dataset = seed_dataset();
        let ctx = SearchContext::new(&dataset, today());

        let in_progress = ProcedureFilter {
            status: Some(ProcedureStatus::InProgress),
            ..Default::default()
        };
        assert!(in_progress
            .apply(&dataset.procedures, &ctx)
            .iter()
            .all(|p| p.status == ProcedureStatus::InProgress));

        let by_type = ProcedureFilter {
            procedure_type: Some(ProcedureType::Substitution),
            code: Some("017".to_string()),
            ..Default::default()
        };
        let found = by_type.apply(&dataset.procedures, &ctx);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, "PR-2025-017");
    }

    #[test]
    fn test_document_filter_search_matches_name_or_procedure_code() {
        let dataset = seed_dataset();
        let ctx = SearchContext::new(&dataset, today());

        let by_code = DocumentFilter {
            search: Some("PR-2025-017".to_string()),
            ..Default::default()
        };
        let found = by_code.apply(dataset.documents(), &ctx);
        assert!(!found.is_empty());
        assert!(found.iter().all(|(p, _)| p.code == "PR-2025-017"));

        let first_name = found[0].1.name.clone();
        let by_name = DocumentFilter {
            search: Some(first_name.to_uppercase()),
            ..Default::default()
        };
        assert!(by_name
            .apply(dataset.documents(), &ctx)
            .iter()
            .any(|(_, d)| d.name == first_name));
    }

    #[test]
    fn test_document_filter_status() {
        let dataset = seed_dataset();
        let ctx = SearchContext::new(&dataset, today());
        let pending = DocumentFilter {
            status: Some(DocumentStatus::Pending),
            ..Default::default()
        };
        assert!(pending
            .apply(dataset.documents(), &ctx)
            .iter()
            .all(|(_, d)| d.status == DocumentStatus::Pending));
    }
}
