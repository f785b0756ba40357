//! Filtering of permits, procedures and documents
//!
//! Every filter is a pure predicate over one record plus a lookup context.
//! Criteria AND-compose; an unset criterion matches everything.

mod filters;

pub use filters::{DocumentFilter, PermitFilter, ProcedureFilter, SearchContext};

/// Case-insensitive substring match. An empty needle matches anything.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Parse an exact-match criterion where `""` and `"all"` mean "no criterion"
pub fn parse_criterion<T>(value: Option<&str>) -> Result<Option<T>, String>
where
    T: std::str::FromStr<Err = String>,
{
    match value.map(str::trim) {
        None | Some("") | Some("all") => Ok(None),
        Some(s) => s.parse().map(Some),
    }
}

/// A text criterion, with blank input treated as unset
pub fn text_criterion(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schemas::PermitStatus;

    #[test]
    fn test_contains_ci() {
        assert!(contains_ci("MINEX ALGERIA SARL", "minex"));
        assert!(contains_ci("PM-2025-001", "2025"));
        assert!(contains_ci("anything", ""));
        assert!(contains_ci("anything", "  "));
        assert!(!contains_ci("Or", "argent"));
    }

    #[test]
    fn test_parse_criterion_all_is_identity() {
        assert_eq!(parse_criterion::<PermitStatus>(Some("all")).unwrap(), None);
        assert_eq!(parse_criterion::<PermitStatus>(Some("")).unwrap(), None);
        assert_eq!(parse_criterion::<PermitStatus>(None).unwrap(), None);
        assert_eq!(
            parse_criterion::<PermitStatus>(Some("expire")).unwrap(),
            Some(PermitStatus::Expired)
        );
        assert!(parse_criterion::<PermitStatus>(Some("bogus")).is_err());
    }

    #[test]
    fn test_text_criterion() {
        assert_eq!(text_criterion(Some(" ".to_string())), None);
        assert_eq!(text_criterion(Some("Or".to_string())), Some("Or".to_string()));
    }
}
