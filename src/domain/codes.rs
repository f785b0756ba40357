//! Record codes (`PM-YYYY-NNN`, `PR-YYYY-NNN`) and id allocation

use regex::Regex;

pub const PERMIT_CODE_PREFIX: &str = "PM";
pub const PROCEDURE_CODE_PREFIX: &str = "PR";

lazy_static::lazy_static! {
    static ref CODE_REGEX: Regex = Regex::new(r"^(PM|PR)-(\d{4})-(\d{3,})$").unwrap();
}

/// Split a code into (prefix, year, sequence)
fn parse_code(code: &str) -> Option<(&str, i32, u32)> {
    let caps = CODE_REGEX.captures(code)?;
    let prefix = caps.get(1)?.as_str();
    let year = caps.get(2)?.as_str().parse().ok()?;
    let seq = caps.get(3)?.as_str().parse().ok()?;
    Some((prefix, year, seq))
}

pub fn is_valid_permit_code(code: &str) -> bool {
    matches!(parse_code(code), Some((PERMIT_CODE_PREFIX, _, _)))
}

pub fn is_valid_procedure_code(code: &str) -> bool {
    matches!(parse_code(code), Some((PROCEDURE_CODE_PREFIX, _, _)))
}

/// Next code in the yearly sequence for `prefix`, e.g. `PR-2026-004` after `PR-2026-003`.
///
/// Codes of other prefixes or years, and malformed codes, are ignored.
pub fn next_code<'a>(prefix: &str, year: i32, existing: impl IntoIterator<Item = &'a str>) -> String {
    let last = existing
        .into_iter()
        .filter_map(parse_code)
        .filter(|(p, y, _)| *p == prefix && *y == year)
        .map(|(_, _, seq)| seq)
        .max()
        .unwrap_or(0);
    format!("{}-{}-{:03}", prefix, year, last + 1)
}

/// Next numeric id after the largest numeric id in `existing`
pub fn next_id<'a>(existing: impl IntoIterator<Item = &'a str>) -> String {
    let last = existing
        .into_iter()
        .filter_map(|id| id.parse::<u64>().ok())
        .max()
        .unwrap_or(0);
    (last + 1).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_validation() {
        assert!(is_valid_permit_code("PM-2025-001"));
        assert!(!is_valid_permit_code("PR-2025-001"));
        assert!(!is_valid_permit_code("PM-25-001"));
        assert!(!is_valid_permit_code("PM-2025-01"));
        assert!(is_valid_procedure_code("PR-2024-234"));
        assert!(is_valid_procedure_code("PR-2024-1002"));
        assert!(!is_valid_procedure_code("PR-1002"));
    }

    #[test]
    fn test_next_code_within_year() {
        let existing = ["PR-2025-017", "PR-2025-045", "PR-2024-234", "PM-2025-090"];
        assert_eq!(next_code("PR", 2025, existing), "PR-2025-046");
        assert_eq!(next_code("PR", 2026, existing), "PR-2026-001");
        assert_eq!(next_code("PM", 2025, existing), "PM-2025-091");
    }

    #[test]
    fn test_next_code_ignores_malformed() {
        assert_eq!(next_code("PR", 2025, ["PR-1002", "garbage"]), "PR-2025-001");
    }

    #[test]
    fn test_next_id() {
        assert_eq!(next_id(["1", "2", "10"]), "11");
        assert_eq!(next_id(["decision-17", "3"]), "4");
        assert_eq!(next_id(std::iter::empty()), "1");
    }
}
