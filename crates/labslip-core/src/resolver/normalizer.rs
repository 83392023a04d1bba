//! Form value normalization.
//!
//! Handles:
//! - Placeholder detection ("", "-", "Select grade", ...)
//! - Numeric id strings ("12", " 12 ")
//! - Alphanumeric keys for loose name comparison ("Vita 3D-Master" → "vita3dmaster")

/// Prompts the form shows before a value is picked.
const PLACEHOLDER_PREFIXES: &[&str] = &["select", "choose", "pick"];

/// Values that mean "nothing picked".
const PLACEHOLDER_VALUES: &[&str] = &["-", "--", "none", "n/a", "null", "undefined"];

/// Check if a form value is missing or still a placeholder.
pub fn is_placeholder(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    if lower.is_empty() {
        return true;
    }
    if PLACEHOLDER_VALUES.contains(&lower.as_str()) {
        return true;
    }
    PLACEHOLDER_PREFIXES
        .iter()
        .any(|prefix| lower == *prefix || lower.starts_with(&format!("{prefix} ")) || lower.starts_with(&format!("{prefix}...")))
}

/// Check an optional form value.
pub fn is_missing(value: Option<&str>) -> bool {
    value.map(is_placeholder).unwrap_or(true)
}

/// Parse a value that is a plain numeric id.
pub fn parse_numeric_id(value: &str) -> Option<i64> {
    let trimmed = value.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

/// Lowercase alphanumeric key used for loose comparisons.
pub fn normalize_key(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(|c| c.to_lowercase())
        .collect()
}
