//! Internal helpers for input normalization.
//!
//! These utilities are **not** part of the public API. They centralize the
//! normalization rules so the engine enforces consistent invariants.

use unicode_normalization::UnicodeNormalization;

use crate::{EngineError, ResultEngine};

/// Trim and collapse internal whitespace; reject empty names.
pub(crate) fn normalize_display_name(value: &str, label: &str) -> ResultEngine<String> {
    let collapsed = value.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(collapsed)
}

/// Case- and width-insensitive lookup key (NFKC + lowercase).
pub(crate) fn normalize_name_key(display: &str) -> String {
    display.nfkc().collect::<String>().to_lowercase()
}

/// Reject negative monetary amounts before any storage access.
pub(crate) fn validate_amount(amount_minor: i64, label: &str) -> ResultEngine<i64> {
    if amount_minor < 0 {
        return Err(EngineError::Validation(format!(
            "{label} must be >= 0"
        )));
    }
    Ok(amount_minor)
}
