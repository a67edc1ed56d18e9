//! Normalization of metadata identifiers.
//!
//! Array elements in key names are written `#0`, `#_10`, `#__100` and so on.
//! A plugin handling metadata for an array declares it with a bare `#`, so
//! concrete indices are collapsed before a provider is looked up.

use std::sync::LazyLock;

use regex::Regex;

static ARRAY_INDEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#_*[0-9]*").unwrap());

/// Collapse every array index segment of `metadata` to `#`.
///
/// ```
/// use chain_core::normalize_metadata;
///
/// assert_eq!(normalize_metadata("check/#_12/type"), "check/#/type");
/// assert_eq!(normalize_metadata("check/type"), "check/type");
/// ```
pub fn normalize_metadata(metadata: &str) -> String {
    ARRAY_INDEX.replace_all(metadata, "#").into_owned()
}
