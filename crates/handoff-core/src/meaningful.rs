//! The one predicate deciding whether a field is worth showing.
//!
//! Pipeline extraction leaves placeholders behind when the voice assistant
//! had nothing to say about a field. Both the section builder and the list
//! badges go through [`is_meaningful`] so they always agree.

use crate::record::Timestamp;

/// Tokens the pipeline writes in place of "no value", compared after trimming
/// and lowercasing.
pub const PLACEHOLDER_TOKENS: [&str; 4] = ["n/a", "na", "null", "undefined"];

/// The closed set of value shapes a record field can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Null,
    Text(&'a str),
    Timestamp(&'a Timestamp),
}

impl<'a> From<Option<&'a str>> for FieldValue<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(FieldValue::Null, FieldValue::Text)
    }
}

#[must_use]
pub fn is_meaningful(value: FieldValue<'_>) -> bool {
    match value {
        FieldValue::Null => false,
        FieldValue::Text(text) => {
            let normalized = text.trim().to_lowercase();
            !normalized.is_empty() && !PLACEHOLDER_TOKENS.contains(&normalized.as_str())
        }
        FieldValue::Timestamp(Timestamp::Parsed(_)) => true,
        FieldValue::Timestamp(Timestamp::Raw(raw)) => is_meaningful(FieldValue::Text(raw)),
    }
}

/// Returns the trimmed text when it is meaningful, `None` otherwise.
#[must_use]
pub fn meaningful_text(value: Option<&str>) -> Option<&str> {
    value
        .filter(|text| is_meaningful(FieldValue::Text(text)))
        .map(str::trim)
}
