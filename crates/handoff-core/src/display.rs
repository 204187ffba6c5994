//! Display-side formatting for timestamps.

use chrono::format::{Item, StrftimeItems};
use chrono::{FixedOffset, Offset, Utc};

use crate::record::Timestamp;

pub const DEFAULT_TIMESTAMP_PATTERN: &str = "%b %-d, %Y %-I:%M %p";

/// Renders timestamps in the dashboard's configured time zone and pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampFormat {
    offset: FixedOffset,
    pattern: String,
}

impl TimestampFormat {
    /// Build a format, rejecting strftime patterns chrono cannot render.
    ///
    /// # Errors
    ///
    /// Returns a human-readable reason when `pattern` is empty or contains an
    /// unknown specifier.
    pub fn new(offset: FixedOffset, pattern: &str) -> Result<Self, String> {
        if pattern.trim().is_empty() {
            return Err("pattern must not be empty".to_string());
        }
        if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
            return Err(format!("unsupported strftime pattern '{pattern}'"));
        }
        Ok(Self {
            offset,
            pattern: pattern.to_string(),
        })
    }

    #[must_use]
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Format a timestamp for display.
    ///
    /// Unparsed timestamps come back verbatim.
    #[must_use]
    pub fn format(&self, timestamp: &Timestamp) -> String {
        match timestamp {
            Timestamp::Parsed(at) => at
                .with_timezone(&self.offset)
                .format(&self.pattern)
                .to_string(),
            Timestamp::Raw(raw) => raw.clone(),
        }
    }
}

impl Default for TimestampFormat {
    fn default() -> Self {
        Self {
            offset: Utc.fix(),
            pattern: DEFAULT_TIMESTAMP_PATTERN.to_string(),
        }
    }
}

/// Parse a UTC offset such as `Z`, `+05:30`, `-0800` or `+02`.
#[must_use]
pub fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Some(Utc.fix());
    }

    let (sign, rest) = match raw.as_bytes().first()? {
        b'+' => (1, &raw[1..]),
        b'-' => (-1, &raw[1..]),
        _ => return None,
    };

    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (
            digits[..2].parse::<i32>().ok()?,
            digits[2..].parse::<i32>().ok()?,
        ),
        _ => return None,
    };
    if hours > 23 || minutes > 59 {
        return None;
    }

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
