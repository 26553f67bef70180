//! Reference number formatting
//!
//! Human-readable, period-scoped identifiers: inspections restart their
//! counter each year-month, establishments and certificates each year.
//! Allocation of the underlying counter value is the backend's job; the
//! formats themselves are pure.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Identifier scope: which entity kind a reference number belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceScope {
    Inspection,
    Establishment,
    Certificate,
}

impl SequenceScope {
    pub fn prefix(&self) -> &'static str {
        match self {
            SequenceScope::Inspection => "HSI",
            SequenceScope::Establishment => "EST",
            SequenceScope::Certificate => "CERT",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SequenceScope::Inspection => "inspection",
            SequenceScope::Establishment => "establishment",
            SequenceScope::Certificate => "certificate",
        }
    }

    /// Zero-padding width of the numeric suffix
    pub fn pad_width(&self) -> usize {
        match self {
            SequenceScope::Inspection => 4,
            SequenceScope::Establishment => 5,
            SequenceScope::Certificate => 6,
        }
    }

    /// Counter period for a given date: YYYY-MM for inspections, YYYY for
    /// establishments and certificates. Periods never reuse numbers.
    pub fn period_key(&self, date: NaiveDate) -> String {
        match self {
            SequenceScope::Inspection => format!("{:04}-{:02}", date.year(), date.month()),
            SequenceScope::Establishment | SequenceScope::Certificate => {
                format!("{:04}", date.year())
            }
        }
    }
}

/// Parsed components of a reference number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReference {
    pub scope: SequenceScope,
    pub period_key: String,
    pub sequence: i64,
}

/// Format a reference number, e.g. `HSI-2025-06-0007`, `EST-2025-00012`,
/// `CERT-2025-000123`. Zero-padded so references within a period sort
/// lexicographically in allocation order.
pub fn format_reference(scope: SequenceScope, period_key: &str, sequence: i64) -> String {
    format!(
        "{}-{}-{:0width$}",
        scope.prefix(),
        period_key,
        sequence,
        width = scope.pad_width()
    )
}

/// Parse a reference number back into scope, period and sequence.
pub fn parse_reference(reference: &str) -> Option<ParsedReference> {
    let (head, seq_part) = reference.rsplit_once('-')?;
    let (prefix, period_key) = head.split_once('-')?;

    let scope = match prefix {
        "HSI" => SequenceScope::Inspection,
        "EST" => SequenceScope::Establishment,
        "CERT" => SequenceScope::Certificate,
        _ => return None,
    };

    if !valid_period_key(scope, period_key) {
        return None;
    }
    if seq_part.len() < scope.pad_width() || !seq_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let sequence: i64 = seq_part.parse().ok()?;

    Some(ParsedReference {
        scope,
        period_key: period_key.to_string(),
        sequence,
    })
}

fn valid_period_key(scope: SequenceScope, period_key: &str) -> bool {
    fn all_digits(s: &str) -> bool {
        !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
    }

    match scope {
        SequenceScope::Inspection => match period_key.split_once('-') {
            Some((year, month)) => {
                year.len() == 4
                    && month.len() == 2
                    && all_digits(year)
                    && all_digits(month)
                    && (1..=12).contains(&month.parse::<u32>().unwrap_or(0))
            }
            None => false,
        },
        SequenceScope::Establishment | SequenceScope::Certificate => {
            period_key.len() == 4 && all_digits(period_key)
        }
    }
}
