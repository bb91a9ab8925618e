//! Filter normalization
//!
//! Turns caller-supplied `(field, value)` pairs into exact-match clauses plus
//! an optional `created_at` range.

use crate::search::query::{Clause, RangeBounds};
use serde::Deserialize;
use serde_json::Value;

/// Attribute the date filters range over
pub const CREATED_AT_FIELD: &str = "created_at";

/// Reserved filter name for the lower `created_at` bound
pub const START_DATE_FILTER: &str = "startdate";

/// Reserved filter name for the upper `created_at` bound
pub const END_DATE_FILTER: &str = "enddate";

/// A `(field, value)` filter pair.
///
/// Deserializes from a two-element JSON array. Scalars on either side keep
/// their textual form; `null` becomes the empty string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "(Value, Value)")]
pub struct Filter {
    pub field: String,
    pub value: String,
}

impl Filter {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl From<(Value, Value)> for Filter {
    fn from((field, value): (Value, Value)) -> Self {
        Self {
            field: scalar_text(field),
            value: scalar_text(value),
        }
    }
}

fn scalar_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Output of [`normalize_filters`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedFilters {
    /// Exact-match clauses in input order
    pub terms: Vec<Clause>,

    /// Bounds on `created_at`, if any date filter was given
    pub created_at: Option<RangeBounds>,
}

impl NormalizedFilters {
    /// The `created_at` range clause
    pub fn range_clause(&self) -> Option<Clause> {
        self.created_at
            .clone()
            .map(|bounds| Clause::range(CREATED_AT_FIELD, bounds))
    }
}

/// Lowercase and classify filters.
///
/// Empty values are skipped. The first `startdate` sets `gte` and the first
/// `enddate` sets `lte`; later occurrences are ignored.
pub fn normalize_filters(filters: &[Filter]) -> NormalizedFilters {
    let mut normalized = NormalizedFilters::default();

    for filter in filters {
        let field = filter.field.to_lowercase();
        let value = filter.value.to_lowercase();

        if value.is_empty() {
            continue;
        }

        match field.as_str() {
            START_DATE_FILTER => {
                let bounds = normalized.created_at.get_or_insert_with(RangeBounds::default);
                if bounds.gte.is_none() {
                    bounds.gte = Some(value);
                }
            }
            END_DATE_FILTER => {
                let bounds = normalized.created_at.get_or_insert_with(RangeBounds::default);
                if bounds.lte.is_none() {
                    bounds.lte = Some(value);
                }
            }
            _ => normalized.terms.push(Clause::field_match(field, value)),
        }
    }

    normalized
}
