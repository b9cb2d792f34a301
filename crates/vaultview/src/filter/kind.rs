use crate::filter::ast::FilterValue;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

///
/// ValueKind
///
/// Resolved data kind of a property leaf. Governs which storage column the
/// predicate targets and how its raw value is parsed into a bound parameter.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum ValueKind {
    Text,
    Number,
    Date,
    Boolean,
    Reference,
    ValueList,
}

impl ValueKind {
    /// Map a declared kind tag onto a storage kind.
    ///
    /// Unknown tags fall back to `Text`; declared kinds never fail.
    #[must_use]
    pub fn from_declared(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "number" | "decimal" | "integer" => Self::Number,
            "date" | "datetime" | "timestamp" => Self::Date,
            "bool" | "boolean" => Self::Boolean,
            "ref" | "object" => Self::Reference,
            "valuelist" | "list" => Self::ValueList,
            _ => Self::Text,
        }
    }

    /// Storage column on the property-value row holding this kind's slot.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Text => "value_text",
            Self::Number => "value_number",
            Self::Date => "value_date",
            Self::Boolean => "value_boolean",
            Self::Reference => "value_reference_id",
            Self::ValueList => "value_list_item_id",
        }
    }
}

/// Resolve the kind governing one property leaf.
///
/// Precedence: the leaf's own declared tag, then the property definition's
/// declared kind, then inference from the value's shape. Total — every leaf
/// gets a kind, defaulting to `Text`.
#[must_use]
pub fn resolve(declared: Option<&str>, schema: Option<ValueKind>, value: &FilterValue) -> ValueKind {
    if let Some(tag) = declared {
        return ValueKind::from_declared(tag);
    }
    if let Some(kind) = schema {
        return kind;
    }

    infer(value)
}

fn infer(value: &FilterValue) -> ValueKind {
    match value {
        FilterValue::Bool(_) => ValueKind::Boolean,
        FilterValue::Number(_) => ValueKind::Number,
        FilterValue::Text(text) => infer_text(text),
        FilterValue::Null => ValueKind::Text,
    }
}

fn infer_text(text: &str) -> ValueKind {
    if looks_numeric(text) {
        ValueKind::Number
    } else if text.eq_ignore_ascii_case("true") || text.eq_ignore_ascii_case("false") {
        ValueKind::Boolean
    } else if parse_date(text).is_some() {
        ValueKind::Date
    } else {
        ValueKind::Text
    }
}

/// `^[+-]?\d+(\.\d+)?$` without a regex dependency.
fn looks_numeric(text: &str) -> bool {
    let body = text
        .strip_prefix(['+', '-'])
        .unwrap_or(text);
    if body.is_empty() {
        return false;
    }

    let mut parts = body.splitn(2, '.');
    let int_part = parts.next().unwrap_or("");
    let frac_part = parts.next();

    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

    all_digits(int_part) && frac_part.is_none_or(all_digits)
}

/// Parse an ISO date or date-time string into a timestamp.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD HH:MM:SS`, and bare
/// `YYYY-MM-DD` (midnight).
#[must_use]
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Some(ts.naive_utc());
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(text, format) {
            return Some(ts);
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
