//! Builders for CourtListener's Django-style filter parameters.
//!
//! Each function returns a small [`Params`] map; combine them with
//! [`combine`] or [`Params::merged`]. Values are passed through as given,
//! so a malformed date is sent as-is and left for the API to reject.
//!
//! ```
//! use courtlistener::filters::{self, SortDirection};
//!
//! let params = filters::combine([
//!     filters::date_range(Some("2023-01-01"), Some("2023-12-31"), "date_filed"),
//!     filters::exact("scotus", "court"),
//!     filters::order_by("date_filed", SortDirection::Desc),
//! ]);
//! assert_eq!(params.get_str("order_by"), Some("-date_filed"));
//! assert_eq!(params.len(), 4);
//! ```

use serde_json::Value;
use std::fmt::Display;
use std::str::FromStr;

use crate::Params;

/// Sort order for `order_by`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Ascending order (oldest/smallest first). This is the default.
    #[default]
    Asc,
    /// Descending order (newest/largest first).
    Desc,
}

impl SortDirection {
    fn prefix(self) -> &'static str {
        match self {
            SortDirection::Asc => "",
            SortDirection::Desc => "-",
        }
    }
}

impl FromStr for SortDirection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(()),
        }
    }
}

/// `{field}__gte` / `{field}__lte`, each only when given and non-empty.
pub fn date_range(start: Option<&str>, end: Option<&str>, field: &str) -> Params {
    let mut params = Params::new();
    if let Some(start) = start.filter(|s| !s.is_empty()) {
        params.insert(format!("{}__gte", field), start);
    }
    if let Some(end) = end.filter(|s| !s.is_empty()) {
        params.insert(format!("{}__lte", field), end);
    }
    params
}

/// Full-text search on `field` (the API's own field is `q`).
pub fn text_search(query: &str, field: &str) -> Params {
    Params::from([(field, query)])
}

/// Exact match.
pub fn exact(value: impl Into<Value>, field: &str) -> Params {
    Params::new().with(field, value)
}

/// Case-insensitive substring match: `{field}__icontains`.
pub fn contains(value: &str, field: &str) -> Params {
    Params::from([(format!("{}__icontains", field), value)])
}

/// Membership: `{field}__in` with the values comma-joined.
pub fn in_values<I>(values: I, field: &str) -> Params
where
    I: IntoIterator,
    I::Item: Display,
{
    let joined = values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",");
    Params::from([(format!("{}__in", field), joined)])
}

/// `order_by`, prefixed with `-` for descending.
pub fn order_by(field: &str, direction: SortDirection) -> Params {
    Params::from([("order_by", format!("{}{}", direction.prefix(), field))])
}

/// A multi-key `order_by`, comma-joined in the given order.
pub fn order_by_multiple(fields: &[(&str, SortDirection)]) -> Params {
    let joined = fields
        .iter()
        .map(|(field, direction)| format!("{}{}", direction.prefix(), field))
        .collect::<Vec<_>>()
        .join(",");
    Params::from([("order_by", joined)])
}

/// A boolean filter sent as the strings `"true"` / `"false"`.
pub fn boolean(value: bool, field: &str) -> Params {
    Params::from([(field, if value { "true" } else { "false" })])
}

/// `{field}__isnull`.
pub fn is_null(field: &str, is_null: bool) -> Params {
    boolean(is_null, &format!("{}__isnull", field))
}

/// A numeric or date range; either bound may be omitted.
pub fn range<T: Into<Value>>(min: Option<T>, max: Option<T>, field: &str) -> Params {
    let mut params = Params::new();
    if let Some(min) = min {
        params.insert(format!("{}__gte", field), min);
    }
    if let Some(max) = max {
        params.insert(format!("{}__lte", field), max);
    }
    params
}

/// Merges filter maps; later maps win on key collisions.
pub fn combine(parts: impl IntoIterator<Item = Params>) -> Params {
    parts.into_iter().fold(Params::new(), Params::merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_json(params: Params) -> Value {
        serde_json::to_value(params).unwrap()
    }

    #[test]
    fn test_date_range() {
        assert_eq!(
            as_json(date_range(Some("2023-01-01"), Some("2023-12-31"), "date_filed")),
            json!({"date_filed__gte": "2023-01-01", "date_filed__lte": "2023-12-31"})
        );
        assert_eq!(
            as_json(date_range(None, Some(""), "date_created")),
            json!({})
        );
        assert_eq!(
            as_json(date_range(Some("not-a-date"), None, "date_filed")),
            json!({"date_filed__gte": "not-a-date"})
        );
    }

    #[test]
    fn test_simple_filters() {
        assert_eq!(as_json(text_search("privacy", "q")), json!({"q": "privacy"}));
        assert_eq!(as_json(exact(42, "cluster")), json!({"cluster": 42}));
        assert_eq!(
            as_json(contains("Smith", "case_name")),
            json!({"case_name__icontains": "Smith"})
        );
        assert_eq!(
            as_json(in_values(["scotus", "ca9", "cadc"], "court")),
            json!({"court__in": "scotus,ca9,cadc"})
        );
        assert_eq!(
            as_json(boolean(false, "has_audio")),
            json!({"has_audio": "false"})
        );
        assert_eq!(
            as_json(is_null("date_terminated", true)),
            json!({"date_terminated__isnull": "true"})
        );
    }

    #[test]
    fn test_ordering() {
        assert_eq!(
            as_json(order_by("date_filed", SortDirection::Asc)),
            json!({"order_by": "date_filed"})
        );
        assert_eq!(
            as_json(order_by_multiple(&[
                ("date_filed", SortDirection::Desc),
                ("case_name", SortDirection::Asc),
            ])),
            json!({"order_by": "-date_filed,case_name"})
        );
        assert_eq!("DESC".parse::<SortDirection>(), Ok(SortDirection::Desc));
        assert!("sideways".parse::<SortDirection>().is_err());
    }

    #[test]
    fn test_range_and_combine() {
        assert_eq!(
            as_json(range(Some(10), None, "citation_count")),
            json!({"citation_count__gte": 10})
        );
        let combined = combine([exact("scotus", "court"), exact("ca9", "court")]);
        assert_eq!(combined.get_str("court"), Some("ca9"));
    }
}
