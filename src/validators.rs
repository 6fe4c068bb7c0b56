//! Local sanity checks for values before they are sent to the API.
//!
//! All validators return `bool`; none of them contact the server.

use chrono::NaiveDate;
use regex::RegexSet;
use serde_json::Value;
use url::Url;

use crate::Params;

// `(?-u)` restricts `\d`, `\w` and `\s` to ASCII.
const CITATION_PATTERNS: &[&str] = &[
    r"(?-u)^\d+\s+U\.S\.\s+\d+$",
    r"(?-u)^\d+\s+F\.\s*\d+$",
    r"(?-u)^\d+\s+F\.\s*Supp\.\s*\d+$",
    r"(?-u)^\d+\s+[A-Za-z]+\.?\s*[A-Za-z]*\.?\s*\d+$",
];

const DOCKET_NUMBER_PATTERNS: &[&str] = &[
    r"(?-u)^\d+-\d+-\w+-\d+$",
    r"(?-u)^\d+:\d+-\w+-\d+$",
    r"(?-u)^\d+-\w+-\d+$",
    r"(?-u)^\d+$",
    r"(?-u)^\d+-\d+$",
];

const COURT_ID_PATTERN: &str = r"^[a-zA-Z0-9_-]+$";

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$";

fn matches_any(patterns: &[&str], text: &str) -> bool {
    match RegexSet::new(patterns) {
        Ok(set) => set.is_match(text),
        Err(e) => {
            tracing::error!(error = %e, "Invalid validator pattern");
            false
        }
    }
}

/// A calendar date written exactly as `YYYY-MM-DD`.
///
/// ```
/// use courtlistener::validators::validate_date;
///
/// assert!(validate_date("2024-02-29"));
/// assert!(!validate_date("2023-02-29"));
/// assert!(!validate_date("2023-2-1"));
/// ```
pub fn validate_date(date: &str) -> bool {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map(|parsed| parsed.format("%Y-%m-%d").to_string() == date)
        .unwrap_or(false)
}

/// A reporter citation such as `410 U.S. 113` or `123 F. Supp. 456`.
pub fn validate_citation(citation: &str) -> bool {
    !citation.is_empty() && matches_any(CITATION_PATTERNS, citation)
}

/// A docket number such as `1:23-cv-456`, `1-23-cv-456` or `12345`.
pub fn validate_docket_number(docket_number: &str) -> bool {
    !docket_number.is_empty() && matches_any(DOCKET_NUMBER_PATTERNS, docket_number)
}

/// A court identifier: letters, digits, `-` and `_`.
pub fn validate_court_id(court_id: &str) -> bool {
    matches_any(&[COURT_ID_PATTERN], court_id)
}

/// A plausibly shaped API token (at least 20 characters).
pub fn validate_api_token(token: &str) -> bool {
    token.len() >= 20
}

/// A positive integer id, given as a JSON number or a string of digits.
pub fn validate_id(id: &Value) -> bool {
    match id {
        Value::Number(n) => n.as_u64().is_some_and(|n| n > 0),
        Value::String(s) => {
            !s.is_empty()
                && s.bytes().all(|b| b.is_ascii_digit())
                && !s.trim_start_matches('0').is_empty()
        }
        _ => false,
    }
}

/// An absolute `http` or `https` URL with a host.
pub fn validate_url(url: &str) -> bool {
    Url::parse(url)
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false)
}

/// A search query of at least two non-blank characters.
pub fn validate_search_query(query: &str) -> bool {
    query.trim_ascii().len() >= 2
}

/// A value that is present: not `null`, not a blank string and not an
/// empty array or object. Numbers and booleans always count.
pub fn validate_required(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim_ascii().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// An email address with a dotted domain, such as `clerk@uscourts.gov`.
pub fn validate_email(email: &str) -> bool {
    let Some((local, _)) = email.split_once('@') else {
        return false;
    };
    local.len() <= 64
        && !local.starts_with('.')
        && !local.ends_with('.')
        && !local.contains("..")
        && matches_any(&[EMAIL_PATTERN], email)
}

/// A US phone number: 10 or 11 ASCII digits once formatting is stripped.
pub fn validate_phone(phone: &str) -> bool {
    let digits = phone.bytes().filter(u8::is_ascii_digit).count();
    (10..=11).contains(&digits)
}

/// A case name of at least three characters containing a letter.
pub fn validate_case_name(case_name: &str) -> bool {
    named(case_name, 3)
}

/// A judge name of at least five characters containing a letter.
pub fn validate_judge_name(judge_name: &str) -> bool {
    named(judge_name, 5)
}

fn named(name: &str, min_len: usize) -> bool {
    name.trim_ascii().len() >= min_len && name.bytes().any(|b| b.is_ascii_alphabetic())
}

/// `page` (>= 1) and `per_page` (1..=100), when present, are integers in range.
pub fn validate_pagination_params(params: &Params) -> bool {
    let page_ok = params
        .get("page")
        .map_or(true, |v| v.as_i64().is_some_and(|p| p >= 1));
    let per_page_ok = params
        .get("per_page")
        .map_or(true, |v| v.as_i64().is_some_and(|p| (1..=100).contains(&p)));
    page_ok && per_page_ok
}

/// Date bounds (`date_created__*`, else `date_filed__*`) are valid dates
/// and the start is not after the end.
pub fn validate_date_range_params(params: &Params) -> bool {
    let bound = |created: &str, filed: &str| {
        params
            .get_str(created)
            .or_else(|| params.get_str(filed))
            .filter(|s| !s.is_empty())
    };
    let start = bound("date_created__gte", "date_filed__gte");
    let end = bound("date_created__lte", "date_filed__lte");

    if start.is_some_and(|s| !validate_date(s)) || end.is_some_and(|e| !validate_date(e)) {
        return false;
    }

    match (start, end) {
        (Some(start), Some(end)) => {
            match (
                NaiveDate::parse_from_str(start, "%Y-%m-%d"),
                NaiveDate::parse_from_str(end, "%Y-%m-%d"),
            ) {
                (Ok(start), Ok(end)) => start <= end,
                _ => false,
            }
        }
        _ => true,
    }
}

/// Pagination, date range and `q` checks combined.
pub fn validate_filters(params: &Params) -> bool {
    if !validate_pagination_params(params) || !validate_date_range_params(params) {
        return false;
    }
    match params.get("q") {
        Some(Value::String(q)) => validate_search_query(q),
        Some(_) => false,
        None => true,
    }
}
