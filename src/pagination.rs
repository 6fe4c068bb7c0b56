//! Pagination helpers for list and search responses.
//!
//! List endpoints answer with an envelope of `count`, `next`, `previous`
//! and `results`. The orchestrator never looks inside it; these helpers do.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashSet;
use url::Url;

use crate::{Client, Params, Payload, Record, Result};

/// The page size the API uses when none is requested.
pub const DEFAULT_PER_PAGE: u64 = 20;

/// Page-number parameters: `{page, per_page}`.
///
/// ```
/// use courtlistener::pagination::page_params;
///
/// let params = page_params(2, 50);
/// assert_eq!(params.get("page"), Some(&2.into()));
/// assert_eq!(params.get("per_page"), Some(&50.into()));
/// ```
pub fn page_params(page: u64, per_page: u64) -> Params {
    Params::from([("page", page), ("per_page", per_page)])
}

/// Cursor parameters: `per_page`, plus `cursor` when one is given.
pub fn cursor_params(cursor: Option<&str>, per_page: u64) -> Params {
    let mut params = Params::from([("per_page", per_page)]);
    if let Some(cursor) = cursor.filter(|c| !c.is_empty()) {
        params.insert("cursor", cursor);
    }
    params
}

/// One page of a list or search response.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Page {
    /// Total matching records, when the API reports a number.
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: Option<u64>,
    /// Link to the following page.
    #[serde(default)]
    pub next: Option<String>,
    /// Link to the preceding page.
    #[serde(default)]
    pub previous: Option<String>,
    /// The records on this page.
    #[serde(default)]
    pub results: Vec<Value>,
}

impl Page {
    /// Reads the envelope out of a payload.
    ///
    /// Returns `None` unless the payload is a JSON object with a `results`
    /// array.
    pub fn from_payload(payload: &Payload) -> Option<Self> {
        let value = payload.as_json()?;
        if !value.get("results")?.is_array() {
            return None;
        }
        Self::deserialize(value).ok()
    }

    /// The results that are JSON objects.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.results.iter().filter_map(Value::as_object)
    }
}

// v4 cursor endpoints may report `count` as a URL rather than a number.
fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_u64()))
}

/// Summary of a page envelope, derived from its fields and `next` link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageInfo {
    /// Total matching records; 0 when absent.
    pub count: u64,
    /// Link to the following page.
    pub next: Option<String>,
    /// Link to the preceding page.
    pub previous: Option<String>,
    /// One less than the `page` in the `next` link, never below 1.
    pub current_page: u64,
    /// `count / per_page`, rounded up.
    pub total_pages: u64,
    /// The `per_page` in the `next` link, or the API default.
    pub per_page: u64,
}

impl PageInfo {
    /// Inspects a decoded list response.
    ///
    /// ```
    /// use courtlistener::pagination::PageInfo;
    /// use serde_json::json;
    ///
    /// let info = PageInfo::from_value(&json!({
    ///     "count": 95,
    ///     "next": "https://www.courtlistener.com/api/rest/v4/dockets/?page=3&per_page=10",
    ///     "previous": null,
    ///     "results": []
    /// }));
    /// assert_eq!(info.current_page, 2);
    /// assert_eq!(info.per_page, 10);
    /// assert_eq!(info.total_pages, 10);
    /// ```
    pub fn from_value(value: &Value) -> Self {
        let count = value.get("count").and_then(Value::as_u64).unwrap_or(0);
        let next = value.get("next").and_then(Value::as_str).map(str::to_string);
        let previous = value
            .get("previous")
            .and_then(Value::as_str)
            .map(str::to_string);

        let link_param = |name: &str| -> Option<u64> {
            let link = Url::parse(next.as_deref()?).ok()?;
            let (_, value) = link.query_pairs().find(|(key, _)| key == name)?;
            value.parse().ok()
        };

        let per_page = link_param("per_page").unwrap_or(DEFAULT_PER_PAGE);
        let current_page = match &next {
            Some(_) => link_param("page").unwrap_or(2).saturating_sub(1).max(1),
            None => 1,
        };
        let total_pages = if per_page > 0 {
            count.div_ceil(per_page)
        } else {
            1
        };

        Self {
            count,
            next,
            previous,
            current_page,
            total_pages,
            per_page,
        }
    }
}

/// Fetches successive pages of a list by following `next` links.
///
/// Each link's query string is merged over the starting parameters and
/// requested against the starting path. Iteration stops when a page has no
/// `next` link, when a link repeats, or when a response is not a page
/// envelope.
///
/// # Examples
///
/// ```no_run
/// use courtlistener::{Client, Params};
///
/// # async fn example() -> Result<(), courtlistener::Error> {
/// let client = Client::builder().api_token("my-token").build()?;
///
/// let mut pages = client.courts().paginate(Params::from([("jurisdiction", "F")]));
/// while let Some(page) = pages.next_page().await? {
///     for court in page.records() {
///         println!("{:?}", court.get("full_name"));
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Paginator<'c> {
    client: &'c Client,
    path: String,
    params: Params,
    next: Option<String>,
    seen: HashSet<String>,
    started: bool,
}

impl<'c> Paginator<'c> {
    pub(crate) fn new(client: &'c Client, path: impl Into<String>, params: Params) -> Self {
        Self {
            client,
            path: path.into(),
            params,
            next: None,
            seen: HashSet::new(),
            started: false,
        }
    }

    /// Fetches the next page, or `Ok(None)` once the list is exhausted.
    ///
    /// # Errors
    ///
    /// Any error from the underlying request.
    pub async fn next_page(&mut self) -> Result<Option<Page>> {
        let params = if !self.started {
            self.started = true;
            self.params.clone()
        } else {
            match self.next.take() {
                Some(link) => self.params.clone().merged(link_params(&link)),
                None => return Ok(None),
            }
        };

        let response = self.client.get(self.path.clone(), params).await?;

        let Some(page) = Page::from_payload(&response.data) else {
            tracing::warn!(path = %self.path, "Response is not a page envelope; stopping pagination");
            return Ok(None);
        };

        self.next = match &page.next {
            Some(link) if !self.seen.insert(link.clone()) => {
                tracing::warn!(next = %link, "Pagination link repeated; stopping");
                None
            }
            other => other.clone(),
        };

        Ok(Some(page))
    }

    /// Collects results across pages, stopping after `limit` items if given.
    pub async fn collect_results(mut self, limit: Option<usize>) -> Result<Vec<Value>> {
        if limit == Some(0) {
            return Ok(Vec::new());
        }

        let mut results = Vec::new();

        while let Some(page) = self.next_page().await? {
            results.extend(page.results);
            if let Some(limit) = limit {
                if results.len() >= limit {
                    results.truncate(limit);
                    break;
                }
            }
        }

        Ok(results)
    }
}

fn link_params(link: &str) -> Params {
    match Url::parse(link) {
        Ok(url) => url.query_pairs().into_owned().collect(),
        Err(e) => {
            tracing::warn!(next = %link, error = %e, "Unparseable pagination link");
            Params::new()
        }
    }
}
