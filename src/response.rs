//! Decoded response bodies and the wrapper carrying call metadata.
//!
//! Successful calls yield a [`Response<Payload>`]. The payload is lenient:
//! a body that is empty or is not JSON comes back as [`Payload::Text`]
//! rather than an error, so callers that care must check which variant they
//! received.

use http::{HeaderMap, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

/// A plain structural record: the JSON object returned for one resource.
pub type Record = serde_json::Map<String, Value>;

/// The decoded body of a successful response.
///
/// # Examples
///
/// ```
/// use courtlistener::Payload;
///
/// let payload = Payload::decode(r#"{"id": 1, "case_name": "Roe v. Wade"}"#);
/// assert_eq!(payload.get("case_name").and_then(|v| v.as_str()), Some("Roe v. Wade"));
///
/// let payload = Payload::decode("<html>maintenance</html>");
/// assert_eq!(payload.as_text(), Some("<html>maintenance</html>"));
///
/// assert_eq!(Payload::decode(""), Payload::Text(String::new()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The body parsed as JSON.
    Json(Value),
    /// The body was empty or not valid JSON; this is the raw text.
    Text(String),
}

impl Payload {
    /// Decodes a response body.
    ///
    /// Empty bodies become `Text("")`, unparseable bodies become
    /// `Text(body)`, anything else becomes `Json`.
    pub fn decode(body: &str) -> Self {
        if body.is_empty() {
            return Payload::Text(String::new());
        }
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Payload::Json(value),
            Err(_) => Payload::Text(body.to_string()),
        }
    }

    /// Returns `true` if the body parsed as JSON.
    pub fn is_json(&self) -> bool {
        matches!(self, Payload::Json(_))
    }

    /// Returns the JSON value, if any.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Text(_) => None,
        }
    }

    /// Returns the raw text, if the body was not JSON.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            Payload::Json(_) => None,
        }
    }

    /// Returns the JSON object, if the body was one.
    pub fn as_record(&self) -> Option<&Record> {
        self.as_json()?.as_object()
    }

    /// Consumes the payload, returning the JSON value if any.
    pub fn into_json(self) -> Option<Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Text(_) => None,
        }
    }

    /// Looks up a top-level field of a JSON object body.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_record()?.get(key)
    }

    /// Returns the `results` array of a list or search envelope.
    pub fn results(&self) -> Option<&Vec<Value>> {
        self.get("results")?.as_array()
    }

    /// Deserializes a JSON body into `T`.
    ///
    /// A text payload is offered to serde as a JSON string, so `T = String`
    /// accepts it and structured types reject it.
    pub fn deserialize<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        match self {
            Payload::Json(value) => T::deserialize(value),
            Payload::Text(text) => T::deserialize(Value::String(text.clone())),
        }
    }
}

/// A successful response and its call metadata.
///
/// # Examples
///
/// ```no_run
/// use courtlistener::{Client, Params};
///
/// # async fn example() -> Result<(), courtlistener::Error> {
/// let client = Client::builder().api_token("my-token").build()?;
/// let response = client.courts().list(Params::new()).await?;
///
/// println!("Status: {}", response.status);
/// println!("Took {:?} over {} attempt(s)", response.latency, response.attempts);
/// if let Some(results) = response.results() {
///     println!("{} courts on this page", results.len());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The decoded response data.
    pub data: T,

    /// The raw response body as a string.
    pub raw_body: String,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// The total latency of the call, including all retry attempts and delays.
    pub latency: Duration,

    /// The number of attempts made to complete this call.
    pub attempts: usize,
}

impl<T> Response<T> {
    /// Creates a new `Response`.
    pub fn new(
        data: T,
        raw_body: String,
        status: StatusCode,
        headers: HeaderMap,
        latency: Duration,
        attempts: usize,
    ) -> Self {
        Self {
            data,
            raw_body,
            status,
            headers,
            latency,
            attempts,
        }
    }

    /// Maps the response data to a different type, keeping the metadata.
    pub fn map<U, F>(self, f: F) -> Response<U>
    where
        F: FnOnce(T) -> U,
    {
        Response {
            data: f(self.data),
            raw_body: self.raw_body,
            status: self.status,
            headers: self.headers,
            latency: self.latency,
            attempts: self.attempts,
        }
    }

    /// Returns `true` if the call needed more than one attempt.
    pub fn was_retried(&self) -> bool {
        self.attempts > 1
    }

    /// Returns a header value by name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

impl<T> AsRef<T> for Response<T> {
    fn as_ref(&self) -> &T {
        &self.data
    }
}

impl<T> std::ops::Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}
