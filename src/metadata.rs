//! Request descriptor types.

use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde_json::Value;

use crate::Params;

/// Everything needed to issue one logical API call.
///
/// Created per call and dropped once the call resolves. The path is relative
/// to the configured base URL (e.g. `"dockets/123/"`), or an absolute URL
/// such as a pagination `next` link.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// The HTTP method (GET, POST, etc.).
    pub method: Method,

    /// The request path, relative to the base URL.
    pub path: String,

    /// Additional headers for this request, on top of the client defaults.
    pub headers: HeaderMap,

    /// Query parameters for this request.
    pub query: Params,

    /// JSON body for this request.
    pub body: Option<Value>,
}

impl RequestMetadata {
    /// Creates a new `RequestMetadata` with the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            query: Params::new(),
            body: None,
        }
    }

    /// Adds a header to the request.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`](crate::Error::Api) with no status if the
    /// header name or value is invalid.
    pub fn with_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, crate::Error> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| invalid_request(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| invalid_request(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Adds a query parameter to the request.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.query.insert(key, value);
        self
    }

    /// Adds multiple query parameters to the request.
    pub fn with_query(mut self, params: Params) -> Self {
        self.query.extend(params);
        self
    }

    /// Sets the JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

fn invalid_request(message: String) -> crate::Error {
    crate::Error::Api {
        message,
        status: None,
        body: None,
    }
}
