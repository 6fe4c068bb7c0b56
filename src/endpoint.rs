//! The generic resource facade.
//!
//! Every CourtListener resource supports the same verbs on the same URL
//! shapes, so a single [`Endpoint`] parameterised by its path segment serves
//! all of them. The typed wrappers in [`resources`](crate::resources) add
//! nothing but a name and, for a few resources, filter shortcuts.

use serde_json::Value;
use std::fmt::Display;

use crate::pagination::Paginator;
use crate::{Client, Params, Payload, Response, Result};

/// CRUD and search verbs for one resource, e.g. `"dockets/"`.
///
/// # Examples
///
/// ```no_run
/// use courtlistener::{Client, Params};
/// use serde_json::json;
///
/// # async fn example() -> Result<(), courtlistener::Error> {
/// let client = Client::builder().api_token("my-token").build()?;
///
/// let alerts = client.alerts();
/// let created = alerts
///     .create(json!({"name": "Privacy", "query": "q=privacy", "rate": "dly"}))
///     .await?;
///
/// if let Some(id) = created.get("id").and_then(|v| v.as_u64()) {
///     alerts.patch(id, json!({"rate": "wly"})).await?;
///     alerts.delete(id).await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Endpoint<'c> {
    client: &'c Client,
    segment: &'static str,
}

impl<'c> Endpoint<'c> {
    pub(crate) fn new(client: &'c Client, segment: &'static str) -> Self {
        Self { client, segment }
    }

    /// The resource's path segment, with its trailing slash.
    pub fn segment(&self) -> &'static str {
        self.segment
    }

    /// The client this facade issues requests through.
    pub fn client(&self) -> &'c Client {
        self.client
    }

    fn item_path(&self, id: impl Display) -> String {
        format!("{}{}/", self.segment, id)
    }

    /// GET `{segment}` with filters.
    pub async fn list(&self, params: Params) -> Result<Response<Payload>> {
        self.client.get(self.segment, params).await
    }

    /// GET `{segment}{id}/`.
    pub async fn get(&self, id: impl Display, params: Params) -> Result<Response<Payload>> {
        self.client.get(self.item_path(id), params).await
    }

    /// POST `{segment}` with a JSON body.
    pub async fn create(&self, data: Value) -> Result<Response<Payload>> {
        self.client.post(self.segment, data).await
    }

    /// PUT `{segment}{id}/` with a JSON body.
    pub async fn update(&self, id: impl Display, data: Value) -> Result<Response<Payload>> {
        self.client.put(self.item_path(id), data).await
    }

    /// PATCH `{segment}{id}/` with a JSON body.
    pub async fn patch(&self, id: impl Display, data: Value) -> Result<Response<Payload>> {
        self.client.patch(self.item_path(id), data).await
    }

    /// DELETE `{segment}{id}/`.
    pub async fn delete(&self, id: impl Display) -> Result<Response<Payload>> {
        self.client.delete(self.item_path(id)).await
    }

    /// GET `{segment}search/`.
    pub async fn search(&self, params: Params) -> Result<Response<Payload>> {
        self.client
            .get(format!("{}search/", self.segment), params)
            .await
    }

    /// GET a sub-resource of one record: `{segment}{id}/{sub}`.
    ///
    /// `sub` should carry its own trailing slash, e.g. `"parties/"`.
    pub async fn nested(
        &self,
        id: impl Display,
        sub: &str,
        params: Params,
    ) -> Result<Response<Payload>> {
        self.client
            .get(format!("{}{}/{}", self.segment, id, sub), params)
            .await
    }

    /// GET a collection-level action: `{segment}{sub}`.
    pub async fn action(&self, sub: &str, params: Params) -> Result<Response<Payload>> {
        self.client
            .get(format!("{}{}", self.segment, sub), params)
            .await
    }

    /// Walks every page of [`list`](Self::list) results.
    pub fn paginate(&self, params: Params) -> Paginator<'c> {
        Paginator::new(self.client, self.segment, params)
    }
}
