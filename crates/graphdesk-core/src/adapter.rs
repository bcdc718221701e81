//! Dual-convention request routing
//!
//! The backend grew two incompatible parameter conventions. Typed-collection
//! endpoints expect space/graph embedded in the request path's query string
//! for mutations and a windowed read; graph-object endpoints take a parallel
//! parameter list for everything. Which convention applies is an explicit tag
//! on the endpoint descriptor, supplied by the call site.
//!
//! The adapter routes an already-validated call and nothing more: no retries,
//! no caching, no state checks. Errors propagate unchanged.

use serde_json::Value as JsonValue;

use crate::error::GraphdeskError;
use crate::transport::ApiTransport;
use crate::types::GraphContext;

/// The backend parameter convention an endpoint follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndpointFamily {
    TypedCollection,
    GraphObject,
}

/// A backend endpoint plus its parameter convention.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct Endpoint {
    pub path: String,
    pub family: EndpointFamily,
}

impl Endpoint {
    pub fn typed_collection(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            family: EndpointFamily::TypedCollection,
        }
    }

    pub fn graph_object(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            family: EndpointFamily::GraphObject,
        }
    }
}

/// Routes reads and writes through the convention of the target endpoint.
pub struct ApiAdapter<T> {
    transport: T,
}

impl<T: ApiTransport> ApiAdapter<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Read one object by its (percent-encoded) route identifier.
    pub async fn read(
        &self,
        endpoint: &Endpoint,
        ctx: &GraphContext,
        route_id: &str,
    ) -> Result<JsonValue, GraphdeskError> {
        let mut query = vec![
            ("spaceId".to_string(), ctx.space_id.clone()),
            ("graphId".to_string(), decode(&ctx.graph_id)),
            ("uri".to_string(), decode(route_id)),
        ];
        if endpoint.family == EndpointFamily::TypedCollection {
            query.push(("pageSize".to_string(), "1".to_string()));
            query.push(("offset".to_string(), "0".to_string()));
        }
        self.transport.get(&endpoint.path, &query).await
    }

    /// Read a window of a collection.
    pub async fn list(
        &self,
        endpoint: &Endpoint,
        ctx: &GraphContext,
        page_size: usize,
        offset: usize,
    ) -> Result<JsonValue, GraphdeskError> {
        let query = vec![
            ("spaceId".to_string(), ctx.space_id.clone()),
            ("graphId".to_string(), decode(&ctx.graph_id)),
            ("pageSize".to_string(), page_size.to_string()),
            ("offset".to_string(), offset.to_string()),
        ];
        self.transport.get(&endpoint.path, &query).await
    }

    /// Create a new object from the serialized entity payload.
    pub async fn create(
        &self,
        endpoint: &Endpoint,
        ctx: &GraphContext,
        payload: &JsonValue,
    ) -> Result<JsonValue, GraphdeskError> {
        match endpoint.family {
            EndpointFamily::TypedCollection => {
                let path = embed(
                    &endpoint.path,
                    &[
                        ("spaceId", ctx.space_id.as_str()),
                        ("graphId", &decode(&ctx.graph_id)),
                    ],
                );
                self.transport.post(&path, &[], payload).await
            }
            EndpointFamily::GraphObject => {
                let query = vec![
                    ("spaceId".to_string(), ctx.space_id.clone()),
                    ("graphId".to_string(), decode(&ctx.graph_id)),
                ];
                self.transport.post(&endpoint.path, &query, payload).await
            }
        }
    }

    /// Update an existing object, replacing it with the payload.
    pub async fn update(
        &self,
        endpoint: &Endpoint,
        ctx: &GraphContext,
        route_id: &str,
        payload: &JsonValue,
    ) -> Result<JsonValue, GraphdeskError> {
        match endpoint.family {
            EndpointFamily::TypedCollection => {
                let path = embed(
                    &endpoint.path,
                    &[
                        ("spaceId", ctx.space_id.as_str()),
                        ("graphId", &decode(&ctx.graph_id)),
                    ],
                );
                self.transport.put(&path, &[], payload).await
            }
            EndpointFamily::GraphObject => {
                let query = vec![
                    ("spaceId".to_string(), ctx.space_id.clone()),
                    ("graphId".to_string(), decode(&ctx.graph_id)),
                    ("uri".to_string(), decode(route_id)),
                ];
                self.transport.put(&endpoint.path, &query, payload).await
            }
        }
    }

    /// Delete one object. Parameters follow the update convention of the
    /// endpoint's family; there is no body.
    pub async fn delete(
        &self,
        endpoint: &Endpoint,
        ctx: &GraphContext,
        route_id: &str,
    ) -> Result<JsonValue, GraphdeskError> {
        match endpoint.family {
            EndpointFamily::TypedCollection => {
                let path = embed(
                    &endpoint.path,
                    &[
                        ("spaceId", ctx.space_id.as_str()),
                        ("graphId", &decode(&ctx.graph_id)),
                        ("uri", &decode(route_id)),
                    ],
                );
                self.transport.delete(&path, &[]).await
            }
            EndpointFamily::GraphObject => {
                let query = vec![
                    ("spaceId".to_string(), ctx.space_id.clone()),
                    ("graphId".to_string(), decode(&ctx.graph_id)),
                    ("uri".to_string(), decode(route_id)),
                ];
                self.transport.delete(&endpoint.path, &query).await
            }
        }
    }
}

fn decode(value: &str) -> String {
    urlencoding::decode(value)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

/// Append the pairs to the path as a query string.
fn embed(path: &str, pairs: &[(&str, &str)]) -> String {
    let query = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs)
        .finish();
    format!("{path}?{query}")
}
