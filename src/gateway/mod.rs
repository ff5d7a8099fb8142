//! Query/mutation gateway: the single GraphQL transport.
//!
//! Attaches the persisted bearer token to every outgoing request and
//! normalizes failures into the [`ClientError`] taxonomy. A 401 observed here
//! forces a logout regardless of which view issued the request.

use std::sync::Arc;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::QueryCache;
use crate::errors::ClientError;
use crate::session::SessionHandle;
use crate::token::TokenStore;

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlErrorEntry>,
}

#[derive(Deserialize)]
struct GraphQlErrorEntry {
    message: String,
}

/// GraphQL gateway over a single HTTP endpoint.
pub struct Gateway {
    http: reqwest::Client,
    endpoint: String,
    tokens: Arc<dyn TokenStore>,
    cache: Arc<QueryCache>,
    session: SessionHandle,
}

impl Gateway {
    pub fn new(
        endpoint: &str,
        tokens: Arc<dyn TokenStore>,
        cache: Arc<QueryCache>,
        session: SessionHandle,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.to_string(),
            tokens,
            cache,
            session,
        }
    }

    /// Execute a GraphQL document and return the raw `data` object.
    pub async fn execute(&self, document: &str, variables: Value) -> Result<Value, ClientError> {
        let mut request = self.http.post(&self.endpoint).json(&GraphQlRequest {
            query: document,
            variables,
        });

        if let Some(token) = self.tokens.load() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            self.force_logout();
            return Err(ClientError::Unauthorized(
                "Request rejected with 401".to_string(),
            ));
        }

        let body: GraphQlResponse = response.json().await?;

        if let Some(first) = body.errors.into_iter().next() {
            tracing::debug!("GraphQL error: {}", first.message);
            return Err(ClientError::GraphQl(first.message));
        }

        body.data
            .ok_or_else(|| ClientError::Internal("Response carried no data".to_string()))
    }

    /// Execute a document and deserialize one field of the `data` object.
    pub async fn query<T: DeserializeOwned>(
        &self,
        document: &str,
        field: &str,
        variables: Value,
    ) -> Result<T, ClientError> {
        let data = self.execute(document, variables).await?;
        let value = data.get(field).cloned().ok_or_else(|| {
            ClientError::Internal(format!("Response missing field `{}`", field))
        })?;
        Ok(serde_json::from_value(value)?)
    }

    /// Clear session, token, and cache after an observed 401.
    fn force_logout(&self) {
        tracing::warn!("401 received; clearing session and persisted token");
        self.tokens.clear();
        self.cache.clear();
        *self.session.write().unwrap() = None;
    }
}
