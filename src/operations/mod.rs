//! Typed GraphQL operation catalog.
//!
//! One file per entity area, mirroring the backend schema. Reference
//! collections (doctors, patients, branches, mappings) read through the shared
//! cache; appointment queries always hit the network because their result is
//! scoped per requester.

mod appointments;
mod auth;
mod branches;
mod records;
mod users;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cache::{Collection, QueryCache};
use crate::errors::ClientError;
use crate::gateway::Gateway;

/// Facade over every GraphQL operation the client issues.
pub struct Api {
    gateway: Arc<Gateway>,
    cache: Arc<QueryCache>,
}

impl Api {
    pub fn new(gateway: Arc<Gateway>, cache: Arc<QueryCache>) -> Self {
        Self { gateway, cache }
    }

    pub(crate) fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    pub(crate) fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Read-through list fetch for a cached reference collection.
    pub(crate) async fn cached_list<T: DeserializeOwned>(
        &self,
        collection: Collection,
        document: &str,
        field: &str,
    ) -> Result<Vec<T>, ClientError> {
        let raw = match self.cache.get_all(collection) {
            Some(cached) => cached,
            None => {
                let fetched: Vec<Value> = self
                    .gateway
                    .query(document, field, serde_json::json!({}))
                    .await?;
                self.cache.store_all(collection, &fetched);
                fetched
            }
        };

        raw.into_iter()
            .map(|v| serde_json::from_value(v).map_err(ClientError::from))
            .collect()
    }
}
