// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Index store client for an OpenSearch-compatible collection endpoint.

use async_trait::async_trait;
use tracing::debug;

use stackhook_core::error::{HookError, Result};
use stackhook_core::reconcile::{CreateIndexOutcome, IndexStore};

/// HTTP client for the search collection's index API.
#[derive(Debug, Clone)]
pub struct SearchIndexClient {
    endpoint: String,
    http: reqwest::Client,
}

impl SearchIndexClient {
    /// Create a client for a collection endpoint URL.
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl IndexStore for SearchIndexClient {
    async fn create_index(&self, name: &str, definition: &str) -> Result<CreateIndexOutcome> {
        let url = format!("{}/{}", self.endpoint, name);

        let response = self
            .http
            .put(&url)
            .header("content-type", "application/json")
            .body(definition.to_string())
            .send()
            .await
            .map_err(|e| HookError::Store {
                operation: "create_index",
                message: e.to_string(),
            })?;

        let http_status = response.status();
        let body = response.text().await.map_err(|e| HookError::Store {
            operation: "create_index",
            message: e.to_string(),
        })?;

        // The store reports refusals (e.g. an index that already exists)
        // in the body; acknowledgement is decided by the payload, not the
        // HTTP status.
        let acknowledged = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| value.get("acknowledged").and_then(|a| a.as_bool()))
            .unwrap_or(false);

        debug!(index = name, status = %http_status, acknowledged, "create index response");

        Ok(CreateIndexOutcome { acknowledged, body })
    }
}
