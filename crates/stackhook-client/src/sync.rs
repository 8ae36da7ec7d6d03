// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Knowledge sync service client.
//!
//! Speaks the service's ingestion-job REST API:
//!
//! - `POST {endpoint}/knowledgebases/{kb}/datasources/{ds}/ingestionjobs/`
//!   with a client token starts a job
//! - `GET  {endpoint}/knowledgebases/{kb}/datasources/{ds}/ingestionjobs/{job}`
//!   reports its status

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use stackhook_core::error::{HookError, Result};
use stackhook_core::sync::{SyncClient, SyncStatus};

/// HTTP client for the knowledge sync service.
#[derive(Debug, Clone)]
pub struct KnowledgeSyncClient {
    endpoint: String,
    http: reqwest::Client,
}

impl KnowledgeSyncClient {
    /// Create a client for a sync service endpoint URL.
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    fn jobs_url(&self, knowledge_base_id: &str, data_source_id: &str) -> String {
        format!(
            "{}/knowledgebases/{}/datasources/{}/ingestionjobs/",
            self.endpoint, knowledge_base_id, data_source_id
        )
    }
}

fn sync_error(operation: &'static str, message: impl ToString) -> HookError {
    HookError::Sync {
        operation,
        message: message.to_string(),
    }
}

/// Pull a string field out of the service's `ingestionJob` envelope.
fn job_field<'a>(body: &'a Value, field: &str, operation: &'static str) -> Result<&'a str> {
    body.pointer(&format!("/ingestionJob/{field}"))
        .and_then(Value::as_str)
        .ok_or_else(|| sync_error(operation, format!("response missing ingestionJob.{field}")))
}

#[async_trait]
impl SyncClient for KnowledgeSyncClient {
    async fn start_sync(
        &self,
        knowledge_base_id: &str,
        data_source_id: &str,
        client_token: &str,
    ) -> Result<String> {
        let url = self.jobs_url(knowledge_base_id, data_source_id);

        let body: Value = self
            .http
            .post(&url)
            .json(&json!({ "clientToken": client_token }))
            .send()
            .await
            .map_err(|e| sync_error("start_sync", e))?
            .error_for_status()
            .map_err(|e| sync_error("start_sync", e))?
            .json()
            .await
            .map_err(|e| sync_error("start_sync", e))?;

        let job_id = job_field(&body, "ingestionJobId", "start_sync")?;
        debug!(job_id, "ingestion job submitted");
        Ok(job_id.to_string())
    }

    async fn sync_status(
        &self,
        job_id: &str,
        knowledge_base_id: &str,
        data_source_id: &str,
    ) -> Result<SyncStatus> {
        let url = format!(
            "{}{}",
            self.jobs_url(knowledge_base_id, data_source_id),
            job_id
        );

        let body: Value = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| sync_error("sync_status", e))?
            .error_for_status()
            .map_err(|e| sync_error("sync_status", e))?
            .json()
            .await
            .map_err(|e| sync_error("sync_status", e))?;

        let raw = job_field(&body, "status", "sync_status")?;
        Ok(SyncStatus::from_service(raw))
    }
}
