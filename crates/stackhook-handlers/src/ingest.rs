// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Knowledge sync hook.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::info;

use stackhook_client::KnowledgeSyncClient;
use stackhook_core::config::IngestHookConfig;
use stackhook_core::error::Result;
use stackhook_core::lifecycle::{Hook, LifecycleRequest};
use stackhook_core::sync::{SyncPolicy, run_sync};

/// Drives a knowledge sync job for the configured data source.
pub struct IngestHook {
    config: IngestHookConfig,
    client: KnowledgeSyncClient,
    policy: SyncPolicy,
    cancel: CancellationToken,
}

impl IngestHook {
    /// Build the hook from its configuration.
    pub fn new(config: IngestHookConfig, cancel: CancellationToken) -> Self {
        let client = KnowledgeSyncClient::new(&config.sync_endpoint);
        Self {
            config,
            client,
            policy: SyncPolicy::default(),
            cancel,
        }
    }

    /// Override the polling policy (tests use short delays).
    pub fn with_policy(mut self, policy: SyncPolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[async_trait]
impl Hook for IngestHook {
    fn default_physical_id(&self) -> &str {
        &self.config.data_source_id
    }

    async fn apply(&self, _request: &LifecycleRequest) -> Result<()> {
        let status = run_sync(
            &self.client,
            &self.config.knowledge_base_id,
            &self.config.data_source_id,
            &self.policy,
            &self.cancel,
        )
        .await?;

        // A finished job is the outcome; its terminal state is
        // informational only.
        info!(
            knowledge_base = %self.config.knowledge_base_id,
            data_source = %self.config.data_source_id,
            status = %status,
            "knowledge sync finished"
        );
        Ok(())
    }
}
