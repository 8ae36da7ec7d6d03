// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Index provisioning hook.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use stackhook_client::SearchIndexClient;
use stackhook_core::config::IndexHookConfig;
use stackhook_core::definition::IndexDefinition;
use stackhook_core::error::{HookError, Result};
use stackhook_core::lifecycle::{Hook, LifecycleRequest};
use stackhook_core::reconcile::{ReconcileOutcome, ReconcilePolicy, ensure_index};

/// Provisions the knowledge-base vector index in the search collection.
pub struct IndexHook {
    config: IndexHookConfig,
    store: SearchIndexClient,
    policy: ReconcilePolicy,
    cancel: CancellationToken,
}

impl IndexHook {
    /// Build the hook from its configuration.
    pub fn new(config: IndexHookConfig, cancel: CancellationToken) -> Self {
        let store = SearchIndexClient::new(&config.search_endpoint);
        Self {
            config,
            store,
            policy: ReconcilePolicy::default(),
            cancel,
        }
    }

    /// Override the retry policy (tests use short delays).
    pub fn with_policy(mut self, policy: ReconcilePolicy) -> Self {
        self.policy = policy;
        self
    }
}

#[async_trait]
impl Hook for IndexHook {
    fn default_physical_id(&self) -> &str {
        &self.config.index_name
    }

    async fn apply(&self, _request: &LifecycleRequest) -> Result<()> {
        let definition =
            IndexDefinition::new(&self.config.index_name, self.config.vector_dimension);

        let outcome = ensure_index(
            &self.store,
            &self.config.index_name,
            &definition.to_json(),
            &self.policy,
            &self.cancel,
        )
        .await?;

        match outcome {
            ReconcileOutcome::Acknowledged { body } => {
                info!(index = %self.config.index_name, body = %body, "index provisioned");
                Ok(())
            }
            ReconcileOutcome::Exhausted { last_body } => {
                warn!(
                    index = %self.config.index_name,
                    last_body = ?last_body,
                    "index store never acknowledged the index"
                );
                Err(HookError::NotAcknowledged {
                    attempts: self.policy.max_attempts,
                })
            }
        }
    }
}
