// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! One-shot knowledge sync job submission and polling.
//!
//! The sync service owns the job resource; this module only submits it
//! and observes its status until it leaves the running states. There is
//! no iteration bound on the poll loop. The effective ceiling is the
//! invocation deadline, surfaced through the cancellation token.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::Result;
use crate::reconcile::sleep_or_cancel;

/// Delay between job status polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Observed state of an ingestion job, as reported by the sync service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncStatus {
    /// The service accepted the job but has not begun ingesting
    Starting,
    /// Ingestion is underway
    InProgress,
    /// The job finished successfully
    Complete,
    /// The job finished with an error
    Failed,
    /// The job was stopped before finishing
    Stopped,
    /// A service-defined state outside the known set; treated as terminal
    Other(String),
}

impl SyncStatus {
    /// Whether the job is still running and should be polled again.
    pub fn is_running(&self) -> bool {
        matches!(self, SyncStatus::Starting | SyncStatus::InProgress)
    }

    /// Parse a status string as reported by the sync service.
    pub fn from_service(raw: &str) -> Self {
        match raw {
            "STARTING" => SyncStatus::Starting,
            "IN_PROGRESS" => SyncStatus::InProgress,
            "COMPLETE" => SyncStatus::Complete,
            "FAILED" => SyncStatus::Failed,
            "STOPPED" => SyncStatus::Stopped,
            other => SyncStatus::Other(other.to_string()),
        }
    }
}

impl fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncStatus::Starting => write!(f, "STARTING"),
            SyncStatus::InProgress => write!(f, "IN_PROGRESS"),
            SyncStatus::Complete => write!(f, "COMPLETE"),
            SyncStatus::Failed => write!(f, "FAILED"),
            SyncStatus::Stopped => write!(f, "STOPPED"),
            SyncStatus::Other(raw) => write!(f, "{raw}"),
        }
    }
}

/// Client capability for the knowledge sync service.
#[async_trait]
pub trait SyncClient: Send + Sync {
    /// Start an ingestion job; returns the service-assigned job id.
    ///
    /// `client_token` deduplicates retried submissions on the service
    /// side, so at most one logical job is created per token.
    async fn start_sync(
        &self,
        knowledge_base_id: &str,
        data_source_id: &str,
        client_token: &str,
    ) -> Result<String>;

    /// Fetch the current status of a previously started job.
    async fn sync_status(
        &self,
        job_id: &str,
        knowledge_base_id: &str,
        data_source_id: &str,
    ) -> Result<SyncStatus>;
}

/// Polling policy for [`run_sync`].
#[derive(Debug, Clone)]
pub struct SyncPolicy {
    /// Delay between status polls
    pub poll_interval: Duration,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
        }
    }
}

/// Submit an ingestion job and wait until it leaves its running states.
///
/// A fresh client token accompanies every invocation, so at most one
/// logical job is created even if the transport retries the submission.
/// Submission and poll errors propagate to the caller. The returned
/// terminal status is informational only: a finished job is the whole
/// outcome, whether the service reports it complete or failed.
pub async fn run_sync<C>(
    client: &C,
    knowledge_base_id: &str,
    data_source_id: &str,
    policy: &SyncPolicy,
    cancel: &CancellationToken,
) -> Result<SyncStatus>
where
    C: SyncClient + ?Sized,
{
    let client_token = Uuid::new_v4().to_string();
    let job_id = client
        .start_sync(knowledge_base_id, data_source_id, &client_token)
        .await?;

    info!(job_id = %job_id, "ingestion job started");

    loop {
        let status = client
            .sync_status(&job_id, knowledge_base_id, data_source_id)
            .await?;

        if !status.is_running() {
            info!(job_id = %job_id, status = %status, "ingestion job finished");
            return Ok(status);
        }

        debug!(job_id = %job_id, status = %status, "ingestion job still running");
        sleep_or_cancel(policy.poll_interval, cancel).await?;
    }
}
