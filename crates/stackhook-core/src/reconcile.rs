// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Index reconciliation against an eventually consistent search store.
//!
//! The store may fail a create call transiently, or accept it without
//! acknowledging the state change yet. Both cases are retried, a bounded
//! number of times. An acknowledged index is given a stabilization window
//! before the procedure returns, so dependent resources created right
//! after it can already reference the index.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::error::{HookError, Result};

/// Maximum number of index creation attempts.
pub const MAX_CREATE_ATTEMPTS: u32 = 3;

/// Delay before the next attempt after a failed or unacknowledged create.
pub const RETRY_DELAY: Duration = Duration::from_secs(10);

/// Wait after an acknowledged create before the index is considered usable.
pub const STABILIZE_DELAY: Duration = Duration::from_secs(60);

/// Result of one create call against the index store.
#[derive(Debug, Clone)]
pub struct CreateIndexOutcome {
    /// Whether the store acknowledged the state change.
    pub acknowledged: bool,
    /// Raw response body, kept for diagnostics.
    pub body: String,
}

/// Client capability for the index store.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Create a named index from a JSON definition.
    ///
    /// Implementations return `Ok` for any response the store produced,
    /// acknowledged or not; `Err` is reserved for calls that never got a
    /// usable response (network or service failure).
    async fn create_index(&self, name: &str, definition: &str) -> Result<CreateIndexOutcome>;
}

/// Retry and stabilization policy for [`ensure_index`].
#[derive(Debug, Clone)]
pub struct ReconcilePolicy {
    /// Maximum create attempts before giving up
    pub max_attempts: u32,
    /// Delay between attempts
    pub retry_delay: Duration,
    /// Wait after an acknowledged create
    pub stabilize_delay: Duration,
}

impl Default for ReconcilePolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_CREATE_ATTEMPTS,
            retry_delay: RETRY_DELAY,
            stabilize_delay: STABILIZE_DELAY,
        }
    }
}

/// Terminal outcome of a reconciliation run.
#[derive(Debug, Clone)]
pub enum ReconcileOutcome {
    /// The store acknowledged the index and the stabilization wait passed.
    Acknowledged {
        /// Response body of the acknowledged attempt.
        body: String,
    },
    /// All attempts were used without an acknowledgement.
    Exhausted {
        /// Body of the last response the store produced, if any call
        /// returned one.
        last_body: Option<String>,
    },
}

/// Ensure a named index exists in the backing store.
///
/// Transient call failures and unacknowledged responses are both retried,
/// up to `policy.max_attempts`. Exhaustion is reported as a value rather
/// than an error, so the caller decides whether it is fatal. Every wait
/// races `cancel`; cancellation surfaces as [`HookError::Cancelled`].
pub async fn ensure_index<S>(
    store: &S,
    name: &str,
    definition: &str,
    policy: &ReconcilePolicy,
    cancel: &CancellationToken,
) -> Result<ReconcileOutcome>
where
    S: IndexStore + ?Sized,
{
    let mut last_body = None;

    for attempt in 1..=policy.max_attempts {
        match store.create_index(name, definition).await {
            Ok(outcome) if outcome.acknowledged => {
                info!(
                    index = name,
                    attempt, "index acknowledged, waiting for stabilization"
                );
                sleep_or_cancel(policy.stabilize_delay, cancel).await?;
                return Ok(ReconcileOutcome::Acknowledged { body: outcome.body });
            }
            Ok(outcome) => {
                debug!(index = name, attempt, body = %outcome.body, "create not acknowledged");
                last_body = Some(outcome.body);
            }
            Err(e) => {
                warn!(index = name, attempt, error = %e, "index creation attempt failed");
            }
        }

        if attempt < policy.max_attempts {
            sleep_or_cancel(policy.retry_delay, cancel).await?;
        }
    }

    warn!(
        index = name,
        attempts = policy.max_attempts,
        "index creation attempts exhausted"
    );
    Ok(ReconcileOutcome::Exhausted { last_body })
}

/// Sleep for `delay`, returning [`HookError::Cancelled`] if the token
/// fires first.
pub(crate) async fn sleep_or_cancel(delay: Duration, cancel: &CancellationToken) -> Result<()> {
    tokio::select! {
        _ = cancel.cancelled() => Err(HookError::Cancelled),
        _ = tokio::time::sleep(delay) => Ok(()),
    }
}
