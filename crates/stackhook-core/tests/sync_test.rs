// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Integration tests for the knowledge sync runner.
//!
//! These tests verify:
//! 1. Polling stops on the first terminal status, success or failure alike
//! 2. Every invocation submits with a fresh client token
//! 3. Submission errors propagate to the caller
//! 4. Cancellation interrupts the poll wait

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use stackhook_core::error::{HookError, Result};
use stackhook_core::sync::{SyncClient, SyncPolicy, SyncStatus, run_sync};

/// Scripted sync service: records submissions and pops one canned status
/// per poll.
struct ScriptedService {
    fail_submission: bool,
    tokens: Mutex<Vec<String>>,
    statuses: Mutex<Vec<SyncStatus>>,
    polls: Mutex<u32>,
}

impl ScriptedService {
    fn new(statuses: Vec<SyncStatus>) -> Self {
        Self {
            fail_submission: false,
            tokens: Mutex::new(Vec::new()),
            statuses: Mutex::new(statuses),
            polls: Mutex::new(0),
        }
    }

    fn failing_submission() -> Self {
        let mut service = Self::new(Vec::new());
        service.fail_submission = true;
        service
    }

    fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }

    fn polls(&self) -> u32 {
        *self.polls.lock().unwrap()
    }
}

#[async_trait]
impl SyncClient for ScriptedService {
    async fn start_sync(
        &self,
        _knowledge_base_id: &str,
        _data_source_id: &str,
        client_token: &str,
    ) -> Result<String> {
        if self.fail_submission {
            return Err(HookError::Sync {
                operation: "start_sync",
                message: "service unavailable".to_string(),
            });
        }
        self.tokens.lock().unwrap().push(client_token.to_string());
        Ok("job-0001".to_string())
    }

    async fn sync_status(
        &self,
        _job_id: &str,
        _knowledge_base_id: &str,
        _data_source_id: &str,
    ) -> Result<SyncStatus> {
        *self.polls.lock().unwrap() += 1;
        Ok(self.statuses.lock().unwrap().remove(0))
    }
}

fn fast_policy() -> SyncPolicy {
    SyncPolicy {
        poll_interval: Duration::from_millis(10),
    }
}

#[tokio::test]
async fn test_polls_until_terminal_status() {
    let service = ScriptedService::new(vec![
        SyncStatus::InProgress,
        SyncStatus::InProgress,
        SyncStatus::Complete,
    ]);

    let status = run_sync(
        &service,
        "kb-1",
        "ds-1",
        &fast_policy(),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(service.polls(), 3);
    assert_eq!(status, SyncStatus::Complete);
}

#[tokio::test]
async fn test_failed_job_also_ends_the_loop() {
    // A failed job is still a finished job; the runner reports the
    // terminal status without treating it as an error.
    let service = ScriptedService::new(vec![SyncStatus::Starting, SyncStatus::Failed]);

    let status = run_sync(
        &service,
        "kb-1",
        "ds-1",
        &fast_policy(),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(service.polls(), 2);
    assert_eq!(status, SyncStatus::Failed);
}

#[tokio::test]
async fn test_unknown_status_is_terminal() {
    let service = ScriptedService::new(vec![SyncStatus::Other("THROTTLED".to_string())]);

    let status = run_sync(
        &service,
        "kb-1",
        "ds-1",
        &fast_policy(),
        &CancellationToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(service.polls(), 1);
    assert_eq!(status, SyncStatus::Other("THROTTLED".to_string()));
}

#[tokio::test]
async fn test_each_invocation_uses_a_fresh_client_token() {
    let service = ScriptedService::new(vec![SyncStatus::Complete, SyncStatus::Complete]);
    let policy = fast_policy();
    let cancel = CancellationToken::new();

    run_sync(&service, "kb-1", "ds-1", &policy, &cancel)
        .await
        .unwrap();
    run_sync(&service, "kb-1", "ds-1", &policy, &cancel)
        .await
        .unwrap();

    let tokens = service.tokens();
    assert_eq!(tokens.len(), 2);
    assert_ne!(tokens[0], tokens[1]);
}

#[tokio::test]
async fn test_submission_error_propagates() {
    let service = ScriptedService::failing_submission();

    let result = run_sync(
        &service,
        "kb-1",
        "ds-1",
        &fast_policy(),
        &CancellationToken::new(),
    )
    .await;

    assert!(matches!(
        result,
        Err(HookError::Sync {
            operation: "start_sync",
            ..
        })
    ));
    assert_eq!(service.polls(), 0);
}

#[tokio::test]
async fn test_cancellation_interrupts_poll_wait() {
    let service = ScriptedService::new(vec![SyncStatus::InProgress]);
    let policy = SyncPolicy {
        poll_interval: Duration::from_secs(60),
    };

    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        token.cancel();
    });

    let result = run_sync(&service, "kb-1", "ds-1", &policy, &cancel).await;

    assert!(matches!(result, Err(HookError::Cancelled)));
    assert_eq!(service.polls(), 1);
}
