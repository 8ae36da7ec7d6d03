// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Hook implementations wiring configuration, clients, and procedures.
//!
//! Each hook composes a config struct, the matching HTTP client, and one
//! core procedure into a [`stackhook_core::lifecycle::Hook`], which the
//! binaries feed into the lifecycle adapter. Invocations are one-shot: a
//! binary reads a single lifecycle event, runs the hook, reports through
//! the event's callback URL, and exits.

use std::io::Read;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use stackhook_core::error::{HookError, Result};
use stackhook_core::lifecycle::LifecycleRequest;

pub mod index;
pub mod ingest;

pub use index::IndexHook;
pub use ingest::IngestHook;

/// Read one lifecycle event from the given file, or stdin when absent.
pub fn read_event(path: Option<&str>) -> Result<LifecycleRequest> {
    let raw = match path {
        Some(path) => std::fs::read_to_string(path)
            .map_err(|e| HookError::InvalidEvent(format!("cannot read {path}: {e}")))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| HookError::InvalidEvent(format!("cannot read stdin: {e}")))?;
            buffer
        }
    };

    serde_json::from_str(&raw).map_err(|e| HookError::InvalidEvent(e.to_string()))
}

/// Arm the invocation deadline: cancel the token once it elapses.
///
/// Hosted runtimes kill an invocation at their own ceiling; cancelling
/// slightly before that lets the hook report FAILED instead of vanishing.
pub fn spawn_deadline(deadline: Option<Duration>, cancel: &CancellationToken) {
    if let Some(deadline) = deadline {
        let token = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(deadline).await;
            warn!(
                deadline_secs = deadline.as_secs(),
                "deadline reached, cancelling hook"
            );
            token.cancel();
        });
    }
}
