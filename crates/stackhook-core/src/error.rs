// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for stackhook hooks.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur while running a lifecycle hook.
#[derive(Debug, Error)]
pub enum HookError {
    /// Configuration error (missing or invalid environment variable)
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Index store call failed before producing a response
    #[error("index store error during {operation}: {message}")]
    Store {
        /// The operation that failed
        operation: &'static str,
        /// Error details
        message: String,
    },

    /// Knowledge sync service call failed
    #[error("sync service error during {operation}: {message}")]
    Sync {
        /// The operation that failed
        operation: &'static str,
        /// Error details
        message: String,
    },

    /// The index store never acknowledged the index
    #[error("index not acknowledged after {attempts} attempts")]
    NotAcknowledged {
        /// Number of creation attempts made
        attempts: u32,
    },

    /// Callback delivery failed
    #[error("callback delivery failed: {0}")]
    Callback(String),

    /// The invocation was cancelled before the procedure finished
    #[error("hook cancelled")]
    Cancelled,

    /// Inbound event payload could not be read or parsed
    #[error("invalid lifecycle event: {0}")]
    InvalidEvent(String),
}

/// Type alias for hook results.
pub type Result<T> = std::result::Result<T, HookError>;
