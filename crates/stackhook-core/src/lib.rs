// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Stackhook Core - Lifecycle Hook Procedures
//!
//! This crate implements the provisioning core invoked by stack lifecycle
//! events: reconciling a vector index against an eventually consistent
//! search store, and driving a knowledge sync job to completion. Both
//! procedures sit behind client capability traits so transports stay out
//! of this crate (see `stackhook-client` for the HTTP implementations).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       Orchestrator                           │
//! │        (stack lifecycle events + callback URL)               │
//! └──────────────────────────────────────────────────────────────┘
//!          │ LifecycleRequest                ▲ LifecycleResponse
//!          ▼                                 │
//! ┌──────────────────────────────────────────────────────────────┐
//! │                 lifecycle::run_hook (adapter)                │
//! │   Create/Update → procedure, Delete → no-op, error → FAILED  │
//! └──────────────────────────────────────────────────────────────┘
//!          │                                 │
//!          ▼                                 ▼
//! ┌─────────────────────┐        ┌─────────────────────────────┐
//! │ reconcile::         │        │ sync::run_sync              │
//! │ ensure_index        │        │ (submit + poll to terminal) │
//! └─────────────────────┘        └─────────────────────────────┘
//!          │ IndexStore                      │ SyncClient
//!          ▼                                 ▼
//! ┌─────────────────────┐        ┌─────────────────────────────┐
//! │  Search collection  │        │  Knowledge sync service     │
//! └─────────────────────┘        └─────────────────────────────┘
//! ```
//!
//! # Guarantees
//!
//! | Procedure | Guarantee |
//! |-----------|-----------|
//! | `ensure_index` | At most [`reconcile::MAX_CREATE_ATTEMPTS`] creates; exhaustion is a value, not an error |
//! | `run_sync` | At most one logical job per invocation (fresh client token) |
//! | `run_hook` | Exactly one callback delivery per event, errors never escape |
//!
//! Every wait in both procedures races a cancellation token, so a hosted
//! invocation can be cut off cleanly at its deadline.

pub mod config;
pub mod definition;
pub mod error;
pub mod lifecycle;
pub mod reconcile;
pub mod sync;

pub use config::{ConfigError, IndexHookConfig, IngestHookConfig};
pub use error::{HookError, Result};
pub use lifecycle::{
    CallbackSender, Hook, LifecycleRequest, LifecycleResponse, RequestType, ResponseStatus,
    run_hook,
};
pub use reconcile::{IndexStore, ReconcileOutcome, ReconcilePolicy, ensure_index};
pub use sync::{SyncClient, SyncPolicy, SyncStatus, run_sync};
