// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Index provisioning hook entry point.
//!
//! Reads one lifecycle event (file argument or stdin), reconciles the
//! knowledge-base index against the search collection, and reports the
//! outcome to the event's callback URL.

use anyhow::Result;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use stackhook_client::HttpCallbackSender;
use stackhook_core::config::IndexHookConfig;
use stackhook_core::lifecycle::run_hook;
use stackhook_handlers::{IndexHook, read_event, spawn_deadline};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (from crate directory or parent directories)
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("stackhook_core=info".parse().unwrap())
                .add_directive("stackhook_client=info".parse().unwrap())
                .add_directive("stackhook_handlers=info".parse().unwrap()),
        )
        .init();

    // Load configuration
    let config = IndexHookConfig::from_env().map_err(|e| {
        error!("Configuration error: {}", e);
        e
    })?;

    info!(
        endpoint = %config.search_endpoint,
        index = %config.index_name,
        "Starting index hook"
    );

    let event = read_event(std::env::args().nth(1).as_deref())?;

    let cancel = CancellationToken::new();
    spawn_deadline(config.deadline, &cancel);

    let hook = IndexHook::new(config, cancel);
    run_hook(&hook, &event, &HttpCallbackSender::new()).await;

    Ok(())
}
