// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Delivery of lifecycle responses to pre-signed callback URLs.

use async_trait::async_trait;
use tracing::debug;

use stackhook_core::error::{HookError, Result};
use stackhook_core::lifecycle::{CallbackSender, LifecycleResponse};

/// Delivers lifecycle responses with an HTTP PUT.
#[derive(Debug, Clone, Default)]
pub struct HttpCallbackSender {
    http: reqwest::Client,
}

impl HttpCallbackSender {
    /// Create a sender with a fresh HTTP client.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CallbackSender for HttpCallbackSender {
    async fn deliver(&self, url: &str, response: &LifecycleResponse) -> Result<()> {
        let body =
            serde_json::to_string(response).map_err(|e| HookError::Callback(e.to_string()))?;

        // Pre-signed callback URLs are signed without a Content-Type
        // header; sending one invalidates the signature.
        let delivery = self
            .http
            .put(url)
            .body(body)
            .send()
            .await
            .map_err(|e| HookError::Callback(e.to_string()))?
            .error_for_status()
            .map_err(|e| HookError::Callback(e.to_string()))?;

        debug!(status = %delivery.status(), "lifecycle response delivered");
        Ok(())
    }
}
