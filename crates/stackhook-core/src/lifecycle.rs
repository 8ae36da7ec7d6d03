// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Lifecycle event model and the shared hook adapter.
//!
//! The orchestrator posts a desired state transition (Create, Update,
//! Delete) together with a pre-signed callback URL. The adapter wraps a
//! hook procedure and guarantees that every event produces exactly one
//! delivered response, whatever the procedure does.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::Result;

/// Sentinel reason reported when a hook did not fail.
pub const NO_REASON: &str = "N/A";

/// Desired state transition for the managed resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RequestType {
    /// Provision the resource for the first time
    Create,
    /// Re-run provisioning for an existing resource
    Update,
    /// The stack is being deleted
    Delete,
}

/// Inbound lifecycle event, as posted by the orchestrator.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleRequest {
    /// Transition being requested
    pub request_type: RequestType,
    /// Correlation id for this event
    pub request_id: String,
    /// Stack the resource belongs to
    pub stack_id: String,
    /// Pre-signed URL the response must be delivered to
    #[serde(rename = "ResponseURL")]
    pub response_url: String,
    /// Orchestrator-side resource type name
    #[serde(default)]
    pub resource_type: Option<String>,
    /// Logical name of the resource within the stack
    pub logical_resource_id: String,
    /// Stable identifier of the managed resource; absent on first Create
    #[serde(default)]
    pub physical_resource_id: Option<String>,
    /// Declared resource properties, passed through verbatim
    #[serde(default)]
    pub resource_properties: Option<Value>,
    /// Previous properties on Update events
    #[serde(default)]
    pub old_resource_properties: Option<Value>,
}

/// Outcome status reported back to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ResponseStatus {
    /// The hook completed (or was a no-op)
    #[serde(rename = "SUCCESS")]
    Success,
    /// The hook's procedure returned an error
    #[serde(rename = "FAILED")]
    Failed,
}

/// Outcome report for a lifecycle event.
///
/// Constructed once per event with [`ResponseStatus::Success`], flipped to
/// [`ResponseStatus::Failed`] only in the caught-failure path, and
/// delivered exactly once.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleResponse {
    /// Overall outcome
    pub status: ResponseStatus,
    /// Diagnostic message; [`NO_REASON`] unless the hook failed
    pub reason: String,
    /// Echoed from the request
    pub stack_id: String,
    /// Echoed from the request
    pub request_id: String,
    /// Echoed from the request
    pub logical_resource_id: String,
    /// Echoed from the request, or the hook's stable default
    pub physical_resource_id: String,
    /// Resource attributes exposed to the rest of the stack
    pub data: Value,
}

impl LifecycleResponse {
    /// Build the default success-shaped response for a request.
    ///
    /// `default_physical_id` is assigned when the event carries no
    /// physical resource id (first Create).
    pub fn for_request(request: &LifecycleRequest, default_physical_id: &str) -> Self {
        Self {
            status: ResponseStatus::Success,
            reason: NO_REASON.to_string(),
            stack_id: request.stack_id.clone(),
            request_id: request.request_id.clone(),
            logical_resource_id: request.logical_resource_id.clone(),
            physical_resource_id: request
                .physical_resource_id
                .clone()
                .unwrap_or_else(|| default_physical_id.to_string()),
            data: Value::Object(serde_json::Map::new()),
        }
    }
}

/// A procedure wrapped by the lifecycle adapter.
#[async_trait]
pub trait Hook: Send + Sync {
    /// Stable resource name assigned when the event carries none.
    fn default_physical_id(&self) -> &str;

    /// Run the hook's procedure for a Create or Update event.
    async fn apply(&self, request: &LifecycleRequest) -> Result<()>;
}

/// Delivery channel for lifecycle responses.
#[async_trait]
pub trait CallbackSender: Send + Sync {
    /// Deliver the response body to the callback URL.
    async fn deliver(&self, url: &str, response: &LifecycleResponse) -> Result<()>;
}

/// Run a hook for one lifecycle event and report the outcome.
///
/// The wrapped procedure runs only for Create and Update events; Delete
/// retains the provisioned resources and still reports success. Any error
/// escaping the procedure becomes a FAILED response carrying the error
/// message as reason. The response is delivered exactly once; a delivery
/// failure is logged and dropped, since there is no further recipient to
/// notify.
pub async fn run_hook<H, C>(hook: &H, request: &LifecycleRequest, callback: &C)
where
    H: Hook + ?Sized,
    C: CallbackSender + ?Sized,
{
    debug!(event = ?request, "lifecycle event received");

    let mut response = LifecycleResponse::for_request(request, hook.default_physical_id());

    match request.request_type {
        RequestType::Create | RequestType::Update => {
            if let Err(e) = hook.apply(request).await {
                warn!(error = %e, "hook procedure failed");
                response.status = ResponseStatus::Failed;
                response.reason = format!("Failed: {e}");
            }
        }
        // Provisioned resources are retained on stack deletion.
        RequestType::Delete => {}
    }

    info!(
        status = ?response.status,
        physical_resource_id = %response.physical_resource_id,
        "delivering lifecycle response"
    );

    if let Err(e) = callback.deliver(&request.response_url, &response).await {
        error!(error = %e, "failed to deliver lifecycle response");
    }
}
