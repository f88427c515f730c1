//! Reporting the outcome back to CloudFormation
//!
//! CloudFormation waits on an HTTP PUT to the event's pre-signed
//! `ResponseURL`. The body shape and the physical-resource-id derivation
//! live here; the transport lives behind [`CallbackSender`].

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::event::{LifecycleEvent, Outcome, RequestType};

/// The JSON body PUT back to the response URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CallbackBody {
    pub status: String,
    pub request_id: String,
    pub logical_resource_id: String,
    pub stack_id: String,
    pub reason: String,
    pub physical_resource_id: String,
}

impl CallbackBody {
    pub fn new(event: &LifecycleEvent, outcome: &Outcome) -> Self {
        Self {
            status: outcome.status.as_str().to_string(),
            request_id: event.request_id.clone(),
            logical_resource_id: event.logical_resource_id.clone(),
            stack_id: event.stack_id.clone(),
            reason: outcome.reason.clone(),
            physical_resource_id: physical_resource_id(event),
        }
    }
}

/// `{LogicalResourceId}-{RequestId}` on Create; otherwise the id the event
/// already carries, falling back to the derived form if it is missing.
pub fn physical_resource_id(event: &LifecycleEvent) -> String {
    let derived = || format!("{}-{}", event.logical_resource_id, event.request_id);
    match RequestType::parse(&event.request_type) {
        Some(RequestType::Create) => derived(),
        _ => event.physical_resource_id.clone().unwrap_or_else(derived),
    }
}

/// Errors delivering the callback
#[derive(Debug, Error)]
pub enum CallbackError {
    /// The PUT never completed
    #[error("Callback transport error: {0}")]
    Transport(String),

    /// The response URL answered with a non-2xx status
    #[error("Callback rejected with status {0}")]
    Rejected(u16),
}

/// Transport for the final callback.
#[async_trait]
pub trait CallbackSender: Send + Sync {
    async fn send(&self, url: &str, body: &CallbackBody) -> Result<(), CallbackError>;
}

/// Build the body and attempt the callback once. Delivery failures are
/// logged; the orchestrator's timeout is the only recovery at that point.
pub async fn report(sender: &dyn CallbackSender, event: &LifecycleEvent, outcome: &Outcome) {
    let body = CallbackBody::new(event, outcome);
    if let Err(e) = sender.send(&event.response_url, &body).await {
        error!(url = %event.response_url, error = %e, "failed to deliver callback");
    }
}
