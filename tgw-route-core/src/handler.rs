//! Lifecycle dispatch for the transit gateway route custom resource
//!
//! Create validates and inserts the route, Delete removes it when the stack
//! still records the resource, and Update is an unconditional
//! delete-then-create rather than a diff. Whatever happens, the caller
//! reports the returned [`Outcome`] through the callback exactly once.

use std::sync::OnceLock;

use regex::Regex;
use tracing::{error, warn};

use crate::api::{CloudApi, RouteEntry};
use crate::event::{LifecycleEvent, Outcome, RequestType};

/// The custom resource type this handler serves.
pub const RESOURCE_TYPE: &str = "Custom::TransitGatewayRoute";

/// Stack resource status meaning the resource never came up.
const CREATE_FAILED: &str = "CREATE_FAILED";

/// Run one lifecycle event to its outcome.
pub async fn handle(api: &dyn CloudApi, event: &LifecycleEvent) -> Outcome {
    match RequestType::parse(&event.request_type) {
        Some(RequestType::Create) => create(api, event).await,
        Some(RequestType::Update) => {
            // Replacement, not a diff: best-effort delete of the old route,
            // then create the new one. Only the create outcome is reported.
            delete(api, event, true).await;
            create(api, event).await
        }
        Some(RequestType::Delete) => delete(api, event, false).await,
        None => {
            let outcome = Outcome::failed(format!(
                "Unknown request type: {}",
                event.request_type
            ));
            error!(reason = %outcome.reason, "rejecting lifecycle event");
            outcome
        }
    }
}

/// Create path: reject duplicates, then insert the route.
async fn create(api: &dyn CloudApi, event: &LifecycleEvent) -> Outcome {
    if event.resource_type != RESOURCE_TYPE {
        error!(resource_type = %event.resource_type, "unknown resource type");
        return Outcome::failed("Unknown resource type");
    }

    let props = &event.resource_properties;
    let (Some(route_table_id), Some(transit_gateway_id), Some(destination_cidr_block)) = (
        props.route_table_id.as_deref(),
        props.transit_gateway_id.as_deref(),
        props.destination_cidr_block.as_deref(),
    ) else {
        error!("missing required resource property");
        return Outcome::failed("Unknown property");
    };

    let routes = match api.list_routes(route_table_id).await {
        Ok(routes) => routes,
        Err(e) => {
            error!(route_table_id, error = %e, "route table lookup failed");
            return Outcome::failed(e.to_string());
        }
    };

    if route_exists(&routes, destination_cidr_block) {
        // Duplicate requests are rejected, not merged.
        return Outcome::failed(format!(
            "The route identified by {} already exists",
            destination_cidr_block
        ));
    }

    match api
        .create_route(route_table_id, transit_gateway_id, destination_cidr_block)
        .await
    {
        Ok(()) => Outcome::success(),
        Err(e) => {
            error!(route_table_id, destination_cidr_block, error = %e, "route create failed");
            Outcome::failed(e.to_string())
        }
    }
}

/// Delete path: skip when the stack no longer records the resource, then
/// remove the route. With `update` set, the identifiers come from the old
/// properties and a missing key silently succeeds without a delete attempt.
async fn delete(api: &dyn CloudApi, event: &LifecycleEvent, update: bool) -> Outcome {
    if event.resource_type != RESOURCE_TYPE {
        return Outcome::success();
    }

    let Some(stack_name) = stack_name_from_id(&event.stack_id) else {
        warn!(stack_id = %event.stack_id, "no stack name in stack id, nothing to clean up");
        return Outcome::success();
    };

    if !resource_recorded(api, stack_name, &event.logical_resource_id).await {
        return Outcome::success();
    }

    let (route_table_id, destination_cidr_block) = if update {
        let Some(old) = event.old_resource_properties.as_ref() else {
            return Outcome::success();
        };
        match (
            old.route_table_id.as_deref(),
            old.destination_cidr_block.as_deref(),
        ) {
            (Some(table), Some(cidr)) => (table, cidr),
            // The previous incarnation never described a full route.
            _ => return Outcome::success(),
        }
    } else {
        let props = &event.resource_properties;
        match (
            props.route_table_id.as_deref(),
            props.destination_cidr_block.as_deref(),
        ) {
            (Some(table), Some(cidr)) => (table, cidr),
            _ => {
                error!("missing required resource property");
                return Outcome::failed("Unknown property");
            }
        }
    };

    match api.delete_route(route_table_id, destination_cidr_block).await {
        Ok(()) => Outcome::success(),
        Err(e) => {
            error!(route_table_id, destination_cidr_block, error = %e, "route delete failed");
            Outcome::failed(e.to_string())
        }
    }
}

/// Whether the stack still records the logical resource with a non-failed
/// status. Lookup errors are logged and treated as "not recorded" so the
/// delete path stays best-effort.
async fn resource_recorded(
    api: &dyn CloudApi,
    stack_name: &str,
    logical_resource_id: &str,
) -> bool {
    match api.stack_resource_status(stack_name, logical_resource_id).await {
        Ok(Some(status)) => status != CREATE_FAILED,
        Ok(None) => false,
        Err(e) => {
            error!(stack_name, logical_resource_id, error = %e, "stack resource lookup failed");
            false
        }
    }
}

/// Scan a route list for the destination CIDR. Entries without one are
/// skipped, not errors.
fn route_exists(routes: &[RouteEntry], destination_cidr_block: &str) -> bool {
    routes
        .iter()
        .any(|route| route.destination_cidr_block.as_deref() == Some(destination_cidr_block))
}

/// Extract the stack name from a stack ARN: the segment following `stack/`
/// up to the next `/`.
fn stack_name_from_id(stack_id: &str) -> Option<&str> {
    static STACK_NAME: OnceLock<Regex> = OnceLock::new();
    let re = STACK_NAME.get_or_init(|| Regex::new(r"stack/([^/]+)").expect("valid regex"));
    re.captures(stack_id)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}
