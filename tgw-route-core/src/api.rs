//! Remote operation seam
//!
//! The handler needs four remote operations: list the routes of a route
//! table, create a route, delete a route, and look up one logical resource
//! in a stack. [`CloudApi`] abstracts them so the lifecycle logic can be
//! tested against a mock.

use async_trait::async_trait;
use thiserror::Error;

/// Errors returned by the remote operations
#[derive(Debug, Error)]
pub enum ApiError {
    /// The provider rejected or failed the call
    #[error("AWS error: {0}")]
    Aws(String),

    /// The response did not carry the expected structure
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Result type for remote operations
pub type ApiResult<T> = Result<T, ApiError>;

/// One entry in a route table's route list.
///
/// Local and propagated entries may not carry a destination CIDR; those are
/// legal and never match anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteEntry {
    pub destination_cidr_block: Option<String>,
}

impl RouteEntry {
    pub fn new(destination_cidr_block: impl Into<String>) -> Self {
        Self {
            destination_cidr_block: Some(destination_cidr_block.into()),
        }
    }
}

/// The remote operations the lifecycle handler performs.
///
/// Each call is issued synchronously from the handler's point of view and
/// either returns or errors exactly once; no retries happen at this layer.
#[async_trait]
pub trait CloudApi: Send + Sync {
    /// List the routes currently in the given route table.
    async fn list_routes(&self, route_table_id: &str) -> ApiResult<Vec<RouteEntry>>;

    /// Create a route pointing at a transit gateway.
    async fn create_route(
        &self,
        route_table_id: &str,
        transit_gateway_id: &str,
        destination_cidr_block: &str,
    ) -> ApiResult<()>;

    /// Delete the route identified by its destination CIDR.
    async fn delete_route(
        &self,
        route_table_id: &str,
        destination_cidr_block: &str,
    ) -> ApiResult<()>;

    /// Look up the status of one logical resource in a stack.
    ///
    /// Returns `None` when the resource is not recorded in the stack.
    async fn stack_resource_status(
        &self,
        stack_name: &str,
        logical_resource_id: &str,
    ) -> ApiResult<Option<String>>;
}
