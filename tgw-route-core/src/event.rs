//! Lifecycle event and outcome model
//!
//! CloudFormation delivers custom resource lifecycle events as JSON with
//! PascalCase field names. The event is immutable for the duration of one
//! invocation; the outcome is built fresh and reported exactly once.

use serde::Deserialize;

/// A custom resource lifecycle event as delivered by CloudFormation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleEvent {
    /// Raw request type; kept as a string so an unknown value can be
    /// echoed back in the failure reason.
    pub request_type: String,
    pub resource_type: String,
    /// Pre-signed URL the outcome is PUT back to.
    #[serde(rename = "ResponseURL")]
    pub response_url: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    /// Present on Update and Delete, absent on Create.
    #[serde(default)]
    pub physical_resource_id: Option<String>,
    #[serde(default)]
    pub resource_properties: RouteProperties,
    /// Present on Update only.
    #[serde(default)]
    pub old_resource_properties: Option<RouteProperties>,
}

/// Properties of the route resource. Every field is optional so a missing
/// key surfaces as the "Unknown property" failure rather than a
/// deserialization error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct RouteProperties {
    pub route_table_id: Option<String>,
    pub transit_gateway_id: Option<String>,
    pub destination_cidr_block: Option<String>,
}

/// The lifecycle operations CloudFormation can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

impl RequestType {
    /// Parse the wire value. Matching is case-sensitive; anything else is
    /// an unknown request type.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "Create" => Some(Self::Create),
            "Update" => Some(Self::Update),
            "Delete" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// Terminal status of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Failed,
}

impl Status {
    /// The wire form CloudFormation expects.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }
}

/// What one invocation of the handler concluded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub status: Status,
    pub reason: String,
}

impl Outcome {
    pub fn success() -> Self {
        Self {
            status: Status::Success,
            reason: String::new(),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            status: Status::Failed,
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_create_event() {
        let event: LifecycleEvent = serde_json::from_value(serde_json::json!({
            "RequestType": "Create",
            "ResourceType": "Custom::TransitGatewayRoute",
            "ResponseURL": "https://cloudformation.example/callback",
            "StackId": "arn:aws:cloudformation:us-east-1:123456789012:stack/network/guid",
            "RequestId": "req-1",
            "LogicalResourceId": "TgwRoute",
            "ResourceProperties": {
                "RouteTableId": "rtb-1",
                "TransitGatewayId": "tgw-1",
                "DestinationCidrBlock": "10.1.0.0/16",
                "ServiceToken": "arn:aws:lambda:us-east-1:123456789012:function:tgw-route"
            }
        }))
        .unwrap();

        assert_eq!(RequestType::parse(&event.request_type), Some(RequestType::Create));
        assert_eq!(event.response_url, "https://cloudformation.example/callback");
        assert_eq!(event.physical_resource_id, None);
        assert_eq!(
            event.resource_properties.destination_cidr_block.as_deref(),
            Some("10.1.0.0/16")
        );
        assert!(event.old_resource_properties.is_none());
    }

    #[test]
    fn missing_properties_default_to_absent() {
        let event: LifecycleEvent = serde_json::from_value(serde_json::json!({
            "RequestType": "Delete",
            "ResourceType": "Custom::TransitGatewayRoute",
            "ResponseURL": "https://cloudformation.example/callback",
            "StackId": "arn:aws:cloudformation:us-east-1:123456789012:stack/network/guid",
            "RequestId": "req-2",
            "LogicalResourceId": "TgwRoute",
            "PhysicalResourceId": "TgwRoute-req-1"
        }))
        .unwrap();

        assert_eq!(event.resource_properties, RouteProperties::default());
        assert_eq!(event.physical_resource_id.as_deref(), Some("TgwRoute-req-1"));
    }

    #[test]
    fn unknown_request_type_keeps_raw_value() {
        assert_eq!(RequestType::parse("Read"), None);
        assert_eq!(RequestType::parse("create"), None);
    }

    #[test]
    fn status_wire_form() {
        assert_eq!(Status::Success.as_str(), "SUCCESS");
        assert_eq!(Status::Failed.as_str(), "FAILED");
        assert!(Outcome::success().is_success());
        assert!(!Outcome::failed("no").is_success());
        assert_eq!(Outcome::success().reason, "");
    }
}
