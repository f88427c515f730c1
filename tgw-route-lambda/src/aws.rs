//! aws-sdk implementation of the remote operation seam

use async_trait::async_trait;
use aws_sdk_cloudformation::Client as CloudFormationClient;
use aws_sdk_ec2::Client as Ec2Client;
use aws_sdk_ec2::types::Route;

use tgw_route_core::api::{ApiError, ApiResult, CloudApi, RouteEntry};

/// Remote operations backed by the EC2 and CloudFormation APIs.
pub struct AwsCloudApi {
    ec2: Ec2Client,
    cloudformation: CloudFormationClient,
}

impl AwsCloudApi {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            ec2: Ec2Client::new(config),
            cloudformation: CloudFormationClient::new(config),
        }
    }
}

/// Keep only the destination CIDR of each route; local and propagated
/// entries legitimately have none.
fn route_entries(routes: &[Route]) -> Vec<RouteEntry> {
    routes
        .iter()
        .map(|route| RouteEntry {
            destination_cidr_block: route.destination_cidr_block().map(str::to_string),
        })
        .collect()
}

#[async_trait]
impl CloudApi for AwsCloudApi {
    async fn list_routes(&self, route_table_id: &str) -> ApiResult<Vec<RouteEntry>> {
        let output = self
            .ec2
            .describe_route_tables()
            .route_table_ids(route_table_id)
            .send()
            .await
            .map_err(|e| ApiError::Aws(e.to_string()))?;

        let table = output.route_tables().first().ok_or_else(|| {
            ApiError::MalformedResponse(format!("route table {} not in response", route_table_id))
        })?;

        Ok(route_entries(table.routes()))
    }

    async fn create_route(
        &self,
        route_table_id: &str,
        transit_gateway_id: &str,
        destination_cidr_block: &str,
    ) -> ApiResult<()> {
        self.ec2
            .create_route()
            .route_table_id(route_table_id)
            .transit_gateway_id(transit_gateway_id)
            .destination_cidr_block(destination_cidr_block)
            .send()
            .await
            .map_err(|e| ApiError::Aws(e.to_string()))?;

        Ok(())
    }

    async fn delete_route(
        &self,
        route_table_id: &str,
        destination_cidr_block: &str,
    ) -> ApiResult<()> {
        self.ec2
            .delete_route()
            .route_table_id(route_table_id)
            .destination_cidr_block(destination_cidr_block)
            .send()
            .await
            .map_err(|e| ApiError::Aws(e.to_string()))?;

        Ok(())
    }

    async fn stack_resource_status(
        &self,
        stack_name: &str,
        logical_resource_id: &str,
    ) -> ApiResult<Option<String>> {
        let result = self
            .cloudformation
            .describe_stack_resource()
            .stack_name(stack_name)
            .logical_resource_id(logical_resource_id)
            .send()
            .await;

        match result {
            Ok(output) => Ok(output
                .stack_resource_detail()
                .and_then(|detail| detail.resource_status())
                .map(|status| status.as_str().to_string())),
            Err(err) => {
                // DescribeStackResource reports a missing resource (or a
                // deleted stack) as a ValidationError, not a typed error.
                let text = format!("{:?}", err);
                if text.contains("does not exist") {
                    Ok(None)
                } else {
                    Err(ApiError::Aws(text))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_entries_keep_only_the_cidr() {
        let routes = vec![
            Route::builder()
                .destination_cidr_block("10.0.0.0/16")
                .gateway_id("local")
                .build(),
            Route::builder().gateway_id("igw-1").build(),
        ];

        assert_eq!(
            route_entries(&routes),
            vec![RouteEntry::new("10.0.0.0/16"), RouteEntry::default()]
        );
    }

    #[test]
    fn route_entries_of_empty_table() {
        assert!(route_entries(&[]).is_empty());
    }
}
