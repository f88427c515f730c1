//! Lambda entry point for the transit gateway route custom resource
//!
//! Wires the aws-sdk implementation of the remote operations and the
//! reqwest callback transport into the lifecycle handler, then hands the
//! service function to the Lambda runtime.

mod aws;
mod callback;

use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use tgw_route_core::callback::report;
use tgw_route_core::event::LifecycleEvent;
use tgw_route_core::handler;

use crate::aws::AwsCloudApi;
use crate::callback::HttpCallbackSender;

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        // CloudWatch adds its own timestamps and does not render ANSI.
        .without_time()
        .with_ansi(false)
        .init();

    let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let api = AwsCloudApi::new(&config);
    let sender = HttpCallbackSender::new();

    run(service_fn(|event: LambdaEvent<LifecycleEvent>| {
        invoke(&api, &sender, event)
    }))
    .await
}

/// Run one lifecycle event and report its outcome.
///
/// Always returns `Ok` once the event has parsed: the outcome (including
/// failures) goes back through the callback, and surfacing an error to the
/// runtime after that would only trigger a retry CloudFormation no longer
/// waits for.
async fn invoke(
    api: &AwsCloudApi,
    sender: &HttpCallbackSender,
    event: LambdaEvent<LifecycleEvent>,
) -> Result<(), Error> {
    let (event, context) = event.into_parts();
    tracing::info!(
        aws_request_id = %context.request_id,
        request_type = %event.request_type,
        logical_resource_id = %event.logical_resource_id,
        "handling lifecycle event"
    );

    let outcome = handler::handle(api, &event).await;
    report(sender, &event, &outcome).await;

    Ok(())
}
