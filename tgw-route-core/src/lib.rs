//! Transit Gateway Route Core
//!
//! Lifecycle logic for a CloudFormation custom resource that manages a
//! route in a VPC route table pointing to a transit gateway. The remote
//! operations are abstracted behind [`api::CloudApi`] so the handler can be
//! exercised without an AWS account.

pub mod api;
pub mod callback;
pub mod event;
pub mod handler;
