// ABOUTME: Composable capability traits for the control-plane client.
// ABOUTME: Defines FunctionOps, DeploymentOps, AuthorizationOps, CloudFunctionApi.

mod authorization;
mod deployment;
mod function;

pub use authorization::AuthorizationOps;
pub use deployment::DeploymentOps;
pub use function::FunctionOps;

/// Every capability the reconciler needs.
///
/// Blanket-implemented for anything providing all three operation sets.
pub trait CloudFunctionApi: FunctionOps + DeploymentOps + AuthorizationOps {}

impl<T> CloudFunctionApi for T where T: FunctionOps + DeploymentOps + AuthorizationOps {}
