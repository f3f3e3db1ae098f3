// ABOUTME: REST client for the cloud function control plane.
// ABOUTME: Transport, typed endpoints, wire models, and capability traits.

mod client;
mod endpoints;
mod error;
pub mod models;
pub mod traits;
mod transport;

pub use client::NvcfClient;
pub use error::{ApiError, ApiErrorKind};
pub use models::{
    Artifact, AuthorizedParty, ContainerEnvironmentEntry, CreateFunctionRequest, Deployment,
    DeploymentSpecification, FunctionAuthorization, FunctionInfo, FunctionStatus, HealthCheck,
    SecretPayload,
};
pub use traits::{AuthorizationOps, CloudFunctionApi, DeploymentOps, FunctionOps};
pub use transport::{Reply, Transport};
