// ABOUTME: Domain model between the desired-state file and the wire types.
// ABOUTME: Workload shapes, observed state, and request building with validation.

mod request;
mod state;
mod workload;

pub use request::{
    CreatePlan, UpdatePlan, ValidationError, create_request, deployment_specifications,
    parse_configuration, secret_value,
};
pub use state::{DeploymentState, FunctionState};
pub use workload::{ContainerWorkload, Health, HelmWorkload, Workload};
