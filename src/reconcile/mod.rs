// ABOUTME: Reconciliation of desired state against the control plane.
// ABOUTME: Exports the resource, data source, waiter, policy, and rollout types.

mod data_source;
mod error;
mod parties;
mod policy;
mod resource;
mod rollout;
mod state;
mod transitions;
mod wait;

pub use data_source::CloudFunctionDataSource;
pub use error::{ResourceError, ResourceErrorKind};
pub use parties::reconcile_parties;
pub use policy::{ChangePlan, FIELD_POLICY, Mutability, PlannedAction, mutability};
pub use resource::{ApplyOutcome, CloudFunctionResource};
pub use rollout::Rollout;
pub use state::{Authorized, Deployed, FunctionCreated, Planned};
pub use transitions::TransitionResult;
pub use wait::{DeploymentWaiter, WaitError, deadline_after};
