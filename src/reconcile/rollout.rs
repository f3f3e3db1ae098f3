// ABOUTME: Generic create rollout parameterized by state marker.
// ABOUTME: State types carry their own data for compile-time guarantees.

use crate::api::FunctionInfo;
use crate::model::CreatePlan;
use crate::types::{FunctionId, VersionId};

use super::state::{Authorized, Deployed, FunctionCreated, Planned};

/// A create in progress, parameterized by its current state.
///
/// The state type parameter `S` carries the remote objects created so far,
/// so a version id is only reachable once the version exists and rollback is
/// only callable where a failed deployment can leave one behind.
#[derive(Debug)]
pub struct Rollout<S> {
    pub(crate) plan: CreatePlan,
    pub(crate) parent: Option<FunctionId>,
    pub(crate) keep_failed_resource: bool,
    pub(crate) state: S,
}

impl Rollout<Planned> {
    pub fn new(plan: CreatePlan, parent: Option<FunctionId>, keep_failed_resource: bool) -> Self {
        Rollout {
            plan,
            parent,
            keep_failed_resource,
            state: Planned,
        }
    }
}

impl<S> Rollout<S> {
    pub fn plan(&self) -> &CreatePlan {
        &self.plan
    }

    pub fn keep_failed_resource(&self) -> bool {
        self.keep_failed_resource
    }
}

impl Rollout<FunctionCreated> {
    pub fn function(&self) -> &FunctionInfo {
        &self.state.function
    }
}

impl Rollout<Authorized> {
    pub fn function(&self) -> &FunctionInfo {
        &self.state.function
    }

    pub fn ids(&self) -> (&FunctionId, &VersionId) {
        (&self.state.function.id, &self.state.function.version_id)
    }
}

impl Rollout<Deployed> {
    pub fn function(&self) -> &FunctionInfo {
        &self.state.function
    }
}
