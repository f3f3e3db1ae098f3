// ABOUTME: Rollout state marker types for the type state pattern.
// ABOUTME: Each state carries the remote objects that exist once it is reached.

use crate::api::{Deployment, FunctionAuthorization, FunctionInfo};

/// Initial state: requests built and validated, nothing sent yet.
/// Available actions: `create_function()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Planned;

/// Function version created remotely.
/// Available actions: `authorize()`
#[derive(Debug, Clone)]
pub struct FunctionCreated {
    pub(crate) function: FunctionInfo,
}

/// Invokers reconciled against the new version.
/// Available actions: `deploy()`, `rollback()`
#[derive(Debug, Clone)]
pub struct Authorized {
    pub(crate) function: FunctionInfo,
    pub(crate) authorization: FunctionAuthorization,
}

/// Deployment active, or none was requested.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Deployed {
    pub(crate) function: FunctionInfo,
    pub(crate) authorization: FunctionAuthorization,
    pub(crate) deployment: Option<Deployment>,
}
