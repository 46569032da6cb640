// ABOUTME: Rollout state marker types for the type state pattern.
// ABOUTME: States carry the instance and outcome data that exist at that point.

use crate::types::InstanceId;

use super::submit::DeploymentOutcome;

/// Initial state: nothing changed yet.
/// Available actions: `preflight()`, `scale_up()`, `deploy_in_place()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Idle;

/// A new instance exists and is initializing.
/// Available actions: `await_ready()`
#[derive(Debug, Clone)]
pub struct ScaledUp {
    pub(crate) instance: InstanceId,
    pub(crate) contenders: Vec<InstanceId>,
}

impl ScaledUp {
    pub fn instance(&self) -> &InstanceId {
        &self.instance
    }

    /// Instances that were also initializing when this one was picked.
    pub fn contenders(&self) -> &[InstanceId] {
        &self.contenders
    }
}

/// The new instance reports ok.
/// Available actions: `mark_target()`
#[derive(Debug, Clone)]
pub struct Ready {
    pub(crate) instance: InstanceId,
}

/// The new instance carries the target tag.
/// Available actions: `detach()`
#[derive(Debug, Clone)]
pub struct Targeted {
    pub(crate) instance: InstanceId,
}

/// The deployment group no longer selects the scaling group.
/// Available actions: `deploy()`, `restore_group()`
#[derive(Debug, Clone)]
pub struct Detached {
    pub(crate) instance: InstanceId,
}

/// The deployment succeeded on the new instance.
/// Available actions: `reattach()`, `restore_group()`
#[derive(Debug, Clone)]
pub struct Deployed {
    pub(crate) instance: InstanceId,
    pub(crate) outcome: DeploymentOutcome,
}

/// The deployment group selects the scaling group again.
/// Available actions: `mark_active()`
#[derive(Debug, Clone)]
pub struct Reattached {
    pub(crate) instance: InstanceId,
    pub(crate) outcome: DeploymentOutcome,
}

/// The new instance carries the active tag.
/// Available actions: `scale_down()`
#[derive(Debug, Clone)]
pub struct Activated {
    pub(crate) instance: InstanceId,
    pub(crate) outcome: DeploymentOutcome,
}

/// Finished. In-place runs have no new instance.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Completed {
    pub(crate) instance: Option<InstanceId>,
    pub(crate) outcome: DeploymentOutcome,
}

/// States in which the deployment group is detached from the scaling group.
pub trait GroupDetached {}

impl GroupDetached for Detached {}
impl GroupDetached for Deployed {}
