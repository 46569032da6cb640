// ABOUTME: Generic rollout struct parameterized by state marker.
// ABOUTME: State types carry their own data for compile-time guarantees.

use crate::control::DeploymentRequest;
use crate::types::{InstanceId, ScalingGroupName};

use super::plan::RolloutPlan;
use super::state::{Activated, Completed, Deployed, Detached, Idle, Ready, Reattached, ScaledUp, Targeted};
use super::submit::DeploymentOutcome;

/// A rollout in progress, parameterized by its current state.
///
/// The state type parameter `S` carries state-specific data (the new
/// instance, the deployment outcome) so that accessors only exist once the
/// data does.
#[derive(Debug)]
pub struct Rollout<S> {
    pub(crate) plan: RolloutPlan,
    pub(crate) state: S,
}

impl Rollout<Idle> {
    pub fn new(plan: RolloutPlan) -> Self {
        Rollout { plan, state: Idle }
    }
}

impl<S> Rollout<S> {
    pub fn plan(&self) -> &RolloutPlan {
        &self.plan
    }

    pub fn request(&self) -> &DeploymentRequest {
        &self.plan.request
    }

    pub fn scaling_group(&self) -> &ScalingGroupName {
        &self.plan.scaling_group
    }

    pub fn state(&self) -> &S {
        &self.state
    }
}

impl Rollout<ScaledUp> {
    pub fn instance(&self) -> &InstanceId {
        &self.state.instance
    }
}

impl Rollout<Ready> {
    pub fn instance(&self) -> &InstanceId {
        &self.state.instance
    }
}

impl Rollout<Targeted> {
    pub fn instance(&self) -> &InstanceId {
        &self.state.instance
    }
}

impl Rollout<Detached> {
    pub fn instance(&self) -> &InstanceId {
        &self.state.instance
    }
}

impl Rollout<Deployed> {
    pub fn instance(&self) -> &InstanceId {
        &self.state.instance
    }

    pub fn outcome(&self) -> &DeploymentOutcome {
        &self.state.outcome
    }
}

impl Rollout<Reattached> {
    pub fn instance(&self) -> &InstanceId {
        &self.state.instance
    }

    pub fn outcome(&self) -> &DeploymentOutcome {
        &self.state.outcome
    }
}

impl Rollout<Activated> {
    pub fn instance(&self) -> &InstanceId {
        &self.state.instance
    }

    pub fn outcome(&self) -> &DeploymentOutcome {
        &self.state.outcome
    }
}

impl Rollout<Completed> {
    /// The new instance; `None` for in-place runs.
    pub fn instance(&self) -> Option<&InstanceId> {
        self.state.instance.as_ref()
    }

    pub fn outcome(&self) -> &DeploymentOutcome {
        &self.state.outcome
    }
}
