// ABOUTME: State transition methods for rollout orchestration.
// ABOUTME: Each method consumes self and returns the next state on success.

use crate::clock::Clock;
use crate::control::{ComputeOps, DeploymentOps, ScalingGroupOps};
use crate::types::InstanceId;

use super::Rollout;
use super::capacity::CapacityController;
use super::error::DeployError;
use super::group::GroupReconfigurator;
use super::readiness::ReadinessPoller;
use super::state::{
    Activated, Completed, Deployed, Detached, GroupDetached, Idle, Ready, Reattached, ScaledUp,
    Targeted,
};
use super::strategy::DeploymentType;
use super::submit::{DeploymentOutcome, DeploymentSubmitter};
use super::tags::TagManager;

/// Result type for transitions that leave the deployment group detached on failure.
pub type TransitionResult<T, S> = Result<Rollout<T>, (Rollout<S>, DeployError)>;

// =============================================================================
// Internal Helpers
// =============================================================================

impl<S> Rollout<S> {
    fn transition<T>(self, state: T) -> Rollout<T> {
        Rollout {
            plan: self.plan,
            state,
        }
    }

    fn transition_with<T>(self, next: impl FnOnce(S) -> T) -> Rollout<T> {
        Rollout {
            plan: self.plan,
            state: next(self.state),
        }
    }

    fn require(&self, deployment_type: DeploymentType) -> Result<(), DeployError> {
        if self.plan.deployment_type != deployment_type {
            return Err(DeployError::config_error(format!(
                "operation requires a {} rollout, plan is {}",
                deployment_type, self.plan.deployment_type
            )));
        }
        Ok(())
    }

    fn reconfigurator<'a, D>(&'a self, deployments: &'a D) -> GroupReconfigurator<'a, D>
    where
        D: DeploymentOps + ?Sized,
    {
        GroupReconfigurator::for_request(deployments, &self.plan.request, &self.plan.tags)
    }

    fn submitter<'a, D>(&self, deployments: &'a D, clock: &'a dyn Clock) -> DeploymentSubmitter<'a, D>
    where
        D: DeploymentOps + ?Sized,
    {
        DeploymentSubmitter::new(deployments, clock, self.plan.timing.status_schedule())
    }

    async fn submit_and_wait<D>(
        &self,
        deployments: &D,
        clock: &dyn Clock,
    ) -> Result<DeploymentOutcome, DeployError>
    where
        D: DeploymentOps + ?Sized,
    {
        let submitter = self.submitter(deployments, clock);
        let id = submitter.submit(&self.plan.request).await?;
        submitter.await_terminal(&id).await
    }
}

// =============================================================================
// Idle
// =============================================================================

impl Rollout<Idle> {
    /// Refuse to start while another deployment runs in the same group.
    pub async fn preflight<D>(&self, deployments: &D, clock: &dyn Clock) -> Result<(), DeployError>
    where
        D: DeploymentOps + ?Sized,
    {
        self.submitter(deployments, clock)
            .ensure_idle(&self.plan.request)
            .await
    }

    /// Add one instance to the scaling group and wait for it to appear.
    pub async fn scale_up<S, C>(
        self,
        scaling: &S,
        compute: &C,
        clock: &dyn Clock,
    ) -> Result<Rollout<ScaledUp>, DeployError>
    where
        S: ScalingGroupOps + ?Sized,
        C: ComputeOps + ?Sized,
    {
        self.require(DeploymentType::BlueGreen)?;
        let controller =
            CapacityController::new(scaling, compute, clock, self.plan.timing.discovery_schedule());
        let discovery = controller
            .scale_up(&self.plan.scaling_group, &self.plan.provisioning)
            .await?;

        Ok(self.transition(ScaledUp {
            instance: discovery.instance.id,
            contenders: discovery.contenders,
        }))
    }

    /// Deploy to the scaling group's current instances.
    pub async fn deploy_in_place<D>(
        self,
        deployments: &D,
        clock: &dyn Clock,
    ) -> Result<Rollout<Completed>, DeployError>
    where
        D: DeploymentOps + ?Sized,
    {
        self.require(DeploymentType::InPlace)?;
        let outcome = self.submit_and_wait(deployments, clock).await?;
        Ok(self.transition(Completed {
            instance: None,
            outcome,
        }))
    }
}

// =============================================================================
// Blue-green sequence
// =============================================================================

impl Rollout<ScaledUp> {
    pub async fn await_ready<C>(
        self,
        compute: &C,
        clock: &dyn Clock,
    ) -> Result<Rollout<Ready>, DeployError>
    where
        C: ComputeOps + ?Sized,
    {
        ReadinessPoller::new(compute, clock, self.plan.timing.readiness_schedule())
            .wait_for_ready(&self.state.instance)
            .await?;

        Ok(self.transition_with(|s| Ready {
            instance: s.instance,
        }))
    }
}

impl Rollout<Ready> {
    pub async fn mark_target<C>(self, compute: &C) -> Result<Rollout<Targeted>, DeployError>
    where
        C: ComputeOps + ?Sized,
    {
        TagManager::new(compute, &self.plan.tags)
            .mark_as_target(&self.state.instance)
            .await?;

        Ok(self.transition_with(|s| Targeted {
            instance: s.instance,
        }))
    }
}

impl Rollout<Targeted> {
    /// Stop the deployment group from selecting the scaling group, so only
    /// the target-tagged instance receives the deployment.
    pub async fn detach<D>(self, deployments: &D) -> Result<Rollout<Detached>, DeployError>
    where
        D: DeploymentOps + ?Sized,
    {
        self.reconfigurator(deployments).detach().await?;

        Ok(self.transition_with(|s| Detached {
            instance: s.instance,
        }))
    }
}

impl Rollout<Detached> {
    /// Submit the deployment and wait for it to succeed.
    ///
    /// On failure, returns the detached rollout so the caller can restore
    /// the deployment group.
    pub async fn deploy<D>(self, deployments: &D, clock: &dyn Clock) -> TransitionResult<Deployed, Detached>
    where
        D: DeploymentOps + ?Sized,
    {
        let result = self.submit_and_wait(deployments, clock).await;
        match result {
            Ok(outcome) => Ok(self.transition_with(|s| Deployed {
                instance: s.instance,
                outcome,
            })),
            Err(e) => Err((self, e)),
        }
    }
}

impl Rollout<Deployed> {
    /// Point the deployment group back at the scaling group.
    pub async fn reattach<D>(self, deployments: &D) -> TransitionResult<Reattached, Deployed>
    where
        D: DeploymentOps + ?Sized,
    {
        let result = self
            .reconfigurator(deployments)
            .reattach(&self.plan.scaling_group)
            .await;
        if let Err(e) = result {
            return Err((self, e));
        }

        Ok(self.transition_with(|s| Reattached {
            instance: s.instance,
            outcome: s.outcome,
        }))
    }
}

impl<S: GroupDetached> Rollout<S> {
    /// Compensation: point the deployment group back at the scaling group
    /// after a failure left it detached.
    pub async fn restore_group<D>(&self, deployments: &D) -> Result<(), DeployError>
    where
        D: DeploymentOps + ?Sized,
    {
        tracing::info!(group = %self.plan.scaling_group, "restoring deployment group after failure");
        self.reconfigurator(deployments)
            .reattach(&self.plan.scaling_group)
            .await
    }
}

impl Rollout<Reattached> {
    pub async fn mark_active<C>(self, compute: &C) -> Result<Rollout<Activated>, DeployError>
    where
        C: ComputeOps + ?Sized,
    {
        TagManager::new(compute, &self.plan.tags)
            .mark_as_active(&self.state.instance)
            .await?;

        Ok(self.transition_with(|s| Activated {
            instance: s.instance,
            outcome: s.outcome,
        }))
    }
}

impl Rollout<Activated> {
    /// Return the scaling group to its baseline capacity, retiring the old instance.
    pub async fn scale_down<S, C>(
        self,
        scaling: &S,
        compute: &C,
        clock: &dyn Clock,
    ) -> Result<Rollout<Completed>, DeployError>
    where
        S: ScalingGroupOps + ?Sized,
        C: ComputeOps + ?Sized,
    {
        CapacityController::new(scaling, compute, clock, self.plan.timing.discovery_schedule())
            .scale_down(&self.plan.scaling_group)
            .await?;

        Ok(self.transition_with(|s| Completed {
            instance: Some(s.instance),
            outcome: s.outcome,
        }))
    }
}

impl Rollout<Completed> {
    /// Consume the rollout, returning the outcome and the new instance if any.
    pub fn finish(self) -> (DeploymentOutcome, Option<InstanceId>) {
        (self.state.outcome, self.state.instance)
    }
}
