// ABOUTME: Top-level rollout state machine sequencing capacity, tags, group, and deployment steps.
// ABOUTME: Reports each phase, records diagnostics, and restores a detached group on failure.

use serde::Serialize;

use crate::clock::Clock;
use crate::control::{ComputeOps, ControlPlane, DeploymentOps, ScalingGroupOps};
use crate::diagnostics::{Diagnostics, Warning};
use crate::types::InstanceId;

use super::Rollout;
use super::error::{DeployError, RunFailure};
use super::phase::{NoopListener, Phase, PhaseListener};
use super::plan::RolloutPlan;
use super::state::{GroupDetached, Idle};
use super::strategy::DeploymentType;
use super::submit::DeploymentOutcome;

/// Result of a successful run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub deployment_type: DeploymentType,
    #[serde(flatten)]
    pub outcome: DeploymentOutcome,
    /// The instance created by a blue-green run.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<InstanceId>,
}

static NOOP: NoopListener = NoopListener;

/// Runs one rollout against the three control planes.
pub struct Orchestrator<'a, S: ?Sized, C: ?Sized, D: ?Sized> {
    scaling: &'a S,
    compute: &'a C,
    deployments: &'a D,
    clock: &'a dyn Clock,
    listener: &'a dyn PhaseListener,
}

impl<'a, P: ControlPlane> Orchestrator<'a, P, P, P> {
    /// Orchestrator whose three capabilities come from one provider.
    pub fn with_plane(plane: &'a P, clock: &'a dyn Clock) -> Self {
        Self::new(plane, plane, plane, clock)
    }
}

impl<'a, S, C, D> Orchestrator<'a, S, C, D>
where
    S: ScalingGroupOps + ?Sized,
    C: ComputeOps + ?Sized,
    D: DeploymentOps + ?Sized,
{
    pub fn new(scaling: &'a S, compute: &'a C, deployments: &'a D, clock: &'a dyn Clock) -> Self {
        Self {
            scaling,
            compute,
            deployments,
            clock,
            listener: &NOOP,
        }
    }

    pub fn with_listener(mut self, listener: &'a dyn PhaseListener) -> Self {
        self.listener = listener;
        self
    }

    /// Run the plan to completion or to the first failure.
    pub async fn run(
        &self,
        plan: RolloutPlan,
        diagnostics: &mut Diagnostics,
    ) -> Result<RunReport, RunFailure> {
        let deployment_type = plan.deployment_type;
        tracing::info!(
            application = %plan.request.application_name,
            deployment_group = %plan.request.deployment_group_name,
            scaling_group = %plan.scaling_group,
            %deployment_type,
            "starting rollout"
        );

        self.enter(Phase::Idle);
        let rollout = Rollout::new(plan);
        rollout
            .preflight(self.deployments, self.clock)
            .await
            .map_err(failed(Phase::Idle))?;

        let result = match deployment_type {
            DeploymentType::InPlace => self.run_in_place(rollout).await,
            DeploymentType::BlueGreen => self.run_blue_green(rollout, diagnostics).await,
        };

        match result {
            Ok((outcome, instance)) => {
                self.enter(Phase::Done);
                tracing::info!(deployment = %outcome.deployment_id, status = %outcome.status, "rollout complete");
                Ok(RunReport {
                    deployment_type,
                    outcome,
                    instance,
                })
            }
            Err(failure) => {
                tracing::error!(phase = %failure.phase, code = failure.code(), "{}", failure.error);
                Err(failure)
            }
        }
    }

    async fn run_in_place(
        &self,
        rollout: Rollout<Idle>,
    ) -> Result<(DeploymentOutcome, Option<InstanceId>), RunFailure> {
        self.enter(Phase::Deploying);
        let rollout = rollout
            .deploy_in_place(self.deployments, self.clock)
            .await
            .map_err(failed(Phase::Deploying))?;
        Ok(rollout.finish())
    }

    async fn run_blue_green(
        &self,
        rollout: Rollout<Idle>,
        diagnostics: &mut Diagnostics,
    ) -> Result<(DeploymentOutcome, Option<InstanceId>), RunFailure> {
        self.enter(Phase::ScalingUp);
        let rollout = rollout
            .scale_up(self.scaling, self.compute, self.clock)
            .await
            .map_err(failed(Phase::ScalingUp))?;
        if !rollout.state().contenders().is_empty() {
            diagnostics.warn(Warning::ambiguous_discovery(format!(
                "picked {} as the new instance while {} other instance(s) were also initializing",
                rollout.instance(),
                rollout.state().contenders().len()
            )));
        }

        self.enter(Phase::AwaitingReady);
        let rollout = rollout
            .await_ready(self.compute, self.clock)
            .await
            .map_err(failed(Phase::AwaitingReady))?;

        self.enter(Phase::TaggingTarget);
        let rollout = rollout
            .mark_target(self.compute)
            .await
            .map_err(failed(Phase::TaggingTarget))?;

        self.enter(Phase::Detaching);
        let rollout = rollout
            .detach(self.deployments)
            .await
            .map_err(failed(Phase::Detaching))?;

        self.enter(Phase::Deploying);
        let rollout = match rollout.deploy(self.deployments, self.clock).await {
            Ok(rollout) => rollout,
            Err((detached, error)) => {
                return Err(self
                    .compensate(&detached, RunFailure::new(Phase::Deploying, error), diagnostics)
                    .await);
            }
        };

        self.enter(Phase::Reattaching);
        // A failed reattach is not repeated as compensation.
        let rollout = rollout
            .reattach(self.deployments)
            .await
            .map_err(|(_, error)| RunFailure::new(Phase::Reattaching, error))?;

        self.enter(Phase::TaggingActive);
        let rollout = rollout
            .mark_active(self.compute)
            .await
            .map_err(failed(Phase::TaggingActive))?;

        self.enter(Phase::ScalingDown);
        let rollout = rollout
            .scale_down(self.scaling, self.compute, self.clock)
            .await
            .map_err(failed(Phase::ScalingDown))?;

        Ok(rollout.finish())
    }

    /// Best-effort reattach. The original failure is always returned.
    async fn compensate<St: GroupDetached>(
        &self,
        rollout: &Rollout<St>,
        failure: RunFailure,
        diagnostics: &mut Diagnostics,
    ) -> RunFailure {
        if !rollout.plan().compensation.reattach_on_failure {
            tracing::info!("leaving deployment group detached, reattach on failure is disabled");
            return failure;
        }

        if let Err(e) = rollout.restore_group(self.deployments).await {
            diagnostics.warn(Warning::compensation_failed(format!(
                "could not reattach scaling group {} to deployment group {}: {}",
                rollout.scaling_group(),
                rollout.request().deployment_group_name,
                e
            )));
        }
        failure
    }

    fn enter(&self, phase: Phase) {
        tracing::info!(%phase, "entering phase");
        self.listener.entered(phase);
    }
}

fn failed(phase: Phase) -> impl FnOnce(DeployError) -> RunFailure {
    move |error| RunFailure::new(phase, error)
}
