// ABOUTME: Submits a deployment and polls its status with linear backoff until terminal.
// ABOUTME: Refuses to submit while another deployment is running in the same group.

use serde::Serialize;

use crate::clock::Clock;
use crate::control::{DeploymentInfo, DeploymentOps, DeploymentOverview, DeploymentRequest, DeploymentStatus};
use crate::poll::{PollError, PollSchedule, poll_until};
use crate::types::DeploymentId;

use super::error::DeployError;

const NO_ERROR_INFORMATION: &str = "no error information";

/// A deployment that reached the success terminal status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentOutcome {
    pub deployment_id: DeploymentId,
    pub status: DeploymentStatus,
    pub overview: DeploymentOverview,
}

pub struct DeploymentSubmitter<'a, D: ?Sized> {
    deployments: &'a D,
    clock: &'a dyn Clock,
    schedule: PollSchedule,
}

impl<'a, D: DeploymentOps + ?Sized> DeploymentSubmitter<'a, D> {
    pub fn new(deployments: &'a D, clock: &'a dyn Clock, schedule: PollSchedule) -> Self {
        Self {
            deployments,
            clock,
            schedule,
        }
    }

    /// Check, submit, and wait for the deployment to succeed.
    ///
    /// Standalone entry point. A rollout runs `ensure_idle` once at `Idle`,
    /// before any capacity change, and later calls only `submit` and
    /// `await_terminal`.
    pub async fn deploy(&self, request: &DeploymentRequest) -> Result<DeploymentOutcome, DeployError> {
        self.ensure_idle(request).await?;
        let id = self.submit(request).await?;
        self.await_terminal(&id).await
    }

    /// Fail with `DeploymentInProgress` if the group already has an ongoing deployment.
    pub async fn ensure_idle(&self, request: &DeploymentRequest) -> Result<(), DeployError> {
        let ongoing = self
            .deployments
            .list_deployments(
                &request.application_name,
                &request.deployment_group_name,
                &DeploymentStatus::ONGOING,
            )
            .await?;

        match ongoing.into_iter().next() {
            Some(deployment_id) => Err(DeployError::DeploymentInProgress { deployment_id }),
            None => Ok(()),
        }
    }

    pub async fn submit(&self, request: &DeploymentRequest) -> Result<DeploymentId, DeployError> {
        let id = self.deployments.create_deployment(request).await?;
        tracing::info!(
            deployment = %id,
            application = %request.application_name,
            deployment_group = %request.deployment_group_name,
            "deployment submitted"
        );
        Ok(id)
    }

    /// Poll until the deployment succeeds or reaches a failure terminal status.
    pub async fn await_terminal(&self, id: &DeploymentId) -> Result<DeploymentOutcome, DeployError> {
        let deployments = self.deployments;

        let info = poll_until(
            self.clock,
            &self.schedule,
            || async move {
                let info = deployments.get_deployment(id).await?;
                tracing::debug!(deployment = %id, status = %info.status, "deployment status");
                if info.status.is_failure() {
                    return Err(failure(info));
                }
                Ok::<_, DeployError>(info)
            },
            |info| info.status.is_success(),
        )
        .await
        .map_err(|err| match err {
            PollError::Failed(err) => err,
            PollError::TimedOut { elapsed, .. } => DeployError::StatusTimeout {
                deployment_id: id.clone(),
                waited: elapsed,
            },
        })?;

        tracing::info!(deployment = %id, status = %info.status, "deployment finished");
        Ok(DeploymentOutcome {
            deployment_id: info.deployment_id,
            status: info.status,
            overview: info.overview,
        })
    }
}

fn failure(info: DeploymentInfo) -> DeployError {
    let (code, message) = match info.error_info {
        Some(error) => (error.code, error.message),
        None => (
            info.status.as_str().to_string(),
            NO_ERROR_INFORMATION.to_string(),
        ),
    };
    DeployError::DeploymentFailed {
        deployment_id: info.deployment_id,
        code,
        message,
    }
}
