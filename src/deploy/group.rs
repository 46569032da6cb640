// ABOUTME: Reconfigures which scaling groups a deployment group selects.
// ABOUTME: Detach and reattach bracket a tag-targeted deployment.

use crate::control::{DeploymentOps, DeploymentRequest};
use crate::types::{ScalingGroupName, TagFilter, TagNames};

use super::error::DeployError;

pub struct GroupReconfigurator<'a, D: ?Sized> {
    deployments: &'a D,
    application: &'a str,
    deployment_group: &'a str,
    active_filter: TagFilter,
}

impl<'a, D: DeploymentOps + ?Sized> GroupReconfigurator<'a, D> {
    pub fn new(
        deployments: &'a D,
        application: &'a str,
        deployment_group: &'a str,
        tags: &TagNames,
    ) -> Self {
        Self {
            deployments,
            application,
            deployment_group,
            active_filter: tags.active_filter(),
        }
    }

    /// Reconfigurator for the deployment group a request targets.
    pub fn for_request(deployments: &'a D, request: &'a DeploymentRequest, tags: &TagNames) -> Self {
        Self::new(
            deployments,
            &request.application_name,
            &request.deployment_group_name,
            tags,
        )
    }

    /// Replace the group's scaling groups. The active-tag filter is always kept.
    pub async fn set_scaling_groups(&self, groups: &[ScalingGroupName]) -> Result<(), DeployError> {
        tracing::info!(
            application = self.application,
            deployment_group = self.deployment_group,
            scaling_groups = groups.len(),
            "updating deployment group"
        );
        self.deployments
            .update_deployment_group(
                self.application,
                self.deployment_group,
                groups,
                std::slice::from_ref(&self.active_filter),
            )
            .await?;
        Ok(())
    }

    /// Stop the deployment group from selecting any scaling group.
    pub async fn detach(&self) -> Result<(), DeployError> {
        self.set_scaling_groups(&[]).await
    }

    /// Point the deployment group back at `group`.
    pub async fn reattach(&self, group: &ScalingGroupName) -> Result<(), DeployError> {
        self.set_scaling_groups(std::slice::from_ref(group)).await
    }
}
