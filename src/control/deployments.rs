// ABOUTME: Deployment service operations trait.
// ABOUTME: Create and inspect deployments, list them, and rewrite deployment groups.

use async_trait::async_trait;

use super::request::DeploymentRequest;
use super::shared_types::{DeploymentInfo, DeploymentStatus};
use crate::types::{DeploymentId, ScalingGroupName, TagFilter};

/// Deployment service capabilities.
#[async_trait]
pub trait DeploymentOps: Send + Sync {
    /// Submit a deployment.
    async fn create_deployment(
        &self,
        request: &DeploymentRequest,
    ) -> Result<DeploymentId, DeploymentServiceError>;

    /// Fetch the current state of a deployment.
    async fn get_deployment(
        &self,
        id: &DeploymentId,
    ) -> Result<DeploymentInfo, DeploymentServiceError>;

    /// Replace a deployment group's instance selection with the given
    /// scaling groups and tag filters.
    async fn update_deployment_group(
        &self,
        application: &str,
        deployment_group: &str,
        scaling_groups: &[ScalingGroupName],
        tag_filters: &[TagFilter],
    ) -> Result<(), DeploymentServiceError>;

    /// Deployments of a group whose status is one of `statuses`.
    async fn list_deployments(
        &self,
        application: &str,
        deployment_group: &str,
        statuses: &[DeploymentStatus],
    ) -> Result<Vec<DeploymentId>, DeploymentServiceError>;
}

/// Errors from the deployment service.
#[derive(Debug, thiserror::Error)]
pub enum DeploymentServiceError {
    #[error("application not found: {0}")]
    ApplicationNotFound(String),

    #[error("deployment group not found: {0}")]
    DeploymentGroupNotFound(String),

    #[error("deployment not found: {0}")]
    DeploymentNotFound(String),

    #[error("deployment service error: {0}")]
    Service(String),
}

