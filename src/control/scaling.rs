// ABOUTME: Scaling group operations trait.
// ABOUTME: Describe groups, set desired capacity, and attach instances.

use async_trait::async_trait;

use super::shared_types::ScalingGroup;
use crate::types::{InstanceId, ScalingGroupName};

/// Scaling group manager capabilities.
#[async_trait]
pub trait ScalingGroupOps: Send + Sync {
    /// Describe the named groups. An empty slice describes every group.
    async fn describe_groups(
        &self,
        names: &[ScalingGroupName],
    ) -> Result<Vec<ScalingGroup>, ScalingError>;

    /// Set the group's desired capacity.
    async fn set_desired_capacity(
        &self,
        name: &ScalingGroupName,
        capacity: u32,
    ) -> Result<(), ScalingError>;

    /// Attach a running instance to the group, raising its desired capacity by one.
    async fn attach_instance(
        &self,
        name: &ScalingGroupName,
        instance: &InstanceId,
    ) -> Result<(), ScalingError>;
}

/// Errors from scaling group operations.
#[derive(Debug, thiserror::Error)]
pub enum ScalingError {
    #[error("scaling group not found: {0}")]
    GroupNotFound(String),

    #[error("instance not found: {0}")]
    InstanceNotFound(String),

    #[error("scaling service error: {0}")]
    Service(String),
}
