// ABOUTME: Compute instance operations trait.
// ABOUTME: Launch instances, list instance status, and manage instance tags.

use async_trait::async_trait;
use std::collections::BTreeSet;

use super::shared_types::InstanceSummary;
use crate::types::{InstanceId, Tag};

/// Compute provisioner capabilities.
#[async_trait]
pub trait ComputeOps: Send + Sync {
    /// Launch one instance from a launch template.
    async fn launch_instance(&self, template: &str) -> Result<InstanceSummary, ComputeError>;

    /// List instance status, optionally restricted to the given ids.
    /// Ordering follows the provider's listing order.
    async fn describe_instance_status(
        &self,
        ids: Option<&[InstanceId]>,
    ) -> Result<Vec<InstanceSummary>, ComputeError>;

    /// Add tags to instances. Adding an existing tag is a no-op.
    async fn create_tags(&self, ids: &[InstanceId], tags: &[Tag]) -> Result<(), ComputeError>;

    /// Remove tags from instances. Removing a missing tag is a no-op.
    async fn delete_tags(&self, ids: &[InstanceId], tags: &[Tag]) -> Result<(), ComputeError>;

    /// Current tag set of one instance.
    async fn describe_tags(&self, id: &InstanceId) -> Result<BTreeSet<Tag>, ComputeError>;
}

/// Errors from compute operations.
#[derive(Debug, thiserror::Error)]
pub enum ComputeError {
    #[error("instance not found: {0}")]
    InstanceNotFound(String),

    #[error("launch template not found: {0}")]
    TemplateNotFound(String),

    #[error("compute service error: {0}")]
    Service(String),
}
