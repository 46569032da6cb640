// ABOUTME: Tag manager that marks an instance as the deployment target or as active.
// ABOUTME: Promotion removes the target tag and adds the active tag concurrently.

use crate::control::ComputeOps;
use crate::types::{InstanceId, TagNames};

use super::error::DeployError;

pub struct TagManager<'a, C: ?Sized> {
    compute: &'a C,
    names: &'a TagNames,
}

impl<'a, C: ComputeOps + ?Sized> TagManager<'a, C> {
    pub fn new(compute: &'a C, names: &'a TagNames) -> Self {
        Self { compute, names }
    }

    /// Add the target tag so tag-filtered deployments select this instance.
    pub async fn mark_as_target(&self, id: &InstanceId) -> Result<(), DeployError> {
        tracing::info!(instance = %id, tag = %self.names.target, "tagging deployment target");
        self.compute
            .create_tags(std::slice::from_ref(id), &[self.names.target_tag()])
            .await?;
        Ok(())
    }

    /// Swap the target tag for the active tag.
    ///
    /// Both calls are issued together with no joint atomicity. If either
    /// fails the error propagates and the instance may carry both tags or
    /// neither.
    pub async fn mark_as_active(&self, id: &InstanceId) -> Result<(), DeployError> {
        tracing::info!(instance = %id, tag = %self.names.active, "promoting instance to active");
        let ids = std::slice::from_ref(id);
        let target = [self.names.target_tag()];
        let active = [self.names.active_tag()];

        let (removed, added) = futures::join!(
            self.compute.delete_tags(ids, &target),
            self.compute.create_tags(ids, &active),
        );
        removed?;
        added?;
        Ok(())
    }
}
