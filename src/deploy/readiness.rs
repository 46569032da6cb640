// ABOUTME: Readiness poller that waits for one instance to report an ok status.
// ABOUTME: Fixed cadence with a hard budget; a missing listing entry counts as unknown.

use crate::clock::Clock;
use crate::control::{ComputeError, ComputeOps, InstanceStatus};
use crate::poll::{PollError, PollSchedule, poll_until};
use crate::types::InstanceId;

use super::error::DeployError;

pub struct ReadinessPoller<'a, C: ?Sized> {
    compute: &'a C,
    clock: &'a dyn Clock,
    schedule: PollSchedule,
}

impl<'a, C: ComputeOps + ?Sized> ReadinessPoller<'a, C> {
    pub fn new(compute: &'a C, clock: &'a dyn Clock, schedule: PollSchedule) -> Self {
        Self {
            compute,
            clock,
            schedule,
        }
    }

    /// Block until `id` reports ok, or fail with `ReadinessTimeout`.
    pub async fn wait_for_ready(&self, id: &InstanceId) -> Result<(), DeployError> {
        let ids = std::slice::from_ref(id);
        let compute = self.compute;

        poll_until(
            self.clock,
            &self.schedule,
            || async move {
                let listing = compute.describe_instance_status(Some(ids)).await?;
                let status = listing
                    .into_iter()
                    .find(|entry| entry.id == *id)
                    .map(|entry| entry.status)
                    .unwrap_or(InstanceStatus::Unknown);
                tracing::debug!(instance = %id, %status, "instance status");
                Ok::<_, ComputeError>(status)
            },
            |status| *status == InstanceStatus::Ok,
        )
        .await
        .map_err(|err| match err {
            PollError::Failed(source) => DeployError::from(source),
            PollError::TimedOut { elapsed, .. } => DeployError::ReadinessTimeout {
                instance: id.clone(),
                waited: elapsed,
            },
        })?;

        tracing::info!(instance = %id, "instance is ready");
        Ok(())
    }
}
