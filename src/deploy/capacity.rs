// ABOUTME: Capacity controller that grows a scaling group by one instance and shrinks it back.
// ABOUTME: Discovers the instance a scale-up produced by polling instance status listings.

use crate::clock::Clock;
use crate::control::{ComputeOps, InstanceStatus, InstanceSummary, ScalingGroup, ScalingGroupOps};
use crate::poll::{PollError, PollSchedule, poll_until};
use crate::types::{InstanceId, ScalingGroupName};

use super::error::{DeployError, ResourceKind};

/// Desired capacity a blue-green run starts from and returns to.
pub const BASELINE_CAPACITY: u32 = 1;

/// Which way to move the scaling group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// How new capacity gets created.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Provisioning {
    /// Raise the group's desired capacity and let the group launch the instance.
    #[default]
    ScaleGroup,
    /// Launch from a template and attach the instance to the group.
    LaunchTemplate(String),
}

/// The instance a scale-up produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub instance: InstanceSummary,
    /// Other instances that were initializing at the same time.
    pub contenders: Vec<InstanceId>,
}

/// Grows and shrinks one scaling group.
pub struct CapacityController<'a, S: ?Sized, C: ?Sized> {
    scaling: &'a S,
    compute: &'a C,
    clock: &'a dyn Clock,
    discovery: PollSchedule,
}

impl<'a, S, C> CapacityController<'a, S, C>
where
    S: ScalingGroupOps + ?Sized,
    C: ComputeOps + ?Sized,
{
    pub fn new(scaling: &'a S, compute: &'a C, clock: &'a dyn Clock, discovery: PollSchedule) -> Self {
        Self {
            scaling,
            compute,
            clock,
            discovery,
        }
    }

    /// Move the group one unit in `direction`.
    ///
    /// Returns the discovered instance when scaling up, nothing when scaling down.
    pub async fn scale(
        &self,
        direction: Direction,
        group: &ScalingGroupName,
        provisioning: &Provisioning,
    ) -> Result<Option<Discovery>, DeployError> {
        match direction {
            Direction::Up => self.scale_up(group, provisioning).await.map(Some),
            Direction::Down => self.scale_down(group).await.map(|()| None),
        }
    }

    /// Add one instance to the group and return it once it is initializing.
    pub async fn scale_up(
        &self,
        group: &ScalingGroupName,
        provisioning: &Provisioning,
    ) -> Result<Discovery, DeployError> {
        let current = self.describe(group).await?;
        if current.desired_capacity != BASELINE_CAPACITY {
            return Err(DeployError::UnexpectedCapacity {
                group: group.to_string(),
                expected: BASELINE_CAPACITY,
                actual: current.desired_capacity,
            });
        }

        match provisioning {
            Provisioning::ScaleGroup => {
                tracing::info!(group = %group, capacity = BASELINE_CAPACITY + 1, "raising desired capacity");
                self.scaling
                    .set_desired_capacity(group, BASELINE_CAPACITY + 1)
                    .await?;
                self.discover(group).await
            }
            Provisioning::LaunchTemplate(template) => {
                tracing::info!(group = %group, template = %template, "launching instance from template");
                let instance = self.compute.launch_instance(template).await?;
                self.scaling.attach_instance(group, &instance.id).await?;
                tracing::info!(group = %group, instance = %instance.id, "attached launched instance");
                Ok(Discovery {
                    instance,
                    contenders: Vec::new(),
                })
            }
        }
    }

    /// Return the group to its baseline capacity. Does not wait for termination.
    pub async fn scale_down(&self, group: &ScalingGroupName) -> Result<(), DeployError> {
        tracing::info!(group = %group, capacity = BASELINE_CAPACITY, "lowering desired capacity");
        self.scaling
            .set_desired_capacity(group, BASELINE_CAPACITY)
            .await?;
        Ok(())
    }

    async fn describe(&self, group: &ScalingGroupName) -> Result<ScalingGroup, DeployError> {
        let groups = self
            .scaling
            .describe_groups(std::slice::from_ref(group))
            .await?;
        groups
            .into_iter()
            .find(|g| g.name == group.as_str())
            .ok_or_else(|| DeployError::ResourceNotFound {
                resource: ResourceKind::ScalingGroup,
                name: group.to_string(),
            })
    }

    async fn discover(&self, group: &ScalingGroupName) -> Result<Discovery, DeployError> {
        let listing = poll_until(
            self.clock,
            &self.discovery,
            || self.compute.describe_instance_status(None),
            |listing: &Vec<InstanceSummary>| {
                listing
                    .iter()
                    .any(|i| i.status == InstanceStatus::Initializing)
            },
        )
        .await
        .map_err(|err| match err {
            PollError::Failed(source) => DeployError::from(source),
            PollError::TimedOut { elapsed, .. } => DeployError::DiscoveryTimeout {
                group: group.to_string(),
                waited: elapsed,
            },
        })?;

        let mut initializing = listing
            .into_iter()
            .filter(|i| i.status == InstanceStatus::Initializing);
        let instance = initializing
            .next()
            .ok_or_else(|| DeployError::DiscoveryTimeout {
                group: group.to_string(),
                waited: self.discovery.timeout.unwrap_or_default(),
            })?;
        let contenders: Vec<InstanceId> = initializing.map(|i| i.id).collect();

        if !contenders.is_empty() {
            tracing::warn!(
                group = %group,
                selected = %instance.id,
                others = contenders.len(),
                "several instances initializing, picked the first listed"
            );
        }
        tracing::info!(group = %group, instance = %instance.id, "discovered new instance");

        Ok(Discovery {
            instance,
            contenders,
        })
    }
}
