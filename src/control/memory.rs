// ABOUTME: In-memory control plane implementing all three capability traits.
// ABOUTME: Scripted instance boot and deployment statuses, a call journal, and failure injection.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::{BTreeSet, HashMap, VecDeque};

use super::compute::{ComputeError, ComputeOps};
use super::deployments::{DeploymentOps, DeploymentServiceError};
use super::request::{DeploymentRequest, TargetSelector};
use super::scaling::{ScalingError, ScalingGroupOps};
use super::shared_types::{
    DeploymentInfo, DeploymentOverview, DeploymentStatus, ErrorInfo, InstanceStatus,
    InstanceSummary, ScalingGroup,
};
use crate::types::{DeploymentId, InstanceId, ScalingGroupName, Tag, TagFilter};

/// Control plane operation, used for failure injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    DescribeGroups,
    SetDesiredCapacity,
    AttachInstance,
    LaunchInstance,
    DescribeInstanceStatus,
    CreateTags,
    DeleteTags,
    DescribeTags,
    CreateDeployment,
    GetDeployment,
    UpdateDeploymentGroup,
    ListDeployments,
}

/// One recorded control plane call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    DescribeGroups,
    SetDesiredCapacity {
        group: String,
        capacity: u32,
    },
    AttachInstance {
        group: String,
        instance: InstanceId,
    },
    LaunchInstance {
        template: String,
    },
    DescribeInstanceStatus,
    CreateTags {
        instances: Vec<InstanceId>,
        tags: Vec<Tag>,
    },
    DeleteTags {
        instances: Vec<InstanceId>,
        tags: Vec<Tag>,
    },
    DescribeTags {
        instance: InstanceId,
    },
    CreateDeployment {
        application: String,
        deployment_group: String,
    },
    GetDeployment {
        deployment: DeploymentId,
    },
    UpdateDeploymentGroup {
        scaling_groups: Vec<String>,
        tag_filters: Vec<TagFilter>,
    },
    ListDeployments,
}

impl Call {
    pub fn operation(&self) -> Operation {
        match self {
            Call::DescribeGroups => Operation::DescribeGroups,
            Call::SetDesiredCapacity { .. } => Operation::SetDesiredCapacity,
            Call::AttachInstance { .. } => Operation::AttachInstance,
            Call::LaunchInstance { .. } => Operation::LaunchInstance,
            Call::DescribeInstanceStatus => Operation::DescribeInstanceStatus,
            Call::CreateTags { .. } => Operation::CreateTags,
            Call::DeleteTags { .. } => Operation::DeleteTags,
            Call::DescribeTags { .. } => Operation::DescribeTags,
            Call::CreateDeployment { .. } => Operation::CreateDeployment,
            Call::GetDeployment { .. } => Operation::GetDeployment,
            Call::UpdateDeploymentGroup { .. } => Operation::UpdateDeploymentGroup,
            Call::ListDeployments => Operation::ListDeployments,
        }
    }
}

/// Instance selection currently configured on a deployment group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentGroupFilter {
    pub scaling_groups: Vec<ScalingGroupName>,
    pub tag_filters: Vec<TagFilter>,
}

#[derive(Debug)]
struct GroupState {
    name: String,
    desired: u32,
    members: Vec<InstanceId>,
}

#[derive(Debug)]
struct InstanceState {
    id: InstanceId,
    status: InstanceStatus,
    upcoming: VecDeque<InstanceStatus>,
    tags: BTreeSet<Tag>,
    terminated: bool,
}

#[derive(Debug)]
struct DeploymentGroupState {
    application: String,
    name: String,
    filter: DeploymentGroupFilter,
}

#[derive(Debug)]
struct DeploymentState {
    id: DeploymentId,
    application: String,
    deployment_group: String,
    status: DeploymentStatus,
    upcoming: VecDeque<DeploymentStatus>,
    targets: u32,
    error_info: Option<ErrorInfo>,
    create_time: DateTime<Utc>,
}

#[derive(Debug)]
struct State {
    groups: Vec<GroupState>,
    instances: Vec<InstanceState>,
    templates: BTreeSet<String>,
    boot_sequence: Vec<InstanceStatus>,
    deployment_groups: Vec<DeploymentGroupState>,
    status_sequence: Vec<DeploymentStatus>,
    failure_info: Option<ErrorInfo>,
    deployments: Vec<DeploymentState>,
    failures: HashMap<Operation, String>,
    journal: Vec<Call>,
    next_instance: u32,
    next_deployment: u32,
}

impl Default for State {
    fn default() -> Self {
        Self {
            groups: Vec::new(),
            instances: Vec::new(),
            templates: BTreeSet::new(),
            boot_sequence: vec![
                InstanceStatus::Pending,
                InstanceStatus::Initializing,
                InstanceStatus::Ok,
            ],
            deployment_groups: Vec::new(),
            status_sequence: vec![
                DeploymentStatus::Created,
                DeploymentStatus::InProgress,
                DeploymentStatus::Succeeded,
            ],
            failure_info: None,
            deployments: Vec::new(),
            failures: HashMap::new(),
            journal: Vec::new(),
            next_instance: 0,
            next_deployment: 0,
        }
    }
}

impl State {
    /// Record the call and surface an injected failure, if any.
    fn record(&mut self, call: Call) -> Result<(), String> {
        let op = call.operation();
        self.journal.push(call);
        match self.failures.get(&op) {
            Some(message) => Err(message.clone()),
            None => Ok(()),
        }
    }

    fn spawn_instance(&mut self) -> InstanceId {
        self.next_instance += 1;
        let id = InstanceId::new(format!("i-{:017x}", self.next_instance));
        self.instances.push(InstanceState {
            id: id.clone(),
            status: InstanceStatus::Pending,
            upcoming: self.boot_sequence.iter().copied().collect(),
            tags: BTreeSet::new(),
            terminated: false,
        });
        id
    }

    fn spawn_running_instance(&mut self) -> InstanceId {
        let id = self.spawn_instance();
        if let Some(instance) = self.instances.last_mut() {
            instance.status = InstanceStatus::Ok;
            instance.upcoming.clear();
        }
        id
    }

    fn group_index(&self, name: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.name == name)
    }

    fn live_instance_mut(&mut self, id: &InstanceId) -> Option<&mut InstanceState> {
        self.instances
            .iter_mut()
            .find(|i| i.id == *id && !i.terminated)
    }

    fn count_targets(&self, target: &TargetSelector) -> u32 {
        let count = match target {
            TargetSelector::ScalingGroup(name) => self
                .group_index(name.as_str())
                .map(|idx| self.groups[idx].members.len())
                .unwrap_or(0),
            TargetSelector::TaggedInstances(filters) => self
                .instances
                .iter()
                .filter(|i| !i.terminated)
                .filter(|i| filters.iter().all(|f| i.tags.iter().any(|t| f.matches(t))))
                .count(),
        };
        u32::try_from(count).unwrap_or(u32::MAX)
    }

    fn find_deployment_group(
        &self,
        application: &str,
        name: &str,
    ) -> Result<usize, DeploymentServiceError> {
        if !self
            .deployment_groups
            .iter()
            .any(|g| g.application == application)
        {
            return Err(DeploymentServiceError::ApplicationNotFound(
                application.to_string(),
            ));
        }
        self.deployment_groups
            .iter()
            .position(|g| g.application == application && g.name == name)
            .ok_or_else(|| DeploymentServiceError::DeploymentGroupNotFound(name.to_string()))
    }
}

/// Control plane held entirely in memory.
///
/// New instances walk through the configured boot sequence, one status per
/// `describe_instance_status` call. New deployments start `Created` and walk
/// through the configured status sequence, one status per `get_deployment`
/// call, staying on the last one.
#[derive(Debug, Default)]
pub struct MemoryControlPlane {
    state: Mutex<State>,
}

impl MemoryControlPlane {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scaling group with `capacity` running instances.
    pub fn with_group(self, name: &str, capacity: u32) -> Self {
        {
            let mut state = self.state.lock();
            let members = (0..capacity)
                .map(|_| state.spawn_running_instance())
                .collect();
            state.groups.push(GroupState {
                name: name.to_string(),
                desired: capacity,
                members,
            });
        }
        self
    }

    /// Register a deployment group under an application.
    pub fn with_deployment_group(self, application: &str, name: &str) -> Self {
        self.state.lock().deployment_groups.push(DeploymentGroupState {
            application: application.to_string(),
            name: name.to_string(),
            filter: DeploymentGroupFilter::default(),
        });
        self
    }

    pub fn with_launch_template(self, template: &str) -> Self {
        self.state.lock().templates.insert(template.to_string());
        self
    }

    /// Statuses a newly created instance reports on successive listings.
    pub fn with_boot_sequence(self, statuses: impl IntoIterator<Item = InstanceStatus>) -> Self {
        self.state.lock().boot_sequence = statuses.into_iter().collect();
        self
    }

    /// Statuses a newly created deployment reports on successive fetches.
    pub fn with_deployment_statuses(
        self,
        statuses: impl IntoIterator<Item = DeploymentStatus>,
    ) -> Self {
        self.state.lock().status_sequence = statuses.into_iter().collect();
        self
    }

    /// Error payload reported once a deployment reaches a failure status.
    pub fn with_failure_info(self, info: ErrorInfo) -> Self {
        self.state.lock().failure_info = Some(info);
        self
    }

    /// Seed a deployment that is already running in the group.
    pub fn with_ongoing_deployment(self, application: &str, deployment_group: &str) -> Self {
        {
            let mut state = self.state.lock();
            state.next_deployment += 1;
            let id = DeploymentId::new(format!("d-MEM{:06}", state.next_deployment));
            state.deployments.push(DeploymentState {
                id,
                application: application.to_string(),
                deployment_group: deployment_group.to_string(),
                status: DeploymentStatus::InProgress,
                upcoming: VecDeque::new(),
                targets: 1,
                error_info: None,
                create_time: Utc::now(),
            });
        }
        self
    }

    /// Make every call of `op` fail with a service error carrying `message`.
    pub fn fail_on(self, op: Operation, message: &str) -> Self {
        self.state.lock().failures.insert(op, message.to_string());
        self
    }

    /// Every call made so far, in order.
    pub fn journal(&self) -> Vec<Call> {
        self.state.lock().journal.clone()
    }

    /// Number of calls made for `op`.
    pub fn count(&self, op: Operation) -> usize {
        self.state
            .lock()
            .journal
            .iter()
            .filter(|c| c.operation() == op)
            .count()
    }

    pub fn desired_capacity(&self, group: &str) -> Option<u32> {
        let state = self.state.lock();
        state.group_index(group).map(|idx| state.groups[idx].desired)
    }

    pub fn group_members(&self, group: &str) -> Vec<InstanceId> {
        let state = self.state.lock();
        state
            .group_index(group)
            .map(|idx| state.groups[idx].members.clone())
            .unwrap_or_default()
    }

    /// Tags of an instance, terminated or not.
    pub fn tags_of(&self, id: &InstanceId) -> BTreeSet<Tag> {
        self.state
            .lock()
            .instances
            .iter()
            .find(|i| i.id == *id)
            .map(|i| i.tags.clone())
            .unwrap_or_default()
    }

    /// Overwrite an instance's tags without journaling.
    pub fn set_tags(&self, id: &InstanceId, tags: impl IntoIterator<Item = Tag>) {
        if let Some(instance) = self.state.lock().instances.iter_mut().find(|i| i.id == *id) {
            instance.tags = tags.into_iter().collect();
        }
    }

    pub fn deployment_group_filter(
        &self,
        application: &str,
        name: &str,
    ) -> Option<DeploymentGroupFilter> {
        self.state
            .lock()
            .deployment_groups
            .iter()
            .find(|g| g.application == application && g.name == name)
            .map(|g| g.filter.clone())
    }
}

#[async_trait]
impl ScalingGroupOps for MemoryControlPlane {
    async fn describe_groups(
        &self,
        names: &[ScalingGroupName],
    ) -> Result<Vec<ScalingGroup>, ScalingError> {
        let mut state = self.state.lock();
        state
            .record(Call::DescribeGroups)
            .map_err(ScalingError::Service)?;

        Ok(state
            .groups
            .iter()
            .filter(|g| names.is_empty() || names.iter().any(|n| n.as_str() == g.name))
            .map(|g| ScalingGroup {
                name: g.name.clone(),
                desired_capacity: g.desired,
                instances: g.members.clone(),
            })
            .collect())
    }

    async fn set_desired_capacity(
        &self,
        name: &ScalingGroupName,
        capacity: u32,
    ) -> Result<(), ScalingError> {
        let mut state = self.state.lock();
        state
            .record(Call::SetDesiredCapacity {
                group: name.to_string(),
                capacity,
            })
            .map_err(ScalingError::Service)?;

        let idx = state
            .group_index(name.as_str())
            .ok_or_else(|| ScalingError::GroupNotFound(name.to_string()))?;

        let target = capacity as usize;
        while state.groups[idx].members.len() < target {
            let id = state.spawn_instance();
            state.groups[idx].members.push(id);
        }
        // Oldest instances go first.
        while state.groups[idx].members.len() > target {
            let id = state.groups[idx].members.remove(0);
            if let Some(instance) = state.live_instance_mut(&id) {
                instance.terminated = true;
            }
        }
        state.groups[idx].desired = capacity;
        Ok(())
    }

    async fn attach_instance(
        &self,
        name: &ScalingGroupName,
        instance: &InstanceId,
    ) -> Result<(), ScalingError> {
        let mut state = self.state.lock();
        state
            .record(Call::AttachInstance {
                group: name.to_string(),
                instance: instance.clone(),
            })
            .map_err(ScalingError::Service)?;

        let idx = state
            .group_index(name.as_str())
            .ok_or_else(|| ScalingError::GroupNotFound(name.to_string()))?;
        if state.live_instance_mut(instance).is_none() {
            return Err(ScalingError::InstanceNotFound(instance.to_string()));
        }

        let group = &mut state.groups[idx];
        if !group.members.contains(instance) {
            group.members.push(instance.clone());
            group.desired += 1;
        }
        Ok(())
    }
}

#[async_trait]
impl ComputeOps for MemoryControlPlane {
    async fn launch_instance(&self, template: &str) -> Result<InstanceSummary, ComputeError> {
        let mut state = self.state.lock();
        state
            .record(Call::LaunchInstance {
                template: template.to_string(),
            })
            .map_err(ComputeError::Service)?;

        if !state.templates.contains(template) {
            return Err(ComputeError::TemplateNotFound(template.to_string()));
        }
        let id = state.spawn_instance();
        Ok(InstanceSummary {
            id,
            status: InstanceStatus::Pending,
            detail: None,
        })
    }

    async fn describe_instance_status(
        &self,
        ids: Option<&[InstanceId]>,
    ) -> Result<Vec<InstanceSummary>, ComputeError> {
        let mut state = self.state.lock();
        state
            .record(Call::DescribeInstanceStatus)
            .map_err(ComputeError::Service)?;

        Ok(state
            .instances
            .iter_mut()
            .filter(|i| !i.terminated)
            .filter(|i| ids.is_none_or(|ids| ids.contains(&i.id)))
            .map(|i| {
                if let Some(next) = i.upcoming.pop_front() {
                    i.status = next;
                }
                InstanceSummary {
                    id: i.id.clone(),
                    status: i.status,
                    detail: None,
                }
            })
            .collect())
    }

    async fn create_tags(&self, ids: &[InstanceId], tags: &[Tag]) -> Result<(), ComputeError> {
        let mut state = self.state.lock();
        state
            .record(Call::CreateTags {
                instances: ids.to_vec(),
                tags: tags.to_vec(),
            })
            .map_err(ComputeError::Service)?;

        for id in ids {
            let instance = state
                .live_instance_mut(id)
                .ok_or_else(|| ComputeError::InstanceNotFound(id.to_string()))?;
            // Same key replaces the old value.
            for tag in tags {
                instance.tags.retain(|t| t.key != tag.key);
                instance.tags.insert(tag.clone());
            }
        }
        Ok(())
    }

    async fn delete_tags(&self, ids: &[InstanceId], tags: &[Tag]) -> Result<(), ComputeError> {
        let mut state = self.state.lock();
        state
            .record(Call::DeleteTags {
                instances: ids.to_vec(),
                tags: tags.to_vec(),
            })
            .map_err(ComputeError::Service)?;

        for id in ids {
            let instance = state
                .live_instance_mut(id)
                .ok_or_else(|| ComputeError::InstanceNotFound(id.to_string()))?;
            instance
                .tags
                .retain(|t| !tags.iter().any(|d| d.key == t.key));
        }
        Ok(())
    }

    async fn describe_tags(&self, id: &InstanceId) -> Result<BTreeSet<Tag>, ComputeError> {
        let mut state = self.state.lock();
        state
            .record(Call::DescribeTags {
                instance: id.clone(),
            })
            .map_err(ComputeError::Service)?;

        state
            .live_instance_mut(id)
            .map(|i| i.tags.clone())
            .ok_or_else(|| ComputeError::InstanceNotFound(id.to_string()))
    }
}

fn overview_for(status: DeploymentStatus, targets: u32) -> DeploymentOverview {
    let mut overview = DeploymentOverview::default();
    match status {
        DeploymentStatus::Created | DeploymentStatus::Queued => overview.pending = targets,
        DeploymentStatus::InProgress => overview.in_progress = targets,
        DeploymentStatus::Ready => overview.ready = targets,
        DeploymentStatus::Succeeded => overview.succeeded = targets,
        DeploymentStatus::Failed => overview.failed = targets,
        DeploymentStatus::Stopped => overview.skipped = targets,
    }
    overview
}

#[async_trait]
impl DeploymentOps for MemoryControlPlane {
    async fn create_deployment(
        &self,
        request: &DeploymentRequest,
    ) -> Result<DeploymentId, DeploymentServiceError> {
        let mut state = self.state.lock();
        state
            .record(Call::CreateDeployment {
                application: request.application_name.clone(),
                deployment_group: request.deployment_group_name.clone(),
            })
            .map_err(DeploymentServiceError::Service)?;

        state.find_deployment_group(
            &request.application_name,
            &request.deployment_group_name,
        )?;

        state.next_deployment += 1;
        let id = DeploymentId::new(format!("d-MEM{:06}", state.next_deployment));
        let targets = state.count_targets(&request.target);
        let upcoming = state.status_sequence.iter().copied().collect();
        state.deployments.push(DeploymentState {
            id: id.clone(),
            application: request.application_name.clone(),
            deployment_group: request.deployment_group_name.clone(),
            status: DeploymentStatus::Created,
            upcoming,
            targets,
            error_info: None,
            create_time: Utc::now(),
        });
        Ok(id)
    }

    async fn get_deployment(
        &self,
        id: &DeploymentId,
    ) -> Result<DeploymentInfo, DeploymentServiceError> {
        let mut state = self.state.lock();
        state
            .record(Call::GetDeployment {
                deployment: id.clone(),
            })
            .map_err(DeploymentServiceError::Service)?;

        let failure_info = state.failure_info.clone();
        let deployment = state
            .deployments
            .iter_mut()
            .find(|d| d.id == *id)
            .ok_or_else(|| DeploymentServiceError::DeploymentNotFound(id.to_string()))?;

        if let Some(next) = deployment.upcoming.pop_front() {
            deployment.status = next;
            if next.is_failure() {
                deployment.error_info = failure_info;
            }
        }

        Ok(DeploymentInfo {
            deployment_id: deployment.id.clone(),
            status: deployment.status,
            overview: overview_for(deployment.status, deployment.targets),
            error_info: deployment.error_info.clone(),
            create_time: Some(deployment.create_time),
        })
    }

    async fn update_deployment_group(
        &self,
        application: &str,
        deployment_group: &str,
        scaling_groups: &[ScalingGroupName],
        tag_filters: &[TagFilter],
    ) -> Result<(), DeploymentServiceError> {
        let mut state = self.state.lock();
        state
            .record(Call::UpdateDeploymentGroup {
                scaling_groups: scaling_groups.iter().map(|g| g.to_string()).collect(),
                tag_filters: tag_filters.to_vec(),
            })
            .map_err(DeploymentServiceError::Service)?;

        let idx = state.find_deployment_group(application, deployment_group)?;
        state.deployment_groups[idx].filter = DeploymentGroupFilter {
            scaling_groups: scaling_groups.to_vec(),
            tag_filters: tag_filters.to_vec(),
        };
        Ok(())
    }

    async fn list_deployments(
        &self,
        application: &str,
        deployment_group: &str,
        statuses: &[DeploymentStatus],
    ) -> Result<Vec<DeploymentId>, DeploymentServiceError> {
        let mut state = self.state.lock();
        state
            .record(Call::ListDeployments)
            .map_err(DeploymentServiceError::Service)?;

        state.find_deployment_group(application, deployment_group)?;
        Ok(state
            .deployments
            .iter()
            .filter(|d| d.application == application && d.deployment_group == deployment_group)
            .filter(|d| statuses.contains(&d.status))
            .map(|d| d.id.clone())
            .collect())
    }
}
