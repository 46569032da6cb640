// ABOUTME: Deployment request submitted to the deployment service.
// ABOUTME: Revision location, file-exists behavior, rollback policy, and target selection.

use nonempty::NonEmpty;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::{ScalingGroupName, TagFilter};

/// Archive format of the revision bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BundleType {
    #[default]
    Zip,
    Tar,
    Tgz,
}

/// What the deployment agent does with files that already exist at the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FileExistsBehavior {
    #[default]
    Disallow,
    Overwrite,
    Retain,
}

impl fmt::Display for FileExistsBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileExistsBehavior::Disallow => write!(f, "DISALLOW"),
            FileExistsBehavior::Overwrite => write!(f, "OVERWRITE"),
            FileExistsBehavior::Retain => write!(f, "RETAIN"),
        }
    }
}

/// Events that trigger the deployment service's own automatic rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RollbackEvent {
    DeploymentFailure,
    DeploymentStopOnAlarm,
    DeploymentStopOnRequest,
}

impl FromStr for RollbackEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEPLOYMENT_FAILURE" => Ok(RollbackEvent::DeploymentFailure),
            "DEPLOYMENT_STOP_ON_ALARM" => Ok(RollbackEvent::DeploymentStopOnAlarm),
            "DEPLOYMENT_STOP_ON_REQUEST" => Ok(RollbackEvent::DeploymentStopOnRequest),
            other => Err(format!("unknown rollback event: {}", other)),
        }
    }
}

/// Automatic rollback configuration forwarded with the request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RollbackPolicy {
    #[default]
    Disabled,
    Enabled { events: NonEmpty<RollbackEvent> },
}

impl RollbackPolicy {
    pub fn on_failure() -> Self {
        RollbackPolicy::Enabled {
            events: NonEmpty::new(RollbackEvent::DeploymentFailure),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, RollbackPolicy::Enabled { .. })
    }
}

/// Object-store location of the revision bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Revision {
    pub bucket: String,
    pub key: String,
    pub bundle_type: BundleType,
}

/// Which instances the deployment targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetSelector {
    /// Deploy to the scaling group's instances in place.
    ScalingGroup(ScalingGroupName),
    /// Deploy only to instances matching the tag filters.
    TaggedInstances(Vec<TagFilter>),
}

/// A deployment submission. Built once per run and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRequest {
    pub application_name: String,
    pub deployment_group_name: String,
    pub deployment_config_name: String,
    pub file_exists_behavior: FileExistsBehavior,
    pub revision: Revision,
    pub rollback_policy: RollbackPolicy,
    pub target: TargetSelector,
}

pub const DEFAULT_DEPLOYMENT_CONFIG: &str = "CodeDeployDefault.OneAtATime";

impl DeploymentRequest {
    pub fn new(
        application_name: impl Into<String>,
        deployment_group_name: impl Into<String>,
        revision: Revision,
        target: TargetSelector,
    ) -> Self {
        Self {
            application_name: application_name.into(),
            deployment_group_name: deployment_group_name.into(),
            deployment_config_name: DEFAULT_DEPLOYMENT_CONFIG.to_string(),
            file_exists_behavior: FileExistsBehavior::default(),
            revision,
            rollback_policy: RollbackPolicy::default(),
            target,
        }
    }

    pub fn deployment_config(mut self, name: impl Into<String>) -> Self {
        self.deployment_config_name = name.into();
        self
    }

    pub fn file_exists_behavior(mut self, behavior: FileExistsBehavior) -> Self {
        self.file_exists_behavior = behavior;
        self
    }

    pub fn rollback_policy(mut self, policy: RollbackPolicy) -> Self {
        self.rollback_policy = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn revision() -> Revision {
        Revision {
            bucket: "b".to_string(),
            key: "k.zip".to_string(),
            bundle_type: BundleType::Zip,
        }
    }

    #[test]
    fn defaults_follow_service_defaults() {
        let request = DeploymentRequest::new(
            "App",
            "Group",
            revision(),
            TargetSelector::TaggedInstances(vec![TagFilter::key_only("new-target")]),
        );
        assert_eq!(request.deployment_config_name, DEFAULT_DEPLOYMENT_CONFIG);
        assert_eq!(request.file_exists_behavior, FileExistsBehavior::Disallow);
        assert!(!request.rollback_policy.is_enabled());
    }

    #[test]
    fn builder_overrides() {
        let request = DeploymentRequest::new(
            "App",
            "Group",
            revision(),
            TargetSelector::ScalingGroup(ScalingGroupName::new("asg").unwrap()),
        )
        .deployment_config("CodeDeployDefault.AllAtOnce")
        .file_exists_behavior(FileExistsBehavior::Overwrite)
        .rollback_policy(RollbackPolicy::on_failure());

        assert_eq!(request.deployment_config_name, "CodeDeployDefault.AllAtOnce");
        assert_eq!(request.file_exists_behavior.to_string(), "OVERWRITE");
        assert!(request.rollback_policy.is_enabled());
    }
}
