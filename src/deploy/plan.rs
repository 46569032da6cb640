// ABOUTME: Everything one rollout needs, built from a resolved profile.
// ABOUTME: Validates required settings and resolves revision env references.

use crate::config::{CompensationConfig, Profile, TimingConfig};
use crate::control::{DeploymentRequest, TargetSelector};
use crate::types::{ScalingGroupName, TagNames};

use super::capacity::Provisioning;
use super::error::DeployError;
use super::strategy::DeploymentType;

#[derive(Debug, Clone)]
pub struct RolloutPlan {
    pub request: DeploymentRequest,
    pub deployment_type: DeploymentType,
    pub scaling_group: ScalingGroupName,
    pub tags: TagNames,
    pub provisioning: Provisioning,
    pub timing: TimingConfig,
    pub compensation: CompensationConfig,
}

impl RolloutPlan {
    pub fn from_profile(profile: &Profile) -> Result<Self, DeployError> {
        let application = required(&profile.application, "application")?;
        let deployment_group = required(&profile.deployment_group, "deployment_group")?;
        let scaling_group = profile
            .scaling_group
            .clone()
            .ok_or_else(|| missing("scaling_group"))?;
        let revision = profile
            .revision
            .as_ref()
            .ok_or_else(|| missing("revision"))?
            .resolve()
            .map_err(|e| DeployError::config_error(e.to_string()))?;

        profile.timing.validate().map_err(DeployError::config_error)?;
        validate_tags(&profile.tags)?;

        let target = match profile.deployment_type {
            DeploymentType::InPlace => TargetSelector::ScalingGroup(scaling_group.clone()),
            DeploymentType::BlueGreen => TargetSelector::TaggedInstances(vec![
                profile.tags.target_filter(),
            ]),
        };

        let request = DeploymentRequest::new(application, deployment_group, revision, target)
            .deployment_config(&profile.deployment_config)
            .file_exists_behavior(profile.file_exists_behavior)
            .rollback_policy(profile.rollback.policy());

        let provisioning = match &profile.launch_template {
            Some(template) => Provisioning::LaunchTemplate(template.clone()),
            None => Provisioning::ScaleGroup,
        };

        Ok(Self {
            request,
            deployment_type: profile.deployment_type,
            scaling_group,
            tags: profile.tags.clone(),
            provisioning,
            timing: profile.timing,
            compensation: profile.compensation,
        })
    }
}

fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, DeployError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| missing(field))
}

fn missing(field: &str) -> DeployError {
    DeployError::config_error(format!("missing required setting: {}", field))
}

fn validate_tags(tags: &TagNames) -> Result<(), DeployError> {
    if tags.target.trim().is_empty() || tags.active.trim().is_empty() {
        return Err(DeployError::config_error("tag names cannot be empty"));
    }
    if tags.target == tags.active {
        return Err(DeployError::config_error(format!(
            "target and active tags must differ, both are {}",
            tags.target
        )));
    }
    Ok(())
}
