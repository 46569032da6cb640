// ABOUTME: Resolved per-environment settings used to build a rollout.
// ABOUTME: Records whether the profile was matched by key or defaulted.

use serde::Serialize;

use crate::control::{DEFAULT_DEPLOYMENT_CONFIG, FileExistsBehavior};
use crate::deploy::DeploymentType;
use crate::types::{ScalingGroupName, TagNames};

use super::{CompensationConfig, Config, ProfileOverrides, RevisionConfig, RollbackConfig, TimingConfig};

/// How a profile was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum ProfileSource {
    /// The requested key named a profile.
    Named,
    /// The requested key matched nothing.
    Defaulted { requested: String },
    /// No key was requested.
    Base,
}

#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub name: Option<String>,
    pub source: ProfileSource,
    pub application: Option<String>,
    pub deployment_group: Option<String>,
    pub deployment_config: String,
    pub file_exists_behavior: FileExistsBehavior,
    pub deployment_type: DeploymentType,
    pub scaling_group: Option<ScalingGroupName>,
    pub tags: TagNames,
    pub launch_template: Option<String>,
    pub revision: Option<RevisionConfig>,
    pub rollback: RollbackConfig,
    pub timing: TimingConfig,
    pub compensation: CompensationConfig,
}

impl Profile {
    pub(super) fn base(config: &Config) -> Self {
        Self {
            name: None,
            source: ProfileSource::Base,
            application: config.application.clone(),
            deployment_group: config.deployment_group.clone(),
            deployment_config: config
                .deployment_config
                .clone()
                .unwrap_or_else(|| DEFAULT_DEPLOYMENT_CONFIG.to_string()),
            file_exists_behavior: config.file_exists_behavior,
            deployment_type: config.deployment_type,
            scaling_group: config.scaling_group.clone(),
            tags: config.tags.clone(),
            launch_template: config.launch_template.clone(),
            revision: config.revision.clone(),
            rollback: config.rollback.clone(),
            timing: config.timing,
            compensation: config.compensation,
        }
    }

    pub(super) fn merged(
        config: &Config,
        name: &str,
        overrides: &ProfileOverrides,
        source: ProfileSource,
    ) -> Self {
        let mut profile = Self::base(config);
        profile.name = Some(name.to_string());
        profile.source = source;

        if let Some(ref application) = overrides.application {
            profile.application = Some(application.clone());
        }
        if let Some(ref group) = overrides.deployment_group {
            profile.deployment_group = Some(group.clone());
        }
        if let Some(ref deployment_config) = overrides.deployment_config {
            profile.deployment_config = deployment_config.clone();
        }
        if let Some(behavior) = overrides.file_exists_behavior {
            profile.file_exists_behavior = behavior;
        }
        if let Some(deployment_type) = overrides.deployment_type {
            profile.deployment_type = deployment_type;
        }
        if let Some(ref scaling_group) = overrides.scaling_group {
            profile.scaling_group = Some(scaling_group.clone());
        }
        if let Some(ref tags) = overrides.tags {
            profile.tags = tags.clone();
        }
        if let Some(ref template) = overrides.launch_template {
            profile.launch_template = Some(template.clone());
        }
        if let Some(ref revision) = overrides.revision {
            profile.revision = Some(revision.clone());
        }
        if let Some(ref rollback) = overrides.rollback {
            profile.rollback = rollback.clone();
        }
        if let Some(timing) = overrides.timing {
            profile.timing = timing;
        }
        if let Some(compensation) = overrides.compensation {
            profile.compensation = compensation;
        }

        profile
    }

    pub(super) fn with_source(mut self, source: ProfileSource) -> Self {
        self.source = source;
        self
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self.source, ProfileSource::Defaulted { .. })
    }
}
