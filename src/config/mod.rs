// ABOUTME: Configuration types and parsing for bascule.yml.
// ABOUTME: Handles YAML parsing, env var interpolation, and per-environment profiles.

mod deserialize;
mod env_value;
mod init;
mod profile;
mod revision;
mod timing;

pub use env_value::EnvValue;
pub use init::init_config;
pub use profile::{Profile, ProfileSource};
pub use revision::{RevisionConfig, RollbackConfig};
pub use timing::TimingConfig;

use crate::control::FileExistsBehavior;
use crate::deploy::DeploymentType;
use crate::error::{Error, Result};
use crate::types::{ScalingGroupName, TagNames};
use deserialize::deserialize_scaling_group_name_option;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "bascule.yml";
pub const CONFIG_FILENAME_ALT: &str = "bascule.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".bascule/config.yml";

/// Base settings plus named per-environment overrides.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub application: Option<String>,

    #[serde(default)]
    pub deployment_group: Option<String>,

    #[serde(default)]
    pub deployment_config: Option<String>,

    #[serde(default)]
    pub file_exists_behavior: FileExistsBehavior,

    #[serde(default)]
    pub deployment_type: DeploymentType,

    #[serde(default, deserialize_with = "deserialize_scaling_group_name_option")]
    pub scaling_group: Option<ScalingGroupName>,

    #[serde(default)]
    pub tags: TagNames,

    #[serde(default)]
    pub launch_template: Option<String>,

    #[serde(default)]
    pub revision: Option<RevisionConfig>,

    #[serde(default)]
    pub rollback: RollbackConfig,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub compensation: CompensationConfig,

    #[serde(default)]
    pub profiles: BTreeMap<String, ProfileOverrides>,

    /// Profile used when a requested key matches nothing.
    #[serde(default)]
    pub default_profile: Option<String>,
}

/// Per-environment settings. Anything left out inherits the base value.
///
/// `tags`, `timing`, `revision`, `rollback`, and `compensation` replace the
/// base section as a whole.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileOverrides {
    #[serde(default)]
    pub application: Option<String>,

    #[serde(default)]
    pub deployment_group: Option<String>,

    #[serde(default)]
    pub deployment_config: Option<String>,

    #[serde(default)]
    pub file_exists_behavior: Option<FileExistsBehavior>,

    #[serde(default)]
    pub deployment_type: Option<DeploymentType>,

    #[serde(default, deserialize_with = "deserialize_scaling_group_name_option")]
    pub scaling_group: Option<ScalingGroupName>,

    #[serde(default)]
    pub tags: Option<TagNames>,

    #[serde(default)]
    pub launch_template: Option<String>,

    #[serde(default)]
    pub revision: Option<RevisionConfig>,

    #[serde(default)]
    pub rollback: Option<RollbackConfig>,

    #[serde(default)]
    pub timing: Option<TimingConfig>,

    #[serde(default)]
    pub compensation: Option<CompensationConfig>,
}

/// Recovery actions taken when a run fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationConfig {
    /// Restore the deployment group's scaling group after a failure
    /// that happened while it was detached.
    #[serde(default = "default_true")]
    pub reattach_on_failure: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CompensationConfig {
    fn default() -> Self {
        Self {
            reattach_on_failure: true,
        }
    }
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Resolve the settings for an environment key.
    ///
    /// A key with no matching profile falls back to `default_profile` when
    /// set, else to the base settings, and the result says so.
    pub fn resolve_profile(&self, key: Option<&str>) -> Result<Profile> {
        let Some(requested) = key else {
            return Ok(Profile::base(self));
        };

        if let Some(overrides) = self.profiles.get(requested) {
            return Ok(Profile::merged(self, requested, overrides, ProfileSource::Named));
        }

        let source = ProfileSource::Defaulted {
            requested: requested.to_string(),
        };
        match &self.default_profile {
            Some(default) => {
                let overrides = self
                    .profiles
                    .get(default)
                    .ok_or_else(|| Error::UnknownProfile(default.clone()))?;
                Ok(Profile::merged(self, default, overrides, source))
            }
            None => Ok(Profile::base(self).with_source(source)),
        }
    }

    pub fn template() -> Self {
        Config {
            application: Some("my-app".to_string()),
            deployment_group: Some("my-app-group".to_string()),
            scaling_group: ScalingGroupName::new("my-app-asg").ok(),
            revision: Some(RevisionConfig {
                bucket: EnvValue::from("my-artifacts"),
                key: EnvValue::FromEnv {
                    var: "BASCULE_REVISION_KEY".to_string(),
                    default: Some("my-app/latest.zip".to_string()),
                },
                bundle_type: Default::default(),
            }),
            ..Config::default()
        }
    }
}
