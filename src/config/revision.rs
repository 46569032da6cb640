// ABOUTME: Revision location and automatic-rollback settings.
// ABOUTME: Converted into request types once env references are resolved.

use nonempty::NonEmpty;
use serde::{Deserialize, Serialize};

use crate::control::{BundleType, Revision, RollbackEvent, RollbackPolicy};
use crate::error::Result;

use super::EnvValue;
use super::deserialize::deserialize_rollback_events;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevisionConfig {
    pub bucket: EnvValue,
    pub key: EnvValue,
    #[serde(default)]
    pub bundle_type: BundleType,
}

impl RevisionConfig {
    pub fn resolve(&self) -> Result<Revision> {
        Ok(Revision {
            bucket: self.bucket.resolve()?,
            key: self.key.resolve()?,
            bundle_type: self.bundle_type,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollbackConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Defaults to deployment failure when rollback is enabled.
    #[serde(
        default,
        deserialize_with = "deserialize_rollback_events",
        skip_serializing_if = "Option::is_none"
    )]
    pub events: Option<NonEmpty<RollbackEvent>>,
}

impl RollbackConfig {
    pub fn policy(&self) -> RollbackPolicy {
        match (&self.enabled, &self.events) {
            (false, _) => RollbackPolicy::Disabled,
            (true, Some(events)) => RollbackPolicy::Enabled {
                events: events.clone(),
            },
            (true, None) => RollbackPolicy::on_failure(),
        }
    }
}
