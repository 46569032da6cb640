// ABOUTME: Shared types returned by the control plane capability traits.
// ABOUTME: Scaling groups, instance status, deployment status and overview.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::{DeploymentId, InstanceId};

/// A managed pool of instances with a desired-capacity set point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalingGroup {
    pub name: String,
    pub desired_capacity: u32,
    pub instances: Vec<InstanceId>,
}

/// Instance health as reported by the compute provisioner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceStatus {
    Pending,
    Initializing,
    Ok,
    Unknown,
}

impl InstanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceStatus::Pending => "pending",
            InstanceStatus::Initializing => "initializing",
            InstanceStatus::Ok => "ok",
            InstanceStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(InstanceStatus::Pending),
            "initializing" => Ok(InstanceStatus::Initializing),
            "ok" => Ok(InstanceStatus::Ok),
            "unknown" => Ok(InstanceStatus::Unknown),
            other => Err(format!("unknown instance status: {}", other)),
        }
    }
}

/// One row of an instance-status listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceSummary {
    pub id: InstanceId,
    pub status: InstanceStatus,
    pub detail: Option<String>,
}

/// Lifecycle status of a submitted deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeploymentStatus {
    Created,
    Queued,
    InProgress,
    Ready,
    Succeeded,
    Failed,
    Stopped,
}

impl DeploymentStatus {
    /// Statuses that mean the deployment is still running.
    pub const ONGOING: [DeploymentStatus; 4] = [
        DeploymentStatus::Created,
        DeploymentStatus::Queued,
        DeploymentStatus::InProgress,
        DeploymentStatus::Ready,
    ];

    pub fn is_ongoing(&self) -> bool {
        Self::ONGOING.contains(self)
    }

    pub fn is_success(&self) -> bool {
        *self == DeploymentStatus::Succeeded
    }

    /// Terminal and not successful.
    pub fn is_failure(&self) -> bool {
        !self.is_ongoing() && !self.is_success()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentStatus::Created => "Created",
            DeploymentStatus::Queued => "Queued",
            DeploymentStatus::InProgress => "InProgress",
            DeploymentStatus::Ready => "Ready",
            DeploymentStatus::Succeeded => "Succeeded",
            DeploymentStatus::Failed => "Failed",
            DeploymentStatus::Stopped => "Stopped",
        }
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeploymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Created" => Ok(DeploymentStatus::Created),
            "Queued" => Ok(DeploymentStatus::Queued),
            "InProgress" => Ok(DeploymentStatus::InProgress),
            "Ready" => Ok(DeploymentStatus::Ready),
            "Succeeded" => Ok(DeploymentStatus::Succeeded),
            "Failed" => Ok(DeploymentStatus::Failed),
            "Stopped" => Ok(DeploymentStatus::Stopped),
            other => Err(format!("unknown deployment status: {}", other)),
        }
    }
}

/// Per-instance progress counters of a deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentOverview {
    pub pending: u32,
    pub in_progress: u32,
    pub succeeded: u32,
    pub failed: u32,
    pub skipped: u32,
    pub ready: u32,
}

/// Failure payload attached to a failed or stopped deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    pub code: String,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Snapshot of a deployment as returned by the deployment service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentInfo {
    pub deployment_id: DeploymentId,
    pub status: DeploymentStatus,
    pub overview: DeploymentOverview,
    pub error_info: Option<ErrorInfo>,
    pub create_time: Option<DateTime<Utc>>,
}
