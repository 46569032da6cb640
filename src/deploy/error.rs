// ABOUTME: Error types for rollout operations and failed runs.
// ABOUTME: Covers missing resources, poll timeouts, failed deployments, and provider errors.

use std::fmt;
use std::time::Duration;

use crate::control::{ComputeError, ControlPlaneError, DeploymentServiceError, ScalingError};
use crate::types::{DeploymentId, InstanceId};

use super::phase::Phase;

/// Kind of resource a lookup failed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    ScalingGroup,
    Instance,
    LaunchTemplate,
    Application,
    DeploymentGroup,
    Deployment,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::ScalingGroup => "scaling group",
            ResourceKind::Instance => "instance",
            ResourceKind::LaunchTemplate => "launch template",
            ResourceKind::Application => "application",
            ResourceKind::DeploymentGroup => "deployment group",
            ResourceKind::Deployment => "deployment",
        };
        f.write_str(name)
    }
}

/// Errors that can occur during rollout steps.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// A named resource does not exist.
    #[error("{resource} not found: {name}")]
    ResourceNotFound { resource: ResourceKind, name: String },

    /// Scale-up never produced an initializing instance.
    #[error("no new instance appeared in scaling group {group} within {}s", .waited.as_secs())]
    DiscoveryTimeout { group: String, waited: Duration },

    /// The new instance never reported ok.
    #[error("instance {instance} did not become ready within {}s", .waited.as_secs())]
    ReadinessTimeout {
        instance: InstanceId,
        waited: Duration,
    },

    /// The deployment service reported a failure terminal status.
    #[error("deployment {deployment_id} failed: {message}")]
    DeploymentFailed {
        deployment_id: DeploymentId,
        code: String,
        message: String,
    },

    /// Status polling hit the optional budget.
    #[error("deployment {deployment_id} did not finish within {}s", .waited.as_secs())]
    StatusTimeout {
        deployment_id: DeploymentId,
        waited: Duration,
    },

    /// The scaling group is not at the capacity a blue-green run starts from.
    #[error("scaling group {group} has desired capacity {actual}, expected {expected}")]
    UnexpectedCapacity {
        group: String,
        expected: u32,
        actual: u32,
    },

    /// Another deployment is still running in the deployment group.
    #[error("deployment {deployment_id} is already in progress for this deployment group")]
    DeploymentInProgress { deployment_id: DeploymentId },

    /// Missing or inconsistent input.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Any other provider failure.
    #[error(transparent)]
    ControlPlane(ControlPlaneError),
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    ResourceNotFound,
    DiscoveryTimeout,
    ReadinessTimeout,
    DeploymentFailed,
    StatusTimeout,
    UnexpectedCapacity,
    DeploymentInProgress,
    Configuration,
    ControlPlane,
}

impl DeployErrorKind {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            DeployErrorKind::ResourceNotFound => "RESOURCE_NOT_FOUND",
            DeployErrorKind::DiscoveryTimeout => "DISCOVERY_TIMEOUT",
            DeployErrorKind::ReadinessTimeout => "READINESS_TIMEOUT",
            DeployErrorKind::DeploymentFailed => "DEPLOYMENT_FAILED",
            DeployErrorKind::StatusTimeout => "STATUS_TIMEOUT",
            DeployErrorKind::UnexpectedCapacity => "UNEXPECTED_CAPACITY",
            DeployErrorKind::DeploymentInProgress => "DEPLOYMENT_IN_PROGRESS",
            DeployErrorKind::Configuration => "CONFIGURATION_ERROR",
            DeployErrorKind::ControlPlane => "CONTROL_PLANE_ERROR",
        }
    }
}

impl DeployError {
    /// Create a configuration error.
    pub fn config_error(msg: impl Into<String>) -> Self {
        DeployError::Configuration(msg.into())
    }

    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::ResourceNotFound { .. } => DeployErrorKind::ResourceNotFound,
            DeployError::DiscoveryTimeout { .. } => DeployErrorKind::DiscoveryTimeout,
            DeployError::ReadinessTimeout { .. } => DeployErrorKind::ReadinessTimeout,
            DeployError::DeploymentFailed { .. } => DeployErrorKind::DeploymentFailed,
            DeployError::StatusTimeout { .. } => DeployErrorKind::StatusTimeout,
            DeployError::UnexpectedCapacity { .. } => DeployErrorKind::UnexpectedCapacity,
            DeployError::DeploymentInProgress { .. } => DeployErrorKind::DeploymentInProgress,
            DeployError::Configuration(_) => DeployErrorKind::Configuration,
            DeployError::ControlPlane(_) => DeployErrorKind::ControlPlane,
        }
    }

    /// The service's failure code for failed deployments, the kind's code otherwise.
    pub fn code(&self) -> &str {
        match self {
            DeployError::DeploymentFailed { code, .. } => code,
            other => other.kind().code(),
        }
    }

    /// Deployment this error concerns, when one is known.
    pub fn deployment_id(&self) -> Option<&DeploymentId> {
        match self {
            DeployError::DeploymentFailed { deployment_id, .. }
            | DeployError::StatusTimeout { deployment_id, .. }
            | DeployError::DeploymentInProgress { deployment_id } => Some(deployment_id),
            _ => None,
        }
    }
}

impl From<ScalingError> for DeployError {
    fn from(err: ScalingError) -> Self {
        match err {
            ScalingError::GroupNotFound(name) => DeployError::ResourceNotFound {
                resource: ResourceKind::ScalingGroup,
                name,
            },
            ScalingError::InstanceNotFound(name) => DeployError::ResourceNotFound {
                resource: ResourceKind::Instance,
                name,
            },
            other => DeployError::ControlPlane(other.into()),
        }
    }
}

impl From<ComputeError> for DeployError {
    fn from(err: ComputeError) -> Self {
        match err {
            ComputeError::InstanceNotFound(name) => DeployError::ResourceNotFound {
                resource: ResourceKind::Instance,
                name,
            },
            ComputeError::TemplateNotFound(name) => DeployError::ResourceNotFound {
                resource: ResourceKind::LaunchTemplate,
                name,
            },
            other => DeployError::ControlPlane(other.into()),
        }
    }
}

impl From<DeploymentServiceError> for DeployError {
    fn from(err: DeploymentServiceError) -> Self {
        match err {
            DeploymentServiceError::ApplicationNotFound(name) => DeployError::ResourceNotFound {
                resource: ResourceKind::Application,
                name,
            },
            DeploymentServiceError::DeploymentGroupNotFound(name) => {
                DeployError::ResourceNotFound {
                    resource: ResourceKind::DeploymentGroup,
                    name,
                }
            }
            DeploymentServiceError::DeploymentNotFound(name) => DeployError::ResourceNotFound {
                resource: ResourceKind::Deployment,
                name,
            },
            other => DeployError::ControlPlane(other.into()),
        }
    }
}

/// A run that ended in the failed state.
///
/// Renders as one consolidated line carrying the phase, the underlying
/// error, its code, and the deployment id when known.
#[derive(Debug)]
pub struct RunFailure {
    pub phase: Phase,
    pub error: DeployError,
}

impl RunFailure {
    pub fn new(phase: Phase, error: DeployError) -> Self {
        Self { phase, error }
    }

    pub fn code(&self) -> &str {
        self.error.code()
    }

    pub fn deployment_id(&self) -> Option<&DeploymentId> {
        self.error.deployment_id()
    }
}

impl fmt::Display for RunFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "deployment failed during {}: {} [code: {}]",
            self.phase,
            self.error,
            self.error.code()
        )?;
        if let Some(id) = self.error.deployment_id() {
            write!(f, " [deployment: {}]", id)?;
        }
        Ok(())
    }
}

impl std::error::Error for RunFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}
