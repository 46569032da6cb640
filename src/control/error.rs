// ABOUTME: Control plane error types with SNAFU pattern.
// ABOUTME: Unifies scaling, compute, and deployment service errors for programmatic handling.

use snafu::Snafu;

use super::compute::ComputeError;
use super::deployments::DeploymentServiceError;
use super::scaling::ScalingError;

/// Unified error for any control plane call.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ControlPlaneError {
    #[snafu(display("scaling group call failed: {source}"))]
    Scaling { source: ScalingError },

    #[snafu(display("compute call failed: {source}"))]
    Compute { source: ComputeError },

    #[snafu(display("deployment service call failed: {source}"))]
    Deployments { source: DeploymentServiceError },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlPlaneErrorKind {
    /// A named resource does not exist.
    NotFound,
    /// The provider rejected or failed the call.
    Service,
}

impl ControlPlaneError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ControlPlaneErrorKind {
        match self {
            ControlPlaneError::Scaling { source } => match source {
                ScalingError::GroupNotFound(_) | ScalingError::InstanceNotFound(_) => {
                    ControlPlaneErrorKind::NotFound
                }
                ScalingError::Service(_) => ControlPlaneErrorKind::Service,
            },
            ControlPlaneError::Compute { source } => match source {
                ComputeError::InstanceNotFound(_) | ComputeError::TemplateNotFound(_) => {
                    ControlPlaneErrorKind::NotFound
                }
                ComputeError::Service(_) => ControlPlaneErrorKind::Service,
            },
            ControlPlaneError::Deployments { source } => match source {
                DeploymentServiceError::ApplicationNotFound(_)
                | DeploymentServiceError::DeploymentGroupNotFound(_)
                | DeploymentServiceError::DeploymentNotFound(_) => ControlPlaneErrorKind::NotFound,
                DeploymentServiceError::Service(_) => ControlPlaneErrorKind::Service,
            },
        }
    }
}

impl From<ScalingError> for ControlPlaneError {
    fn from(source: ScalingError) -> Self {
        ControlPlaneError::Scaling { source }
    }
}

impl From<ComputeError> for ControlPlaneError {
    fn from(source: ComputeError) -> Self {
        ControlPlaneError::Compute { source }
    }
}

impl From<DeploymentServiceError> for ControlPlaneError {
    fn from(source: DeploymentServiceError) -> Self {
        ControlPlaneError::Deployments { source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_kinds() {
        let err: ControlPlaneError = ScalingError::GroupNotFound("asg".into()).into();
        assert_eq!(err.kind(), ControlPlaneErrorKind::NotFound);

        let err: ControlPlaneError = DeploymentServiceError::DeploymentNotFound("d-1".into()).into();
        assert_eq!(err.kind(), ControlPlaneErrorKind::NotFound);
    }

    #[test]
    fn service_kind_and_display() {
        let err: ControlPlaneError = ComputeError::Service("throttled".into()).into();
        assert_eq!(err.kind(), ControlPlaneErrorKind::Service);
        assert_eq!(
            err.to_string(),
            "compute call failed: compute service error: throttled"
        );
    }
}
