// ABOUTME: Capability traits for the three external control planes.
// ABOUTME: Defines ScalingGroupOps, ComputeOps, DeploymentOps and an in-memory implementation.

mod compute;
mod deployments;
mod error;
pub mod memory;
mod request;
mod scaling;
mod shared_types;

pub use compute::{ComputeError, ComputeOps};
pub use deployments::{DeploymentOps, DeploymentServiceError};
pub use error::{ControlPlaneError, ControlPlaneErrorKind};
pub use memory::{Call, MemoryControlPlane, Operation};
pub use request::{
    BundleType, DEFAULT_DEPLOYMENT_CONFIG, DeploymentRequest, FileExistsBehavior, Revision,
    RollbackEvent, RollbackPolicy, TargetSelector,
};
pub use scaling::{ScalingError, ScalingGroupOps};
pub use shared_types::*;

/// A provider that offers every capability the orchestrator needs.
///
/// Blanket-implemented; useful when one client fronts all three planes.
pub trait ControlPlane: ScalingGroupOps + ComputeOps + DeploymentOps {}

impl<T: ScalingGroupOps + ComputeOps + DeploymentOps> ControlPlane for T {}
