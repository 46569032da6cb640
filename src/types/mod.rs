// ABOUTME: Type-safe identifiers and validated domain types.
// ABOUTME: Uses phantom types to prevent instance and deployment ID confusion at compile time.

mod id;
mod scaling_group_name;
mod tag;

pub use id::{DeploymentId, InstanceId};
pub use scaling_group_name::{ScalingGroupName, ScalingGroupNameError};
pub use tag::{Tag, TagFilter, TagNames};
