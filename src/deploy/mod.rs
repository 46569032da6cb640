// ABOUTME: Rollout orchestration using the type state pattern.
// ABOUTME: Exports the components, state markers, and the orchestrator.

mod capacity;
mod error;
mod group;
mod orchestrator;
mod phase;
mod plan;
mod readiness;
mod rollout;
mod state;
mod strategy;
mod submit;
mod tags;
mod transitions;

pub use capacity::{BASELINE_CAPACITY, CapacityController, Direction, Discovery, Provisioning};
pub use error::{DeployError, DeployErrorKind, ResourceKind, RunFailure};
pub use group::GroupReconfigurator;
pub use orchestrator::{Orchestrator, RunReport};
pub use phase::{NoopListener, Phase, PhaseListener};
pub use plan::RolloutPlan;
pub use readiness::ReadinessPoller;
pub use rollout::Rollout;
pub use state::{
    Activated, Completed, Deployed, Detached, GroupDetached, Idle, Ready, Reattached, ScaledUp,
    Targeted,
};
pub use strategy::DeploymentType;
pub use submit::{DeploymentOutcome, DeploymentSubmitter};
pub use tags::TagManager;
pub use transitions::TransitionResult;
