// ABOUTME: Orchestration phases and the listener notified on each transition.
// ABOUTME: Phase names double as the wording of progress and failure messages.

use serde::Serialize;
use std::fmt;

/// A step of the rollout state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    Idle,
    ScalingUp,
    AwaitingReady,
    TaggingTarget,
    Detaching,
    Deploying,
    Reattaching,
    TaggingActive,
    ScalingDown,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Phase::Idle => "idle",
            Phase::ScalingUp => "scaling up",
            Phase::AwaitingReady => "awaiting readiness",
            Phase::TaggingTarget => "tagging target",
            Phase::Detaching => "detaching scaling group",
            Phase::Deploying => "deploying",
            Phase::Reattaching => "reattaching scaling group",
            Phase::TaggingActive => "tagging active",
            Phase::ScalingDown => "scaling down",
            Phase::Done => "done",
        };
        f.write_str(text)
    }
}

/// Receives every phase the orchestrator enters, in order.
pub trait PhaseListener: Send + Sync {
    fn entered(&self, phase: Phase);
}

/// Listener that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopListener;

impl PhaseListener for NoopListener {
    fn entered(&self, _phase: Phase) {}
}
