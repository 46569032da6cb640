// ABOUTME: Test support utilities.
// ABOUTME: Provides tracing setup, control plane fixtures, and a recording phase listener.

use std::sync::Once;

use bascule::config::Config;
use bascule::control::MemoryControlPlane;
use bascule::deploy::{DeploymentType, Phase, PhaseListener, RolloutPlan};
use bascule::types::ScalingGroupName;
use parking_lot::Mutex;

static TRACING_INIT: Once = Once::new();

pub const APP: &str = "App";
pub const GROUP: &str = "Group";
pub const ASG: &str = "app-asg";

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("bascule=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[allow(dead_code)]
pub fn asg() -> ScalingGroupName {
    ScalingGroupName::new(ASG).unwrap()
}

/// Scaling group at capacity 1 plus the matching deployment group.
#[allow(dead_code)]
pub fn plane() -> MemoryControlPlane {
    MemoryControlPlane::new()
        .with_group(ASG, 1)
        .with_deployment_group(APP, GROUP)
}

/// Plan for App/Group deploying s3://b/k.zip.
#[allow(dead_code)]
pub fn plan(deployment_type: DeploymentType) -> RolloutPlan {
    let yaml = format!(
        r#"
application: {APP}
deployment_group: {GROUP}
deployment_type: {deployment_type}
scaling_group: {ASG}
revision:
  bucket: b
  key: k.zip
"#
    );
    let config = Config::from_yaml(&yaml).unwrap();
    let profile = config.resolve_profile(None).unwrap();
    RolloutPlan::from_profile(&profile).unwrap()
}

/// Records every phase the orchestrator enters.
#[allow(dead_code)]
#[derive(Default)]
pub struct RecordingListener {
    phases: Mutex<Vec<Phase>>,
}

#[allow(dead_code)]
impl RecordingListener {
    pub fn phases(&self) -> Vec<Phase> {
        self.phases.lock().clone()
    }
}

impl PhaseListener for RecordingListener {
    fn entered(&self, phase: Phase) {
        self.phases.lock().push(phase);
    }
}
