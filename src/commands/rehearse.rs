// ABOUTME: Rehearse command implementation.
// ABOUTME: Runs the whole rollout against an in-memory control plane on virtual time.

use bascule::clock::ManualClock;
use bascule::config::Config;
use bascule::control::{ComputeOps, DeploymentStatus, ErrorInfo, MemoryControlPlane};
use bascule::deploy::{Orchestrator, Provisioning, RolloutPlan, RunReport};
use bascule::diagnostics::Diagnostics;
use bascule::error::Result;
use bascule::output::Output;
use std::path::Path;

use super::note_defaulted;

const INJECTED_FAILURE_MESSAGE: &str = "failure injected by rehearsal";

pub async fn rehearse(
    dir: &Path,
    environment: Option<&str>,
    fail_with: Option<&str>,
    mut output: Output,
) -> Result<()> {
    let config = Config::discover(dir)?;
    let profile = config.resolve_profile(environment)?;
    let mut diagnostics = Diagnostics::default();
    note_defaulted(&profile, &mut diagnostics);

    let plan = RolloutPlan::from_profile(&profile)?;
    let plane = rehearsal_plane(&plan, fail_with);
    let clock = ManualClock::new();

    output.start_timer();
    output.progress(&format!(
        "Rehearsing {} rollout of {} to {} ({})",
        plan.deployment_type,
        plan.request.application_name,
        plan.request.deployment_group_name,
        plan.scaling_group
    ));

    let result = Orchestrator::with_plane(&plane, &clock)
        .with_listener(&output)
        .run(plan, &mut diagnostics)
        .await;

    for warning in diagnostics.warnings() {
        output.warning(warning);
    }
    let report = result?;

    if let Some(instance) = &report.instance {
        let tags = plane
            .describe_tags(instance)
            .await
            .map_err(bascule::deploy::DeployError::from)?;
        let keys: Vec<&str> = tags.iter().map(|t| t.key.as_str()).collect();
        output.progress(&format!("  instance {} tags: {}", instance, keys.join(", ")));
    }
    output.progress(&format!(
        "  virtual time elapsed: {}s",
        clock.elapsed().as_secs()
    ));
    output.result(&summary(&report), &report);
    Ok(())
}

fn rehearsal_plane(plan: &RolloutPlan, fail_with: Option<&str>) -> MemoryControlPlane {
    let mut plane = MemoryControlPlane::new()
        .with_group(plan.scaling_group.as_str(), 1)
        .with_deployment_group(
            &plan.request.application_name,
            &plan.request.deployment_group_name,
        );

    if let Provisioning::LaunchTemplate(template) = &plan.provisioning {
        plane = plane.with_launch_template(template);
    }

    if let Some(code) = fail_with {
        plane = plane
            .with_deployment_statuses([
                DeploymentStatus::Created,
                DeploymentStatus::InProgress,
                DeploymentStatus::Failed,
            ])
            .with_failure_info(ErrorInfo::new(code, INJECTED_FAILURE_MESSAGE));
    }
    plane
}

fn summary(report: &RunReport) -> String {
    match &report.instance {
        Some(instance) => format!(
            "Deployment {} {} on {}",
            report.outcome.deployment_id, report.outcome.status, instance
        ),
        None => format!(
            "Deployment {} {}",
            report.outcome.deployment_id, report.outcome.status
        ),
    }
}
