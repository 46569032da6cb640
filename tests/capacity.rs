// ABOUTME: Integration tests for the capacity controller.
// ABOUTME: Covers scale-up discovery, pre-flight checks, launch-and-attach, and scale-down.

mod support;

use bascule::clock::ManualClock;
use bascule::control::{ComputeOps, InstanceStatus, MemoryControlPlane, Operation};
use bascule::deploy::{
    CapacityController, DeployError, DeployErrorKind, Direction, Provisioning, ResourceKind,
};
use bascule::poll::PollSchedule;
use bascule::types::ScalingGroupName;
use std::time::Duration;
use support::{ASG, asg, plane};

fn discovery() -> PollSchedule {
    PollSchedule::fixed(Duration::from_secs(5), Duration::from_secs(180))
}

#[tokio::test]
async fn scale_up_returns_initializing_instance() {
    support::init_tracing();
    let plane = plane();
    let clock = ManualClock::new();
    let original = plane.group_members(ASG);

    let discovered = CapacityController::new(&plane, &plane, &clock, discovery())
        .scale_up(&asg(), &Provisioning::ScaleGroup)
        .await
        .unwrap();

    assert_eq!(discovered.instance.status, InstanceStatus::Initializing);
    assert!(!original.contains(&discovered.instance.id));
    assert!(discovered.contenders.is_empty());
    assert_eq!(plane.desired_capacity(ASG), Some(2));
    // First listing shows the new instance pending, second shows it initializing.
    assert_eq!(plane.count(Operation::DescribeInstanceStatus), 2);
    assert_eq!(clock.sleeps(), vec![Duration::from_secs(5)]);
}

#[tokio::test]
async fn scale_up_refuses_unexpected_capacity() {
    let plane = MemoryControlPlane::new().with_group(ASG, 2);
    let clock = ManualClock::new();

    let err = CapacityController::new(&plane, &plane, &clock, discovery())
        .scale_up(&asg(), &Provisioning::ScaleGroup)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DeployError::UnexpectedCapacity {
            expected: 1,
            actual: 2,
            ..
        }
    ));
    assert_eq!(plane.count(Operation::SetDesiredCapacity), 0);
}

#[tokio::test]
async fn scale_up_of_unknown_group_is_resource_not_found() {
    let plane = plane();
    let clock = ManualClock::new();
    let missing = ScalingGroupName::new("nope").unwrap();

    let err = CapacityController::new(&plane, &plane, &clock, discovery())
        .scale_up(&missing, &Provisioning::ScaleGroup)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DeployError::ResourceNotFound {
            resource: ResourceKind::ScalingGroup,
            ..
        }
    ));
}

#[tokio::test]
async fn discovery_times_out_when_nothing_initializes() {
    let plane = plane().with_boot_sequence([InstanceStatus::Pending]);
    let clock = ManualClock::new();

    let err = CapacityController::new(&plane, &plane, &clock, discovery())
        .scale_up(&asg(), &Provisioning::ScaleGroup)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), DeployErrorKind::DiscoveryTimeout);
    assert_eq!(clock.elapsed(), Duration::from_secs(180));
}

#[tokio::test]
async fn first_initializing_instance_wins() {
    let plane = plane().with_launch_template("stray");
    let clock = ManualClock::new();
    // An unrelated instance booting at the same time, listed first.
    let stray = plane.launch_instance("stray").await.unwrap();

    let discovered = CapacityController::new(&plane, &plane, &clock, discovery())
        .scale_up(&asg(), &Provisioning::ScaleGroup)
        .await
        .unwrap();

    assert_eq!(discovered.instance.id, stray.id);
    assert_eq!(discovered.contenders.len(), 1);
}

#[tokio::test]
async fn launch_template_attaches_instead_of_scaling() {
    let plane = plane().with_launch_template("web-v2");
    let clock = ManualClock::new();

    let discovered = CapacityController::new(&plane, &plane, &clock, discovery())
        .scale_up(&asg(), &Provisioning::LaunchTemplate("web-v2".into()))
        .await
        .unwrap();

    assert_eq!(plane.count(Operation::SetDesiredCapacity), 0);
    assert_eq!(plane.count(Operation::LaunchInstance), 1);
    assert_eq!(plane.count(Operation::AttachInstance), 1);
    assert_eq!(plane.desired_capacity(ASG), Some(2));
    assert!(plane.group_members(ASG).contains(&discovered.instance.id));
    assert!(clock.sleeps().is_empty());
}

#[tokio::test]
async fn unknown_launch_template_is_resource_not_found() {
    let plane = plane();
    let clock = ManualClock::new();

    let err = CapacityController::new(&plane, &plane, &clock, discovery())
        .scale_up(&asg(), &Provisioning::LaunchTemplate("missing".into()))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        DeployError::ResourceNotFound {
            resource: ResourceKind::LaunchTemplate,
            ..
        }
    ));
}

#[tokio::test]
async fn scale_down_returns_to_baseline_without_waiting() {
    let plane = plane();
    let clock = ManualClock::new();
    let controller = CapacityController::new(&plane, &plane, &clock, discovery());

    let discovered = controller
        .scale(Direction::Up, &asg(), &Provisioning::ScaleGroup)
        .await
        .unwrap();
    assert!(discovered.is_some());
    let sleeps_before = clock.sleeps().len();

    let result = controller
        .scale(Direction::Down, &asg(), &Provisioning::ScaleGroup)
        .await
        .unwrap();

    assert!(result.is_none());
    assert_eq!(plane.desired_capacity(ASG), Some(1));
    assert_eq!(clock.sleeps().len(), sleeps_before);
}
