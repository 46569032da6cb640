// ABOUTME: Integration tests for the tag manager and deployment-group reconfigurator.
// ABOUTME: Verifies tag sets after promotion and the filters written on detach and reattach.

mod support;

use bascule::control::{ComputeOps, DeploymentRequest, MemoryControlPlane, Operation, Revision, TargetSelector};
use bascule::deploy::{DeployError, GroupReconfigurator, TagManager};
use bascule::types::{InstanceId, Tag, TagFilter, TagNames};
use std::collections::BTreeSet;
use support::{APP, GROUP, asg, plane};

async fn instance(plane: &MemoryControlPlane) -> InstanceId {
    plane.launch_instance("web").await.unwrap().id
}

fn web_plane() -> MemoryControlPlane {
    plane().with_launch_template("web")
}

mod tagging {
    use super::*;

    #[tokio::test]
    async fn target_then_active_leaves_only_active() {
        support::init_tracing();
        let plane = web_plane();
        let id = instance(&plane).await;
        let names = TagNames::default();
        let tags = TagManager::new(&plane, &names);

        tags.mark_as_target(&id).await.unwrap();
        assert_eq!(plane.tags_of(&id), BTreeSet::from([Tag::marker("new-target")]));

        tags.mark_as_active(&id).await.unwrap();
        assert_eq!(plane.tags_of(&id), BTreeSet::from([Tag::marker("active")]));
    }

    #[tokio::test]
    async fn marking_is_idempotent() {
        let plane = web_plane();
        let id = instance(&plane).await;
        let names = TagNames::default();
        let tags = TagManager::new(&plane, &names);

        tags.mark_as_target(&id).await.unwrap();
        tags.mark_as_target(&id).await.unwrap();
        tags.mark_as_active(&id).await.unwrap();
        tags.mark_as_active(&id).await.unwrap();

        assert_eq!(plane.tags_of(&id), BTreeSet::from([Tag::marker("active")]));
    }

    #[tokio::test]
    async fn profile_tag_names_are_used() {
        let plane = web_plane();
        let id = instance(&plane).await;
        let names = TagNames {
            target: "staging-target".into(),
            active: "staging-active".into(),
        };
        let tags = TagManager::new(&plane, &names);

        tags.mark_as_target(&id).await.unwrap();
        tags.mark_as_active(&id).await.unwrap();

        assert_eq!(
            plane.tags_of(&id),
            BTreeSet::from([Tag::marker("staging-active")])
        );
    }

    #[tokio::test]
    async fn promotion_issues_both_calls_even_if_one_fails() {
        let plane = web_plane().fail_on(Operation::DeleteTags, "denied");
        let id = instance(&plane).await;
        let names = TagNames::default();

        let err = TagManager::new(&plane, &names)
            .mark_as_active(&id)
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::ControlPlane(_)));
        assert_eq!(plane.count(Operation::DeleteTags), 1);
        assert_eq!(plane.count(Operation::CreateTags), 1);
        assert!(plane.tags_of(&id).contains(&Tag::marker("active")));
    }

    #[tokio::test]
    async fn tagging_unknown_instance_is_not_found() {
        let plane = web_plane();
        let names = TagNames::default();

        let err = TagManager::new(&plane, &names)
            .mark_as_target(&InstanceId::new("i-missing"))
            .await
            .unwrap_err();

        assert!(matches!(err, DeployError::ResourceNotFound { .. }));
    }
}

mod reconfiguring {
    use super::*;

    #[tokio::test]
    async fn detach_clears_scaling_groups_but_keeps_active_filter() {
        let plane = plane();
        let names = TagNames::default();
        let group = GroupReconfigurator::new(&plane, APP, GROUP, &names);

        group.detach().await.unwrap();

        let filter = plane.deployment_group_filter(APP, GROUP).unwrap();
        assert!(filter.scaling_groups.is_empty());
        assert_eq!(filter.tag_filters, vec![TagFilter::key_only("active")]);
    }

    #[tokio::test]
    async fn reattach_restores_scaling_group() {
        let plane = plane();
        let names = TagNames::default();
        let group = GroupReconfigurator::new(&plane, APP, GROUP, &names);

        group.detach().await.unwrap();
        group.reattach(&asg()).await.unwrap();

        let filter = plane.deployment_group_filter(APP, GROUP).unwrap();
        assert_eq!(filter.scaling_groups, vec![asg()]);
        assert_eq!(filter.tag_filters, vec![TagFilter::key_only("active")]);
    }

    #[tokio::test]
    async fn for_request_targets_request_group() {
        let plane = plane();
        let names = TagNames::default();
        let request = DeploymentRequest::new(
            APP,
            GROUP,
            Revision {
                bucket: "b".into(),
                key: "k.zip".into(),
                bundle_type: Default::default(),
            },
            TargetSelector::TaggedInstances(vec![names.target_filter()]),
        );

        GroupReconfigurator::for_request(&plane, &request, &names)
            .set_scaling_groups(&[asg()])
            .await
            .unwrap();

        assert_eq!(plane.count(Operation::UpdateDeploymentGroup), 1);
    }

    #[tokio::test]
    async fn unknown_application_is_not_found() {
        let plane = plane();
        let names = TagNames::default();

        let err = GroupReconfigurator::new(&plane, "Other", GROUP, &names)
            .detach()
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "application not found: Other");
    }
}
