// ABOUTME: Integration tests for type-safe identifiers and validated types.
// ABOUTME: Tests parsing, validation, and serialization properties.

use bascule::types::*;

mod scaling_group_name_tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let name = ScalingGroupName::new("  web-asg ").unwrap();
        assert_eq!(name.as_str(), "web-asg");
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(
            ScalingGroupName::new("   "),
            Err(ScalingGroupNameError::Empty)
        );
    }

    #[test]
    fn rejects_control_characters() {
        assert_eq!(
            ScalingGroupName::new("web\nasg"),
            Err(ScalingGroupNameError::InvalidChar('\n'))
        );
    }

    #[test]
    fn accepts_maximum_length() {
        let long = "a".repeat(255);
        assert!(ScalingGroupName::new(&long).is_ok());
        let too_long = "a".repeat(256);
        assert_eq!(
            ScalingGroupName::new(&too_long),
            Err(ScalingGroupNameError::TooLong)
        );
    }

    #[test]
    fn serializes_as_plain_string() {
        let name = ScalingGroupName::new("web-asg").unwrap();
        assert_eq!(serde_json::to_string(&name).unwrap(), r#""web-asg""#);
    }
}

mod id_tests {
    use super::*;

    #[test]
    fn ids_display_their_value() {
        let instance = InstanceId::new("i-0123456789abcdef0");
        let deployment = DeploymentId::new("d-ABCDEF123");
        assert_eq!(instance.to_string(), "i-0123456789abcdef0");
        assert_eq!(deployment.as_str(), "d-ABCDEF123");
    }

    #[test]
    fn ids_compare_by_value() {
        assert_eq!(InstanceId::new("i-1"), InstanceId::new("i-1"));
        assert_ne!(InstanceId::new("i-1"), InstanceId::new("i-2"));
    }

    #[test]
    fn ids_round_trip_through_json() {
        let id = DeploymentId::new("d-1");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, r#""d-1""#);
        let back: DeploymentId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}

mod tag_tests {
    use super::*;

    #[test]
    fn key_only_filter_ignores_value() {
        let filter = TagFilter::key_only("active");
        assert!(filter.matches(&Tag::marker("active")));
        assert!(filter.matches(&Tag::new("active", "yes")));
        assert!(!filter.matches(&Tag::marker("new-target")));
    }

    #[test]
    fn key_and_value_filter_requires_both() {
        let filter = TagFilter::key_and_value("env", "prod");
        assert!(filter.matches(&Tag::new("env", "prod")));
        assert!(!filter.matches(&Tag::new("env", "staging")));
    }

    #[test]
    fn default_tag_names() {
        let names = TagNames::default();
        assert_eq!(names.target_tag(), Tag::marker("new-target"));
        assert_eq!(names.active_tag(), Tag::marker("active"));
        assert_eq!(names.active_filter(), TagFilter::key_only("active"));
    }
}
