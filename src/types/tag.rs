// ABOUTME: Instance tags, tag filters, and the per-profile tag namespace.
// ABOUTME: Tags are the only persistent signal of an instance's deployment role.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A key/value tag on a compute instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// A marker tag: the key carries the meaning, the value is empty.
    pub fn marker(key: impl Into<String>) -> Self {
        Self::new(key, "")
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value.is_empty() {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{}={}", self.key, self.value)
        }
    }
}

/// Instance selection filter understood by the deployment service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagFilter {
    pub key: String,
    /// `None` matches any value (key-only filter).
    pub value: Option<String>,
}

impl TagFilter {
    pub fn key_only(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: None,
        }
    }

    pub fn key_and_value(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
        }
    }

    pub fn matches(&self, tag: &Tag) -> bool {
        tag.key == self.key && self.value.as_ref().is_none_or(|v| *v == tag.value)
    }
}

/// Tag keys marking an instance's deployment role.
///
/// Each profile carries its own names so that environments sharing an
/// account do not steer each other's deployments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagNames {
    #[serde(default = "default_target")]
    pub target: String,
    #[serde(default = "default_active")]
    pub active: String,
}

fn default_target() -> String {
    "new-target".to_string()
}

fn default_active() -> String {
    "active".to_string()
}

impl Default for TagNames {
    fn default() -> Self {
        Self {
            target: default_target(),
            active: default_active(),
        }
    }
}

impl TagNames {
    pub fn target_tag(&self) -> Tag {
        Tag::marker(&self.target)
    }

    pub fn active_tag(&self) -> Tag {
        Tag::marker(&self.active)
    }

    pub fn target_filter(&self) -> TagFilter {
        TagFilter::key_only(&self.target)
    }

    pub fn active_filter(&self) -> TagFilter {
        TagFilter::key_only(&self.active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_only_filter_matches_any_value() {
        let filter = TagFilter::key_only("active");
        assert!(filter.matches(&Tag::marker("active")));
        assert!(filter.matches(&Tag::new("active", "2024-01-01")));
        assert!(!filter.matches(&Tag::marker("new-target")));
    }

    #[test]
    fn key_and_value_filter_requires_both() {
        let filter = TagFilter::key_and_value("role", "web");
        assert!(filter.matches(&Tag::new("role", "web")));
        assert!(!filter.matches(&Tag::new("role", "worker")));
    }

    #[test]
    fn default_names() {
        let names = TagNames::default();
        assert_eq!(names.target_tag(), Tag::marker("new-target"));
        assert_eq!(names.active_tag(), Tag::marker("active"));
    }

    #[test]
    fn marker_tag_displays_key_only() {
        assert_eq!(Tag::marker("active").to_string(), "active");
        assert_eq!(Tag::new("env", "prod").to_string(), "env=prod");
    }
}
