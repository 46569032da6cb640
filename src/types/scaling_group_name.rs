// ABOUTME: Validated scaling group name.
// ABOUTME: Rejects empty names, overlong names, and control characters.

use std::fmt;
use thiserror::Error;

const MAX_LEN: usize = 255;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScalingGroupNameError {
    #[error("scaling group name cannot be empty")]
    Empty,

    #[error("scaling group name exceeds maximum length of 255 characters")]
    TooLong,

    #[error("invalid character in scaling group name: {0:?}")]
    InvalidChar(char),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScalingGroupName(String);

impl ScalingGroupName {
    pub fn new(value: &str) -> Result<Self, ScalingGroupNameError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(ScalingGroupNameError::Empty);
        }

        if value.chars().count() > MAX_LEN {
            return Err(ScalingGroupNameError::TooLong);
        }

        if let Some(c) = value.chars().find(|c| c.is_control()) {
            return Err(ScalingGroupNameError::InvalidChar(c));
        }

        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ScalingGroupName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl serde::Serialize for ScalingGroupName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_typical_names() {
        let name = ScalingGroupName::new("app-production-asg").unwrap();
        assert_eq!(name.as_str(), "app-production-asg");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let name = ScalingGroupName::new("  app-asg ").unwrap();
        assert_eq!(name.to_string(), "app-asg");
    }

    #[test]
    fn rejects_empty() {
        assert_eq!(
            ScalingGroupName::new("   ").unwrap_err(),
            ScalingGroupNameError::Empty
        );
    }

    #[test]
    fn rejects_control_characters() {
        assert_eq!(
            ScalingGroupName::new("app\tasg").unwrap_err(),
            ScalingGroupNameError::InvalidChar('\t')
        );
    }

    #[test]
    fn rejects_overlong() {
        let long = "a".repeat(256);
        assert_eq!(
            ScalingGroupName::new(&long).unwrap_err(),
            ScalingGroupNameError::TooLong
        );
    }
}
