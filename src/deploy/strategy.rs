// ABOUTME: Deployment type selection: in-place or blue-green.
// ABOUTME: Determines which phases a run walks through.

use serde::de::{self, Deserialize, Deserializer};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::phase::Phase;

/// Strategy for rolling out a revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeploymentType {
    /// Update the existing fleet without new capacity.
    InPlace,

    /// Provision a new instance, deploy to it, then retire the old one.
    #[default]
    BlueGreen,
}

impl DeploymentType {
    /// Phases a successful run of this type enters, in order.
    pub fn phases(&self) -> &'static [Phase] {
        match self {
            DeploymentType::InPlace => &[Phase::Idle, Phase::Deploying, Phase::Done],
            DeploymentType::BlueGreen => &[
                Phase::Idle,
                Phase::ScalingUp,
                Phase::AwaitingReady,
                Phase::TaggingTarget,
                Phase::Detaching,
                Phase::Deploying,
                Phase::Reattaching,
                Phase::TaggingActive,
                Phase::ScalingDown,
                Phase::Done,
            ],
        }
    }
}

impl FromStr for DeploymentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "in-place" | "inplace" => Ok(DeploymentType::InPlace),
            "blue-green" | "bluegreen" => Ok(DeploymentType::BlueGreen),
            other => Err(format!("unknown deployment type: {}", other)),
        }
    }
}

impl fmt::Display for DeploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeploymentType::InPlace => write!(f, "in-place"),
            DeploymentType::BlueGreen => write!(f, "blue-green"),
        }
    }
}

impl<'de> Deserialize<'de> for DeploymentType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

impl Serialize for DeploymentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_spellings() {
        assert_eq!("in-place".parse(), Ok(DeploymentType::InPlace));
        assert_eq!("IN_PLACE".parse(), Ok(DeploymentType::InPlace));
        assert_eq!("blue-green".parse(), Ok(DeploymentType::BlueGreen));
        assert_eq!("BLUE_GREEN".parse(), Ok(DeploymentType::BlueGreen));
        assert!("canary".parse::<DeploymentType>().is_err());
    }

    #[test]
    fn in_place_skips_capacity_phases() {
        let phases = DeploymentType::InPlace.phases();
        assert!(!phases.contains(&Phase::ScalingUp));
        assert!(!phases.contains(&Phase::Detaching));
    }

    #[test]
    fn blue_green_brackets_deploy_with_detach_and_reattach() {
        let phases = DeploymentType::BlueGreen.phases();
        let pos = |p| phases.iter().position(|x| *x == p).unwrap();
        assert!(pos(Phase::Detaching) < pos(Phase::Deploying));
        assert!(pos(Phase::Deploying) < pos(Phase::Reattaching));
        assert!(pos(Phase::Reattaching) < pos(Phase::TaggingActive));
    }

    #[test]
    fn display_matches_config_spelling() {
        assert_eq!(DeploymentType::BlueGreen.to_string(), "blue-green");
        assert_eq!(DeploymentType::InPlace.to_string(), "in-place");
    }
}
