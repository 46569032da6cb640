// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Handles scaling group names and rollback event lists.

use nonempty::NonEmpty;
use serde::Deserialize;

use crate::control::RollbackEvent;
use crate::types::ScalingGroupName;

pub fn deserialize_scaling_group_name_option<'de, D>(
    deserializer: D,
) -> Result<Option<ScalingGroupName>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    opt.map(|s| ScalingGroupName::new(&s).map_err(serde::de::Error::custom))
        .transpose()
}

pub fn deserialize_rollback_events<'de, D>(
    deserializer: D,
) -> Result<Option<NonEmpty<RollbackEvent>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<Vec<RollbackEvent>> = Option::deserialize(deserializer)?;
    match opt {
        None => Ok(None),
        Some(values) => {
            let events = NonEmpty::from_vec(values)
                .ok_or_else(|| serde::de::Error::custom("rollback events list cannot be empty"))?;
            Ok(Some(events))
        }
    }
}
