//! Request plumbing shared by every call to the generative endpoint

use std::time::Duration;

use serde::{Deserialize, Deserializer};

pub mod retry;
pub mod throttle;

/// Durations are expressed as milliseconds in config files.
pub(crate) fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = u64::deserialize(deserializer)?;

    Ok(Duration::from_millis(millis))
}
