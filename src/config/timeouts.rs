// ABOUTME: Per-operation deadlines for create and update.
// ABOUTME: Parsed as humantime durations, defaulting to one hour.

use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(3600);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Timeouts {
    #[serde(default, with = "humantime_serde::option")]
    pub create: Option<Duration>,

    #[serde(default, with = "humantime_serde::option")]
    pub update: Option<Duration>,
}

impl Timeouts {
    pub fn create(&self) -> Duration {
        self.create.unwrap_or(DEFAULT_OPERATION_TIMEOUT)
    }

    pub fn update(&self) -> Duration {
        self.update.unwrap_or(DEFAULT_OPERATION_TIMEOUT)
    }
}
