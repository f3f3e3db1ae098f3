// ABOUTME: Import identifier parsing for adopting existing function versions.
// ABOUTME: Accepts the "function_id,version_id" format with both parts required.

use super::id::{FunctionId, VersionId};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ImportIdError {
    #[error(
        "expected import identifier with format: function_id,version_id. Got: {0:?}"
    )]
    Malformed(String),
}

/// A parsed `function_id,version_id` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportId {
    pub function_id: FunctionId,
    pub version_id: VersionId,
}

impl ImportId {
    pub fn parse(value: &str) -> Result<Self, ImportIdError> {
        let mut parts = value.split(',');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(function_id), Some(version_id), None)
                if !function_id.is_empty() && !version_id.is_empty() =>
            {
                Ok(Self {
                    function_id: FunctionId::new(function_id),
                    version_id: VersionId::new(version_id),
                })
            }
            _ => Err(ImportIdError::Malformed(value.to_string())),
        }
    }
}

impl FromStr for ImportId {
    type Err = ImportIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ImportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.function_id, self.version_id)
    }
}
