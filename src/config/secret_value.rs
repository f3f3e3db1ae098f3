// ABOUTME: Secret value sources for the desired-state file.
// ABOUTME: Handles literal values and references to environment variables.

use serde::Deserialize;

use crate::model::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SecretValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl SecretValue {
    /// Resolve the raw secret text. `secret` names the secret in errors.
    pub fn resolve(&self, secret: &str) -> Result<String, ValidationError> {
        match self {
            SecretValue::Literal(s) => Ok(s.clone()),
            SecretValue::FromEnv { var, default } => match std::env::var(var) {
                Ok(val) => Ok(val),
                Err(_) => default
                    .clone()
                    .ok_or_else(|| ValidationError::MissingSecretEnv {
                        secret: secret.to_string(),
                        var: var.clone(),
                    }),
            },
        }
    }
}

/// A secret entry: the name is recorded in state, the value never is.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SecretSpec {
    pub name: String,
    pub value: SecretValue,
}
