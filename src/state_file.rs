// ABOUTME: JSON persistence of the observed function state between CLI runs.
// ABOUTME: Writes go through a sibling temp file so a crash never leaves half a state.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::FunctionState;

pub const DEFAULT_STATE_FILENAME: &str = "nvcf.state.json";

/// Location of a persisted [`FunctionState`].
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the state. A missing file is [`Error::StateNotFound`].
    pub fn load(&self) -> Result<FunctionState> {
        if !self.path.exists() {
            return Err(Error::StateNotFound(self.path.clone()));
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Load the state if the file exists.
    pub fn load_optional(&self) -> Result<Option<FunctionState>> {
        match self.load() {
            Ok(state) => Ok(Some(state)),
            Err(Error::StateNotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn save(&self, state: &FunctionState) -> Result<()> {
        let json = serde_json::to_string_pretty(state)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;

        tracing::debug!(path = %self.path.display(), "saved state");
        Ok(())
    }

    /// Remove the file. Removing a missing file is not an error.
    pub fn remove(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
