//! Local-file state backend.
//!
//! JSON document on disk, written with the temp-then-rename pattern so a
//! crashed run can never leave a torn state file. Mostly for development
//! and air-gapped setups; production uses [`super::GistStore`].

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::error::StoreError;

use super::{AlertState, StateStore};

pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl StateStore for FileStore {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn load(&self) -> Result<AlertState, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "state file absent, starting empty");
                return Ok(AlertState::default());
            }
            Err(e) => return Err(e.into()),
        };

        let state: AlertState = serde_json::from_str(&content)?;
        debug!(
            path = %self.path.display(),
            entries = state.len(),
            "alert state loaded"
        );
        Ok(state)
    }

    async fn save(&self, state: &AlertState) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(state)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // Write to temp file first for atomicity.
        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;

        let cleanup_and_err = |e: std::io::Error| {
            let _ = fs::remove_file(&temp_path);
            e
        };

        file.write_all(json.as_bytes()).map_err(cleanup_and_err)?;
        file.sync_all().map_err(cleanup_and_err)?;
        fs::rename(&temp_path, &self.path).map_err(cleanup_and_err)?;

        debug!(
            path = %self.path.display(),
            entries = state.len(),
            "alert state saved"
        );
        Ok(())
    }
}
