//! File-backed workspace client
//!
//! Stores the workspace as a single JSON document. Writes go to a sibling
//! temp file which is then renamed over the original.

use super::model::{Workspace, WorkspaceError};
use super::traits::WorkspaceService;
use crate::state::SetupFormValues;
use async_trait::async_trait;
use chrono::Utc;
use directories::ProjectDirs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Client persisting the workspace to a JSON file
#[derive(Debug, Clone)]
pub struct FileWorkspaceClient {
    path: PathBuf,
}

impl FileWorkspaceClient {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location in the platform data directory
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "workspace-setup", "workspace-setup")
            .map(|dirs| dirs.data_dir().join("workspace.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<Option<Workspace>, WorkspaceError> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn store(&self, workspace: &Workspace) -> Result<(), WorkspaceError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(workspace)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).await?;
        fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

#[async_trait]
impl WorkspaceService for FileWorkspaceClient {
    async fn get_workspace(&self) -> Result<Option<Workspace>, WorkspaceError> {
        self.load().await
    }

    async fn set_initial_setup_config(
        &self,
        values: SetupFormValues,
    ) -> Result<Workspace, WorkspaceError> {
        let anonymous_data_collection = values.anonymous_data_collection.ok_or_else(|| {
            WorkspaceError::InvalidValues("anonymousDataCollection is required".to_string())
        })?;

        let mut workspace = self.load().await?.unwrap_or_default();
        workspace.email = Some(values.email.trim().to_string());
        workspace.anonymous_data_collection = anonymous_data_collection;
        workspace.security_check = values.security_check;
        workspace.initial_setup_complete = true;
        workspace.display_setup_wizard = true;
        workspace.updated_at = Utc::now();

        self.store(&workspace).await?;
        tracing::info!(
            "Stored initial setup for workspace {} at {}",
            workspace.workspace_id,
            self.path.display()
        );
        Ok(workspace)
    }
}
