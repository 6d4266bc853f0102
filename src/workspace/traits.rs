//! Trait abstraction for the workspace service to enable mocking in tests

use super::model::{Workspace, WorkspaceError};
use crate::state::SetupFormValues;
use async_trait::async_trait;

/// Write path for the workspace's initial setup
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WorkspaceService: Send + Sync {
    /// Fetch the current workspace, if one exists yet
    async fn get_workspace(&self) -> Result<Option<Workspace>, WorkspaceError>;

    /// Record the initial setup values and mark setup complete
    async fn set_initial_setup_config(
        &self,
        values: SetupFormValues,
    ) -> Result<Workspace, WorkspaceError>;
}
