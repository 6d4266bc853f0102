//! Workspace data and errors

use crate::state::SecurityCheckStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Persisted workspace configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workspace {
    pub workspace_id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub anonymous_data_collection: bool,
    #[serde(default)]
    pub security_check: Option<SecurityCheckStatus>,
    #[serde(default)]
    pub initial_setup_complete: bool,
    #[serde(default)]
    pub display_setup_wizard: bool,
    pub updated_at: DateTime<Utc>,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            workspace_id: Uuid::new_v4(),
            email: None,
            anonymous_data_collection: false,
            security_check: None,
            initial_setup_complete: false,
            display_setup_wizard: false,
            updated_at: Utc::now(),
        }
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("workspace storage error: {0}")]
    Io(#[from] std::io::Error),
    #[error("workspace data is malformed: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("invalid setup values: {0}")]
    InvalidValues(String),
}
