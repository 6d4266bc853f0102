//! Configuration handling for the setup tool

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

const ENV_ANALYTICS: &str = "WORKSPACE_SETUP_ANALYTICS";
const ENV_WEBAPP_URL: &str = "WORKSPACE_SETUP_WEBAPP_URL";
const ENV_WORKSPACE_FILE: &str = "WORKSPACE_SETUP_FILE";

/// User configuration for the setup tool
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SetupConfig {
    /// Whether anonymous analytics collection is offered as an option
    pub analytics_enabled: Option<bool>,
    /// URL the web app is served from, inspected by the security check
    pub webapp_url: Option<String>,
    /// Where the workspace document is stored
    pub workspace_file: Option<PathBuf>,
    /// Message catalogue overrides
    #[serde(default)]
    pub messages: HashMap<String, String>,
}

impl SetupConfig {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("io", "workspace-setup", "workspace-setup")
            .map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load configuration from file, then apply environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                let content = fs::read_to_string(&path)?;
                serde_json::from_str(&content)?
            }
            _ => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(flag) = var(ENV_ANALYTICS).as_deref().and_then(parse_flag) {
            self.analytics_enabled = Some(flag);
        }
        if let Some(url) = var(ENV_WEBAPP_URL) {
            self.webapp_url = Some(url);
        }
        if let Some(file) = var(ENV_WORKSPACE_FILE) {
            self.workspace_file = Some(PathBuf::from(file));
        }
    }

    /// Analytics collection is offered unless explicitly disabled
    pub fn analytics_enabled(&self) -> bool {
        self.analytics_enabled.unwrap_or(true)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
