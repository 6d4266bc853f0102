//! Application state definitions

use super::forms::{initialize, SecurityCheckStatus, SetupFormState};
use crate::workspace::Workspace;
use std::collections::VecDeque;

/// Current view in the application
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Setup,
    /// Initial setup was handed off to the workspace service
    Complete,
}

/// Main application state
#[derive(Debug, Clone)]
pub struct AppState {
    pub current_view: View,
    pub form: SetupFormState,
    /// Workspace returned by the last successful submission
    pub workspace: Option<Workspace>,
    /// Host the security check inspected, for display
    pub security_host: Option<String>,
    /// Status the security check reported, before any acknowledgement
    pub security_result: Option<SecurityCheckStatus>,
    pub status_message: Option<String>,
    /// Errors waiting to be shown, oldest first
    error_queue: VecDeque<String>,
}

impl AppState {
    pub fn new(analytics_enabled: bool) -> Self {
        Self {
            current_view: View::Setup,
            form: initialize(analytics_enabled),
            workspace: None,
            security_host: None,
            security_result: None,
            status_message: None,
            error_queue: VecDeque::new(),
        }
    }

    pub fn push_error(&mut self, message: String) {
        self.error_queue.push_back(message);
    }

    pub fn has_errors(&self) -> bool {
        !self.error_queue.is_empty()
    }

    pub fn current_error(&self) -> Option<&str> {
        self.error_queue.front().map(String::as_str)
    }

    pub fn dismiss_error(&mut self) {
        self.error_queue.pop_front();
    }
}
