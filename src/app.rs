//! Application state and core logic

use crate::config::SetupConfig;
use crate::messages::Messages;
use crate::security::{HostSecurityCheck, SecurityCheck};
use crate::state::{reduce, AppState, FocusTarget, FormAction, SecurityCheckStatus, View};
use crate::workspace::{FileWorkspaceClient, Workspace, WorkspaceError, WorkspaceService};
use anyhow::{anyhow, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::mpsc;

/// Results reported back to the event loop by background tasks
#[derive(Debug)]
pub enum AppEvent {
    SecurityCheckFinished(SecurityCheckStatus),
    SubmitFinished(Result<Workspace, WorkspaceError>),
}

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Localized strings
    pub messages: Messages,
    /// Receives the initial setup on submit
    workspace: Arc<dyn WorkspaceService>,
    events_tx: mpsc::UnboundedSender<AppEvent>,
    events_rx: mpsc::UnboundedReceiver<AppEvent>,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App instance from configuration
    pub async fn new(config: &SetupConfig) -> Result<Self> {
        let path = match &config.workspace_file {
            Some(path) => path.clone(),
            None => FileWorkspaceClient::default_path()
                .ok_or_else(|| anyhow!("Could not determine a data directory for the workspace"))?,
        };
        let client = FileWorkspaceClient::new(path);

        let existing = match client.get_workspace().await {
            Ok(workspace) => workspace,
            Err(e) => {
                tracing::warn!("Ignoring unreadable workspace at {}: {e}", client.path().display());
                None
            }
        };

        let messages = Messages::with_overrides(&config.messages);
        let mut app = Self::with_services(config.analytics_enabled(), messages, Arc::new(client));

        if let Some(workspace) = existing.filter(|w| w.initial_setup_complete) {
            tracing::info!("Workspace {} already set up", workspace.workspace_id);
            app.state.workspace = Some(workspace);
            app.state.current_view = View::Complete;
        }

        let check = HostSecurityCheck::new(config.webapp_url.clone());
        app.state.security_host = check.host();
        app.start_security_check(Arc::new(check));

        Ok(app)
    }

    /// Create an App around an already constructed workspace service
    pub fn with_services(
        analytics_enabled: bool,
        messages: Messages,
        workspace: Arc<dyn WorkspaceService>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            state: AppState::new(analytics_enabled),
            messages,
            workspace,
            events_tx,
            events_rx,
            quit: false,
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Push an error message to the error queue for display
    pub fn push_error(&mut self, message: impl Into<String>) {
        self.state.push_error(message.into());
    }

    /// Run `action` through the form reducer
    pub fn dispatch(&mut self, action: FormAction) {
        self.state.form = reduce(&self.state.form, action);
    }

    /// Run the security check in the background
    pub fn start_security_check(&self, check: Arc<dyn SecurityCheck>) {
        let tx = self.events_tx.clone();
        tokio::spawn(async move {
            let status = check.run().await;
            // Receiver only goes away when the app is shutting down
            let _ = tx.send(AppEvent::SecurityCheckFinished(status));
        });
    }

    /// Start submitting the form. Returns false when the gate is closed.
    pub fn submit(&mut self) -> bool {
        if !self.state.form.can_submit() {
            tracing::debug!("Submit ignored: form cannot be submitted");
            return false;
        }
        self.dispatch(FormAction::SubmitStarted);

        let values = self.state.form.values.clone();
        let workspace = Arc::clone(&self.workspace);
        let tx = self.events_tx.clone();
        tracing::info!("Submitting initial setup");
        tokio::spawn(async move {
            let result = workspace.set_initial_setup_config(values).await;
            let _ = tx.send(AppEvent::SubmitFinished(result));
        });
        true
    }

    /// Apply a background task's result
    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SecurityCheckFinished(status) => {
                tracing::info!("Security check finished: {status:?}");
                self.state.security_result = Some(status);
                self.dispatch(FormAction::SecurityCheckReported(status));
            }
            AppEvent::SubmitFinished(Ok(workspace)) => {
                self.dispatch(FormAction::SubmitFinished);
                tracing::info!("Initial setup saved for workspace {}", workspace.workspace_id);
                let id = workspace.workspace_id.to_string();
                self.state.status_message = Some(
                    self.messages
                        .format_with("setupForm.complete", &[("workspaceId", id.as_str())]),
                );
                self.state.workspace = Some(workspace);
                self.state.current_view = View::Complete;
            }
            AppEvent::SubmitFinished(Err(e)) => {
                self.dispatch(FormAction::SubmitFinished);
                tracing::warn!("Initial setup submission failed: {e}");
                self.push_error(format!("Failed to save setup: {e}"));
            }
        }
    }

    /// Apply every event that is already waiting, without blocking
    pub fn drain_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            self.handle_event(event);
        }
    }

    /// Wait for the next background event
    #[cfg(test)]
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.events_rx.recv().await
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit = true;
            return;
        }

        // Handle error dialog dismissal first (modal)
        if self.state.has_errors() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.state.dismiss_error();
            }
            return;
        }

        match self.state.current_view {
            View::Setup => self.handle_setup_key(key),
            View::Complete => self.handle_complete_key(key),
        }
    }

    fn handle_setup_key(&mut self, key: KeyEvent) {
        self.state.status_message = None;
        let active = self.state.form.active_field;

        match key.code {
            KeyCode::Esc => self.quit = true,
            KeyCode::Tab | KeyCode::Down => self.dispatch(FormAction::FocusNext),
            KeyCode::BackTab | KeyCode::Up => self.dispatch(FormAction::FocusPrev),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.submit();
            }
            KeyCode::Enter if active == FocusTarget::Submit => {
                self.submit();
            }
            KeyCode::Enter => self.dispatch(FormAction::FocusNext),
            // Clear the email field
            KeyCode::Char('u')
                if active == FocusTarget::Email && key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.dispatch(FormAction::EmailChanged(String::new()))
            }
            KeyCode::Char(c)
                if active == FocusTarget::Email && !key.modifiers.contains(KeyModifiers::CONTROL) =>
            {
                self.dispatch(FormAction::EmailInput(c))
            }
            KeyCode::Backspace if active == FocusTarget::Email => {
                self.dispatch(FormAction::EmailBackspace)
            }
            KeyCode::Char(' ') if active == FocusTarget::Consent => {
                self.dispatch(FormAction::ToggleConsent)
            }
            KeyCode::Char('a') if active == FocusTarget::SecurityCheck => {
                self.dispatch(FormAction::AcknowledgeSecurityRisk)
            }
            _ => {}
        }
    }

    fn handle_complete_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => self.quit = true,
            // Run the setup again with a fresh form
            KeyCode::Char('r') => {
                let host = self.state.security_host.take();
                let result = self.state.security_result;
                self.state = AppState::new(self.state.form.consent_visible);
                self.state.security_host = host;
                self.state.security_result = result;
                if let Some(status) = result {
                    self.dispatch(FormAction::SecurityCheckReported(status));
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SetupFormValues;
    use crate::workspace::MockWorkspaceService;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use tokio::sync::Notify;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
    }

    fn app_with(mock: MockWorkspaceService, analytics_enabled: bool) -> App {
        App::with_services(analytics_enabled, Messages::default(), Arc::new(mock))
    }

    /// Fill in a submittable form
    fn make_ready(app: &mut App) {
        type_text(app, "a@b.com");
        app.handle_event(AppEvent::SecurityCheckFinished(
            SecurityCheckStatus::Succeeded,
        ));
    }

    struct FixedCheck(SecurityCheckStatus);

    #[async_trait]
    impl SecurityCheck for FixedCheck {
        async fn run(&self) -> SecurityCheckStatus {
            self.0
        }
    }

    /// Workspace service that blocks until released
    struct GatedWorkspace {
        release: Arc<Notify>,
    }

    #[async_trait]
    impl WorkspaceService for GatedWorkspace {
        async fn get_workspace(&self) -> Result<Option<Workspace>, WorkspaceError> {
            Ok(None)
        }

        async fn set_initial_setup_config(
            &self,
            _values: SetupFormValues,
        ) -> Result<Workspace, WorkspaceError> {
            self.release.notified().await;
            Ok(Workspace::new())
        }
    }

    #[tokio::test]
    async fn test_submit_success_hands_off_values() {
        let mut mock = MockWorkspaceService::new();
        mock.expect_set_initial_setup_config()
            .withf(|values| {
                values.email == "a@b.com"
                    && values.anonymous_data_collection == Some(false)
                    && values.security_check == Some(SecurityCheckStatus::Succeeded)
            })
            .times(1)
            .returning(|_| {
                let mut ws = Workspace::new();
                ws.initial_setup_complete = true;
                Ok(ws)
            });
        let mut app = app_with(mock, true);
        make_ready(&mut app);

        assert!(app.submit());
        assert!(app.state.form.is_submitting);

        let event = app.next_event().await.unwrap();
        app.handle_event(event);

        assert!(!app.state.form.is_submitting);
        assert_eq!(app.state.current_view, View::Complete);
        assert!(app.state.workspace.is_some());
        assert!(app.state.status_message.is_some());
    }

    #[tokio::test]
    async fn test_submit_failure_preserves_values() {
        let mut mock = MockWorkspaceService::new();
        mock.expect_set_initial_setup_config()
            .times(2)
            .returning(|_| Err(WorkspaceError::InvalidValues("rejected".to_string())));
        let mut app = app_with(mock, true);
        make_ready(&mut app);
        let before = app.state.form.values.clone();

        assert!(app.submit());
        let event = app.next_event().await.unwrap();
        app.handle_event(event);

        assert!(!app.state.form.is_submitting);
        assert_eq!(app.state.form.values, before);
        assert_eq!(app.state.current_view, View::Setup);
        assert!(app
            .state
            .current_error()
            .is_some_and(|e| e.contains("rejected")));

        // Back to idle: can submit again
        assert!(app.state.form.can_submit());
        assert!(app.submit());
        let event = app.next_event().await.unwrap();
        app.handle_event(event);
    }

    #[tokio::test]
    async fn test_submit_blocked_while_security_check_loading() {
        let mut mock = MockWorkspaceService::new();
        mock.expect_set_initial_setup_config().times(0);
        let mut app = app_with(mock, true);
        type_text(&mut app, "a@b.com");

        assert!(!app.submit());
        assert!(!app.state.form.is_submitting);
    }

    #[tokio::test]
    async fn test_submit_blocked_on_failed_until_acknowledged() {
        let mut mock = MockWorkspaceService::new();
        mock.expect_set_initial_setup_config()
            .times(1)
            .returning(|_| Ok(Workspace::new()));
        let mut app = app_with(mock, false);
        type_text(&mut app, "a@b.com");
        app.start_security_check(Arc::new(FixedCheck(SecurityCheckStatus::Failed)));
        let event = app.next_event().await.unwrap();
        app.handle_event(event);
        assert!(!app.submit());

        // Consent row is hidden, so one Tab reaches the security check
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.state.form.active_field, FocusTarget::SecurityCheck);
        app.handle_key(key(KeyCode::Char('a')));
        assert_eq!(
            app.state.form.security_status(),
            Some(SecurityCheckStatus::Ignored)
        );
        assert!(app.submit());
        let event = app.next_event().await.unwrap();
        app.handle_event(event);
        assert_eq!(app.state.current_view, View::Complete);
    }

    #[tokio::test]
    async fn test_pending_until_service_resolves() {
        let release = Arc::new(Notify::new());
        let service = GatedWorkspace {
            release: Arc::clone(&release),
        };
        let mut app = App::with_services(true, Messages::default(), Arc::new(service));
        make_ready(&mut app);

        assert!(app.submit());
        tokio::task::yield_now().await;
        app.drain_events();
        assert!(app.state.form.is_submitting);
        // No second submission while pending
        assert!(!app.submit());
        app.handle_key(ctrl('s'));
        assert!(app.state.form.is_submitting);

        release.notify_one();
        let event = app.next_event().await.unwrap();
        app.handle_event(event);
        assert!(!app.state.form.is_submitting);
        assert_eq!(app.state.current_view, View::Complete);
    }

    #[tokio::test]
    async fn test_enter_on_submit_button() {
        let mut mock = MockWorkspaceService::new();
        mock.expect_set_initial_setup_config()
            .times(1)
            .returning(|_| Ok(Workspace::new()));
        let mut app = app_with(mock, true);
        make_ready(&mut app);

        // Enter on a field moves focus instead of submitting
        app.handle_key(key(KeyCode::Enter));
        assert_eq!(app.state.form.active_field, FocusTarget::Consent);
        assert!(!app.state.form.is_submitting);

        app.handle_key(key(KeyCode::BackTab));
        app.handle_key(key(KeyCode::BackTab));
        assert_eq!(app.state.form.active_field, FocusTarget::Submit);
        app.handle_key(key(KeyCode::Enter));
        assert!(app.state.form.is_submitting);
        let event = app.next_event().await.unwrap();
        app.handle_event(event);
    }

    #[test]
    fn test_email_editing_keys() {
        let mut app = app_with(MockWorkspaceService::new(), true);
        type_text(&mut app, "ab");
        app.handle_key(key(KeyCode::Backspace));
        assert_eq!(app.state.form.values.email, "a");
    }

    #[test]
    fn test_ctrl_u_clears_email() {
        let mut app = app_with(MockWorkspaceService::new(), true);
        type_text(&mut app, "a@b.com");
        app.handle_key(ctrl('u'));
        assert_eq!(app.state.form.values.email, "");
        assert!(!app.state.form.is_dirty());

        // Only clears while the email field has focus
        type_text(&mut app, "x");
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(ctrl('u'));
        assert_eq!(app.state.form.values.email, "x");
    }

    #[test]
    fn test_space_toggles_consent_only_when_focused() {
        let mut app = app_with(MockWorkspaceService::new(), true);
        app.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(app.state.form.values.email, " ");
        assert_eq!(app.state.form.values.anonymous_data_collection, Some(false));

        app.handle_key(key(KeyCode::Down));
        app.handle_key(key(KeyCode::Char(' ')));
        assert_eq!(app.state.form.values.anonymous_data_collection, Some(true));
    }

    #[test]
    fn test_error_dialog_is_modal() {
        let mut app = app_with(MockWorkspaceService::new(), true);
        app.push_error("boom");
        app.handle_key(key(KeyCode::Char('x')));
        assert_eq!(app.state.form.values.email, "");
        app.handle_key(key(KeyCode::Esc));
        assert!(!app.state.has_errors());
        assert!(!app.should_quit());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app_with(MockWorkspaceService::new(), true);
        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_quit());

        let mut app = app_with(MockWorkspaceService::new(), true);
        app.handle_key(ctrl('c'));
        assert!(app.should_quit());
    }

    #[test]
    fn test_complete_view_restart() {
        let mut app = app_with(MockWorkspaceService::new(), true);
        make_ready(&mut app);
        app.state.current_view = View::Complete;

        app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(app.state.current_view, View::Setup);
        assert_eq!(app.state.form.values.email, "");
        assert_eq!(
            app.state.form.security_status(),
            Some(SecurityCheckStatus::Succeeded)
        );
        assert!(!app.should_quit());

        app.state.current_view = View::Complete;
        app.handle_key(key(KeyCode::Char('q')));
        assert!(app.should_quit());
    }

    #[test]
    fn test_restart_asks_again_about_failed_check() {
        let mut app = app_with(MockWorkspaceService::new(), false);
        type_text(&mut app, "a@b.com");
        app.handle_event(AppEvent::SecurityCheckFinished(SecurityCheckStatus::Failed));
        app.handle_key(key(KeyCode::Tab));
        app.handle_key(key(KeyCode::Char('a')));
        assert_eq!(
            app.state.form.security_status(),
            Some(SecurityCheckStatus::Ignored)
        );
        app.state.current_view = View::Complete;

        app.handle_key(key(KeyCode::Char('r')));
        assert_eq!(
            app.state.form.security_status(),
            Some(SecurityCheckStatus::Failed)
        );
        assert_eq!(app.state.security_result, Some(SecurityCheckStatus::Failed));
        assert!(!app.state.form.can_submit());
    }

    #[tokio::test]
    async fn test_new_with_completed_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("workspace.json");
        let client = FileWorkspaceClient::new(&path);
        client
            .set_initial_setup_config(SetupFormValues {
                email: "a@b.com".to_string(),
                anonymous_data_collection: Some(true),
                security_check: Some(SecurityCheckStatus::Succeeded),
            })
            .await
            .unwrap();

        let config = SetupConfig {
            analytics_enabled: Some(false),
            webapp_url: Some("http://localhost:8000".to_string()),
            workspace_file: Some(path),
            ..Default::default()
        };
        let mut app = App::new(&config).await.unwrap();
        assert_eq!(app.state.current_view, View::Complete);
        assert_eq!(app.state.security_host.as_deref(), Some("localhost"));
        assert!(!app.state.form.consent_visible);

        let event = app.next_event().await.unwrap();
        assert!(matches!(
            event,
            AppEvent::SecurityCheckFinished(SecurityCheckStatus::Succeeded)
        ));
    }
}
