//! Setup form state and its reducer
//!
//! The form is a plain value: every change goes through [`reduce`], which
//! returns the next state with errors recomputed.

use super::validation::{validate, FieldError, FieldName, ValidationResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Result reported by the security check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityCheckStatus {
    #[default]
    Loading,
    CheckFailed,
    Succeeded,
    Ignored,
    Failed,
}

impl SecurityCheckStatus {
    /// Statuses the form accepts at submission time
    pub fn is_submittable(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Ignored | Self::CheckFailed)
    }

    /// Message catalogue key describing this status
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::Loading => "setupForm.securityCheck.loading",
            Self::CheckFailed => "setupForm.securityCheck.checkFailed",
            Self::Succeeded => "setupForm.securityCheck.succeeded",
            Self::Ignored => "setupForm.securityCheck.ignored",
            Self::Failed => "setupForm.securityCheck.failed",
        }
    }
}

/// Values collected by the setup form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetupFormValues {
    pub email: String,
    pub anonymous_data_collection: Option<bool>,
    pub security_check: Option<SecurityCheckStatus>,
}

impl SetupFormValues {
    pub fn defaults(analytics_enabled: bool) -> Self {
        Self {
            email: String::new(),
            anonymous_data_collection: Some(!analytics_enabled),
            security_check: Some(SecurityCheckStatus::Loading),
        }
    }
}

/// Focusable rows of the form, top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusTarget {
    Email,
    Consent,
    SecurityCheck,
    Submit,
}

/// Rows shown for the given configuration. The consent switch only exists
/// when analytics collection is a user-facing option.
pub fn visible_fields(consent_visible: bool) -> Vec<FocusTarget> {
    let mut fields = vec![FocusTarget::Email];
    if consent_visible {
        fields.push(FocusTarget::Consent);
    }
    fields.push(FocusTarget::SecurityCheck);
    fields.push(FocusTarget::Submit);
    fields
}

/// Everything that can happen to the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    EmailChanged(String),
    EmailInput(char),
    EmailBackspace,
    ToggleConsent,
    SecurityCheckReported(SecurityCheckStatus),
    /// User accepts the risk of a failed security check
    AcknowledgeSecurityRisk,
    FocusNext,
    FocusPrev,
    SubmitStarted,
    SubmitFinished,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SetupFormState {
    pub values: SetupFormValues,
    pub defaults: SetupFormValues,
    pub touched: BTreeSet<FieldName>,
    pub errors: ValidationResult,
    pub is_submitting: bool,
    pub consent_visible: bool,
    pub active_field: FocusTarget,
}

/// Fresh form state for a newly mounted setup screen
pub fn initialize(analytics_enabled: bool) -> SetupFormState {
    let defaults = SetupFormValues::defaults(analytics_enabled);
    SetupFormState {
        errors: validate(&defaults),
        values: defaults.clone(),
        defaults,
        touched: BTreeSet::new(),
        is_submitting: false,
        consent_visible: analytics_enabled,
        active_field: FocusTarget::Email,
    }
}

/// The submission gate
pub fn can_submit(is_valid: bool, is_dirty: bool, is_submitting: bool) -> bool {
    is_valid && is_dirty && !is_submitting
}

impl SetupFormState {
    pub fn is_dirty(&self) -> bool {
        self.values != self.defaults
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_valid()
    }

    pub fn can_submit(&self) -> bool {
        can_submit(self.is_valid(), self.is_dirty(), self.is_submitting)
    }

    /// Error to show inline for `field`; untouched fields stay quiet.
    pub fn visible_error(&self, field: FieldName) -> Option<FieldError> {
        if self.touched.contains(&field) {
            self.errors.get(field)
        } else {
            None
        }
    }

    pub fn security_status(&self) -> Option<SecurityCheckStatus> {
        self.values.security_check
    }

    fn focus_order(&self) -> Vec<FocusTarget> {
        visible_fields(self.consent_visible)
    }

    fn move_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let current = order
            .iter()
            .position(|f| *f == self.active_field)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % order.len()
        } else if current == 0 {
            order.len() - 1
        } else {
            current - 1
        };
        self.active_field = order[next];
    }

    fn touch(&mut self, field: FieldName) {
        self.touched.insert(field);
        self.errors = validate(&self.values);
    }

    fn revalidate(&mut self) {
        self.errors = validate(&self.values);
    }
}

/// Apply `action` to `state`, returning the next state
pub fn reduce(state: &SetupFormState, action: FormAction) -> SetupFormState {
    let mut next = state.clone();
    match action {
        FormAction::EmailChanged(email) => {
            next.values.email = email;
            next.touch(FieldName::Email);
        }
        FormAction::EmailInput(c) => {
            next.values.email.push(c);
            next.touch(FieldName::Email);
        }
        FormAction::EmailBackspace => {
            next.values.email.pop();
            next.touch(FieldName::Email);
        }
        FormAction::ToggleConsent => {
            if next.consent_visible {
                let current = next.values.anonymous_data_collection.unwrap_or(false);
                next.values.anonymous_data_collection = Some(!current);
                next.touch(FieldName::AnonymousDataCollection);
            }
        }
        FormAction::SecurityCheckReported(status) => {
            next.values.security_check = Some(status);
            next.revalidate();
        }
        FormAction::AcknowledgeSecurityRisk => {
            if next.values.security_check == Some(SecurityCheckStatus::Failed) {
                next.values.security_check = Some(SecurityCheckStatus::Ignored);
                next.touch(FieldName::SecurityCheck);
            }
        }
        FormAction::FocusNext => next.move_focus(true),
        FormAction::FocusPrev => next.move_focus(false),
        FormAction::SubmitStarted => {
            if state.can_submit() {
                next.is_submitting = true;
            }
        }
        FormAction::SubmitFinished => next.is_submitting = false,
    }
    next
}
