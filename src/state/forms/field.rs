//! Form field value objects
//!
//! A [`FormField`] is the render-ready description of one row of the setup
//! form: label, current value and any inline error, already localized.

use super::setup_form::{FocusTarget, SetupFormState};
use super::validation::FieldName;
use crate::messages::Messages;

/// Type-safe field values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Switch(bool),
}

/// Represents a single form field with its configuration and value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: FieldName,
    pub label: String,
    pub placeholder: Option<String>,
    pub description: Option<String>,
    pub value: FieldValue,
    pub error: Option<String>,
}

impl FormField {
    /// Create a new text input
    pub fn text_input(name: FieldName, label: String, placeholder: String, value: &str) -> Self {
        Self {
            name,
            label,
            placeholder: Some(placeholder),
            description: None,
            value: FieldValue::Text(value.to_string()),
            error: None,
        }
    }

    /// Create a new on/off switch
    pub fn switch(name: FieldName, label: String, description: String, value: bool) -> Self {
        Self {
            name,
            label,
            placeholder: None,
            description: Some(description),
            value: FieldValue::Switch(value),
            error: None,
        }
    }

    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }

    pub fn focus_target(&self) -> FocusTarget {
        match self.name {
            FieldName::Email => FocusTarget::Email,
            FieldName::AnonymousDataCollection => FocusTarget::Consent,
            FieldName::SecurityCheck => FocusTarget::SecurityCheck,
        }
    }

    /// Get the display value for rendering
    pub fn display_value(&self) -> String {
        match &self.value {
            FieldValue::Text(s) if s.is_empty() => self.placeholder.clone().unwrap_or_default(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::Switch(true) => "[x] On".to_string(),
            FieldValue::Switch(false) => "[ ] Off".to_string(),
        }
    }

    /// True when the value is empty and the placeholder is shown instead
    pub fn shows_placeholder(&self) -> bool {
        matches!(&self.value, FieldValue::Text(s) if s.is_empty()) && self.placeholder.is_some()
    }
}

/// Build the editable fields of the setup form. The security check is not
/// an editable field and is rendered separately.
pub fn setup_fields(state: &SetupFormState, messages: &Messages) -> Vec<FormField> {
    let error_for = |field: FieldName| {
        state
            .visible_error(field)
            .map(|err| messages.format(err.message_key()))
    };

    let mut fields = vec![FormField::text_input(
        FieldName::Email,
        messages.format("form.yourEmail"),
        messages.format("form.email.placeholder"),
        &state.values.email,
    )
    .with_error(error_for(FieldName::Email))];

    if state.consent_visible {
        fields.push(
            FormField::switch(
                FieldName::AnonymousDataCollection,
                messages.format("preferences.anonymizeUsage"),
                messages.format("preferences.collectData"),
                state.values.anonymous_data_collection.unwrap_or(false),
            )
            .with_error(error_for(FieldName::AnonymousDataCollection)),
        );
    }

    fields
}
