//! Per-field validators for the setup form
//!
//! Each validator is a pure function over one field's value. [`validate`]
//! composes them into a [`ValidationResult`] keyed by field.

use super::setup_form::{SecurityCheckStatus, SetupFormValues};
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$").expect("valid hardcoded regex")
});

/// Fields of the setup form, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldName {
    Email,
    AnonymousDataCollection,
    SecurityCheck,
}

impl FieldName {
    /// Wire name of the field (matches the serialized form values)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::AnonymousDataCollection => "anonymousDataCollection",
            Self::SecurityCheck => "securityCheck",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single field failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("field must not be empty")]
    Empty,
    #[error("not a valid email address")]
    Format,
    #[error("field is required")]
    Required,
    #[error("value is not one of the allowed choices")]
    InvalidChoice,
}

impl FieldError {
    /// Message catalogue key used to display this error
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::Empty | Self::Required => "form.empty.error",
            Self::Format => "form.email.error",
            Self::InvalidChoice => "form.invalidChoice.error",
        }
    }
}

/// Outcome of validating a full set of form values.
///
/// Holds at most one error per field; empty means the values are valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: BTreeMap<FieldName, FieldError>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: FieldName) -> Option<FieldError> {
        self.errors.get(&field).copied()
    }

    fn record(&mut self, field: FieldName, result: Result<(), FieldError>) {
        if let Err(err) = result {
            self.errors.insert(field, err);
        }
    }
}

pub fn validate_email(email: &str) -> Result<(), FieldError> {
    if email.trim().is_empty() {
        return Err(FieldError::Empty);
    }
    if !EMAIL_RE.is_match(email) {
        return Err(FieldError::Format);
    }
    Ok(())
}

pub fn validate_anonymous_data_collection(value: Option<bool>) -> Result<(), FieldError> {
    value.map(|_| ()).ok_or(FieldError::Required)
}

/// Loading and Failed are legal states for the field but never submittable.
pub fn validate_security_check(status: Option<SecurityCheckStatus>) -> Result<(), FieldError> {
    match status {
        None => Err(FieldError::Required),
        Some(s) if s.is_submittable() => Ok(()),
        Some(_) => Err(FieldError::InvalidChoice),
    }
}

/// Run every field validator against `values`
pub fn validate(values: &SetupFormValues) -> ValidationResult {
    let mut result = ValidationResult::default();
    result.record(FieldName::Email, validate_email(&values.email));
    result.record(
        FieldName::AnonymousDataCollection,
        validate_anonymous_data_collection(values.anonymous_data_collection),
    );
    result.record(
        FieldName::SecurityCheck,
        validate_security_check(values.security_check),
    );
    result
}
