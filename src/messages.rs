//! Message catalogue for user-facing strings

use std::collections::HashMap;

/// Built-in English catalogue
const DEFAULT_MESSAGES: &[(&str, &str)] = &[
    ("setupForm.title", "Set up your workspace"),
    ("setupForm.submit", "Continue"),
    ("setupForm.submitting", "Submitting..."),
    ("setupForm.complete", "Workspace {workspaceId} is ready."),
    ("form.yourEmail", "Your email"),
    ("form.email.placeholder", "you@company.com"),
    ("form.email.error", "Invalid email"),
    ("form.empty.error", "Required"),
    (
        "form.invalidChoice.error",
        "Finish or acknowledge the security check",
    ),
    ("preferences.anonymizeUsage", "Anonymize usage data collection"),
    (
        "preferences.collectData",
        "We collect usage data to improve the product. Switch on to anonymize it.",
    ),
    ("setupForm.securityCheck.title", "Security check"),
    (
        "setupForm.securityCheck.loading",
        "Checking whether your deployment is exposed...",
    ),
    (
        "setupForm.securityCheck.checkFailed",
        "Could not verify deployment security. You may continue.",
    ),
    (
        "setupForm.securityCheck.succeeded",
        "Your deployment is not publicly reachable.",
    ),
    (
        "setupForm.securityCheck.ignored",
        "Security risk acknowledged.",
    ),
    (
        "setupForm.securityCheck.failed",
        "Your deployment at {host} appears to be publicly reachable.",
    ),
    ("setupForm.securityCheck.unknownHost", "this deployment"),
    (
        "setupForm.securityCheck.acknowledge",
        "Press 'a' to acknowledge the risk and continue",
    ),
];

/// Localized string lookup with `{name}` interpolation
#[derive(Debug, Clone)]
pub struct Messages {
    entries: HashMap<String, String>,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            entries: DEFAULT_MESSAGES
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl Messages {
    /// Built-in catalogue with `overrides` layered on top
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut messages = Self::default();
        messages
            .entries
            .extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        messages
    }

    /// Look up `key`; unknown keys render as the key itself
    pub fn format(&self, key: &str) -> String {
        match self.entries.get(key) {
            Some(message) => message.clone(),
            None => {
                tracing::debug!("Missing message for key {key}");
                key.to_string()
            }
        }
    }

    /// Look up `key` and replace each `{name}` with its value
    pub fn format_with(&self, key: &str, values: &[(&str, &str)]) -> String {
        values
            .iter()
            .fold(self.format(key), |message, (name, value)| {
                message.replace(&format!("{{{name}}}"), value)
            })
    }
}
