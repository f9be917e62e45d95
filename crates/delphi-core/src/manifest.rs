//! Definition-time validation reporting.
//!
//! Definition problems (missing names, missing actions, invalid types) are
//! collected into a [`ManifestErrors`] aggregate keyed by the offending
//! definition, and surfaced at schema-validation time. They never abort
//! request handling on their own.

use indexmap::IndexMap;
use serde::Serialize;

/// A single coded problem attached to a definition.
#[derive(Debug, Clone, Serialize)]
pub struct ManifestIssue {
    /// Machine-readable issue code, e.g. `MissingAction`.
    pub code: String,
    /// Human-readable explanation.
    pub message: String,
}

/// An aggregate report of definition-time problems.
///
/// Issues are keyed by a subject string of the form `kind:id`
/// (e.g. `endpoint:create_user`).
#[derive(Debug, Default)]
pub struct ManifestErrors {
    entries: IndexMap<String, Vec<ManifestIssue>>,
}

impl ManifestErrors {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an issue against a subject.
    pub fn add(
        &mut self,
        subject: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.entries.entry(subject.into()).or_default().push(ManifestIssue {
            code: code.into(),
            message: message.into(),
        });
    }

    /// Returns the issues recorded against a subject.
    #[must_use]
    pub fn for_subject(&self, subject: &str) -> &[ManifestIssue] {
        self.entries.get(subject).map_or(&[], Vec::as_slice)
    }

    /// Returns the issue codes recorded against a subject.
    #[must_use]
    pub fn codes_for(&self, subject: &str) -> Vec<&str> {
        self.for_subject(subject)
            .iter()
            .map(|issue| issue.code.as_str())
            .collect()
    }

    /// Returns `true` if no issues have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of subjects with issues.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over `(subject, issues)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ManifestIssue])> {
        self.entries
            .iter()
            .map(|(subject, issues)| (subject.as_str(), issues.as_slice()))
    }
}

/// Returns whether a name is a valid definition identifier.
///
/// Identifiers are snake_case: a lowercase letter or underscore followed by
/// lowercase letters, digits and underscores.
#[must_use]
pub fn valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_lowercase() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report() {
        let errors = ManifestErrors::new();
        assert!(errors.is_empty());
        assert!(errors.for_subject("endpoint:test").is_empty());
    }

    #[test]
    fn test_add_and_lookup() {
        let mut errors = ManifestErrors::new();
        errors.add("endpoint:test", "MissingAction", "an action must be defined");
        errors.add("endpoint:test", "MissingName", "a name must be defined");
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.codes_for("endpoint:test"),
            vec!["MissingAction", "MissingName"]
        );
    }

    #[test]
    fn test_valid_names() {
        assert!(valid_name("name"));
        assert!(valid_name("_private"));
        assert!(valid_name("name_2"));
        assert!(!valid_name(""));
        assert!(!valid_name("Name"));
        assert!(!valid_name("invalid+name"));
        assert!(!valid_name("2fast"));
    }
}
