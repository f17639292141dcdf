//! Error types for configuration validation

use thiserror::Error;

/// Aggregated configuration problems
///
/// Validation never stops at the first problem: every issue found in the
/// document is collected so the user can fix them in one pass.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} configuration issue(s):\n  - {}", .issues.len(), .issues.join("\n  - "))]
pub struct ConfigError {
    pub issues: Vec<String>,
}

impl ConfigError {
    pub fn new(issues: Vec<String>) -> Self {
        Self { issues }
    }

    /// Convert a list of issues into a result, `Ok` when the list is empty
    pub fn check(issues: Vec<String>) -> Result<(), Self> {
        if issues.is_empty() {
            Ok(())
        } else {
            Err(Self::new(issues))
        }
    }
}

/// Invalid `schedule` value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "invalid schedule '{value}': {reason} (expected 'On trigger', 'Continuous' or a cron expression; values are case sensitive)"
)]
pub struct ScheduleError {
    pub value: String,
    pub reason: String,
}

/// Problems with a naming pattern
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// Unbalanced or empty placeholder braces
    #[error("malformed naming pattern '{pattern}': {reason}")]
    Malformed { pattern: String, reason: String },

    /// Placeholders with no matching metadata key
    #[error("metadata is missing key(s) required by the naming pattern: {}", .keys.join(", "))]
    MissingKeys { keys: Vec<String> },
}
