//! Validation issue collection
//!
//! Loaders stop on the first hard error, but they also collect non-fatal
//! issues (unknown keys, unsupported expressions) and, when asked for a full
//! audit, every rule violation at once.
//!
//! # Example
//!
//! ```rust
//! use builddesc_core::validation::{ValidationIssue, ValidationReport};
//!
//! let mut report = ValidationReport::new();
//! report.add_warning(ValidationIssue::new("android.lint", "Unknown key", "UNKNOWN_KEY").at_line(12));
//!
//! assert!(report.is_valid());
//! assert_eq!(report.warnings().len(), 1);
//! ```

use crate::error::{Error, ErrorCode, Result};
use serde::{Deserialize, Serialize};

/// Warning code for keys the loader ignores
pub const UNKNOWN_KEY: &str = "UNKNOWN_KEY";

/// Warning code for value expressions the loader cannot evaluate
pub const UNSUPPORTED_EXPR: &str = "UNSUPPORTED_EXPR";

/// A single validation finding
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// Dotted path of the offending field, e.g. `android.defaultConfig.minSdk`
    pub field: String,
    /// Human-readable message
    pub message: String,
    /// Machine-readable code
    pub code: String,
    /// 1-based source line, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
}

impl ValidationIssue {
    /// Create an issue without a source position
    pub fn new(field: impl Into<String>, message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code: code.into(),
            line: None,
        }
    }

    /// Attach a source line
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }
}

impl std::fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} (line {}): {}", self.field, line, self.message),
            None => write!(f, "{}: {}", self.field, self.message),
        }
    }
}

/// Validation result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    errors: Vec<ValidationIssue>,
    warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get all errors
    pub fn errors(&self) -> &[ValidationIssue] {
        &self.errors
    }

    /// Get all warnings
    pub fn warnings(&self) -> &[ValidationIssue] {
        &self.warnings
    }

    /// Add an error
    pub fn add_error(&mut self, error: ValidationIssue) {
        self.errors.push(error);
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: ValidationIssue) {
        self.warnings.push(warning);
    }

    /// Merge another report into this one
    pub fn merge(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    /// Convert to Result type
    pub fn to_result(&self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            let messages: Vec<String> = self.errors.iter().map(|e| e.to_string()).collect();
            Err(Error::new(
                ErrorCode::ValidationError,
                format!("Validation failed: {}", messages.join("; ")),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_is_valid() {
        let report = ValidationReport::new();
        assert!(report.is_valid());
        assert!(report.to_result().is_ok());
    }

    #[test]
    fn test_warnings_do_not_invalidate() {
        let mut report = ValidationReport::new();
        report.add_warning(ValidationIssue::new("android.lint", "Unknown key", UNKNOWN_KEY));
        assert!(report.is_valid());
        assert_eq!(report.warnings()[0].code, UNKNOWN_KEY);
    }

    #[test]
    fn test_errors_join_into_message() {
        let mut report = ValidationReport::new();
        report.add_error(ValidationIssue::new("minSdk", "below floor", "CONSTRAINT").at_line(4));
        report.add_error(ValidationIssue::new("applicationId", "missing", "CONSTRAINT"));

        let err = report.to_result().unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(err.message.contains("minSdk (line 4): below floor"));
        assert!(err.message.contains("applicationId: missing"));
    }

    #[test]
    fn test_merge() {
        let mut a = ValidationReport::new();
        a.add_warning(ValidationIssue::new("x", "w", UNSUPPORTED_EXPR));
        let mut b = ValidationReport::new();
        b.add_error(ValidationIssue::new("y", "e", "CONSTRAINT"));

        a.merge(b);
        assert!(!a.is_valid());
        assert_eq!(a.warnings().len(), 1);
        assert_eq!(a.errors().len(), 1);
    }
}
