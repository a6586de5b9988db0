//! Error types for build descriptor loading.

use builddesc_core::error::{Error, ErrorCode};
use thiserror::Error;

/// Result type alias for descriptor operations.
pub type Result<T> = std::result::Result<T, DescriptorError>;

/// Errors that can occur while loading a build descriptor.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// Malformed input
    #[error("Parse error at line {line}, column {column}: {message}")]
    Parse {
        /// 1-based line
        line: usize,
        /// 1-based column
        column: usize,
        /// What went wrong
        message: String,
    },

    /// A semantic rule is broken
    #[error("Constraint violation on {field}: {message}")]
    ConstraintViolation {
        /// Offending field
        field: String,
        /// Which rule failed
        message: String,
    },

    /// A signing config or symbol reference does not resolve
    #[error("Unresolved {kind} reference '{name}'{}", format_available(.available))]
    UnresolvedReference {
        /// What kind of thing was referenced, e.g. `signing config`
        kind: String,
        /// The dangling name
        name: String,
        /// Names that would have resolved
        available: Vec<String>,
    },

    /// The same package is declared twice
    #[error("Duplicate dependency '{package}' declared again in '{configuration}'")]
    DuplicateDependency {
        /// Configuration of the repeated declaration, e.g. `api`
        configuration: String,
        /// `group:artifact`
        package: String,
    },

    /// Loader configuration could not be read
    #[error("Loader configuration error: {0}")]
    Config(#[from] Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_available(available: &[String]) -> String {
    if available.is_empty() {
        String::new()
    } else {
        format!(" (defined: {})", available.join(", "))
    }
}

impl DescriptorError {
    pub(crate) fn parse(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            column,
            message: message.into(),
        }
    }

    pub(crate) fn constraint(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// The matching core error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Parse { .. } => ErrorCode::ParseError,
            Self::ConstraintViolation { .. } => ErrorCode::ConstraintViolation,
            Self::UnresolvedReference { .. } => ErrorCode::UnresolvedReference,
            Self::DuplicateDependency { .. } => ErrorCode::DuplicateDependency,
            Self::Config(err) => err.code,
            Self::Io(_) => ErrorCode::IoError,
        }
    }
}

impl From<DescriptorError> for Error {
    fn from(err: DescriptorError) -> Self {
        let code = err.code();
        let suggestion = match &err {
            DescriptorError::ConstraintViolation { .. } => {
                Some("Adjust the value in android/app/build.gradle.kts")
            }
            DescriptorError::UnresolvedReference { .. } => {
                Some("Declare the signing config under android.signingConfigs or reference an existing one")
            }
            DescriptorError::DuplicateDependency { .. } => {
                Some("Remove the repeated dependency declaration")
            }
            _ => None,
        };

        match err {
            DescriptorError::Config(inner) => inner,
            other => {
                let error = Error::new(code, other.to_string());
                match suggestion {
                    Some(s) => error.with_suggestion(s),
                    None => error,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_lists_available() {
        let err = DescriptorError::UnresolvedReference {
            kind: "signing config".to_string(),
            name: "release".to_string(),
            available: vec!["debug".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Unresolved signing config reference 'release' (defined: debug)"
        );
    }

    #[test]
    fn test_into_core_error_keeps_code() {
        let err: Error = DescriptorError::DuplicateDependency {
            configuration: "implementation".to_string(),
            package: "com.example:lib".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::DuplicateDependency);
        assert!(err.suggestion.is_some());
    }

    #[test]
    fn test_parse_error_display() {
        let err = DescriptorError::parse(3, 14, "expected ')'");
        assert_eq!(err.to_string(), "Parse error at line 3, column 14: expected ')'");
        assert_eq!(err.code(), ErrorCode::ParseError);
    }
}
