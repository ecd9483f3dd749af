//! Input validation
//!
//! Fluent validation for form input and configuration values. Every check
//! records a [`ValidationError`] instead of returning early, so a caller can
//! report all problems with a form at once.
//!
//! # Example
//!
//! ```rust
//! use streamlyne_core::validation::Validator;
//!
//! let result = Validator::new()
//!     .required("disease", "Cholera")
//!     .required("description", "")
//!     .validate();
//!
//! assert!(!result.is_valid());
//! assert_eq!(result.errors()[0].field, "description");
//! ```

use serde::{Deserialize, Serialize};

/// Validation error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Field that failed validation
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
    /// Expected value (if applicable)
    pub expected: Option<String>,
    /// Actual value (if applicable)
    pub actual: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validation result
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// Check if validation passed
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get all errors
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Whether any error concerns `field`
    pub fn has_error_for(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Add an error
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Merge another result into this one
    pub fn merge(&mut self, other: ValidationResult) {
        self.errors.extend(other.errors);
    }

    /// All error messages joined for display
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl std::fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.summary())
    }
}

/// Fluent validator builder
#[derive(Debug, Default)]
pub struct Validator {
    result: ValidationResult,
}

impl Validator {
    /// Create a new validator
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate that a field is not empty or whitespace
    #[must_use]
    pub fn required(mut self, field: &str, value: &str) -> Self {
        if value.trim().is_empty() {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: "Field is required".to_string(),
                code: "REQUIRED".to_string(),
                expected: Some("non-empty value".to_string()),
                actual: Some("empty".to_string()),
            });
        }
        self
    }

    /// Validate that an optional value is present
    #[must_use]
    pub fn present<T>(mut self, field: &str, value: Option<&T>, message: &str) -> Self {
        if value.is_none() {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: message.to_string(),
                code: "MISSING".to_string(),
                expected: None,
                actual: None,
            });
        }
        self
    }

    /// Validate a numeric range (inclusive)
    #[must_use]
    pub fn range<T: PartialOrd + std::fmt::Display>(
        mut self,
        field: &str,
        value: T,
        min: T,
        max: T,
    ) -> Self {
        if !(value >= min && value <= max) {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message: format!("Must be between {min} and {max}"),
                code: "RANGE".to_string(),
                expected: Some(format!("{min} - {max}")),
                actual: Some(value.to_string()),
            });
        }
        self
    }

    /// Add a custom validation
    #[must_use]
    pub fn custom<F>(mut self, field: &str, f: F) -> Self
    where
        F: FnOnce() -> Option<String>,
    {
        if let Some(message) = f() {
            self.result.add_error(ValidationError {
                field: field.to_string(),
                message,
                code: "CUSTOM".to_string(),
                expected: None,
                actual: None,
            });
        }
        self
    }

    /// Complete validation and return result
    pub fn validate(self) -> ValidationResult {
        self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_validation() {
        let result = Validator::new().required("review", "").validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "REQUIRED");
    }

    #[test]
    fn test_whitespace_is_empty() {
        let result = Validator::new().required("review", "  \n\t").validate();
        assert!(result.has_error_for("review"));
    }

    #[test]
    fn test_present_validation() {
        let session: Option<&str> = None;
        let result = Validator::new()
            .present("session", session.as_ref(), "You need to be logged in")
            .validate();
        assert_eq!(result.errors()[0].code, "MISSING");
        assert_eq!(result.to_string(), "session: You need to be logged in");
    }

    #[test]
    fn test_range_validation() {
        let result = Validator::new().range("k", 150, 1, 100).validate();
        assert!(!result.is_valid());
        assert_eq!(result.errors()[0].code, "RANGE");
    }

    #[test]
    fn test_range_rejects_nan() {
        let result = Validator::new().range("delta", f64::NAN, 0.0, 10.0).validate();
        assert!(!result.is_valid());
    }

    #[test]
    fn test_collects_every_error() {
        let result = Validator::new()
            .required("disease", "")
            .required("description", " ")
            .validate();
        assert_eq!(result.errors().len(), 2);
        assert!(result.summary().contains("disease"));
        assert!(result.summary().contains("description"));
    }

    #[test]
    fn test_merge_keeps_both_sides() {
        let mut result = Validator::new().required("disease", "").validate();
        result.merge(Validator::new().range("k", 0, 1, 100).validate());
        assert!(result.has_error_for("disease"));
        assert!(result.has_error_for("k"));
        assert_eq!(result.to_string(), "disease: Field is required; k: Must be between 1 and 100");
    }

    #[test]
    fn test_custom_validation() {
        let result = Validator::new()
            .custom("email", || Some("Please fill in both fields".to_string()))
            .validate();
        assert_eq!(result.errors()[0].code, "CUSTOM");
    }
}
