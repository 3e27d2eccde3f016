//! Analysis contract violations.

use thiserror::Error;

use crate::domain::foundation::ValidationError;

/// A provider reply that does not satisfy the response schema.
///
/// # Security
///
/// Variants carry raw values for logs. Use `to_client_message()` when the
/// error leaves the engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContractError {
    #[error("Provider returned an empty response")]
    EmptyResponse,

    #[error("Provider response is not valid JSON: {reason}")]
    MalformedJson { reason: String },

    #[error("Missing required field: {field}")]
    MissingRequired { field: String },

    #[error("Invalid type for field {field}: expected {expected}, got {actual}")]
    InvalidType {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("Array length for field {field} must be between {min} and {max}, got {actual}")]
    ArrayLength {
        field: String,
        min: usize,
        max: usize,
        actual: usize,
    },

    #[error("Value out of range for field {field}: {value} not in [{min}, {max}]")]
    OutOfRange {
        field: String,
        value: String,
        min: i64,
        max: i64,
    },

    #[error("Invalid value for field {field}: {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Contract violations: {0:?}")]
    Multiple(Vec<ContractError>),
}

impl ContractError {
    pub fn missing(field: impl Into<String>) -> Self {
        ContractError::MissingRequired {
            field: field.into(),
        }
    }

    pub fn invalid_type(
        field: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        ContractError::InvalidType {
            field: field.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ContractError::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Folds collected violations into one error, `None` when there are none.
    pub fn from_violations(mut errors: Vec<ContractError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(ContractError::Multiple(errors)),
        }
    }

    /// Convert to client-safe error message.
    pub fn to_client_message(&self) -> String {
        match self {
            ContractError::EmptyResponse => "The analysis service returned nothing".to_string(),
            ContractError::MalformedJson { .. } => {
                "The analysis service returned an unreadable response".to_string()
            }
            ContractError::MissingRequired { field } => {
                format!("Analysis is missing required field '{}'", field)
            }
            ContractError::InvalidType { field, expected, .. } => {
                format!("Analysis field '{}' must be {}", field, expected)
            }
            ContractError::ArrayLength { field, min, max, .. } => {
                format!("Analysis field '{}' must hold {} to {} items", field, min, max)
            }
            ContractError::OutOfRange { field, min, max, .. } => {
                format!("Analysis field '{}' must be between {} and {}", field, min, max)
            }
            ContractError::InvalidValue { field, .. } => {
                format!("Analysis field '{}' has an invalid value", field)
            }
            ContractError::Multiple(errors) => errors
                .first()
                .map(|e| e.to_client_message())
                .unwrap_or_else(|| "Analysis failed validation".to_string()),
        }
    }

    /// Number of individual violations.
    pub fn violation_count(&self) -> usize {
        match self {
            ContractError::Multiple(errors) => errors.iter().map(Self::violation_count).sum(),
            _ => 1,
        }
    }

    /// Returns true when the named field is among the violations.
    pub fn concerns(&self, name: &str) -> bool {
        match self {
            ContractError::MissingRequired { field }
            | ContractError::InvalidType { field, .. }
            | ContractError::ArrayLength { field, .. }
            | ContractError::OutOfRange { field, .. }
            | ContractError::InvalidValue { field, .. } => field == name,
            ContractError::Multiple(errors) => errors.iter().any(|e| e.concerns(name)),
            ContractError::EmptyResponse | ContractError::MalformedJson { .. } => false,
        }
    }
}

impl From<ValidationError> for ContractError {
    fn from(err: ValidationError) -> Self {
        ContractError::invalid_value(err.field().to_string(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_violation_is_not_wrapped() {
        let err = ContractError::from_violations(vec![ContractError::missing("summary")]).unwrap();
        assert_eq!(err, ContractError::missing("summary"));
        assert!(ContractError::from_violations(Vec::new()).is_none());
    }

    #[test]
    fn several_violations_become_multiple() {
        let err = ContractError::from_violations(vec![
            ContractError::missing("summary"),
            ContractError::missing("biases"),
        ])
        .unwrap();
        assert_eq!(err.violation_count(), 2);
        assert!(err.concerns("biases"));
        assert!(!err.concerns("simulations"));
    }

    #[test]
    fn client_message_hides_raw_values() {
        let err = ContractError::OutOfRange {
            field: "clarityScore".into(),
            value: "150".into(),
            min: 0,
            max: 100,
        };
        let msg = err.to_client_message();
        assert!(msg.contains("clarityScore"));
        assert!(!msg.contains("150"));
    }

    #[test]
    fn malformed_json_message_omits_parser_detail() {
        let err = ContractError::MalformedJson {
            reason: "expected value at line 1 column 1".into(),
        };
        assert!(!err.to_client_message().contains("line 1"));
    }
}
