// 🚨 Error & Warning Vocabulary
// Shared by the schema validator and the money normalizer so callers can render both the same way

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// VALIDATION ERRORS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationErrorCode {
    MissingField,
    InvalidType,
    InvalidFormat,
    InvalidEnum,
    InvalidValue,
    ExtraField,
}

impl ValidationErrorCode {
    /// Wire name, as serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationErrorCode::MissingField => "missing_field",
            ValidationErrorCode::InvalidType => "invalid_type",
            ValidationErrorCode::InvalidFormat => "invalid_format",
            ValidationErrorCode::InvalidEnum => "invalid_enum",
            ValidationErrorCode::InvalidValue => "invalid_value",
            ValidationErrorCode::ExtraField => "extra_field",
        }
    }
}

impl std::fmt::Display for ValidationErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One field-level problem.
///
/// `path` is dotted for nested objects and indexed for array elements,
/// e.g. `porConta[2].valor`. The whole-document case uses `root`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub path: String,
    pub code: ValidationErrorCode,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, code: ValidationErrorCode, message: impl Into<String>) -> Self {
        ValidationError {
            path: path.into(),
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.path, self.message)
    }
}

impl std::error::Error for ValidationError {}

// ============================================================================
// NORMALIZATION WARNINGS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationWarningCode {
    NormalizedValue,
    NormalizedPeriodo,
    NormalizedMoeda,
}

impl NormalizationWarningCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            NormalizationWarningCode::NormalizedValue => "normalized_value",
            NormalizationWarningCode::NormalizedPeriodo => "normalized_periodo",
            NormalizationWarningCode::NormalizedMoeda => "normalized_moeda",
        }
    }
}

impl std::fmt::Display for NormalizationWarningCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-fatal notice: the normalizer rewrote a value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationWarning {
    pub path: String,
    pub code: NormalizationWarningCode,
    pub message: String,
}

impl NormalizationWarning {
    pub fn new(
        path: impl Into<String>,
        code: NormalizationWarningCode,
        message: impl Into<String>,
    ) -> Self {
        NormalizationWarning {
            path: path.into(),
            code,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for NormalizationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.path, self.message)
    }
}

// ============================================================================
// NORMALIZATION FAILURE
// ============================================================================

/// Every error found across the whole document, bundled into one value.
/// No partial document travels with it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("normalization failed with {} error(s)", .errors.len())]
pub struct NormalizationFailure {
    pub errors: Vec<ValidationError>,
}

impl NormalizationFailure {
    pub fn new(errors: Vec<ValidationError>) -> Self {
        NormalizationFailure { errors }
    }

    /// Paths of all failing fields, in report order
    pub fn paths(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.path.as_str()).collect()
    }
}

// ============================================================================
// TESTS
// ============================================================================
