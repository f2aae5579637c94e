// DRE Check - Core Library
// Validates and normalizes profit-and-loss (DRE) payloads before anything downstream trusts them

pub mod error;
pub mod currency;
pub mod period;
pub mod money;      // Sign classification + locale-ambiguous amount parsing
pub mod document;
pub mod attributes; // Field catalog driving the validator
pub mod schema;     // SchemaValidator
pub mod normalizer; // MoneyNormalizer
pub mod pipeline;

// Re-export commonly used types
pub use error::{
    NormalizationFailure, NormalizationWarning, NormalizationWarningCode,
    ValidationError, ValidationErrorCode,
};
pub use currency::{CurrencyOracle, CurrencyTable, Iso4217};
pub use period::{is_valid_periodo, Periodo};
pub use money::{parse_monetary, DecimalSeparator, MoneyParseError, ValueSign};
pub use document::{
    AccountEntryInput, DreInput, Grupo, NormalizedDocument, NormalizedEntry, RawValor,
};
pub use attributes::{AttributeDefinition, AttributeRegistry, AttributeType, ValidationRule};
pub use schema::{SchemaValidator, ValidationResult};
pub use normalizer::{MoneyNormalizer, NormalizationResult};
pub use pipeline::DrePipeline;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Validate a raw payload against the built-in ISO-4217 table
pub fn validate(raw: &serde_json::Value) -> ValidationResult {
    SchemaValidator::new().validate(raw)
}

/// Normalize a structurally valid payload against the built-in ISO-4217 table
pub fn normalize(raw: &serde_json::Value) -> Result<NormalizationResult, NormalizationFailure> {
    MoneyNormalizer::new().normalize_value(raw)
}
