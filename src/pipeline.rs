// 🔗 DRE Pipeline - validate, then normalize
// The sequence every caller is expected to follow, packaged as one call

use crate::currency::{CurrencyOracle, Iso4217};
use crate::document::DreInput;
use crate::error::{NormalizationFailure, ValidationError, ValidationErrorCode};
use crate::normalizer::{MoneyNormalizer, NormalizationResult};
use crate::schema::{SchemaValidator, ValidationResult};
use serde_json::Value;
use std::sync::Arc;

/// Validator and normalizer sharing one currency oracle
#[derive(Clone)]
pub struct DrePipeline {
    validator: SchemaValidator,
    normalizer: MoneyNormalizer,
}

impl DrePipeline {
    pub fn new() -> Self {
        Self::with_oracle(Arc::new(Iso4217))
    }

    pub fn with_oracle(currencies: Arc<dyn CurrencyOracle>) -> Self {
        DrePipeline {
            validator: SchemaValidator::with_oracle(Arc::clone(&currencies)),
            normalizer: MoneyNormalizer::with_oracle(currencies),
        }
    }

    pub fn validate(&self, raw: &Value) -> ValidationResult {
        self.validator.validate(raw)
    }

    /// Validate, and only if that passes, normalize. Validator errors are
    /// returned as the failure; the normalizer never sees an invalid shape.
    pub fn process(&self, raw: &Value) -> Result<NormalizationResult, NormalizationFailure> {
        self.validator
            .validate(raw)
            .into_result()
            .map_err(NormalizationFailure::new)?;

        // The validator accepted the shape, so this only fails on an internal mismatch
        let input = DreInput::from_value(raw).map_err(|e| {
            NormalizationFailure::new(vec![ValidationError::new(
                "root",
                ValidationErrorCode::InvalidType,
                format!("Documento DRE ilegível: {}.", e),
            )])
        })?;

        self.normalizer.normalize(&input)
    }
}

impl Default for DrePipeline {
    fn default() -> Self {
        Self::new()
    }
}
