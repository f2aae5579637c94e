// 🧮 Money Normalizer - canonical DRE output
// Re-parses periodo, moeda and every valor; either the whole document comes out clean or nothing does

use crate::currency::{CurrencyOracle, Iso4217};
use crate::document::{DreInput, NormalizedDocument, NormalizedEntry, RawValor};
use crate::error::{
    NormalizationFailure, NormalizationWarning, NormalizationWarningCode, ValidationError,
    ValidationErrorCode,
};
use crate::money::{parse_monetary, MoneyParseError};
use crate::period::is_valid_periodo;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// RESULT TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizationResult {
    pub data: NormalizedDocument,
    pub warnings: Vec<NormalizationWarning>,
}

/// A field value after normalization, plus whether it differs from the input
struct Normalized<T> {
    value: T,
    changed: bool,
}

// ============================================================================
// MONEY NORMALIZER
// ============================================================================

#[derive(Clone)]
pub struct MoneyNormalizer {
    currencies: Arc<dyn CurrencyOracle>,
}

impl MoneyNormalizer {
    pub fn new() -> Self {
        Self::with_oracle(Arc::new(Iso4217))
    }

    pub fn with_oracle(currencies: Arc<dyn CurrencyOracle>) -> Self {
        MoneyNormalizer { currencies }
    }

    /// Normalize a structurally valid document.
    ///
    /// Every failing field is collected before deciding; on any failure only the
    /// errors are returned. Warnings are emitted only for values actually rewritten.
    pub fn normalize(&self, input: &DreInput) -> Result<NormalizationResult, NormalizationFailure> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let periodo = match normalize_periodo(&input.periodo) {
            Ok(periodo) => {
                if periodo.changed {
                    warnings.push(NormalizationWarning::new(
                        "periodo",
                        NormalizationWarningCode::NormalizedPeriodo,
                        format!("Período ajustado para {}.", periodo.value),
                    ));
                }
                Some(periodo.value)
            }
            Err(error) => {
                errors.push(error);
                None
            }
        };

        let moeda = match self.normalize_moeda(&input.moeda) {
            Ok(moeda) => {
                if moeda.changed {
                    warnings.push(NormalizationWarning::new(
                        "moeda",
                        NormalizationWarningCode::NormalizedMoeda,
                        format!("Moeda normalizada para {}.", moeda.value),
                    ));
                }
                Some(moeda.value)
            }
            Err(error) => {
                errors.push(error);
                None
            }
        };

        let mut por_conta = Vec::with_capacity(input.por_conta.len());
        for (index, entry) in input.por_conta.iter().enumerate() {
            let path = format!("porConta[{}].valor", index);
            match normalize_valor(&entry.valor, &path) {
                Ok((valor, warning)) => {
                    warnings.extend(warning);
                    por_conta.push(NormalizedEntry {
                        id: entry.id.clone(),
                        nome: entry.nome.clone(),
                        grupo: entry.grupo,
                        valor,
                    });
                }
                Err(error) => errors.push(error),
            }
        }

        debug!(
            entries = input.por_conta.len(),
            errors = errors.len(),
            warnings = warnings.len(),
            "DRE normalization finished"
        );

        match (periodo, moeda) {
            (Some(periodo), Some(moeda)) if errors.is_empty() => Ok(NormalizationResult {
                data: NormalizedDocument {
                    schema_version: input.schema_version.clone(),
                    periodo,
                    moeda,
                    totais: input.totais.clone(),
                    por_conta,
                },
                warnings,
            }),
            _ => Err(NormalizationFailure::new(errors)),
        }
    }

    /// Read the payload as a [`DreInput`] first. A payload that does not have the
    /// DRE shape fails as a whole with `invalid_type` on `root`.
    pub fn normalize_value(&self, raw: &Value) -> Result<NormalizationResult, NormalizationFailure> {
        let input = DreInput::from_value(raw).map_err(|e| {
            NormalizationFailure::new(vec![ValidationError::new(
                "root",
                ValidationErrorCode::InvalidType,
                format!("Documento DRE ilegível: {}.", e),
            )])
        })?;
        self.normalize(&input)
    }

    fn normalize_moeda(&self, moeda: &str) -> Result<Normalized<String>, ValidationError> {
        let trimmed = moeda.trim();
        if trimmed.len() != 3 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ValidationError::new(
                "moeda",
                ValidationErrorCode::InvalidFormat,
                "Código de moeda inválido; informe um ISO-4217 (ex.: \"BRL\").",
            ));
        }

        let upper = trimmed.to_ascii_uppercase();
        if !self.currencies.is_known(&upper) {
            return Err(ValidationError::new(
                "moeda",
                ValidationErrorCode::InvalidEnum,
                format!("Moeda desconhecida \"{}\". Verifique o código ISO-4217.", trimmed),
            ));
        }

        Ok(Normalized {
            changed: upper != moeda,
            value: upper,
        })
    }
}

impl Default for MoneyNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_periodo(periodo: &str) -> Result<Normalized<String>, ValidationError> {
    let trimmed = periodo.trim();
    if !is_valid_periodo(trimmed) {
        return Err(ValidationError::new(
            "periodo",
            ValidationErrorCode::InvalidFormat,
            "Formato inválido para \"periodo\"; utilize \"YYYY-MM\".",
        ));
    }
    Ok(Normalized {
        value: trimmed.to_string(),
        changed: trimmed != periodo,
    })
}

/// Numbers pass through untouched; strings are parsed and always produce a warning
fn normalize_valor(
    valor: &RawValor,
    path: &str,
) -> Result<(f64, Option<NormalizationWarning>), ValidationError> {
    match valor {
        RawValor::Number(n) if n.is_finite() => Ok((*n, None)),
        RawValor::Number(_) => Err(ValidationError::new(
            path,
            ValidationErrorCode::InvalidValue,
            "Valor numérico inválido; informe número finito.",
        )),
        RawValor::Text(raw) => match parse_monetary(raw) {
            Ok(value) => Ok((
                value,
                Some(NormalizationWarning::new(
                    path,
                    NormalizationWarningCode::NormalizedValue,
                    format!("Valor monetário normalizado de \"{}\" para {:.2}.", raw, value),
                )),
            )),
            Err(MoneyParseError::Empty) => Err(ValidationError::new(
                path,
                ValidationErrorCode::InvalidValue,
                "Valor monetário vazio; informe dígitos numéricos.",
            )),
            Err(_) => Err(ValidationError::new(
                path,
                ValidationErrorCode::InvalidValue,
                format!("Não foi possível interpretar o valor monetário \"{}\".", raw),
            )),
        },
    }
}

// ============================================================================
// TESTS
// ============================================================================
