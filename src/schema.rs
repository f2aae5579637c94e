// 📐 Shape Layer - Schema Validation
// Checks an untyped DRE payload for structural and sign-policy violations

use crate::attributes::AttributeRegistry;
use crate::currency::{CurrencyOracle, Iso4217};
use crate::document::{Grupo, RawValor};
use crate::error::{ValidationError, ValidationErrorCode};
use crate::money::ValueSign;
use crate::period::is_valid_periodo;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

// ============================================================================
// VALIDATION RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub ok: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<ValidationError>) -> Self {
        ValidationResult {
            ok: errors.is_empty(),
            errors,
        }
    }

    pub fn into_result(self) -> Result<(), Vec<ValidationError>> {
        if self.ok {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

// ============================================================================
// SCHEMA VALIDATOR
// ============================================================================

/// Stateless checker; one instance can serve any number of threads
#[derive(Clone)]
pub struct SchemaValidator {
    root: AttributeRegistry,
    entry: AttributeRegistry,
    currencies: Arc<dyn CurrencyOracle>,
}

impl SchemaValidator {
    /// Validator backed by the built-in ISO-4217 table
    pub fn new() -> Self {
        Self::with_oracle(Arc::new(Iso4217))
    }

    pub fn with_oracle(currencies: Arc<dyn CurrencyOracle>) -> Self {
        SchemaValidator {
            root: AttributeRegistry::dre_root(),
            entry: AttributeRegistry::dre_entry(),
            currencies,
        }
    }

    /// Validate a raw DRE payload. Never fails: problems come back in the result.
    ///
    /// Order is fixed: root extra fields, root required fields (declared order),
    /// `schemaVersion`, `periodo` format, `moeda` format, then each `porConta`
    /// entry in array order.
    pub fn validate(&self, raw: &Value) -> ValidationResult {
        let Some(data) = raw.as_object() else {
            return ValidationResult::from_errors(vec![ValidationError::new(
                "root",
                ValidationErrorCode::InvalidType,
                "Estrutura raiz inválida: esperado objeto JSON.",
            )]);
        };

        let mut errors = Vec::new();

        for key in data.keys() {
            if !self.root.allows(key) {
                errors.push(ValidationError::new(
                    key.as_str(),
                    ValidationErrorCode::ExtraField,
                    format!("Campo não suportado na raiz: \"{}\". Remova para continuar.", key),
                ));
            }
        }

        // Shape failures on totais/porConta are reported here, once
        for attr in self.root.required() {
            match data.get(&attr.name) {
                None => errors.push(ValidationError::new(
                    attr.name.as_str(),
                    ValidationErrorCode::MissingField,
                    format!("Campo obrigatório ausente: \"{}\".", attr.name),
                )),
                Some(value) if !attr.accepts(value) => errors.push(ValidationError::new(
                    attr.name.as_str(),
                    attr.mismatch_code(),
                    attr.mismatch_message(),
                )),
                Some(_) => {}
            }
        }

        if let (Some(value), Some(attr)) = (data.get("schemaVersion"), self.root.get("schemaVersion")) {
            if !attr.accepts(value) {
                errors.push(ValidationError::new(
                    "schemaVersion",
                    ValidationErrorCode::InvalidType,
                    "Campo opcional \"schemaVersion\" deve ser numérico.",
                ));
            }
        }

        if let Some(periodo) = data.get("periodo").and_then(Value::as_str) {
            if !is_valid_periodo(periodo) {
                errors.push(ValidationError::new(
                    "periodo",
                    ValidationErrorCode::InvalidFormat,
                    "Formato inválido para \"periodo\"; utilize \"YYYY-MM\".",
                ));
            }
        }

        if let Some(moeda) = data.get("moeda").and_then(Value::as_str) {
            if let Some(error) = self.check_moeda(moeda) {
                errors.push(error);
            }
        }

        // A wrong-kind `totais`/`porConta` is reported here a second time, after the
        // required-field pass already flagged it
        if let Some(totais) = data.get("totais") {
            if !totais.is_object() {
                errors.push(ValidationError::new(
                    "totais",
                    ValidationErrorCode::InvalidType,
                    "Campo \"totais\" deve ser um objeto com valores numéricos.",
                ));
            }
        }

        let entry_count = data.get("porConta").and_then(Value::as_array).map_or(0, Vec::len);
        match data.get("porConta") {
            Some(Value::Array(entries)) => {
                for (index, entry) in entries.iter().enumerate() {
                    self.validate_entry(entry, index, &mut errors);
                }
            }
            Some(_) => errors.push(ValidationError::new(
                "porConta",
                ValidationErrorCode::InvalidType,
                "Campo \"porConta\" deve ser uma lista de lançamentos.",
            )),
            None => {}
        }

        debug!(
            entries = entry_count,
            errors = errors.len(),
            "DRE schema validation finished"
        );

        ValidationResult::from_errors(errors)
    }

    /// Three ASCII letters, known to the oracle once uppercased.
    /// Unknown codes share `invalid_format` with malformed ones at this layer.
    fn check_moeda(&self, moeda: &str) -> Option<ValidationError> {
        let well_formed = moeda.len() == 3 && moeda.chars().all(|c| c.is_ascii_alphabetic());
        if !well_formed {
            return Some(ValidationError::new(
                "moeda",
                ValidationErrorCode::InvalidFormat,
                "Código de moeda inválido; informe um ISO-4217 (ex.: \"BRL\").",
            ));
        }
        if !self.currencies.is_known(&moeda.to_ascii_uppercase()) {
            return Some(ValidationError::new(
                "moeda",
                ValidationErrorCode::InvalidFormat,
                format!("Moeda \"{}\" não consta na tabela ISO-4217.", moeda),
            ));
        }
        None
    }

    fn validate_entry(&self, entry: &Value, index: usize, errors: &mut Vec<ValidationError>) {
        let base = format!("porConta[{}]", index);

        let Some(record) = entry.as_object() else {
            errors.push(ValidationError::new(
                base.as_str(),
                ValidationErrorCode::InvalidType,
                format!(
                    "Entrada {} inválida: esperado objeto com {{ id, nome, grupo, valor }}.",
                    base
                ),
            ));
            return;
        };

        for key in record.keys() {
            if !self.entry.allows(key) {
                errors.push(ValidationError::new(
                    format!("{}.{}", base, key),
                    ValidationErrorCode::ExtraField,
                    format!("Campo não suportado em {}: \"{}\".", base, key),
                ));
            }
        }

        for attr in self.entry.required() {
            let path = format!("{}.{}", base, attr.name);
            match record.get(&attr.name) {
                None => errors.push(ValidationError::new(
                    path,
                    ValidationErrorCode::MissingField,
                    format!("Campo obrigatório ausente em {}: \"{}\".", base, attr.name),
                )),
                Some(value) if !attr.accepts(value) => {
                    errors.push(ValidationError::new(path, attr.mismatch_code(), attr.mismatch_message()))
                }
                Some(_) => {}
            }
        }

        // Gated inside: runs only for a known `grupo` and a number/string `valor`
        if let Some(error) = check_entry_sign(record, &base) {
            errors.push(error);
        }
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

/// Sign policy for one entry. Skipped unless `grupo` is one of the six names and
/// `valor` is a number or a string; any other shape was reported by the field checks.
fn check_entry_sign(record: &Map<String, Value>, base: &str) -> Option<ValidationError> {
    let grupo = match record.get("grupo") {
        Some(Value::String(name)) => Grupo::from_name(name)?,
        _ => return None,
    };
    let valor = match record.get("valor") {
        Some(value @ (Value::Number(_) | Value::String(_))) => RawValor::from_json(value)?,
        _ => return None,
    };

    let path = format!("{}.valor", base);
    let sign = valor.sign();

    if sign == ValueSign::Invalid {
        return Some(ValidationError::new(
            path,
            ValidationErrorCode::InvalidValue,
            format!(
                "Valor inválido em {}.valor; informe número ou string monetária com dígitos.",
                base
            ),
        ));
    }

    if grupo.allows(sign) {
        return None;
    }

    let expected = grupo.expected_sign().unwrap_or(sign);
    let expected = match expected {
        ValueSign::Positive => "positivos",
        _ => "negativos",
    };
    Some(ValidationError::new(
        path,
        ValidationErrorCode::InvalidValue,
        format!("Valores do grupo \"{}\" devem ser {} ou zero.", grupo, expected),
    ))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::CurrencyTable;
    use serde_json::json;

    fn create_valid_input() -> Value {
        json!({
            "schemaVersion": 1,
            "periodo": "2025-01",
            "moeda": "BRL",
            "totais": {
                "receitaBruta": 100000,
                "deducoes": 10000
            },
            "porConta": [
                {"id": "R1", "nome": "Receita A", "grupo": "receita", "valor": 100000},
                {"id": "D1", "nome": "Imposto", "grupo": "deducao", "valor": -10000},
                {"id": "C1", "nome": "Custo", "grupo": "custo", "valor": -20000},
                {"id": "E1", "nome": "Marketing", "grupo": "despesa", "valor": -5000},
                {"id": "O1", "nome": "Outras receitas/despesas", "grupo": "outras", "valor": 2000},
                {"id": "I1", "nome": "IR", "grupo": "imposto", "valor": -3000}
            ]
        })
    }

    fn codes(result: &ValidationResult) -> Vec<(&str, ValidationErrorCode)> {
        result.errors.iter().map(|e| (e.path.as_str(), e.code)).collect()
    }

    #[test]
    fn test_valid_payload() {
        let validator = SchemaValidator::new();
        let result = validator.validate(&create_valid_input());

        assert!(result.ok);
        assert!(result.errors.is_empty());
        assert!(result.into_result().is_ok());
    }

    #[test]
    fn test_string_valor_with_consistent_sign() {
        let validator = SchemaValidator::new();
        let mut input = create_valid_input();
        input["porConta"][1]["valor"] = json!("R$ -10.000,00");

        assert!(validator.validate(&input).ok);
    }

    #[test]
    fn test_root_not_object() {
        let validator = SchemaValidator::new();

        for raw in [json!([]), json!("x"), json!(null), json!(42)] {
            let result = validator.validate(&raw);
            assert!(!result.ok);
            assert_eq!(codes(&result), vec![("root", ValidationErrorCode::InvalidType)]);
        }
    }

    #[test]
    fn test_empty_object_reports_each_missing_field() {
        let validator = SchemaValidator::new();
        let result = validator.validate(&json!({}));

        assert_eq!(
            codes(&result),
            vec![
                ("periodo", ValidationErrorCode::MissingField),
                ("moeda", ValidationErrorCode::MissingField),
                ("totais", ValidationErrorCode::MissingField),
                ("porConta", ValidationErrorCode::MissingField),
            ]
        );
    }

    #[test]
    fn test_missing_moeda() {
        let validator = SchemaValidator::new();
        let mut input = create_valid_input();
        input.as_object_mut().unwrap().remove("moeda");

        let result = validator.validate(&input);
        assert_eq!(codes(&result), vec![("moeda", ValidationErrorCode::MissingField)]);
    }

    #[test]
    fn test_wrong_root_types() {
        let validator = SchemaValidator::new();
        let mut input = create_valid_input();
        input["periodo"] = json!(202501);
        input["totais"] = json!([]);
        input["schemaVersion"] = json!("1");

        let result = validator.validate(&input);
        assert_eq!(
            codes(&result),
            vec![
                ("periodo", ValidationErrorCode::InvalidType),
                ("totais", ValidationErrorCode::InvalidType),
                ("schemaVersion", ValidationErrorCode::InvalidType),
                ("totais", ValidationErrorCode::InvalidType),
            ]
        );
    }

    #[test]
    fn test_null_totais_reported_twice() {
        let validator = SchemaValidator::new();
        let mut input = create_valid_input();
        input["totais"] = Value::Null;

        let result = validator.validate(&input);
        assert_eq!(
            codes(&result),
            vec![
                ("totais", ValidationErrorCode::InvalidType),
                ("totais", ValidationErrorCode::InvalidType),
            ]
        );
    }

    #[test]
    fn test_periodo_format() {
        let validator = SchemaValidator::new();

        for bad in ["2025-13", "2025-00", "202501", "2025/01", " 2025-01"] {
            let mut input = create_valid_input();
            input["periodo"] = json!(bad);
            let result = validator.validate(&input);
            assert_eq!(
                codes(&result),
                vec![("periodo", ValidationErrorCode::InvalidFormat)],
                "periodo {:?}",
                bad
            );
        }

        let mut input = create_valid_input();
        input["periodo"] = json!("2025-01");
        assert!(validator.validate(&input).ok);
    }

    #[test]
    fn test_moeda_format_and_registry() {
        let validator = SchemaValidator::new();

        for bad in ["BR", "BRLL", "B1L", "XYZ"] {
            let mut input = create_valid_input();
            input["moeda"] = json!(bad);
            let result = validator.validate(&input);
            assert_eq!(
                codes(&result),
                vec![("moeda", ValidationErrorCode::InvalidFormat)],
                "moeda {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_moeda_lowercase_is_accepted() {
        let validator = SchemaValidator::new();
        let mut input = create_valid_input();
        input["moeda"] = json!("brl");

        assert!(validator.validate(&input).ok);
    }

    #[test]
    fn test_custom_currency_oracle() {
        let table = CurrencyTable::from_codes(["USD"]).unwrap();
        let validator = SchemaValidator::with_oracle(Arc::new(table));

        let result = validator.validate(&create_valid_input());
        assert_eq!(codes(&result), vec![("moeda", ValidationErrorCode::InvalidFormat)]);
    }

    #[test]
    fn test_invalid_grupo_is_enum_error() {
        let validator = SchemaValidator::new();
        let mut input = create_valid_input();
        input["porConta"][0]["grupo"] = json!("foo");

        let result = validator.validate(&input);
        assert_eq!(codes(&result), vec![("porConta[0].grupo", ValidationErrorCode::InvalidEnum)]);
    }

    #[test]
    fn test_sign_check_skipped_when_grupo_is_unknown() {
        let validator = SchemaValidator::new();
        let mut input = create_valid_input();
        input["porConta"][0]["grupo"] = json!("Receita");
        input["porConta"][0]["valor"] = json!(-500);

        let result = validator.validate(&input);
        assert_eq!(codes(&result), vec![("porConta[0].grupo", ValidationErrorCode::InvalidEnum)]);
    }

    #[test]
    fn test_receita_must_not_be_negative() {
        let validator = SchemaValidator::new();
        let mut input = create_valid_input();
        input["porConta"][0]["valor"] = json!(-1000);

        let result = validator.validate(&input);
        assert_eq!(codes(&result), vec![("porConta[0].valor", ValidationErrorCode::InvalidValue)]);
    }

    #[test]
    fn test_negative_groups_must_not_be_positive() {
        let validator = SchemaValidator::new();
        let mut input = create_valid_input();
        input["porConta"][1]["valor"] = json!(500);

        let result = validator.validate(&input);
        assert_eq!(codes(&result), vec![("porConta[1].valor", ValidationErrorCode::InvalidValue)]);

        let mut input = create_valid_input();
        input["porConta"][1]["valor"] = json!("10.000,00");
        let result = validator.validate(&input);
        assert_eq!(codes(&result), vec![("porConta[1].valor", ValidationErrorCode::InvalidValue)]);
    }

    #[test]
    fn test_outras_accepts_any_sign() {
        let validator = SchemaValidator::new();

        for valor in [json!(2000), json!(-2000), json!(0), json!("(1,00)"), json!("1,00")] {
            let mut input = create_valid_input();
            input["porConta"][4]["valor"] = valor.clone();
            assert!(validator.validate(&input).ok, "outras with {}", valor);
        }
    }

    #[test]
    fn test_zero_passes_every_group() {
        let validator = SchemaValidator::new();
        let mut input = create_valid_input();
        for i in 0..6 {
            input["porConta"][i]["valor"] = json!(0);
        }
        input["porConta"][0]["valor"] = json!("R$ 0,00");
        input["porConta"][1]["valor"] = json!("-0,00");

        assert!(validator.validate(&input).ok);
    }

    #[test]
    fn test_string_without_digits_is_invalid_value() {
        let validator = SchemaValidator::new();
        let mut input = create_valid_input();
        input["porConta"][2]["valor"] = json!("R$ -");

        let result = validator.validate(&input);
        assert_eq!(codes(&result), vec![("porConta[2].valor", ValidationErrorCode::InvalidValue)]);
    }

    #[test]
    fn test_extra_fields_root_and_entry() {
        let validator = SchemaValidator::new();
        let mut input = create_valid_input();
        input["extra"] = json!(true);
        input["porConta"][0]["extra"] = json!("x");

        let result = validator.validate(&input);
        assert_eq!(
            codes(&result),
            vec![
                ("extra", ValidationErrorCode::ExtraField),
                ("porConta[0].extra", ValidationErrorCode::ExtraField),
            ]
        );
    }

    #[test]
    fn test_extra_fields_reported_alongside_other_errors() {
        let validator = SchemaValidator::new();
        let input = json!({
            "bogus": 1,
            "periodo": "2025-13",
            "porConta": [{"id": "", "grupo": "receita", "valor": -5, "note": "x"}]
        });

        let result = validator.validate(&input);
        assert_eq!(
            codes(&result),
            vec![
                ("bogus", ValidationErrorCode::ExtraField),
                ("moeda", ValidationErrorCode::MissingField),
                ("totais", ValidationErrorCode::MissingField),
                ("periodo", ValidationErrorCode::InvalidFormat),
                ("porConta[0].note", ValidationErrorCode::ExtraField),
                ("porConta[0].id", ValidationErrorCode::InvalidType),
                ("porConta[0].nome", ValidationErrorCode::MissingField),
                ("porConta[0].valor", ValidationErrorCode::InvalidValue),
            ]
        );
    }

    #[test]
    fn test_por_conta_not_array() {
        let validator = SchemaValidator::new();
        let mut input = create_valid_input();
        input["porConta"] = json!({});

        let result = validator.validate(&input);
        assert_eq!(
            codes(&result),
            vec![
                ("porConta", ValidationErrorCode::InvalidType),
                ("porConta", ValidationErrorCode::InvalidType),
            ]
        );
        assert_eq!(result.errors[1].message, "Campo \"porConta\" deve ser uma lista de lançamentos.");
    }

    #[test]
    fn test_entry_not_object() {
        let validator = SchemaValidator::new();
        let mut input = create_valid_input();
        input["porConta"][3] = json!("linha");

        let result = validator.validate(&input);
        assert_eq!(codes(&result), vec![("porConta[3]", ValidationErrorCode::InvalidType)]);
    }

    #[test]
    fn test_entry_missing_id() {
        let validator = SchemaValidator::new();
        let mut input = create_valid_input();
        input["porConta"][0].as_object_mut().unwrap().remove("id");

        let result = validator.validate(&input);
        assert_eq!(codes(&result), vec![("porConta[0].id", ValidationErrorCode::MissingField)]);
    }

    #[test]
    fn test_sign_check_skipped_when_valor_has_wrong_type() {
        let validator = SchemaValidator::new();
        let mut input = create_valid_input();
        input["porConta"][0]["valor"] = json!(true);

        let result = validator.validate(&input);
        assert_eq!(codes(&result), vec![("porConta[0].valor", ValidationErrorCode::InvalidType)]);
    }

    #[test]
    fn test_validation_does_not_mutate_input() {
        let validator = SchemaValidator::new();
        let mut input = create_valid_input();
        input["moeda"] = json!("brl");
        let before = input.clone();

        validator.validate(&input);
        assert_eq!(input, before);
    }
}
