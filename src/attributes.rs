// 🏛️ Field Catalog - what a DRE payload may contain
// The validator reads allow-lists, required fields and shapes from here, in declared order

use crate::document::Grupo;
use crate::error::ValidationErrorCode;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// ATTRIBUTE TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AttributeType {
    String,
    Number,
    Object,
    Array,
    /// Number or locale-formatted monetary string
    Monetary,
}

impl AttributeType {
    /// Container/primitive kind check only
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            AttributeType::String => value.is_string(),
            AttributeType::Number => value.is_number(),
            AttributeType::Object => value.is_object(),
            AttributeType::Array => value.is_array(),
            AttributeType::Monetary => value.is_number() || value.is_string(),
        }
    }

    /// Label used in user-facing messages
    pub fn label(&self) -> &'static str {
        match self {
            AttributeType::String => "uma string",
            AttributeType::Number => "um número",
            AttributeType::Object => "um objeto",
            AttributeType::Array => "uma lista",
            AttributeType::Monetary => "número ou string monetária",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ValidationRule {
    Required,
    Optional,
    /// String must have non-whitespace content
    NonEmpty,
    /// String must be one of a closed set (exact match)
    OneOf(Vec<String>),
}

// ============================================================================
// ATTRIBUTE DEFINITION
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct AttributeDefinition {
    /// Wire name (e.g. "porConta")
    pub name: String,

    pub type_: AttributeType,

    pub description: String,

    pub validation_rules: Vec<ValidationRule>,

    pub examples: Vec<String>,
}

impl AttributeDefinition {
    pub fn new(name: impl Into<String>, type_: AttributeType) -> Self {
        AttributeDefinition {
            name: name.into(),
            type_,
            description: String::new(),
            validation_rules: Vec::new(),
            examples: Vec::new(),
        }
    }

    /// Builder: add description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Builder: add validation rule
    pub fn with_validation(mut self, rule: ValidationRule) -> Self {
        self.validation_rules.push(rule);
        self
    }

    /// Builder: add example
    pub fn with_example(mut self, example: impl Into<String>) -> Self {
        self.examples.push(example.into());
        self
    }

    pub fn is_required(&self) -> bool {
        self.validation_rules.contains(&ValidationRule::Required)
    }

    fn allowed_values(&self) -> Option<&[String]> {
        self.validation_rules.iter().find_map(|rule| match rule {
            ValidationRule::OneOf(values) => Some(values.as_slice()),
            _ => None,
        })
    }

    /// Shape check: kind plus the value-level rules (non-empty, closed set)
    pub fn accepts(&self, value: &Value) -> bool {
        if !self.type_.matches(value) {
            return false;
        }
        self.validation_rules.iter().all(|rule| match rule {
            ValidationRule::NonEmpty => value.as_str().map_or(false, |s| !s.trim().is_empty()),
            ValidationRule::OneOf(values) => value
                .as_str()
                .map_or(false, |s| values.iter().any(|v| v == s)),
            ValidationRule::Required | ValidationRule::Optional => true,
        })
    }

    /// Closed-set fields report `invalid_enum`; everything else `invalid_type`
    pub fn mismatch_code(&self) -> ValidationErrorCode {
        if self.allowed_values().is_some() {
            ValidationErrorCode::InvalidEnum
        } else {
            ValidationErrorCode::InvalidType
        }
    }

    pub fn mismatch_message(&self) -> String {
        if let Some(values) = self.allowed_values() {
            return format!(
                "Campo \"{}\" inválido. Valores permitidos: {}.",
                self.name,
                values.join(", ")
            );
        }
        if self.validation_rules.contains(&ValidationRule::NonEmpty) {
            return format!("Campo \"{}\" deve ser string não vazia.", self.name);
        }
        format!(
            "Tipo inválido para \"{}\": esperado {}.",
            self.name,
            self.type_.label()
        )
    }
}

// ============================================================================
// ATTRIBUTE REGISTRY
// ============================================================================

/// Ordered catalog of fields for one object level
#[derive(Debug, Clone, Default)]
pub struct AttributeRegistry {
    attributes: Vec<AttributeDefinition>,
}

impl AttributeRegistry {
    pub fn new() -> Self {
        AttributeRegistry::default()
    }

    /// Root-level DRE fields
    pub fn dre_root() -> Self {
        let mut registry = AttributeRegistry::new();

        registry.register(
            AttributeDefinition::new("schemaVersion", AttributeType::Number)
                .with_description("Payload schema version")
                .with_validation(ValidationRule::Optional)
                .with_example("1"),
        );

        registry.register(
            AttributeDefinition::new("periodo", AttributeType::String)
                .with_description("Reporting month, YYYY-MM")
                .with_validation(ValidationRule::Required)
                .with_example("2025-01"),
        );

        registry.register(
            AttributeDefinition::new("moeda", AttributeType::String)
                .with_description("ISO-4217 currency code")
                .with_validation(ValidationRule::Required)
                .with_example("BRL")
                .with_example("USD"),
        );

        registry.register(
            AttributeDefinition::new("totais", AttributeType::Object)
                .with_description("Statement subtotals by label; not deeply checked")
                .with_validation(ValidationRule::Required)
                .with_example(r#"{"receitaBruta": 100000}"#),
        );

        registry.register(
            AttributeDefinition::new("porConta", AttributeType::Array)
                .with_description("Line items, in statement order")
                .with_validation(ValidationRule::Required),
        );

        registry
    }

    /// Fields of one `porConta` entry
    pub fn dre_entry() -> Self {
        let mut registry = AttributeRegistry::new();

        registry.register(
            AttributeDefinition::new("id", AttributeType::String)
                .with_description("Account identifier")
                .with_validation(ValidationRule::Required)
                .with_validation(ValidationRule::NonEmpty)
                .with_example("R1"),
        );

        registry.register(
            AttributeDefinition::new("nome", AttributeType::String)
                .with_description("Account display name")
                .with_validation(ValidationRule::Required)
                .with_validation(ValidationRule::NonEmpty)
                .with_example("Receita de vendas"),
        );

        registry.register(
            AttributeDefinition::new("grupo", AttributeType::String)
                .with_description("Account group; fixes the allowed sign of valor")
                .with_validation(ValidationRule::Required)
                .with_validation(ValidationRule::OneOf(
                    Grupo::ALL.iter().map(|g| g.name().to_string()).collect(),
                ))
                .with_example("receita")
                .with_example("despesa"),
        );

        registry.register(
            AttributeDefinition::new("valor", AttributeType::Monetary)
                .with_description("Amount, numeric or locale-formatted")
                .with_validation(ValidationRule::Required)
                .with_example("-2500")
                .with_example("R$ 10.000,00")
                .with_example("(2.500,00)"),
        );

        registry
    }

    pub fn register(&mut self, attr: AttributeDefinition) {
        self.attributes.push(attr);
    }

    pub fn get(&self, name: &str) -> Option<&AttributeDefinition> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Is `name` a known field at this level?
    pub fn allows(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Required fields, in declared order
    pub fn required(&self) -> impl Iterator<Item = &AttributeDefinition> {
        self.attributes.iter().filter(|attr| attr.is_required())
    }

    pub fn names(&self) -> Vec<&str> {
        self.attributes.iter().map(|attr| attr.name.as_str()).collect()
    }

    pub fn count(&self) -> usize {
        self.attributes.len()
    }
}

// ============================================================================
// TESTS
// ============================================================================
