// 📄 DRE Document Model
// Typed input (what callers send) and normalized output (what downstream code trusts)

use crate::money::ValueSign;
use crate::period::Periodo;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

// ============================================================================
// ACCOUNT GROUP
// ============================================================================

/// Account group; decides which sign a line item may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grupo {
    Receita,
    Deducao,
    Custo,
    Despesa,
    Outras,
    Imposto,
}

impl Grupo {
    pub const ALL: [Grupo; 6] = [
        Grupo::Receita,
        Grupo::Deducao,
        Grupo::Custo,
        Grupo::Despesa,
        Grupo::Outras,
        Grupo::Imposto,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Grupo::Receita => "receita",
            Grupo::Deducao => "deducao",
            Grupo::Custo => "custo",
            Grupo::Despesa => "despesa",
            Grupo::Outras => "outras",
            Grupo::Imposto => "imposto",
        }
    }

    /// Exact, case-sensitive lookup
    pub fn from_name(name: &str) -> Option<Grupo> {
        Grupo::ALL.into_iter().find(|g| g.name() == name)
    }

    /// Sign policy: receita >= 0, deducao/custo/despesa/imposto <= 0, outras free.
    /// Zero satisfies every group. `Invalid` satisfies none.
    pub fn allows(&self, sign: ValueSign) -> bool {
        match (self, sign) {
            (_, ValueSign::Invalid) => false,
            (_, ValueSign::Zero) => true,
            (Grupo::Outras, _) => true,
            (Grupo::Receita, s) => s == ValueSign::Positive,
            (Grupo::Deducao | Grupo::Custo | Grupo::Despesa | Grupo::Imposto, s) => {
                s == ValueSign::Negative
            }
        }
    }

    /// Sign the group expects, if it constrains one
    pub fn expected_sign(&self) -> Option<ValueSign> {
        match self {
            Grupo::Receita => Some(ValueSign::Positive),
            Grupo::Outras => None,
            _ => Some(ValueSign::Negative),
        }
    }
}

impl std::fmt::Display for Grupo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// RAW VALUE
// ============================================================================

/// `valor` as submitted: a number, or a locale-formatted monetary string
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValor {
    Number(f64),
    Text(String),
}

impl RawValor {
    /// Shape check over untyped JSON; anything but a number or a string is `None`
    pub fn from_json(value: &Value) -> Option<RawValor> {
        match value {
            Value::Number(n) => n.as_f64().map(RawValor::Number),
            Value::String(s) => Some(RawValor::Text(s.clone())),
            _ => None,
        }
    }

    pub fn sign(&self) -> ValueSign {
        match self {
            RawValor::Number(n) => ValueSign::of_number(*n),
            RawValor::Text(s) => ValueSign::of_text(s),
        }
    }
}

impl From<f64> for RawValor {
    fn from(value: f64) -> Self {
        RawValor::Number(value)
    }
}

impl From<&str> for RawValor {
    fn from(value: &str) -> Self {
        RawValor::Text(value.to_string())
    }
}

// ============================================================================
// INPUT DOCUMENT
// ============================================================================

/// One `porConta` line item, structurally checked but not yet normalized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountEntryInput {
    pub id: String,
    pub nome: String,
    pub grupo: Grupo,
    pub valor: RawValor,
}

/// A structurally valid DRE payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DreInput {
    #[serde(rename = "schemaVersion", default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<Number>,
    pub periodo: String,
    pub moeda: String,
    pub totais: Map<String, Value>,
    #[serde(rename = "porConta")]
    pub por_conta: Vec<AccountEntryInput>,
}

impl DreInput {
    /// Read a payload that already passed the schema validator
    pub fn from_value(value: &Value) -> serde_json::Result<DreInput> {
        DreInput::deserialize(value)
    }
}

// ============================================================================
// NORMALIZED DOCUMENT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedEntry {
    pub id: String,
    pub nome: String,
    pub grupo: Grupo,
    pub valor: f64,
}

/// Canonical document: trimmed `YYYY-MM` period, uppercase registered currency,
/// every `valor` a finite number. Entry order matches the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedDocument {
    #[serde(rename = "schemaVersion", default, skip_serializing_if = "Option::is_none")]
    pub schema_version: Option<Number>,
    pub periodo: String,
    pub moeda: String,
    pub totais: Map<String, Value>,
    #[serde(rename = "porConta")]
    pub por_conta: Vec<NormalizedEntry>,
}

impl NormalizedDocument {
    pub fn period(&self) -> Option<Periodo> {
        Periodo::parse(&self.periodo)
    }

    pub fn periodo_start(&self) -> Option<NaiveDate> {
        self.period()?.first_day()
    }

    /// Sum of `valor` for one group
    pub fn total_for(&self, grupo: Grupo) -> f64 {
        self.por_conta
            .iter()
            .filter(|e| e.grupo == grupo)
            .map(|e| e.valor)
            .sum()
    }
}

// ============================================================================
// TESTS
// ============================================================================
