// 💱 Currency Oracle - ISO-4217 membership
// The core only asks "is this uppercase 3-letter code a currency?"; where the answer comes from is injected

use anyhow::{bail, Context, Result};
use std::collections::HashSet;

/// Set-membership check over uppercase 3-letter currency codes.
pub trait CurrencyOracle: Send + Sync {
    fn is_known(&self, code: &str) -> bool;
}

// ============================================================================
// BUILT-IN ISO-4217 TABLE
// ============================================================================

/// Active ISO-4217 alphabetic codes, including funds and precious-metal codes.
/// Kept sorted so lookups can binary search.
const ISO_4217_CODES: &[&str] = &[
    "AED", "AFN", "ALL", "AMD", "ANG", "AOA", "ARS", "AUD", "AWG", "AZN",
    "BAM", "BBD", "BDT", "BGN", "BHD", "BIF", "BMD", "BND", "BOB", "BOV",
    "BRL", "BSD", "BTN", "BWP", "BYN", "BZD", "CAD", "CDF", "CHE", "CHF",
    "CHW", "CLF", "CLP", "CNY", "COP", "COU", "CRC", "CUC", "CUP", "CVE",
    "CZK", "DJF", "DKK", "DOP", "DZD", "EGP", "ERN", "ETB", "EUR", "FJD",
    "FKP", "GBP", "GEL", "GHS", "GIP", "GMD", "GNF", "GTQ", "GYD", "HKD",
    "HNL", "HTG", "HUF", "IDR", "ILS", "INR", "IQD", "IRR", "ISK", "JMD",
    "JOD", "JPY", "KES", "KGS", "KHR", "KMF", "KPW", "KRW", "KWD", "KYD",
    "KZT", "LAK", "LBP", "LKR", "LRD", "LSL", "LYD", "MAD", "MDL", "MGA",
    "MKD", "MMK", "MNT", "MOP", "MRU", "MUR", "MVR", "MWK", "MXN", "MXV",
    "MYR", "MZN", "NAD", "NGN", "NIO", "NOK", "NPR", "NZD", "OMR", "PAB",
    "PEN", "PGK", "PHP", "PKR", "PLN", "PYG", "QAR", "RON", "RSD", "RUB",
    "RWF", "SAR", "SBD", "SCR", "SDG", "SEK", "SGD", "SHP", "SLE", "SLL",
    "SOS", "SRD", "SSP", "STN", "SVC", "SYP", "SZL", "THB", "TJS", "TMT",
    "TND", "TOP", "TRY", "TTD", "TWD", "TZS", "UAH", "UGX", "USD", "USN",
    "UYI", "UYU", "UYW", "UZS", "VED", "VES", "VND", "VUV", "WST", "XAF",
    "XAG", "XAU", "XBA", "XBB", "XBC", "XBD", "XCD", "XCG", "XDR", "XOF",
    "XPD", "XPF", "XPT", "XSU", "XTS", "XUA", "XXX", "YER", "ZAR", "ZMW",
    "ZWG", "ZWL",
];

/// Static ISO-4217 registry compiled into the crate
#[derive(Debug, Clone, Copy, Default)]
pub struct Iso4217;

impl CurrencyOracle for Iso4217 {
    fn is_known(&self, code: &str) -> bool {
        ISO_4217_CODES
            .binary_search_by(|known| (*known).cmp(code))
            .is_ok()
    }
}

// ============================================================================
// CONFIGURABLE TABLE
// ============================================================================

/// Caller-supplied set of accepted codes (e.g. a deployment that only books BRL and USD)
#[derive(Debug, Clone, Default)]
pub struct CurrencyTable {
    codes: HashSet<String>,
}

impl CurrencyTable {
    /// Build from any list of codes. Codes are stored uppercase; entries that are
    /// not exactly three ASCII letters are rejected.
    pub fn from_codes<I, S>(codes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = CurrencyTable::default();
        for code in codes {
            let code = code.as_ref().trim();
            if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                bail!("Invalid currency code in table: {:?}", code);
            }
            table.codes.insert(code.to_ascii_uppercase());
        }
        Ok(table)
    }

    /// Load from a JSON array of codes, e.g. `["BRL", "USD"]`
    pub fn from_json(raw: &str) -> Result<Self> {
        let codes: Vec<String> =
            serde_json::from_str(raw).context("Currency table must be a JSON array of strings")?;
        Self::from_codes(codes)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl CurrencyOracle for CurrencyTable {
    fn is_known(&self, code: &str) -> bool {
        self.codes.contains(code)
    }
}

// ============================================================================
// TESTS
// ============================================================================
