// 📅 Reporting Period - "YYYY-MM"

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

fn periodo_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `[0-9]`, not `\d`: non-ASCII digits must not match
    RE.get_or_init(|| Regex::new(r"^[0-9]{4}-(0[1-9]|1[0-2])$").expect("periodo pattern compiles"))
}

/// Strict check: 4-digit year, dash, zero-padded month 01-12. No trimming.
pub fn is_valid_periodo(raw: &str) -> bool {
    periodo_regex().is_match(raw)
}

/// A parsed reporting period (one calendar month)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Periodo {
    pub year: i32,
    pub month: u32,
}

impl Periodo {
    pub fn parse(raw: &str) -> Option<Periodo> {
        if !is_valid_periodo(raw) {
            return None;
        }
        let (year, month) = raw.split_once('-')?;
        Some(Periodo {
            year: year.parse().ok()?,
            month: month.parse().ok()?,
        })
    }

    /// First calendar day of the period
    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }
}

impl std::fmt::Display for Periodo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
