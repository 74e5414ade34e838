//! Run configuration: currency codes, timestamp layout and degrade policies.

use serde::Deserialize;

/// Reference currency that conversions are anchored to.
pub const DEFAULT_BASE_CURRENCY: &str = "GBP";

/// Secondary unit (cost of gold) convertible to and from the base currency.
pub const DEFAULT_ALTERNATE_CURRENCY: &str = "GGM";

/// `chrono` layout of the ledger timestamp column, e.g. `02/01/2006 15:04`.
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// The two currency codes the total-spend rule treats specially.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyPair {
    pub base: String,
    pub alternate: String,
}

impl CurrencyPair {
    pub fn new(base: impl Into<String>, alternate: impl Into<String>) -> Self {
        CurrencyPair {
            base: base.into(),
            alternate: alternate.into(),
        }
    }
}

impl Default for CurrencyPair {
    fn default() -> Self {
        CurrencyPair::new(DEFAULT_BASE_CURRENCY, DEFAULT_ALTERNATE_CURRENCY)
    }
}

/// What a filter clause with an unrecognized field or operator evaluates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFilterPolicy {
    /// The clause never matches, so the whole filter rejects every row.
    #[default]
    NoMatch,

    /// The clause always matches and is effectively dropped.
    Ignore,

    /// The run fails before reading the ledger.
    Error,
}

/// Settings for one ranking run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingConfig {
    pub currencies: CurrencyPair,

    /// `chrono` format string for the timestamp column.
    pub date_format: String,

    pub unknown_filter: UnknownFilterPolicy,

    /// Abort on the first undecodable row instead of skipping it.
    pub strict: bool,
}

impl Default for RankingConfig {
    fn default() -> Self {
        RankingConfig {
            currencies: CurrencyPair::default(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            unknown_filter: UnknownFilterPolicy::default(),
            strict: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RankingConfig::default();
        assert_eq!(config.currencies.base, "GBP");
        assert_eq!(config.currencies.alternate, "GGM");
        assert_eq!(config.date_format, "%d/%m/%Y %H:%M");
        assert_eq!(config.unknown_filter, UnknownFilterPolicy::NoMatch);
        assert!(!config.strict);
    }

    #[test]
    fn test_policy_deserializes_snake_case() {
        let policy: UnknownFilterPolicy = serde_json::from_str("\"no_match\"").unwrap();
        assert_eq!(policy, UnknownFilterPolicy::NoMatch);
        let policy: UnknownFilterPolicy = serde_json::from_str("\"ignore\"").unwrap();
        assert_eq!(policy, UnknownFilterPolicy::Ignore);
        let policy: UnknownFilterPolicy = serde_json::from_str("\"error\"").unwrap();
        assert_eq!(policy, UnknownFilterPolicy::Error);
    }
}
