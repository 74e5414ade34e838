//! The JSON request passed as the single command-line argument.

use crate::config::{CurrencyPair, RankingConfig, UnknownFilterPolicy, DEFAULT_DATE_FORMAT};
use crate::engine::TopSpendersEngine;
use crate::error::Result;
use crate::filter::{FilterClause, FilterSet};
use serde::{Deserialize, Deserializer};

/// A ranking request.
///
/// ```json
/// {
///   "file_name": "sample-transactions.csv",
///   "filters": [{"field": "description", "cmp": "=", "value": "CARD SPEND"}],
///   "top_n": 5
/// }
/// ```
///
/// `topN` is accepted in place of `top_n`. The remaining keys are optional
/// and override [`RankingConfig::default`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TopSpendersRequest {
    pub file_name: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub filters: Vec<FilterClause>,

    #[serde(alias = "topN")]
    pub top_n: i64,

    #[serde(default)]
    pub base_currency: Option<String>,

    #[serde(default)]
    pub alternate_currency: Option<String>,

    #[serde(default)]
    pub date_format: Option<String>,

    #[serde(default)]
    pub unknown_filter: Option<UnknownFilterPolicy>,

    #[serde(default)]
    pub strict: bool,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<FilterClause>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<FilterClause>>::deserialize(deserializer)?.unwrap_or_default())
}

impl TopSpendersRequest {
    /// Parses a request from its JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds the run configuration, falling back to defaults for absent keys.
    pub fn config(&self) -> RankingConfig {
        let defaults = CurrencyPair::default();
        RankingConfig {
            currencies: CurrencyPair::new(
                self.base_currency.clone().unwrap_or(defaults.base),
                self.alternate_currency.clone().unwrap_or(defaults.alternate),
            ),
            date_format: self
                .date_format
                .clone()
                .unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_string()),
            unknown_filter: self.unknown_filter.unwrap_or_default(),
            strict: self.strict,
        }
    }

    /// Compiles the filters and builds an engine for this request.
    pub fn engine(&self) -> Result<TopSpendersEngine> {
        let config = self.config();
        let filters = FilterSet::compile(&self.filters, config.unknown_filter)?;
        Ok(TopSpendersEngine::new(config, filters, self.top_n))
    }
}
