//! Transaction model and positional CSV row decoding.

use crate::config::CurrencyPair;
use crate::decimal::Money;
use crate::error::DecodeError;
use crate::total::compute_total;
use chrono::{Datelike, NaiveDateTime};
use csv::StringRecord;
use serde::Serialize;
use std::str::FromStr;

/// Number of positional columns in a ledger row.
pub const COLUMN_COUNT: usize = 10;

/// One spend or exchange event from the ledger.
///
/// # Invariants
///
/// - `amount` and `rate` are non-negative when produced by [`decode`]
/// - `month` is always derived from `date`; there is no setter for either
/// - `total_spend` is `None` until [`Transaction::with_total_spend`]
///   succeeds, and is never overwritten afterwards
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub first_name: String,
    pub last_name: String,
    pub email: String,

    /// Free-text category, e.g. `CARD SPEND` or `SELL GOLD`.
    pub description: String,

    pub merchant_code: String,

    pub amount: Money,

    /// Source currency code.
    pub from_currency: String,

    /// Destination currency code.
    pub to_currency: String,

    /// Exchange rate applied when the currency pair needs conversion.
    pub rate: Money,

    date: NaiveDateTime,

    /// Calendar month of `date`, 1 to 12.
    month: u32,

    total_spend: Option<Money>,
}

impl Transaction {
    /// Creates a transaction with empty identity fields and a zero amount in
    /// the default base currency. Use the `with_*` methods to fill it in.
    pub fn new(
        email: impl Into<String>,
        description: impl Into<String>,
        date: NaiveDateTime,
    ) -> Self {
        let base = CurrencyPair::default().base;
        Transaction {
            first_name: String::new(),
            last_name: String::new(),
            email: email.into(),
            description: description.into(),
            merchant_code: String::new(),
            amount: Money::ZERO,
            from_currency: base.clone(),
            to_currency: base,
            rate: Money::ZERO,
            month: date.month(),
            date,
            total_spend: None,
        }
    }

    pub fn with_name(
        mut self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        self.first_name = first_name.into();
        self.last_name = last_name.into();
        self
    }

    pub fn with_merchant_code(mut self, merchant_code: impl Into<String>) -> Self {
        self.merchant_code = merchant_code.into();
        self
    }

    /// Sets the amount, the currency direction and the exchange rate.
    pub fn with_exchange(
        mut self,
        amount: Money,
        from_currency: impl Into<String>,
        to_currency: impl Into<String>,
        rate: Money,
    ) -> Self {
        self.amount = amount;
        self.from_currency = from_currency.into();
        self.to_currency = to_currency.into();
        self.rate = rate;
        self
    }

    /// Computes and stores the total spend. A total that is already set is
    /// kept as is.
    ///
    /// Fails when the converted total cannot be represented exactly.
    pub fn with_total_spend(mut self, currencies: &CurrencyPair) -> Result<Self, DecodeError> {
        if self.total_spend.is_none() {
            let total = compute_total(&self, currencies).ok_or_else(|| {
                DecodeError::UnrepresentableTotal {
                    amount: self.amount.to_string(),
                    rate: self.rate.to_string(),
                }
            })?;
            self.total_spend = Some(total);
        }
        Ok(self)
    }

    pub fn date(&self) -> NaiveDateTime {
        self.date
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn total_spend(&self) -> Option<Money> {
        self.total_spend
    }
}

/// Decodes one ledger row, mapped positionally:
/// first name, last name, email, description, merchant code, amount,
/// source currency, destination currency, rate, timestamp.
///
/// Extra trailing columns are ignored.
pub fn decode(record: &StringRecord, date_format: &str) -> Result<Transaction, DecodeError> {
    if record.len() < COLUMN_COUNT {
        return Err(DecodeError::MissingColumns {
            expected: COLUMN_COUNT,
            found: record.len(),
        });
    }

    let field = |idx: usize| record.get(idx).unwrap_or_default().trim();

    let amount = parse_money("amount", field(5))?;
    let rate = parse_money("rate", field(8))?;
    let date = NaiveDateTime::parse_from_str(field(9), date_format).map_err(|e| {
        DecodeError::InvalidTimestamp {
            value: field(9).to_string(),
            reason: e.to_string(),
        }
    })?;

    Ok(Transaction::new(field(2), field(3), date)
        .with_name(field(0), field(1))
        .with_merchant_code(field(4))
        .with_exchange(amount, field(6), field(7), rate))
}

fn parse_money(name: &'static str, value: &str) -> Result<Money, DecodeError> {
    let money = Money::from_str(value).map_err(|_| DecodeError::InvalidNumber {
        field: name,
        value: value.to_string(),
    })?;

    if money.is_negative() {
        return Err(DecodeError::Negative {
            field: name,
            value: value.to_string(),
        });
    }

    Ok(money)
}
