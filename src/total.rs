//! Total-spend calculation.

use crate::config::CurrencyPair;
use crate::decimal::Money;
use crate::transaction::Transaction;

/// Returns the value a transaction is ranked by.
///
/// Spends that stay in the base currency, and purchases of the alternate
/// currency paid in the base currency, are already denominated in the base
/// currency: the amount is returned unchanged and the rate is ignored. Every
/// other direction (alternate to base, alternate to alternate, unknown codes)
/// is converted as `amount * rate`.
///
/// Returns `None` when a converted total cannot be held exactly.
pub fn compute_total(tx: &Transaction, currencies: &CurrencyPair) -> Option<Money> {
    let from_base = tx.from_currency == currencies.base;
    let to_base = tx.to_currency == currencies.base;
    let to_alternate = tx.to_currency == currencies.alternate;

    if from_base && (to_base || to_alternate) {
        Some(tx.amount)
    } else {
        tx.amount.checked_mul(tx.rate)
    }
}
