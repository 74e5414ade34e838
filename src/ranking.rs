//! Bounded top-N selection by total spend.
//!
//! The working set is a vector kept sorted descending. A new entry is placed
//! after every entry with an equal total, so ties keep arrival order, and
//! once the set is full an entry only gets in by beating the lowest total
//! strictly.

use crate::config::CurrencyPair;
use crate::decimal::Money;
use crate::filter::{matches, FilterClause};
use crate::transaction::Transaction;
use log::{debug, warn};

/// The best `capacity` transactions seen so far, highest total first.
///
/// # Invariants
///
/// - `len() <= capacity()` at all times
/// - entries are sorted descending by total spend
/// - every entry has a total spend
#[derive(Debug, Clone)]
pub struct TopN {
    capacity: usize,
    entries: Vec<Transaction>,
}

impl TopN {
    /// Creates an empty ranking that keeps at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        TopN {
            capacity,
            entries: Vec::with_capacity(capacity.min(1024)),
        }
    }

    /// Creates a ranking from a requested count; zero or negative gives an
    /// always-empty ranking.
    pub fn from_requested(top_n: i64) -> Self {
        TopN::new(usize::try_from(top_n).unwrap_or(0))
    }

    /// Offers a priced transaction. Returns `true` if it entered the ranking.
    ///
    /// Transactions without a total spend are refused.
    pub fn offer(&mut self, tx: Transaction) -> bool {
        let total = match tx.total_spend() {
            Some(total) => total,
            None => {
                debug!("Refusing unpriced transaction for {}", tx.email);
                return false;
            }
        };

        if self.capacity == 0 {
            return false;
        }

        if self.entries.len() == self.capacity {
            match self.lowest() {
                Some(lowest) if total > lowest => {
                    self.entries.pop();
                }
                _ => return false,
            }
        }

        let pos = self.entries.partition_point(|e| rank_key(e) >= total);
        self.entries.insert(pos, tx);
        true
    }

    /// Total spend of the lowest-ranked entry, if any.
    pub fn lowest(&self) -> Option<Money> {
        self.entries.last().map(rank_key)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn as_slice(&self) -> &[Transaction] {
        &self.entries
    }

    pub fn into_vec(self) -> Vec<Transaction> {
        self.entries
    }
}

fn rank_key(tx: &Transaction) -> Money {
    tx.total_spend().unwrap_or(Money::ZERO)
}

/// Prices each transaction, keeps the ones accepted by `accept`, and returns
/// the best `top_n` by total spend, highest first.
///
/// A transaction whose total cannot be represented exactly is left out.
pub fn select_with<I, F>(
    transactions: I,
    accept: F,
    top_n: i64,
    currencies: &CurrencyPair,
) -> Vec<Transaction>
where
    I: IntoIterator<Item = Transaction>,
    F: Fn(&Transaction) -> bool,
{
    let mut ranking = TopN::from_requested(top_n);
    for tx in transactions {
        let tx = match tx.with_total_spend(currencies) {
            Ok(tx) => tx,
            Err(e) => {
                warn!("Leaving out unpriceable transaction: {}", e);
                continue;
            }
        };
        if accept(&tx) {
            ranking.offer(tx);
        }
    }
    ranking.into_vec()
}

/// Returns the best `top_n` transactions that satisfy every filter clause,
/// using the default currency pair.
pub fn select<I>(transactions: I, filters: &[FilterClause], top_n: i64) -> Vec<Transaction>
where
    I: IntoIterator<Item = Transaction>,
{
    select_with(
        transactions,
        |tx| matches(tx, filters),
        top_n,
        &CurrencyPair::default(),
    )
}
