//! Filter clauses and the predicate evaluator.
//!
//! Clauses combine with logical AND only. Field names, operators and literal
//! values are compared lower-cased and trimmed.

use crate::config::UnknownFilterPolicy;
use crate::error::{RankerError, Result};
use crate::transaction::Transaction;
use log::warn;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;

/// One `(field, operator, value)` test as supplied in the request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterClause {
    pub field: String,
    pub cmp: String,
    /// Kept as text and parsed according to the field at evaluation time.
    #[serde(deserialize_with = "text_or_number")]
    pub value: String,
}

impl FilterClause {
    pub fn new(field: impl Into<String>, cmp: impl Into<String>, value: impl Into<String>) -> Self {
        FilterClause {
            field: field.into(),
            cmp: cmp.into(),
            value: value.into(),
        }
    }
}

/// Accepts `"2"` as well as `2` for the clause value.
fn text_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Literal {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Literal::deserialize(deserializer)? {
        Literal::Text(s) => s,
        Literal::Number(n) => n.to_string(),
    })
}

/// Numeric comparison operator for ordered fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Comparison {
    fn parse(op: &str) -> Option<Self> {
        match op {
            "=" | "==" => Some(Comparison::Eq),
            ">" => Some(Comparison::Gt),
            ">=" => Some(Comparison::Ge),
            "<" => Some(Comparison::Lt),
            "<=" => Some(Comparison::Le),
            _ => None,
        }
    }

    fn holds(self, ordering: Ordering) -> bool {
        match self {
            Comparison::Eq => ordering == Ordering::Equal,
            Comparison::Gt => ordering == Ordering::Greater,
            Comparison::Ge => ordering != Ordering::Less,
            Comparison::Lt => ordering == Ordering::Less,
            Comparison::Le => ordering != Ordering::Greater,
        }
    }
}

/// A clause after normalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive, trimmed equality on the description.
    Description(String),
    /// Comparison of the transaction month against a literal.
    Month(Comparison, i64),
    Always,
    Never,
}

impl Predicate {
    pub fn matches(&self, tx: &Transaction) -> bool {
        match self {
            Predicate::Description(expected) => normalize(&tx.description) == *expected,
            Predicate::Month(cmp, expected) => cmp.holds(i64::from(tx.month()).cmp(expected)),
            Predicate::Always => true,
            Predicate::Never => false,
        }
    }
}

/// Why a clause could not be turned into a predicate as written.
#[derive(Debug)]
enum ClauseIssue {
    /// Unknown field, or an operator the field does not support.
    Unsupported,
    /// The literal does not parse; `fallback` is what it degrades to.
    InvalidValue { fallback: Predicate },
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

fn parse_clause(clause: &FilterClause) -> std::result::Result<Predicate, ClauseIssue> {
    let field = normalize(&clause.field);
    let cmp = normalize(&clause.cmp);
    let value = normalize(&clause.value);

    match field.as_str() {
        "description" => match cmp.as_str() {
            "=" | "==" => Ok(Predicate::Description(value)),
            _ => Err(ClauseIssue::Unsupported),
        },
        "month" => {
            let cmp = Comparison::parse(&cmp).ok_or(ClauseIssue::Unsupported)?;
            value.parse::<i64>().map(|m| Predicate::Month(cmp, m)).map_err(|_| {
                ClauseIssue::InvalidValue {
                    fallback: Predicate::Month(cmp, 0),
                }
            })
        }
        _ => Err(ClauseIssue::Unsupported),
    }
}

/// Returns `true` if the transaction satisfies every clause.
///
/// An empty list always matches. Evaluation stops at the first clause that
/// does not match. Unknown fields and unsupported operators never match, and
/// a month literal that is not an integer is read as `0`.
pub fn matches(tx: &Transaction, filters: &[FilterClause]) -> bool {
    filters.iter().all(|clause| match parse_clause(clause) {
        Ok(predicate) => predicate.matches(tx),
        Err(ClauseIssue::Unsupported) => false,
        Err(ClauseIssue::InvalidValue { fallback }) => fallback.matches(tx),
    })
}

/// Clauses compiled once per run under an [`UnknownFilterPolicy`].
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    predicates: Vec<Predicate>,
    degraded: usize,
}

impl FilterSet {
    /// Compiles the clauses in order.
    ///
    /// With [`UnknownFilterPolicy::Error`] the first unsupported clause or
    /// unparsable literal is returned as an error. Otherwise each such clause
    /// is logged, counted and replaced by its degraded predicate.
    pub fn compile(clauses: &[FilterClause], policy: UnknownFilterPolicy) -> Result<Self> {
        let mut set = FilterSet::default();

        for clause in clauses {
            let predicate = match parse_clause(clause) {
                Ok(predicate) => predicate,
                Err(ClauseIssue::Unsupported) => {
                    let degraded = match policy {
                        UnknownFilterPolicy::NoMatch => Predicate::Never,
                        UnknownFilterPolicy::Ignore => Predicate::Always,
                        UnknownFilterPolicy::Error => {
                            return Err(RankerError::UnknownFilter {
                                field: clause.field.clone(),
                                cmp: clause.cmp.clone(),
                            })
                        }
                    };
                    warn!(
                        "Unsupported filter `{} {} {}` treated as {:?}",
                        clause.field, clause.cmp, clause.value, degraded
                    );
                    set.degraded += 1;
                    degraded
                }
                Err(ClauseIssue::InvalidValue { fallback }) => {
                    if policy == UnknownFilterPolicy::Error {
                        return Err(RankerError::InvalidFilterValue {
                            field: clause.field.clone(),
                            value: clause.value.clone(),
                        });
                    }
                    warn!(
                        "Filter value `{}` for `{}` is not a number, using {:?}",
                        clause.value, clause.field, fallback
                    );
                    set.degraded += 1;
                    fallback
                }
            };
            set.predicates.push(predicate);
        }

        Ok(set)
    }

    /// Logical AND of all predicates, short-circuiting. Empty sets match.
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.predicates.iter().all(|p| p.matches(tx))
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    /// Number of clauses that were replaced by a degraded predicate.
    pub fn degraded_count(&self) -> usize {
        self.degraded
    }
}
