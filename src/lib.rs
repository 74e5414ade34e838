//! # Top Spenders
//!
//! A single-pass ranker that reads a CSV spend ledger, filters it, and
//! reports the top-N transactions by total spend.
//!
//! ## Design Principles
//!
//! - **Exact arithmetic**: amounts, rates and totals use `rust_decimal`
//! - **Bounded memory**: only the current best N transactions are kept
//! - **Strict-greater replacement**: a later tie never displaces an earlier entry
//! - **Tolerant decoding**: bad rows are skipped and recorded, or fatal in strict mode
//!
//! ## Example
//!
//! ```no_run
//! use top_spenders::TopSpendersRequest;
//! use std::io::Cursor;
//!
//! let request = TopSpendersRequest::from_json(
//!     r#"{"file_name": "ledger.csv", "filters": [], "top_n": 3}"#,
//! ).unwrap();
//! let csv = "first,last,email,description,merchant,amount,from,to,rate,date\n\
//!            Ann,A,ann@x.com,CARD SPEND,M1,10,GBP,GBP,1,01/02/2021 10:00\n";
//! let mut engine = request.engine().unwrap();
//! engine.process_csv(Cursor::new(csv)).unwrap();
//! top_spenders::report::write_terminal(engine.ranking(), std::io::stdout()).unwrap();
//! ```

pub mod config;
pub mod decimal;
pub mod engine;
pub mod error;
pub mod filter;
pub mod ranking;
pub mod report;
pub mod request;
pub mod total;
pub mod transaction;

pub use config::{CurrencyPair, RankingConfig, UnknownFilterPolicy};
pub use decimal::Money;
pub use engine::{RunStats, SkippedRow, TopSpendersEngine};
pub use error::{DecodeError, RankerError, Result};
pub use filter::{matches, FilterClause, FilterSet};
pub use ranking::{select, select_with, TopN};
pub use request::TopSpendersRequest;
pub use total::compute_total;
pub use transaction::{decode, Transaction};
