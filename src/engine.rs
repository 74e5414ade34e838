//! Single-pass ranking engine.
//!
//! Reads the ledger one record at a time, decodes, prices and filters each
//! row, and feeds the survivors into a bounded [`TopN`]. Rows that cannot be
//! decoded are recorded and skipped unless the run is strict.

use crate::config::RankingConfig;
use crate::error::{DecodeError, RankerError, Result};
use crate::filter::FilterSet;
use crate::ranking::TopN;
use crate::transaction::{decode, Transaction};
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info, warn};
use std::io::Read;

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Data rows read, excluding the header.
    pub rows_read: usize,

    /// Rows that could not be decoded or priced.
    pub rows_skipped: usize,

    /// Decoded rows rejected by the filters.
    pub rows_filtered_out: usize,

    /// Decoded rows that passed the filters and were offered to the ranking.
    pub rows_matched: usize,
}

/// A row that was dropped during decoding or pricing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-indexed line of the row, counting the header as line 1.
    pub row: usize,
    pub error: DecodeError,
}

/// The top spenders engine.
///
/// Owns the ranking state for exactly one pass over one ledger.
pub struct TopSpendersEngine {
    config: RankingConfig,
    filters: FilterSet,
    ranking: TopN,
    stats: RunStats,
    skipped: Vec<SkippedRow>,
}

impl TopSpendersEngine {
    /// Creates an engine that keeps the best `top_n` rows passing `filters`.
    pub fn new(config: RankingConfig, filters: FilterSet, top_n: i64) -> Self {
        TopSpendersEngine {
            config,
            filters,
            ranking: TopN::from_requested(top_n),
            stats: RunStats::default(),
            skipped: Vec::new(),
        }
    }

    /// Processes a ledger from a CSV reader in streaming fashion.
    ///
    /// The first row is a header and is always skipped. I/O failures abort
    /// the pass; malformed or undecodable rows are logged at warn level and
    /// skipped, or abort the pass when the config is strict.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.records().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row
            self.stats.rows_read += 1;

            let decoded = match result {
                Ok(record) => self.decode_record(&record),
                Err(e) if matches!(e.kind(), csv::ErrorKind::Io(_)) => return Err(e.into()),
                Err(e) => Err(DecodeError::Malformed(e.to_string())),
            };

            match decoded {
                Ok(tx) => self.process_transaction(tx, row_num)?,
                Err(error) => self.skip_row(row_num, error)?,
            }
        }

        info!(
            "Read {} rows: {} skipped, {} filtered out, {} matched, {} ranked",
            self.stats.rows_read,
            self.stats.rows_skipped,
            self.stats.rows_filtered_out,
            self.stats.rows_matched,
            self.ranking.len()
        );

        Ok(())
    }

    fn decode_record(
        &self,
        record: &StringRecord,
    ) -> std::result::Result<Transaction, DecodeError> {
        decode(record, &self.config.date_format)
    }

    /// Prices, filters and ranks a single decoded transaction.
    ///
    /// A total that cannot be represented exactly makes the row a skipped
    /// row, which is fatal in strict mode.
    pub fn process_transaction(&mut self, tx: Transaction, row: usize) -> Result<()> {
        let tx = match tx.with_total_spend(&self.config.currencies) {
            Ok(tx) => tx,
            Err(error) => return self.skip_row(row, error),
        };

        if !self.filters.matches(&tx) {
            self.stats.rows_filtered_out += 1;
            debug!("Row {}: Filtered out {} ({})", row, tx.email, tx.description);
            return Ok(());
        }

        self.stats.rows_matched += 1;
        let email = tx.email.clone();
        let total = tx.total_spend().unwrap_or_default();
        if self.ranking.offer(tx) {
            debug!("Row {}: Ranked {} with total {}", row, email, total);
        } else {
            debug!("Row {}: {} did not beat the lowest ranked total", row, email);
        }
        Ok(())
    }

    fn skip_row(&mut self, row: usize, error: DecodeError) -> Result<()> {
        if self.config.strict {
            return Err(RankerError::InvalidRecord { row, source: error });
        }

        warn!("Row {}: Skipping row: {}", row, error);
        self.stats.rows_skipped += 1;
        self.skipped.push(SkippedRow { row, error });
        Ok(())
    }

    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Rows dropped during decoding or pricing, in input order.
    pub fn skipped_rows(&self) -> &[SkippedRow] {
        &self.skipped
    }

    /// Current ranking, highest total first.
    pub fn ranking(&self) -> &[Transaction] {
        self.ranking.as_slice()
    }

    /// Consumes the engine and returns the final ranking.
    pub fn finish(self) -> Vec<Transaction> {
        self.ranking.into_vec()
    }
}
