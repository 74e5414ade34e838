//! Terminal and JSON rendering of the final ranking.

use crate::error::Result;
use crate::transaction::Transaction;
use chrono::{DateTime, SecondsFormat, TimeZone};
use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Prints one line per ranked transaction.
pub fn write_terminal<W: Write>(transactions: &[Transaction], mut out: W) -> io::Result<()> {
    writeln!(out, "Top spenders:")?;
    for tx in transactions {
        writeln!(
            out,
            "Email: {}, FirstName: {}, LastName: {}, MerchantCode: {}, TotalSpend: {}",
            tx.email,
            tx.first_name,
            tx.last_name,
            tx.merchant_code,
            tx.total_spend()
                .map(|total| total.to_string())
                .unwrap_or_default(),
        )?;
    }
    Ok(())
}

/// Writes the ranking as a pretty-printed JSON array.
pub fn write_json<W: Write>(transactions: &[Transaction], out: W) -> io::Result<()> {
    serde_json::to_writer_pretty(out, transactions).map_err(io::Error::from)
}

/// `top_spender.<RFC 3339 timestamp>.json`
pub fn output_file_name<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "top_spender.{}.json",
        now.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}

/// Writes the JSON artifact into `dir` and returns its path.
pub fn write_json_file<Tz>(
    transactions: &[Transaction],
    dir: &Path,
    now: &DateTime<Tz>,
) -> Result<PathBuf>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let path = dir.join(output_file_name(now));
    let mut writer = BufWriter::new(File::create(&path)?);
    write_json(transactions, &mut writer)?;
    writer.flush()?;
    Ok(path)
}

/// Prints the ranking and writes the JSON artifact.
///
/// Nothing is written to disk when the ranking is empty; returns the
/// artifact path otherwise.
pub fn emit<W, Tz>(
    transactions: &[Transaction],
    mut out: W,
    dir: &Path,
    now: &DateTime<Tz>,
) -> Result<Option<PathBuf>>
where
    W: Write,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if transactions.is_empty() {
        writeln!(out, "No matching transactions.")?;
        return Ok(None);
    }

    write_terminal(transactions, &mut out)?;
    let path = write_json_file(transactions, dir, now)?;

    writeln!(out, "\nRelative file path:")?;
    writeln!(out, "{}", output_file_name(now))?;
    Ok(Some(path))
}
