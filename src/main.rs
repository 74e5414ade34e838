//! Top Spenders CLI
//!
//! Ranks the transactions of a CSV ledger by total spend and writes the
//! result to the terminal and to `top_spender.<timestamp>.json`.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- '{"file_name": "transactions.csv", "filters": [{"field": "description", "cmp": "=", "value": "CARD SPEND"}], "top_n": 5}'
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `info`, `debug` or `warn` to control logging verbosity

use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::process;
use top_spenders::{report, RankerError, Result, TopSpendersRequest};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let request_json = env::args().nth(1).ok_or(RankerError::MissingArgument)?;
    let request = TopSpendersRequest::from_json(&request_json)?;
    let mut engine = request.engine()?;

    let file = File::open(&request.file_name)?;
    engine.process_csv(BufReader::new(file))?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    report::emit(
        engine.ranking(),
        handle,
        Path::new("."),
        &chrono::Local::now(),
    )?;

    Ok(())
}
