//! TrendScan CLI — multi-timeframe Supertrend scanning over OHLCV series.
//!
//! Commands:
//! - `scan` — load bars from CSV (or generate a synthetic series) and print
//!   the latest Supertrend state per configured timeframe
//! - `timeframes` — print the timeframe table that a scan would use
//!
//! The CLI owns the data-acquisition chores the engine refuses to do:
//! sorting, duplicate-date removal, and file parsing.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Deserialize;

use trendscan_core::domain::Bar;
use trendscan_core::scan::{default_timeframes, scan, TimeframeConfig, TimeframeSignal};
use trendscan_core::synthetic::SyntheticSeries;

#[derive(Parser)]
#[command(
    name = "trendscan",
    about = "TrendScan CLI — multi-timeframe Supertrend scanner"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan an OHLCV series and report the latest signal per timeframe.
    Scan {
        /// CSV file with date,open,high,low,close,volume columns.
        #[arg(long, conflicts_with = "synthetic")]
        csv: Option<PathBuf>,

        /// Generate a deterministic synthetic series instead of loading a file.
        #[arg(long, default_value_t = false)]
        synthetic: bool,

        /// Number of synthetic bars.
        #[arg(long, default_value_t = 250)]
        bars: usize,

        /// Synthetic series seed.
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Symbol attached to loaded or generated bars.
        #[arg(long, default_value = "DEMO")]
        symbol: String,

        /// TOML file overriding the default timeframe table.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Write the scan result as JSON to this path.
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Print the timeframe table that a scan would use.
    Timeframes {
        /// TOML file overriding the default timeframe table.
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// One CSV row. `symbol` is optional; the --symbol flag fills it in.
#[derive(Debug, Deserialize)]
struct CsvBar {
    #[serde(default)]
    symbol: Option<String>,
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

/// Timeframe table file: a [[timeframes]] array of tables.
#[derive(Debug, Deserialize)]
struct TimeframeFile {
    timeframes: Vec<TimeframeConfig>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Scan {
            csv,
            synthetic,
            bars,
            seed,
            symbol,
            config,
            json,
        } => cmd_scan(
            csv.as_deref(),
            synthetic,
            bars,
            seed,
            &symbol,
            config.as_deref(),
            json.as_deref(),
        ),
        Commands::Timeframes { config } => cmd_timeframes(config.as_deref()),
    }
}

fn cmd_scan(
    csv: Option<&Path>,
    synthetic: bool,
    bars: usize,
    seed: u64,
    symbol: &str,
    config: Option<&Path>,
    json: Option<&Path>,
) -> Result<()> {
    let bars = if let Some(path) = csv {
        load_csv_bars(path, symbol)?
    } else if synthetic {
        SyntheticSeries {
            symbol: symbol.to_string(),
            bars,
            seed,
            ..Default::default()
        }
        .generate()
    } else {
        bail!("either --csv <path> or --synthetic is required");
    };

    if bars.is_empty() {
        bail!("no bars to scan");
    }

    let timeframes = load_timeframes(config)?;
    let results = scan(&bars, &timeframes);

    print_results(&bars, &results);

    if let Some(path) = json {
        let payload = serde_json::to_string_pretty(&results)?;
        std::fs::write(path, payload)
            .with_context(|| format!("failed to write {}", path.display()))?;
        println!("\nwrote {}", path.display());
    }

    Ok(())
}

fn cmd_timeframes(config: Option<&Path>) -> Result<()> {
    let timeframes = load_timeframes(config)?;
    println!(
        "{:<10} {:>8} {:>8} {:>8}",
        "label", "period", "factor", "window"
    );
    for tf in &timeframes {
        println!(
            "{:<10} {:>8} {:>8} {:>8}",
            tf.label, tf.period, tf.factor, tf.window
        );
    }
    Ok(())
}

/// Load, sort, and dedupe bars from a CSV file.
///
/// Ordering and duplicate-date removal (keep first) happen here: the engine
/// trusts its input to be time-ordered with unique dates.
fn load_csv_bars(path: &Path, symbol: &str) -> Result<Vec<Bar>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?;
    parse_csv_bars(file, symbol).with_context(|| format!("failed to load {}", path.display()))
}

fn parse_csv_bars<R: Read>(reader: R, symbol: &str) -> Result<Vec<Bar>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut bars = Vec::new();
    for (i, record) in csv_reader.deserialize().enumerate() {
        let row: CsvBar = record.with_context(|| format!("malformed CSV row {}", i + 1))?;
        bars.push(Bar {
            symbol: row.symbol.unwrap_or_else(|| symbol.to_string()),
            date: row.date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
        });
    }
    bars.sort_by_key(|bar| bar.date);
    bars.dedup_by_key(|bar| bar.date);
    Ok(bars)
}

fn load_timeframes(config: Option<&Path>) -> Result<Vec<TimeframeConfig>> {
    let Some(path) = config else {
        return Ok(default_timeframes());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file: TimeframeFile = toml::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    if file.timeframes.is_empty() {
        bail!("timeframe table in {} is empty", path.display());
    }
    Ok(file.timeframes)
}

fn print_results(bars: &[Bar], results: &[TimeframeSignal]) {
    let last = &bars[bars.len() - 1];
    println!(
        "{} — {} bars through {} (close {:.2})",
        last.symbol,
        bars.len(),
        last.date,
        last.close
    );
    println!(
        "{:<10} {:>6} {:>10} {:>10} {:>8}",
        "timeframe", "dir", "trend", "atr", "signal"
    );
    for result in results {
        match &result.latest {
            Some(point) => println!(
                "{:<10} {:>6} {:>10.2} {:>10.2} {:>8}",
                result.label, point.direction, point.value, point.atr, point.signal
            ),
            None => println!("{:<10} {:>6}", result.label, "-"),
        }
    }
}
