//! Deterministic synthetic OHLCV series.
//!
//! Seeded random walk with configurable drift and volatility, used by the
//! CLI's `--synthetic` mode, the benches, and integration tests. Same seed,
//! same series, regardless of thread count or platform.

use chrono::{Duration, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::Bar;

/// Parameters for a synthetic daily series.
#[derive(Debug, Clone)]
pub struct SyntheticSeries {
    pub symbol: String,
    pub start: NaiveDate,
    pub bars: usize,
    /// Per-bar drift of the close (0.0005 is roughly 12% annual on daily bars).
    pub drift: f64,
    /// Per-bar volatility of the close (0.012 is roughly 19% annual).
    pub volatility: f64,
    pub seed: u64,
}

impl Default for SyntheticSeries {
    fn default() -> Self {
        Self {
            symbol: "SYN".into(),
            start: NaiveDate::from_ymd_opt(2022, 1, 3).unwrap(),
            bars: 250,
            drift: 0.0005,
            volatility: 0.012,
            seed: 42,
        }
    }
}

impl SyntheticSeries {
    /// Generate the series. Deterministic in `seed`.
    ///
    /// Every generated bar satisfies the OHLC ordering invariant: the open is
    /// the previous close, the high/low straddle both open and close.
    pub fn generate(&self) -> Vec<Bar> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut close = 100.0;
        let mut bars = Vec::with_capacity(self.bars);

        for i in 0..self.bars {
            let open = close;
            let noise: f64 = rng.gen_range(-1.0..1.0);
            close = (open * (1.0 + self.drift + self.volatility * noise)).max(1.0);

            let span = open.max(close) * self.volatility * rng.gen_range(0.2..0.8);
            let high = open.max(close) + span;
            let low = open.min(close) - span;
            let volume: u64 = rng.gen_range(500_000..2_000_000);

            bars.push(Bar {
                symbol: self.symbol.clone(),
                date: self.start + Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume,
            });
        }

        bars
    }
}
