//! Multi-timeframe scan — runs the Supertrend state machine over several
//! independently configured windows of one price series.
//!
//! Each timeframe is a data row (label, ATR period, band factor, lookback
//! window), so adding or tuning a horizon is a table edit, not new code.
//! Timeframes are mutually independent and evaluate in parallel.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::domain::Bar;
use crate::indicators::{Supertrend, SupertrendPoint};

/// One row of the timeframe table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeframeConfig {
    /// Horizon label, e.g. "short".
    pub label: String,
    /// ATR smoothing period.
    pub period: usize,
    /// Band multiplier applied to ATR.
    pub factor: f64,
    /// Lookback window: at most this many of the most recent bars are used.
    pub window: usize,
}

/// Latest Supertrend state for one timeframe.
///
/// `latest` is `None` when the windowed slice is too thin (fewer than
/// `period + 1` bars) or unusable — absence, not an error.
#[derive(Debug, Clone, Serialize)]
pub struct TimeframeSignal {
    pub label: String,
    pub latest: Option<SupertrendPoint>,
}

/// The process-wide default table.
pub fn default_timeframes() -> Vec<TimeframeConfig> {
    vec![
        TimeframeConfig {
            label: "short".into(),
            period: 7,
            factor: 2.0,
            window: 50,
        },
        TimeframeConfig {
            label: "medium".into(),
            period: 10,
            factor: 3.0,
            window: 100,
        },
        TimeframeConfig {
            label: "long".into(),
            period: 14,
            factor: 3.0,
            window: 200,
        },
    ]
}

/// Run the Supertrend state machine once per timeframe over the most recent
/// `window` bars, keeping only the final point of each run.
///
/// Output order matches table order. Failures are isolated per timeframe: a
/// thin or invalid window records `None` and the remaining timeframes still
/// evaluate. The per-timeframe computations share no state, so they run on
/// the rayon pool; the fan-out is a throughput optimization only.
pub fn scan(bars: &[Bar], timeframes: &[TimeframeConfig]) -> Vec<TimeframeSignal> {
    timeframes
        .par_iter()
        .map(|tf| TimeframeSignal {
            label: tf.label.clone(),
            latest: latest_signal(bars, tf),
        })
        .collect()
}

/// Latest Supertrend point for a single timeframe, or `None`.
pub fn latest_signal(bars: &[Bar], tf: &TimeframeConfig) -> Option<SupertrendPoint> {
    // Nonsensical table rows (the table may come from a user-supplied config
    // file) degrade to absence rather than panicking the whole scan.
    if tf.period == 0 || !(tf.factor > 0.0) {
        return None;
    }

    let window = tf.window.min(bars.len());
    let slice = &bars[bars.len() - window..];
    if slice.len() < tf.period + 1 {
        return None;
    }

    Supertrend::new(tf.period, tf.factor)
        .compute(slice)
        .ok()
        .and_then(|mut points| points.pop())
}
