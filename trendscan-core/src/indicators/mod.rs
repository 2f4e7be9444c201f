//! Indicator computation: true range, Wilder-smoothed ATR, and the
//! Supertrend band/direction state machine.
//!
//! All computations are batch transforms over a fixed `&[Bar]` slice.
//! Output vectors are compact and index-aligned: element `j` corresponds to
//! input bar `j + period - 1`.

pub mod atr;
pub mod supertrend;

pub use atr::{true_range, true_range_series, Atr};
pub use supertrend::{Direction, Signal, Supertrend, SupertrendPoint};

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::Bar;

/// Errors raised by the indicator engine.
///
/// Both variants are recoverable — callers skip the affected computation.
/// The engine never retries (it is deterministic) and never logs; reporting
/// belongs to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    /// Input sequence shorter than the configured period requires.
    #[error("insufficient data: {required} bars required, {actual} available")]
    InsufficientData { required: usize, actual: usize },

    /// A bar violating the OHLC ordering invariant, or carrying non-finite
    /// prices.
    #[error("invalid bar at index {index} ({date}): OHLC ordering violated")]
    InvalidBar { index: usize, date: NaiveDate },
}

/// Reject sequences containing void or ordering-violating bars.
pub(crate) fn validate_bars(bars: &[Bar]) -> Result<(), IndicatorError> {
    match bars.iter().position(|bar| !bar.is_sane()) {
        Some(index) => Err(IndicatorError::InvalidBar {
            index,
            date: bars[index].date,
        }),
        None => Ok(()),
    }
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLCV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            Bar {
                symbol: "TEST".to_string(),
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
