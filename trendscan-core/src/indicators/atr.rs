//! True range and Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|); the first
//! bar has no predecessor and uses high-low alone.
//! ATR uses Wilder smoothing (EMA with alpha = 1/period), seeded with the
//! arithmetic mean of the first `period` true ranges.

use super::{validate_bars, IndicatorError};
use crate::domain::Bar;

/// True range of `bar` given its immediate predecessor.
///
/// Total for well-formed bars: the raw range when there is no predecessor,
/// otherwise the largest of the three gap-aware candidates.
pub fn true_range(bar: &Bar, prev: Option<&Bar>) -> f64 {
    let range = bar.high - bar.low;
    match prev {
        None => range,
        Some(p) => range
            .max((bar.high - p.close).abs())
            .max((bar.low - p.close).abs()),
    }
}

/// True range for every bar. Element 0 uses the no-predecessor branch.
pub fn true_range_series(bars: &[Bar]) -> Vec<f64> {
    bars.iter()
        .enumerate()
        .map(|(i, bar)| true_range(bar, i.checked_sub(1).map(|j| &bars[j])))
        .collect()
}

/// Wilder-smoothed Average True Range.
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
}

impl Atr {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "ATR period must be >= 1");
        Self { period }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Compute the ATR sequence.
    ///
    /// Output is compact: `out[j]` corresponds to input bar `j + period - 1`,
    /// so the length is `bars.len() - period + 1`. The seed value `out[0]` is
    /// the mean of the first `period` true ranges; every later value follows
    /// the Wilder recurrence `(prev * (period - 1) + tr) / period`.
    pub fn compute(&self, bars: &[Bar]) -> Result<Vec<f64>, IndicatorError> {
        validate_bars(bars)?;
        if bars.len() < self.period {
            return Err(IndicatorError::InsufficientData {
                required: self.period,
                actual: bars.len(),
            });
        }

        let tr = true_range_series(bars);
        let mut out = Vec::with_capacity(bars.len() - self.period + 1);

        let seed = tr[..self.period].iter().sum::<f64>() / self.period as f64;
        out.push(seed);

        let mut prev = seed;
        for &value in &tr[self.period..] {
            let smoothed = (prev * (self.period as f64 - 1.0) + value) / self.period as f64;
            out.push(smoothed);
            prev = smoothed;
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};
    use chrono::NaiveDate;

    fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<Bar> {
        let base_date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        data.iter()
            .enumerate()
            .map(|(i, &(open, high, low, close))| Bar {
                symbol: "TEST".to_string(),
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn true_range_basic() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),  // TR = 105-95 = 10
            (102.0, 108.0, 100.0, 106.0), // TR = max(8, |108-102|, |100-102|) = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = max(9, |107-106|, |98-106|) = 9
        ]);
        let tr = true_range_series(&bars);
        assert_approx(tr[0], 10.0, DEFAULT_EPSILON);
        assert_approx(tr[1], 8.0, DEFAULT_EPSILON);
        assert_approx(tr[2], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        // Gap up: prev close 100, current bar 110-115-108
        let bars = make_ohlc_bars(&[
            (98.0, 102.0, 97.0, 100.0),
            (110.0, 115.0, 108.0, 112.0), // TR = max(7, |115-100|, |108-100|) = 15
        ]);
        let tr = true_range_series(&bars);
        assert_approx(tr[1], 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_gap_down() {
        // Gap down: prev close 100, current bar trades entirely below it.
        let bars = make_ohlc_bars(&[
            (98.0, 102.0, 97.0, 100.0),
            (90.0, 92.0, 86.0, 88.0), // TR = max(6, |92-100|, |86-100|) = 14
        ]);
        let tr = true_range_series(&bars);
        assert_approx(tr[1], 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn first_bar_uses_plain_range() {
        let bars = make_ohlc_bars(&[(100.0, 105.0, 95.0, 102.0)]);
        assert_approx(true_range(&bars[0], None), 10.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_period_3() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),  // TR = 10
            (102.0, 108.0, 100.0, 106.0), // TR = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = 9
            (99.0, 103.0, 97.0, 101.0),   // TR = 6
            (101.0, 106.0, 100.0, 105.0), // TR = 6
        ]);
        let result = Atr::new(3).compute(&bars).unwrap();

        // Seed at bar 2: mean(10, 8, 9) = 9
        // Bar 3: (9*2 + 6) / 3 = 8
        // Bar 4: (8*2 + 6) / 3 = 22/3
        assert_eq!(result.len(), 3);
        assert_approx(result[0], 9.0, DEFAULT_EPSILON);
        assert_approx(result[1], 8.0, DEFAULT_EPSILON);
        assert_approx(result[2], 22.0 / 3.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_period_1_tracks_true_range() {
        // period 1: seed = TR[0], recurrence degenerates to (prev*0 + tr)/1 = tr.
        let bars = make_bars(&[100.0, 103.0, 99.0, 104.0]);
        let tr = true_range_series(&bars);
        let result = Atr::new(1).compute(&bars).unwrap();
        assert_eq!(result.len(), bars.len());
        for (a, t) in result.iter().zip(&tr) {
            assert_approx(*a, *t, DEFAULT_EPSILON);
        }
    }

    #[test]
    fn atr_output_length() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 101.0, 103.0, 104.0, 102.0, 105.0]);
        let result = Atr::new(5).compute(&bars).unwrap();
        assert_eq!(result.len(), bars.len() - 5 + 1);
    }

    #[test]
    fn atr_insufficient_data() {
        let bars = make_bars(&[100.0, 101.0]);
        let err = Atr::new(3).compute(&bars).unwrap_err();
        assert_eq!(
            err,
            IndicatorError::InsufficientData {
                required: 3,
                actual: 2
            }
        );
    }

    #[test]
    fn atr_rejects_invalid_bar() {
        let mut bars = make_bars(&[100.0, 101.0, 102.0, 103.0]);
        bars[1].high = bars[1].low - 1.0; // inverted range
        let err = Atr::new(2).compute(&bars).unwrap_err();
        match err {
            IndicatorError::InvalidBar { index, .. } => assert_eq!(index, 1),
            other => panic!("expected InvalidBar, got {other:?}"),
        }
    }

    #[test]
    #[should_panic(expected = "ATR period must be >= 1")]
    fn atr_rejects_zero_period() {
        Atr::new(0);
    }
}
