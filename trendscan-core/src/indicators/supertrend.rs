//! Supertrend — ATR-based directional indicator.
//!
//! Inherently sequential/stateful: each bar's final bands and direction
//! depend on the previous bar's final bands, close, and direction. The
//! recurrence is carried as an explicit `PrevState` fold accumulator rather
//! than by indexing into the growing output vector.
//!
//! Output: the active band value — lower band (support) while trending up,
//! upper band (resistance) while trending down — plus the direction, the
//! flip signal, and the band/ATR values for the bar.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::atr::Atr;
use super::{validate_bars, IndicatorError};
use crate::domain::Bar;

/// Prevailing trend side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Transition signal. Buy/Sell fire only on the bar where the direction
/// flips; every other bar holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "buy"),
            Signal::Sell => write!(f, "sell"),
            Signal::Hold => write!(f, "hold"),
        }
    }
}

/// Supertrend state for one bar.
///
/// `value` is the active band plotted against price. `upper_band` and
/// `lower_band` are the final (ratchet-adjusted) bands, not the basic ones.
/// `date` and `close` identify the bar so the latest point is
/// self-describing for callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupertrendPoint {
    pub date: chrono::NaiveDate,
    pub close: f64,
    pub value: f64,
    pub direction: Direction,
    pub signal: Signal,
    pub atr: f64,
    pub upper_band: f64,
    pub lower_band: f64,
}

/// Carried state of the recurrence: everything bar i+1 needs from bar i.
#[derive(Debug, Clone, Copy)]
struct PrevState {
    direction: Direction,
    final_upper: f64,
    final_lower: f64,
    close: f64,
}

/// Supertrend band/direction state machine.
#[derive(Debug, Clone)]
pub struct Supertrend {
    period: usize,
    factor: f64,
}

impl Supertrend {
    pub fn new(period: usize, factor: f64) -> Self {
        assert!(period >= 1, "Supertrend period must be >= 1");
        assert!(factor > 0.0, "Supertrend factor must be > 0");
        Self { period, factor }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    /// Run the state machine over `bars`.
    ///
    /// Produces one point per bar from index `period - 1` onward (length
    /// `bars.len() - period + 1`), aligned one-to-one with the ATR output.
    /// Fails with `InsufficientData` when fewer than `period + 1` bars are
    /// supplied, and with `InvalidBar` when a bar violates the OHLC
    /// invariant.
    pub fn compute(&self, bars: &[Bar]) -> Result<Vec<SupertrendPoint>, IndicatorError> {
        validate_bars(bars)?;
        if bars.len() < self.period + 1 {
            return Err(IndicatorError::InsufficientData {
                required: self.period + 1,
                actual: bars.len(),
            });
        }

        let atr = Atr::new(self.period).compute(bars)?;
        let start = self.period - 1;

        let mut out = Vec::with_capacity(bars.len() - start);
        let mut prev: Option<PrevState> = None;

        for (j, bar) in bars[start..].iter().enumerate() {
            let atr_value = atr[j];
            let hl2 = (bar.high + bar.low) / 2.0;
            let basic_upper = hl2 + self.factor * atr_value;
            let basic_lower = hl2 - self.factor * atr_value;

            // Ratchet: a band only moves toward price unless the previous
            // close already broke through it. Skipped on the first eligible
            // bar, where final = basic.
            let (final_upper, final_lower) = match prev {
                None => (basic_upper, basic_lower),
                Some(p) => {
                    let upper = if basic_upper < p.final_upper || p.close > p.final_upper {
                        basic_upper
                    } else {
                        p.final_upper
                    };
                    let lower = if basic_lower > p.final_lower || p.close < p.final_lower {
                        basic_lower
                    } else {
                        p.final_lower
                    };
                    (upper, lower)
                }
            };

            // Direction state machine over {Up, Down}. The four transition
            // arms partition direction x (close vs band) with complementary
            // strict/non-strict comparisons, so the match is exhaustive
            // without a fallback arm.
            let (direction, value, signal) = match prev {
                None => {
                    let direction = if bar.close <= final_lower {
                        Direction::Down
                    } else {
                        Direction::Up
                    };
                    let value = match direction {
                        Direction::Up => final_lower,
                        Direction::Down => final_upper,
                    };
                    (direction, value, Signal::Hold)
                }
                Some(p) => match p.direction {
                    Direction::Up if bar.close > final_lower => {
                        (Direction::Up, final_lower, Signal::Hold)
                    }
                    Direction::Up => (Direction::Down, final_upper, Signal::Sell),
                    Direction::Down if bar.close < final_upper => {
                        (Direction::Down, final_upper, Signal::Hold)
                    }
                    Direction::Down => (Direction::Up, final_lower, Signal::Buy),
                },
            };

            out.push(SupertrendPoint {
                date: bar.date,
                close: bar.close,
                value,
                direction,
                signal,
                atr: atr_value,
                upper_band: final_upper,
                lower_band: final_lower,
            });

            prev = Some(PrevState {
                direction,
                final_upper,
                final_lower,
                close: bar.close,
            });
        }

        Ok(out)
    }
}
