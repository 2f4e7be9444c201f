//! TrendScan Core — true range, Wilder-smoothed ATR, the Supertrend
//! band/direction state machine, and the multi-timeframe scan that drives it.
//!
//! The engine is a pure batch transform: a fixed slice of OHLCV bars goes in,
//! a sequence of indicator points (or a per-timeframe latest-signal table)
//! comes out. No I/O, no logging, no shared mutable state.
//!
//! - Domain types (`domain::Bar`)
//! - Indicator computation (`indicators::atr`, `indicators::supertrend`)
//! - Multi-timeframe orchestration (`scan`)
//! - Deterministic synthetic series (`synthetic`) for demos, benches, tests

pub mod domain;
pub mod indicators;
pub mod scan;
pub mod synthetic;
