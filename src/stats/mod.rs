//! Stats module - descriptive statistics and column types

mod calculator;

pub use calculator::{ColumnStats, ColumnType, StatsCalculator, StatsTable};
