//! Charts module - chart data and rendering

mod builder;
mod plotter;

pub use builder::{Chart, ChartBuilder, ChartError, ChartKind, ColumnClasses, Histogram};
pub use plotter::ChartPlotter;
