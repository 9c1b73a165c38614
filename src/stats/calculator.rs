//! Statistics Calculator Module
//! Descriptive statistics per column and inferred column types.

use crate::data::{is_numeric_dtype, value_counts};
use polars::prelude::*;
use rayon::prelude::*;
use statrs::statistics::Statistics;

/// Summary of one numeric column.
#[derive(Debug, Clone)]
pub struct ColumnStats {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl Default for ColumnStats {
    fn default() -> Self {
        Self {
            column: String::new(),
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        }
    }
}

impl ColumnStats {
    /// Row labels of the rendered table, in display order.
    pub const LABELS: [&'static str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

    pub fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
        ]
    }
}

/// Summary of a non-numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalSummary {
    pub column: String,
    pub count: usize,
    pub unique: usize,
    pub top: Option<String>,
    pub freq: usize,
}

/// Result of `describe`: numeric columns when any exist, otherwise every column
/// summarised as categorical.
#[derive(Debug, Clone)]
pub enum StatsTable {
    Numeric(Vec<ColumnStats>),
    Categorical(Vec<CategoricalSummary>),
}

/// Inferred type of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnType {
    pub column: String,
    pub dtype: String,
}

pub struct StatsCalculator;

impl StatsCalculator {
    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> ColumnStats {
        let n = values.len();
        if n == 0 {
            return ColumnStats::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        ColumnStats {
            column: String::new(),
            count: n,
            mean: values.iter().mean(),
            std: values.iter().std_dev(),
            min: sorted[0],
            q25: Self::percentile(&sorted, 25.0),
            median: Self::percentile(&sorted, 50.0),
            q75: Self::percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// Calculate percentile using linear interpolation (NumPy compatible).
    fn percentile(sorted_values: &[f64], p: f64) -> f64 {
        let n = sorted_values.len();
        if n == 0 {
            return f64::NAN;
        }
        if n == 1 {
            return sorted_values[0];
        }

        let rank = (p / 100.0) * (n - 1) as f64;
        let lower = rank.floor() as usize;
        let upper = (rank.ceil() as usize).min(n - 1);
        let frac = rank - lower as f64;

        if lower == upper {
            sorted_values[lower]
        } else {
            sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
        }
    }

    /// Non-null values of a numeric column as f64.
    pub fn numeric_values(col: &Column) -> PolarsResult<Vec<f64>> {
        Ok(col
            .cast(&DataType::Float64)?
            .f64()?
            .into_iter()
            .flatten()
            .collect())
    }

    pub fn column_stats(col: &Column) -> PolarsResult<ColumnStats> {
        let values = Self::numeric_values(col)?;
        let mut stats = Self::compute_descriptive_stats(&values);
        stats.column = col.name().to_string();
        Ok(stats)
    }

    pub fn categorical_summary(col: &Column) -> PolarsResult<CategoricalSummary> {
        let counts = value_counts(col)?;
        let top = counts.first();
        Ok(CategoricalSummary {
            column: col.name().to_string(),
            count: col.len() - col.null_count(),
            unique: counts.len(),
            top: top.map(|vc| vc.value.clone()),
            freq: top.map(|vc| vc.count).unwrap_or(0),
        })
    }

    /// Describe the table, one entry per column, computed in parallel.
    pub fn describe(df: &DataFrame) -> PolarsResult<StatsTable> {
        let numeric: Vec<&Column> = df
            .get_columns()
            .iter()
            .filter(|col| is_numeric_dtype(col.dtype()))
            .collect();

        if numeric.is_empty() {
            let summaries = df
                .get_columns()
                .par_iter()
                .map(Self::categorical_summary)
                .collect::<PolarsResult<Vec<_>>>()?;
            return Ok(StatsTable::Categorical(summaries));
        }

        let stats = numeric
            .par_iter()
            .map(|col| Self::column_stats(col))
            .collect::<PolarsResult<Vec<_>>>()?;
        Ok(StatsTable::Numeric(stats))
    }

    pub fn data_types(df: &DataFrame) -> Vec<ColumnType> {
        df.get_columns()
            .iter()
            .map(|col| ColumnType {
                column: col.name().to_string(),
                dtype: col.dtype().to_string(),
            })
            .collect()
    }
}
