//! Chart Builder Module
//! Computes what a chart shows: histogram bins or value frequencies.

use crate::data::{is_numeric_dtype, is_text_dtype, value_counts, ValueCount};
use crate::stats::StatsCalculator;
use polars::prelude::*;
use thiserror::Error;

/// Number of equal-width bins of every histogram.
pub const HISTOGRAM_BINS: usize = 20;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),
    #[error("Histogram needs a numeric column, '{column}' is {dtype}")]
    NotNumeric { column: String, dtype: String },
    #[error("Column '{0}' has no values to plot")]
    NoValues(String),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Chart kinds offered in the visualization menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    #[default]
    Histogram,
    BarPlot,
    PieChart,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Histogram, ChartKind::BarPlot, ChartKind::PieChart];

    pub fn label(&self) -> &'static str {
        match self {
            ChartKind::Histogram => "Histogram",
            ChartKind::BarPlot => "Bar Plot",
            ChartKind::PieChart => "Pie Chart",
        }
    }
}

/// Column names split the way the visualization section lists them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnClasses {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
}

impl ColumnClasses {
    pub fn from_dataframe(df: &DataFrame) -> Self {
        let mut classes = Self::default();
        for col in df.get_columns() {
            if is_numeric_dtype(col.dtype()) {
                classes.numeric.push(col.name().to_string());
            } else if is_text_dtype(col.dtype()) {
                classes.categorical.push(col.name().to_string());
            }
        }
        classes
    }
}

/// Equal-width bins: `edges` has one more entry than `counts`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    /// Bin values into `bins` equal-width bins over [min, max], last bin closed.
    /// A constant series spans [v - 0.5, v + 0.5].
    pub fn from_values(values: &[f64], bins: usize) -> Option<Self> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() || bins == 0 {
            return None;
        }

        let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let width = (hi - lo) / bins as f64;
        let mut edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();
        edges[bins] = hi;

        let mut counts = vec![0usize; bins];
        for v in finite {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Some(Self { edges, counts })
    }

    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    /// Center of each bin.
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }
}

/// What the visualizer draws for one column.
#[derive(Debug, Clone)]
pub enum Chart {
    Histogram { column: String, histogram: Histogram },
    Bar { column: String, counts: Vec<ValueCount> },
    Pie { column: String, counts: Vec<ValueCount> },
}

pub struct ChartBuilder;

impl ChartBuilder {
    pub fn build(df: &DataFrame, column: &str, kind: ChartKind) -> Result<Chart, ChartError> {
        let col = df
            .column(column)
            .map_err(|_| ChartError::ColumnNotFound(column.to_string()))?;
        let name = column.to_string();

        match kind {
            ChartKind::Histogram => {
                if !is_numeric_dtype(col.dtype()) {
                    return Err(ChartError::NotNumeric {
                        column: name,
                        dtype: col.dtype().to_string(),
                    });
                }
                let values = StatsCalculator::numeric_values(col)?;
                let histogram = Histogram::from_values(&values, HISTOGRAM_BINS)
                    .ok_or_else(|| ChartError::NoValues(name.clone()))?;
                Ok(Chart::Histogram {
                    column: name,
                    histogram,
                })
            }
            ChartKind::BarPlot | ChartKind::PieChart => {
                let counts = value_counts(col)?;
                if counts.is_empty() {
                    return Err(ChartError::NoValues(name));
                }
                if kind == ChartKind::BarPlot {
                    Ok(Chart::Bar { column: name, counts })
                } else {
                    Ok(Chart::Pie { column: name, counts })
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df!(
            "score" => [Some(1.0f64), Some(2.0), None, Some(10.0), Some(4.5)],
            "team" => [Some("red"), Some("blue"), Some("red"), None, Some("red")],
            "flag" => [true, false, true, true, false]
        )
        .unwrap()
    }

    #[test]
    fn histogram_always_has_twenty_bins() {
        let Chart::Histogram { histogram, .. } =
            ChartBuilder::build(&sample(), "score", ChartKind::Histogram).unwrap()
        else {
            panic!("expected histogram");
        };

        assert_eq!(histogram.counts.len(), HISTOGRAM_BINS);
        assert_eq!(histogram.edges.len(), HISTOGRAM_BINS + 1);
        assert_eq!(histogram.counts.iter().sum::<usize>(), 4);
        assert_eq!(histogram.edges[0], 1.0);
        assert_eq!(histogram.edges[HISTOGRAM_BINS], 10.0);
        // max lands in the closed last bin
        assert_eq!(histogram.counts[HISTOGRAM_BINS - 1], 1);
    }

    #[test]
    fn constant_values_get_unit_range() {
        let histogram = Histogram::from_values(&[3.0, 3.0], HISTOGRAM_BINS).unwrap();
        assert_eq!(histogram.counts.len(), HISTOGRAM_BINS);
        assert_eq!(histogram.edges[0], 2.5);
        assert_eq!(histogram.edges[HISTOGRAM_BINS], 3.5);
        assert_eq!(histogram.counts.iter().sum::<usize>(), 2);
    }

    #[test]
    fn histogram_rejects_text_columns() {
        let err = ChartBuilder::build(&sample(), "team", ChartKind::Histogram).unwrap_err();
        assert!(matches!(err, ChartError::NotNumeric { .. }));
    }

    #[test]
    fn bar_and_pie_use_value_counts() {
        let Chart::Bar { counts, .. } =
            ChartBuilder::build(&sample(), "team", ChartKind::BarPlot).unwrap()
        else {
            panic!("expected bar chart");
        };
        assert_eq!(counts[0], ValueCount { value: "red".into(), count: 3 });
        assert_eq!(counts[1], ValueCount { value: "blue".into(), count: 1 });

        let pie = ChartBuilder::build(&sample(), "flag", ChartKind::PieChart).unwrap();
        assert!(
            matches!(pie, Chart::Pie { ref column, ref counts } if column == "flag" && counts.len() == 2)
        );
    }

    #[test]
    fn unknown_column_is_reported() {
        let err = ChartBuilder::build(&sample(), "nope", ChartKind::BarPlot).unwrap_err();
        assert!(matches!(err, ChartError::ColumnNotFound(_)));
    }

    #[test]
    fn column_classes_split_numeric_and_text() {
        let classes = ColumnClasses::from_dataframe(&sample());
        assert_eq!(classes.numeric, vec!["score"]);
        assert_eq!(classes.categorical, vec!["team"]);
    }
}
