//! Duplicate Handler
//! Per-column duplicate detection: a cell is a duplicate when an equal value
//! appears earlier in the same column. Nulls compare equal to each other.

use polars::prelude::*;

/// Duplicate count of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateCount {
    pub column: String,
    pub duplicates: usize,
}

pub struct DuplicateHandler;

impl DuplicateHandler {
    /// Boolean view of the table; the input is left untouched.
    pub fn duplicate_flags(df: &DataFrame) -> PolarsResult<DataFrame> {
        let flags: Vec<Expr> = df
            .get_column_names()
            .into_iter()
            .map(|name| col(name.clone()).is_first_distinct().not())
            .collect();
        df.clone().lazy().select(flags).collect()
    }

    pub fn count_duplicates(df: &DataFrame) -> PolarsResult<Vec<DuplicateCount>> {
        Self::duplicate_flags(df)?
            .get_columns()
            .iter()
            .map(|flags| {
                Ok(DuplicateCount {
                    column: flags.name().to_string(),
                    duplicates: flags.as_materialized_series().bool()?.num_trues(),
                })
            })
            .collect()
    }

    /// For each column in order, drop rows repeating a value of that column,
    /// keeping the last occurrence. Returns the number of rows removed.
    pub fn drop_duplicates(df: &mut DataFrame) -> PolarsResult<usize> {
        let before = df.height();
        let names: Vec<PlSmallStr> = df.get_column_names().into_iter().cloned().collect();

        for name in &names {
            *df = df
                .clone()
                .lazy()
                .filter(col(name.clone()).is_last_distinct())
                .collect()?;
        }

        let dropped = before - df.height();
        log::debug!("Dropped {dropped} duplicate rows across {} columns", names.len());
        Ok(dropped)
    }
}
