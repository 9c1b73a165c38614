//! Missing-Value Handler
//! Reports, fills and drops null entries across the whole table.

use polars::prelude::*;

/// Null count of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingCount {
    pub column: String,
    pub missing: usize,
}

/// Per-column null counts plus the rows holding at least one null.
#[derive(Debug, Clone)]
pub struct MissingReport {
    pub counts: Vec<MissingCount>,
    pub rows: DataFrame,
    /// Position of each of `rows` in the table it was taken from.
    pub positions: Vec<usize>,
}

impl MissingReport {
    pub fn total_missing(&self) -> usize {
        self.counts.iter().map(|c| c.missing).sum()
    }
}

/// Handles null reporting and cleaning.
pub struct MissingValueHandler;

impl MissingValueHandler {
    pub fn missing_counts(df: &DataFrame) -> Vec<MissingCount> {
        df.get_columns()
            .iter()
            .map(|col| MissingCount {
                column: col.name().to_string(),
                missing: col.null_count(),
            })
            .collect()
    }

    /// True for every row holding a null in any column.
    pub fn missing_mask(df: &DataFrame) -> BooleanChunked {
        df.get_columns().iter().fold(
            BooleanChunked::full("missing".into(), false, df.height()),
            |mask, col| &mask | &col.as_materialized_series().is_null(),
        )
    }

    pub fn report(df: &DataFrame) -> PolarsResult<MissingReport> {
        let mask = Self::missing_mask(df);
        let positions = IdxCa::from_vec("position".into(), (0..df.height() as IdxSize).collect())
            .filter(&mask)?
            .into_no_null_iter()
            .map(|pos| pos as usize)
            .collect();

        Ok(MissingReport {
            counts: Self::missing_counts(df),
            rows: df.filter(&mask)?,
            positions,
        })
    }

    /// Remove every row holding a null. Returns the number of rows removed.
    pub fn drop_missing_values(df: &mut DataFrame) -> PolarsResult<usize> {
        let before = df.height();
        *df = df.drop_nulls::<String>(None)?;
        let dropped = before - df.height();

        log::debug!("Dropped {dropped} rows with missing values");
        Ok(dropped)
    }

    /// Replace every null with `value`. Returns the number of cells filled.
    ///
    /// Numeric columns stay numeric when `value` is a finite number: integer
    /// columns keep their type for an integer that fits it and widen to
    /// Float64 otherwise. Any other column is converted to text and receives
    /// the literal as typed.
    pub fn fill_missing_values(df: &mut DataFrame, value: &str) -> PolarsResult<usize> {
        let targets: Vec<Column> = df
            .get_columns()
            .iter()
            .filter(|col| col.null_count() > 0)
            .cloned()
            .collect();

        let mut filled = 0;
        for col in targets {
            filled += col.null_count();
            df.with_column(Self::fill_column(&col, value)?)?;
        }

        log::debug!("Filled {filled} missing cells with {value:?}");
        Ok(filled)
    }

    fn fill_column(col: &Column, value: &str) -> PolarsResult<Column> {
        let series = col.as_materialized_series();
        let dtype = series.dtype().clone();
        let number = value.parse::<f64>().ok().filter(|n| n.is_finite());

        let filled = match number {
            Some(number) if dtype.is_integer() => match Self::integer_fill(value, &dtype) {
                Some(fill) => Self::fill_nulls(series, &fill)?,
                None => {
                    let widened = series.cast(&DataType::Float64)?;
                    Self::fill_nulls(&widened, &Series::new("fill".into(), [number]))?
                }
            },
            Some(number) if dtype.is_float() => {
                let fill = Series::new("fill".into(), [number]).cast(&dtype)?;
                Self::fill_nulls(series, &fill)?
            }
            _ => {
                let text = series.cast(&DataType::String)?;
                Self::fill_nulls(&text, &Series::new("fill".into(), [value]))?
            }
        };
        Ok(filled.into())
    }

    /// `value` as a one-element series of `dtype`, if it is an integer that fits.
    fn integer_fill(value: &str, dtype: &DataType) -> Option<Series> {
        let int = value.parse::<i64>().ok()?;
        Series::new("fill".into(), [int]).strict_cast(dtype).ok()
    }

    /// Nulls of `series` take the single value of `fill`; other cells are kept as is.
    fn fill_nulls(series: &Series, fill: &Series) -> PolarsResult<Series> {
        let present = series.is_not_null();
        series.zip_with(&present, &fill.new_from_index(0, series.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataFrame {
        df!(
            "a" => [Some(1i64), None, Some(3)],
            "b" => [Some("x"), Some("y"), None],
            "c" => [1.5f64, 2.5, 3.5]
        )
        .unwrap()
    }

    fn strings(df: &DataFrame, name: &str) -> Vec<Option<String>> {
        df.column(name)
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect()
    }

    #[test]
    fn report_counts_nulls_and_collects_rows() {
        let report = MissingValueHandler::report(&sample()).unwrap();

        assert_eq!(
            report.counts,
            vec![
                MissingCount { column: "a".into(), missing: 1 },
                MissingCount { column: "b".into(), missing: 1 },
                MissingCount { column: "c".into(), missing: 0 },
            ]
        );
        assert_eq!(report.total_missing(), 2);
        assert_eq!(report.rows.height(), 2);
        assert_eq!(report.positions, vec![1, 2]);
    }

    #[test]
    fn drop_removes_rows_with_any_null() {
        let mut df = df!("a" => [Some(1i64), None, Some(3)]).unwrap();

        let dropped = MissingValueHandler::drop_missing_values(&mut df).unwrap();

        assert_eq!(dropped, 1);
        assert_eq!(df.height(), 2);
        let values: Vec<Option<i64>> = df.column("a").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1), Some(3)]);
        assert_eq!(MissingValueHandler::report(&df).unwrap().total_missing(), 0);
    }

    #[test]
    fn drop_on_whole_table() {
        let mut df = sample();
        MissingValueHandler::drop_missing_values(&mut df).unwrap();
        assert_eq!(df.height(), 1);
    }

    #[test]
    fn fill_with_text_turns_column_into_text() {
        let mut df = df!("a" => [Some(1i64), None, Some(3)]).unwrap();

        let filled = MissingValueHandler::fill_missing_values(&mut df, "x").unwrap();

        assert_eq!(filled, 1);
        assert_eq!(
            strings(&df, "a"),
            vec![Some("1".into()), Some("x".into()), Some("3".into())]
        );
    }

    #[test]
    fn fill_with_number_keeps_numeric_columns() {
        let mut df = sample();

        MissingValueHandler::fill_missing_values(&mut df, "0").unwrap();

        let a = df.column("a").unwrap();
        assert_eq!(a.dtype(), &DataType::Int64);
        let values: Vec<Option<i64>> = a.i64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1), Some(0), Some(3)]);
        assert_eq!(
            strings(&df, "b"),
            vec![Some("x".into()), Some("y".into()), Some("0".into())]
        );
        // untouched: no nulls
        assert_eq!(df.column("c").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn fractional_fill_widens_integer_column() {
        let mut df = df!("a" => [Some(1i64), None]).unwrap();

        MissingValueHandler::fill_missing_values(&mut df, "0.5").unwrap();

        let values: Vec<Option<f64>> = df.column("a").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(1.0), Some(0.5)]);
    }

    #[test]
    fn fill_leaves_no_missing_entries() {
        let mut df = sample();
        MissingValueHandler::fill_missing_values(&mut df, "xf").unwrap();
        assert_eq!(MissingValueHandler::report(&df).unwrap().total_missing(), 0);
        assert_eq!(df.height(), 3);
    }

    #[test]
    fn fill_leaves_large_integers_exact() {
        let mut df = df!("a" => [Some(9007199254740993i64), None]).unwrap();

        MissingValueHandler::fill_missing_values(&mut df, "0").unwrap();

        let a = df.column("a").unwrap();
        assert_eq!(a.dtype(), &DataType::Int64);
        let values: Vec<Option<i64>> = a.i64().unwrap().into_iter().collect();
        assert_eq!(values, vec![Some(9007199254740993), Some(0)]);
    }

    #[test]
    fn non_finite_or_padded_numbers_fill_as_text() {
        let mut df = df!("f" => [Some(1.5f64), None]).unwrap();
        MissingValueHandler::fill_missing_values(&mut df, "nan").unwrap();
        assert_eq!(strings(&df, "f"), vec![Some("1.5".into()), Some("nan".into())]);

        let mut df = df!("i" => [Some(2i64), None]).unwrap();
        MissingValueHandler::fill_missing_values(&mut df, " 5 ").unwrap();
        assert_eq!(strings(&df, "i"), vec![Some("2".into()), Some(" 5 ".into())]);
    }

    #[test]
    fn report_positions_follow_source_rows() {
        let df = df!(
            "a" => [Some(1i64), Some(2), None, Some(4), None],
            "b" => [Some("p"), None, Some("q"), Some("r"), Some("s")]
        )
        .unwrap();

        let report = MissingValueHandler::report(&df).unwrap();

        assert_eq!(report.positions, vec![1, 2, 4]);
        assert_eq!(report.rows.height(), 3);
    }
}
