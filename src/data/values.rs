//! Cell helpers shared by the handlers and the chart builder.

use polars::prelude::*;

/// Whether a column holds numbers (integers or floats, booleans excluded).
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

/// Text columns, the ones offered as categorical.
pub fn is_text_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::String | DataType::Categorical(..) | DataType::Enum(..))
}

/// Display text of a cell, `None` for null. Floats print their shortest
/// round-trip form so distinct values never share a label.
pub fn cell_label(value: &AnyValue) -> Option<String> {
    match value {
        AnyValue::Null => None,
        AnyValue::String(s) => Some(s.to_string()),
        AnyValue::StringOwned(s) => Some(s.to_string()),
        AnyValue::Float64(f) => Some(format!("{f:?}")),
        AnyValue::Float32(f) => Some(format!("{f:?}")),
        other => Some(other.to_string()),
    }
}

/// Frequency of one distinct value.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

/// Distinct non-null values, most frequent first; ties keep first-appearance order.
pub fn value_counts(column: &Column) -> PolarsResult<Vec<ValueCount>> {
    let name = column.name().clone();
    let count_name = format!("{name}_count");

    let counts = DataFrame::new(vec![column.clone()])?
        .lazy()
        .filter(col(name.clone()).is_not_null())
        .group_by_stable([col(name.clone())])
        .agg([len().alias(count_name.as_str())])
        .sort(
            [count_name.as_str()],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_maintain_order(true),
        )
        .collect()?;

    let values = counts.column(name.as_str())?.as_materialized_series();
    let totals = counts.column(count_name.as_str())?.cast(&DataType::UInt64)?;
    let totals = totals.u64()?;

    (0..counts.height())
        .map(|i| {
            Ok(ValueCount {
                value: cell_label(&values.get(i)?).unwrap_or_default(),
                count: totals.get(i).unwrap_or(0) as usize,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_skip_nulls_and_quotes() {
        assert_eq!(cell_label(&AnyValue::Null), None);
        assert_eq!(cell_label(&AnyValue::String("a")), Some("a".to_string()));
        assert_eq!(cell_label(&AnyValue::Int64(7)), Some("7".to_string()));
    }

    #[test]
    fn float_labels_keep_full_precision() {
        assert_eq!(cell_label(&AnyValue::Float64(0.3)), Some("0.3".to_string()));
        assert_eq!(
            cell_label(&AnyValue::Float64(0.30000000000000004)),
            Some("0.30000000000000004".to_string())
        );
        assert_eq!(
            cell_label(&AnyValue::Float64(12345678901.6)),
            Some("12345678901.6".to_string())
        );
    }

    #[test]
    fn value_counts_sorted_by_frequency() {
        let col = Column::new(
            "s".into(),
            [Some("b"), Some("a"), None, Some("a"), Some("c"), Some("b"), Some("a")],
        );
        let counts: Vec<(String, usize)> = value_counts(&col)
            .unwrap()
            .into_iter()
            .map(|vc| (vc.value, vc.count))
            .collect();
        assert_eq!(
            counts,
            vec![("a".into(), 3), ("b".into(), 2), ("c".into(), 1)]
        );
    }

    #[test]
    fn booleans_are_not_numeric() {
        assert!(is_numeric_dtype(&DataType::UInt16));
        assert!(!is_numeric_dtype(&DataType::Boolean));
        assert!(is_text_dtype(&DataType::String));
    }

    #[test]
    fn value_counts_keep_close_floats_apart() {
        let col = Column::new(
            "v".into(),
            [0.3f64, 0.30000000000000004, 12345678901.5, 12345678901.6, 0.3],
        );
        let counts = value_counts(&col).unwrap();

        assert_eq!(counts.len(), 4);
        assert_eq!(counts[0], ValueCount { value: "0.3".into(), count: 2 });
        assert!(counts[1..].iter().all(|vc| vc.count == 1));
        assert_eq!(counts[2].value, "12345678901.5");
    }

    #[test]
    fn value_count_ties_keep_first_appearance() {
        let col = Column::new("s".into(), ["z", "y", "x", "y", "z"]);
        let order: Vec<String> = value_counts(&col)
            .unwrap()
            .into_iter()
            .map(|vc| vc.value)
            .collect();
        assert_eq!(order, vec!["z", "y", "x"]);
    }

    #[test]
    fn value_counts_of_a_column_named_count() {
        let col = Column::new("count".into(), [1i64, 1, 2]);
        let counts = value_counts(&col).unwrap();
        assert_eq!(counts[0], ValueCount { value: "1".into(), count: 2 });
    }
}
