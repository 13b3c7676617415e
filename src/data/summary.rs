use serde::Serialize;

use super::model::Dataset;
use super::select::{NumericColumnSet, present_values};

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

/// One row of the describe table.
///
/// Statistics that are undefined for the column (e.g. `std` of a single
/// value) are NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DescribeRow {
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

/// Describe every numeric column, in dataset order.  Text columns are skipped.
pub fn describe(dataset: &Dataset, numeric: &NumericColumnSet) -> Vec<DescribeRow> {
    numeric
        .iter()
        .filter_map(|name| {
            let values = dataset.column(name)?.numeric_values()?;
            Some(describe_values(name, values))
        })
        .collect()
}

/// Statistics over the non-missing values of one column.
pub fn describe_values(name: &str, values: &[Option<f64>]) -> DescribeRow {
    let mut sorted = present_values(values);
    sorted.sort_by(f64::total_cmp);

    let count = sorted.len();
    let (mean, std) = mean_and_std(&sorted);

    DescribeRow {
        column: name.to_string(),
        count,
        mean,
        std,
        min: sorted.first().copied().unwrap_or(f64::NAN),
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted.last().copied().unwrap_or(f64::NAN),
    }
}

/// Mean and sample standard deviation (N-1 denominator).
fn mean_and_std(values: &[f64]) -> (f64, f64) {
    let n = values.len();
    if n == 0 {
        return (f64::NAN, f64::NAN);
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    if n < 2 {
        return (mean, f64::NAN);
    }
    let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (mean, (ss / (n - 1) as f64).sqrt())
}

/// Quantile of already sorted data using linear interpolation between the
/// two closest ranks.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let pos = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lo = pos.floor() as usize;
            let hi = pos.ceil() as usize;
            let frac = pos - lo as f64;
            sorted[lo] + (sorted[hi] - sorted[lo]) * frac
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Column;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_describe_basic() {
        let row = describe_values("x", &[Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
        assert_eq!(row.count, 4);
        assert!(approx(row.mean, 2.5));
        assert!(approx(row.std, (5.0f64 / 3.0).sqrt()));
        assert_eq!(row.min, 1.0);
        assert!(approx(row.q25, 1.75));
        assert!(approx(row.median, 2.5));
        assert!(approx(row.q75, 3.25));
        assert_eq!(row.max, 4.0);
    }

    #[test]
    fn test_describe_skips_missing() {
        let row = describe_values("b", &[Some(2.0), None, Some(6.0)]);
        assert_eq!(row.count, 2);
        assert!(approx(row.mean, 4.0));
        assert!(approx(row.median, 4.0));
        assert!(approx(row.std, 8.0f64.sqrt()));
    }

    #[test]
    fn test_quartiles_are_ordered() {
        let values: Vec<Option<f64>> = [9.0, -3.0, 4.5, 0.0, 12.0, 7.25, 4.5]
            .iter()
            .map(|v| Some(*v))
            .collect();
        let row = describe_values("v", &values);
        assert!(row.min <= row.q25);
        assert!(row.q25 <= row.median);
        assert!(row.median <= row.q75);
        assert!(row.q75 <= row.max);
        assert_eq!(row.median, 4.5);
    }

    #[test]
    fn test_degenerate_columns() {
        let single = describe_values("s", &[Some(7.0)]);
        assert_eq!(single.count, 1);
        assert_eq!(single.mean, 7.0);
        assert!(single.std.is_nan());
        assert_eq!(single.q25, 7.0);

        let empty = describe_values("e", &[None, None]);
        assert_eq!(empty.count, 0);
        assert!(empty.mean.is_nan());
        assert!(empty.min.is_nan());
        assert!(empty.max.is_nan());
    }

    #[test]
    fn test_describe_only_numeric_columns() {
        let ds = Dataset::from_columns(vec![
            Column::text("name", vec![Some("a".into()), Some("b".into())]),
            Column::numeric("x", vec![Some(1.0), Some(3.0)]),
        ]);
        let rows = describe(&ds, &NumericColumnSet::from_dataset(&ds));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].column, "x");
    }

    #[test]
    fn test_describe_empty_numeric_set() {
        let ds = Dataset::from_columns(vec![Column::text("t", vec![Some("a".into())])]);
        assert!(describe(&ds, &NumericColumnSet::from_dataset(&ds)).is_empty());
    }
}
