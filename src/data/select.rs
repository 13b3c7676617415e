use serde::Serialize;

use super::model::{ColumnKind, Dataset};

// ---------------------------------------------------------------------------
// Numeric column selection
// ---------------------------------------------------------------------------

/// Names of the numeric columns, in dataset column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NumericColumnSet(Vec<String>);

impl NumericColumnSet {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        NumericColumnSet(
            dataset
                .columns
                .iter()
                .filter(|c| c.kind() == ColumnKind::Numeric)
                .map(|c| c.name.clone())
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Raw values of a column for single-column views such as the box plot.
///
/// Membership in the numeric set is the caller's job: a missing or text
/// column yields `None`.
pub fn column_values<'a>(dataset: &'a Dataset, name: &str) -> Option<&'a [Option<f64>]> {
    dataset.column(name)?.numeric_values()
}

/// Non-missing values of a numeric column.
pub fn present_values(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().flatten().copied().collect()
}
