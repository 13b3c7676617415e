use serde::Serialize;

use super::model::Dataset;

// ---------------------------------------------------------------------------
// Missing-value report
// ---------------------------------------------------------------------------

/// Missing cells in one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingCount {
    pub column: String,
    pub missing: usize,
}

/// Per-column missing-value counts, in dataset column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingReport {
    pub counts: Vec<MissingCount>,
    pub is_clean: bool,
}

impl MissingReport {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let counts: Vec<MissingCount> = dataset
            .columns
            .iter()
            .map(|col| MissingCount {
                column: col.name.clone(),
                missing: col.missing_count(),
            })
            .collect();
        let is_clean = counts.iter().all(|c| c.missing == 0);
        MissingReport { counts, is_clean }
    }

    /// Missing cells across all columns.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|c| c.missing).sum()
    }

    pub fn get(&self, column: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.missing)
    }
}
