use serde::Serialize;

use super::model::Dataset;
use super::select::NumericColumnSet;

// ---------------------------------------------------------------------------
// Correlation matrix
// ---------------------------------------------------------------------------

/// Square, symmetric matrix of Pearson coefficients between numeric columns.
///
/// A cell is NaN when the coefficient is undefined for that pair (zero
/// variance or fewer than two paired observations).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Pairwise-complete Pearson correlation over the given columns.
    pub fn compute(dataset: &Dataset, numeric: &NumericColumnSet) -> Self {
        let series: Vec<(String, &[Option<f64>])> = numeric
            .iter()
            .filter_map(|name| {
                let values = dataset.column(name)?.numeric_values()?;
                Some((name.to_string(), values))
            })
            .collect();

        let n = series.len();
        let mut values = vec![vec![f64::NAN; n]; n];
        for i in 0..n {
            let xi = series[i].1;
            values[i][i] = if pearson(xi, xi).is_nan() { f64::NAN } else { 1.0 };
            for j in (i + 1)..n {
                let r = pearson(xi, series[j].1);
                values[i][j] = r;
                values[j][i] = r;
            }
        }

        CorrelationMatrix {
            columns: series.into_iter().map(|(name, _)| name).collect(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Coefficient for a pair of column names.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }
}

/// Pearson correlation over the rows where both values are present.
pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();

    let n = pairs.len();
    if n < 2 {
        return f64::NAN;
    }

    // Exact equality, not the accumulated sums: a constant 0.1 column still
    // leaves rounding residue in sxx.
    if is_constant(pairs.iter().map(|p| p.0)) || is_constant(pairs.iter().map(|p| p.1)) {
        return f64::NAN;
    }

    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n as f64;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for &(a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0)
}

fn is_constant(mut values: impl Iterator<Item = f64>) -> bool {
    match values.next() {
        Some(first) => values.all(|v| v == first),
        None => true,
    }
}

// ---------------------------------------------------------------------------
// Relationship analysis outcome
// ---------------------------------------------------------------------------

/// Either a correlation matrix or the reason none was computed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Relationships {
    Available(CorrelationMatrix),
    Unavailable { reason: String },
}

impl Relationships {
    /// Correlate the numeric columns, or skip when there are fewer than two.
    pub fn analyze(dataset: &Dataset, numeric: &NumericColumnSet) -> Self {
        if numeric.len() < 2 {
            log::debug!(
                "Skipping correlation: {} numeric column(s)",
                numeric.len()
            );
            let reason = if numeric.is_empty() {
                "No numerical columns found for relationship analysis.".to_string()
            } else {
                "At least two numerical columns are needed for a correlation matrix.".to_string()
            };
            return Relationships::Unavailable { reason };
        }
        Relationships::Available(CorrelationMatrix::compute(dataset, numeric))
    }

    pub fn matrix(&self) -> Option<&CorrelationMatrix> {
        match self {
            Relationships::Available(m) => Some(m),
            Relationships::Unavailable { .. } => None,
        }
    }
}
