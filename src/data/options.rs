/// Cell texts treated as missing values in every column.
pub const DEFAULT_NA_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "#N/A", "<NA>",
];

/// Knobs for ingestion and the preview artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOptions {
    /// Rows shown in the raw data preview.
    pub preview_rows: usize,
    /// Field delimiter (default: comma).
    pub delimiter: u8,
    /// Cell texts counted as missing, compared after trimming whitespace.
    pub na_markers: Vec<String>,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            preview_rows: 5,
            delimiter: b',',
            na_markers: DEFAULT_NA_MARKERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PipelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = rows;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_na_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.na_markers = markers.into_iter().map(Into::into).collect();
        self
    }

    /// Whether a raw cell counts as missing.
    pub fn is_na(&self, cell: &str) -> bool {
        let cell = cell.trim();
        // An all-blank cell is always missing, whatever the marker list says.
        cell.is_empty() || self.na_markers.iter().any(|m| m == cell)
    }
}
