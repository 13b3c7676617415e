use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use super::correlation::Relationships;
use super::error::ParseError;
use super::loader;
use super::model::{CellValue, ColumnKind, Dataset};
use super::options::PipelineOptions;
use super::select::{NumericColumnSet, column_values};
use super::summary::{DescribeRow, describe};
use super::validate::MissingReport;

// ---------------------------------------------------------------------------
// Artifacts handed to the display surface
// ---------------------------------------------------------------------------

/// The first rows of the dataset, all columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub columns: Vec<String>,
    pub kinds: Vec<ColumnKind>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Preview {
    fn from_head(head: &Dataset) -> Self {
        Preview {
            columns: head.column_names(),
            kinds: head.columns.iter().map(|c| c.kind()).collect(),
            rows: (0..head.len()).map(|i| head.row(i)).collect(),
        }
    }
}

/// Everything derived from one dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    pub rows: usize,
    pub columns: usize,
    pub preview: Preview,
    pub missing: MissingReport,
    pub describe: Vec<DescribeRow>,
    pub numeric_columns: NumericColumnSet,
    pub relationships: Relationships,
}

impl Analysis {
    /// Validate, summarize and correlate a dataset.
    pub fn of(dataset: &Dataset, options: &PipelineOptions) -> Self {
        let numeric_columns = NumericColumnSet::from_dataset(dataset);
        let head = dataset.head(options.preview_rows);

        Analysis {
            rows: dataset.len(),
            columns: dataset.width(),
            preview: Preview::from_head(&head),
            missing: MissingReport::from_dataset(dataset),
            describe: describe(dataset, &numeric_columns),
            relationships: Relationships::analyze(dataset, &numeric_columns),
            numeric_columns,
        }
    }

    /// Describe row for a column, if it is numeric.
    pub fn describe_row(&self, column: &str) -> Option<&DescribeRow> {
        self.describe.iter().find(|r| r.column == column)
    }
}

// ---------------------------------------------------------------------------
// Session – one opened file and its artifacts
// ---------------------------------------------------------------------------

/// A dataset together with its analysis.  Replaced wholesale on every open.
#[derive(Debug, Clone)]
pub struct Session {
    pub source: Option<PathBuf>,
    pub dataset: Dataset,
    pub analysis: Analysis,
}

impl Session {
    pub fn new(source: Option<PathBuf>, dataset: Dataset, options: &PipelineOptions) -> Self {
        let analysis = Analysis::of(&dataset, options);
        log::info!(
            "Analysis ready: {} numeric column(s), {} missing cell(s)",
            analysis.numeric_columns.len(),
            analysis.missing.total()
        );
        Session {
            source,
            dataset,
            analysis,
        }
    }

    /// Run the whole pipeline over uploaded bytes.
    pub fn from_bytes(bytes: &[u8], options: &PipelineOptions) -> Result<Self, ParseError> {
        let dataset = loader::parse_csv(bytes, options)?;
        Ok(Self::new(None, dataset, options))
    }

    /// Run the whole pipeline over a file on disk.
    pub fn open(path: &Path, options: &PipelineOptions) -> Result<Self> {
        let dataset = loader::load_file(path, options)
            .with_context(|| format!("loading {}", path.display()))?;
        Ok(Self::new(Some(path.to_path_buf()), dataset, options))
    }

    /// File name for display, if the session came from disk.
    pub fn source_name(&self) -> Option<String> {
        self.source
            .as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
    }

    /// Raw values of a column for the distribution view.
    pub fn column_values(&self, name: &str) -> Option<&[Option<f64>]> {
        column_values(&self.dataset, name)
    }

    /// Write the analysis as pretty-printed JSON.
    pub fn export_report(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(std::io::BufWriter::new(file), &self.analysis)
            .context("writing JSON report")?;
        log::info!("Exported report to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str) -> Result<Session, ParseError> {
        Session::from_bytes(text.as_bytes(), &PipelineOptions::default())
    }

    #[test]
    fn test_missing_cell_scenario() {
        let session = run("a,b\n1,2\n3,\n5,6").unwrap();
        let analysis = &session.analysis;

        assert_eq!(analysis.missing.get("a"), Some(0));
        assert_eq!(analysis.missing.get("b"), Some(1));
        assert!(!analysis.missing.is_clean);
        assert_eq!(analysis.describe_row("b").unwrap().count, 2);
        assert_eq!(analysis.describe_row("a").unwrap().count, 3);
        assert_eq!(
            analysis.numeric_columns.iter().collect::<Vec<_>>(),
            vec!["a", "b"]
        );
        assert!(analysis.relationships.matrix().is_some());
    }

    #[test]
    fn test_all_text_scenario() {
        let session = run("name,city\nAlice,Paris\nBob,Rome").unwrap();
        let analysis = &session.analysis;

        assert!(analysis.numeric_columns.is_empty());
        assert!(analysis.describe.is_empty());
        assert!(matches!(
            analysis.relationships,
            Relationships::Unavailable { .. }
        ));
        assert!(analysis.missing.is_clean);
    }

    #[test]
    fn test_malformed_input_yields_no_artifacts() {
        let err = run("a,b\n1,2\n3\n").unwrap_err();
        assert!(matches!(err, ParseError::ColumnCount { .. }));
    }

    #[test]
    fn test_preview_is_first_rows() {
        let text = "id,name\n1,a\n2,b\n3,c\n4,d\n5,e\n6,f\n7,g";
        let session = run(text).unwrap();
        let preview = &session.analysis.preview;

        assert_eq!(preview.columns, vec!["id", "name"]);
        assert_eq!(preview.rows.len(), 5);
        assert_eq!(preview.rows[0], vec![CellValue::Number(1.0), CellValue::Text("a".into())]);
        assert_eq!(preview.rows[4][1], CellValue::Text("e".into()));
    }

    #[test]
    fn test_head_reingests_to_same_records() {
        let text = "x,label,y\n1.5,a,\n2,\"b, c\",7\n-3,d,8.25\n4,e,9\n5,f,10\n6,g,11\n";
        let opts = PipelineOptions::default();
        let session = Session::from_bytes(text.as_bytes(), &opts).unwrap();
        let head = session.dataset.head(5);

        let mut buf = Vec::new();
        head.write_csv(&mut buf).unwrap();
        let reparsed = loader::parse_csv(&buf, &opts).unwrap();

        assert_eq!(reparsed, head);
        assert_eq!(reparsed.column_names(), vec!["x", "label", "y"]);
    }

    #[test]
    fn test_head_of_late_text_column_reingests_as_numeric() {
        let text = "id,code\n1,007\n2,008\n3,009\n4,010\n5,011\n6,x1\n";
        let opts = PipelineOptions::default();
        let session = Session::from_bytes(text.as_bytes(), &opts).unwrap();
        let head = session.dataset.head(5);
        assert_eq!(head.column("code").unwrap().kind(), ColumnKind::Text);

        let mut buf = Vec::new();
        head.write_csv(&mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf.clone()).unwrap(),
            "id,code\n1,007\n2,008\n3,009\n4,010\n5,011\n"
        );

        // Same records, but the head alone no longer carries the text evidence.
        let reparsed = loader::parse_csv(&buf, &opts).unwrap();
        let code = reparsed.column("code").unwrap();
        assert_eq!(code.kind(), ColumnKind::Numeric);
        assert_eq!(
            code.numeric_values().unwrap(),
            &[Some(7.0), Some(8.0), Some(9.0), Some(10.0), Some(11.0)]
        );
    }

    #[test]
    fn test_runs_are_isolated() {
        assert!(run("a,b\n\"oops\n").is_err());
        let session = run("a\n1\n2").unwrap();
        assert_eq!(session.analysis.rows, 2);
    }

    #[test]
    fn test_open_and_export_report() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("data.csv");
        std::fs::write(&csv_path, "a,b,t\n1,2,x\n2,,y\n3,3,z\n").unwrap();

        let session = Session::open(&csv_path, &PipelineOptions::default()).unwrap();
        assert_eq!(session.source_name().as_deref(), Some("data.csv"));
        assert_eq!(session.column_values("b"), Some(&[Some(2.0), None, Some(3.0)][..]));

        let report_path = dir.path().join("report.json");
        session.export_report(&report_path).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();

        assert_eq!(json["rows"], 3);
        assert_eq!(json["missing"]["is_clean"], false);
        assert_eq!(json["numeric_columns"], serde_json::json!(["a", "b"]));
        assert_eq!(json["relationships"]["status"], "available");
        assert_eq!(json["preview"]["rows"][1][1], serde_json::Value::Null);
    }

    #[test]
    fn test_open_reports_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "").unwrap();
        let err = Session::open(&path, &PipelineOptions::default()).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("bad.csv"));
        assert!(msg.contains("empty"));
    }
}
