use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::error::ParseError;
use super::model::{Column, ColumnData, Dataset};
use super::options::PipelineOptions;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – delimited text with a header row
/// * `.parquet`      – flat table of numeric, string or boolean columns
pub fn load_file(path: &Path, options: &PipelineOptions) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" | "txt" => {
            let bytes = std::fs::read(path).context("reading CSV file")?;
            Ok(parse_csv(&bytes, options)?)
        }
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV decoder
// ---------------------------------------------------------------------------

/// Decode delimited text into a [`Dataset`].
///
/// The first record is the header.  Each column is numeric when every
/// non-missing cell parses as a number, otherwise text.  The whole input is
/// rejected on the first malformed record; no partial dataset is returned.
pub fn parse_csv(bytes: &[u8], options: &PipelineOptions) -> Result<Dataset, ParseError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ParseError::Empty);
    }
    check_quotes(bytes, options.delimiter)?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(false)
        .from_reader(bytes);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(ParseError::Empty);
    }
    let headers = normalize_headers(headers);

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for result in reader.records() {
        let record = result?;
        for (col, value) in cells.iter_mut().zip(record.iter()) {
            col.push(value.to_string());
        }
    }

    let columns: Vec<Column> = headers
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| infer_column(name, raw, options))
        .collect();

    let dataset = Dataset::from_columns(columns);
    log::info!(
        "Parsed CSV: {} rows x {} columns",
        dataset.len(),
        dataset.width()
    );
    for col in &dataset.columns {
        log::debug!("  column {:?}: {}", col.name, col.kind());
    }
    Ok(dataset)
}

/// Type a column from its raw cells.
fn infer_column(name: String, raw: Vec<String>, options: &PipelineOptions) -> Column {
    // A header-only file gives no evidence for a number type.
    if raw.is_empty() {
        return Column::text(name, Vec::new());
    }

    let numeric: Option<Vec<Option<f64>>> = raw
        .iter()
        .map(|cell| {
            if options.is_na(cell) {
                return Some(None);
            }
            match cell.trim().parse::<f64>() {
                Ok(v) if v.is_nan() => Some(None),
                Ok(v) => Some(Some(v)),
                Err(_) => None,
            }
        })
        .collect();

    match numeric {
        Some(values) => Column::numeric(name, values),
        None => {
            let values = raw
                .into_iter()
                .map(|cell| if options.is_na(&cell) { None } else { Some(cell) })
                .collect();
            Column::text(name, values)
        }
    }
}

/// Give blank headers a positional name and de-duplicate repeats as `a`, `a.1`, `a.2`.
fn normalize_headers(headers: Vec<String>) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(headers.len());

    for (i, header) in headers.into_iter().enumerate() {
        let base = if header.trim().is_empty() {
            format!("Unnamed: {i}")
        } else {
            header
        };

        let name = match seen.get(&base).copied() {
            None => base,
            Some(mut count) => {
                let candidate = loop {
                    count += 1;
                    let candidate = format!("{base}.{count}");
                    if !seen.contains_key(&candidate) {
                        break candidate;
                    }
                };
                seen.insert(base, count);
                candidate
            }
        };
        seen.insert(name.clone(), 0);
        out.push(name);
    }
    out
}

/// Reject a quoted field that is still open at end of input.
///
/// Only a quote at the start of a field opens a quoted field; `""` inside
/// one is an escaped quote.
fn check_quotes(bytes: &[u8], delimiter: u8) -> Result<(), ParseError> {
    #[derive(Clone, Copy, PartialEq)]
    enum State {
        FieldStart,
        Unquoted,
        Quoted,
        QuoteInQuoted,
    }

    let mut state = State::FieldStart;
    let mut line: u64 = 1;
    let mut opened_on: u64 = 1;

    for &b in bytes {
        state = match (state, b) {
            (State::FieldStart, b'"') => {
                opened_on = line;
                State::Quoted
            }
            (State::Quoted, b'"') => State::QuoteInQuoted,
            (State::Quoted, _) => State::Quoted,
            (State::QuoteInQuoted, b'"') => State::Quoted,
            (_, b'\n' | b'\r') => State::FieldStart,
            (_, b) if b == delimiter => State::FieldStart,
            _ => State::Unquoted,
        };
        if b == b'\n' {
            line += 1;
        }
    }

    if state == State::Quoted {
        return Err(ParseError::UnbalancedQuotes { line: opened_on });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet table.
///
/// Integer and float columns become numeric, string and boolean columns
/// become text, nulls are missing.  Nested columns are rejected.  Works with
/// files written by both **Pandas** (`df.to_parquet()`) and **Polars**
/// (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let schema = builder.schema().clone();

    let mut columns: Vec<Column> = schema
        .fields()
        .iter()
        .map(|field| match field.data_type() {
            dt if dt.is_numeric() => Ok(Column::numeric(field.name().clone(), Vec::new())),
            DataType::Utf8 | DataType::LargeUtf8 | DataType::Boolean => {
                Ok(Column::text(field.name().clone(), Vec::new()))
            }
            other => Err(ParseError::Unsupported(format!(
                "column '{}' has type {other:?}",
                field.name()
            ))),
        })
        .collect::<Result<_, _>>()?;

    let reader = builder.build().context("building parquet reader")?;
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, column) in columns.iter_mut().enumerate() {
            append_arrow_column(column, batch.column(col_idx))
                .with_context(|| format!("reading column '{}'", column.name))?;
        }
    }

    let dataset = Dataset::from_columns(columns);
    log::info!(
        "Loaded parquet: {} rows x {} columns",
        dataset.len(),
        dataset.width()
    );
    Ok(dataset)
}

// -- Arrow helpers --

/// Append one batch's worth of an Arrow column to a typed [`Column`].
fn append_arrow_column(column: &mut Column, array: &Arc<dyn Array>) -> Result<()> {
    match &mut column.data {
        ColumnData::Numeric(values) => {
            let casted = cast(array, &DataType::Float64).context("casting to Float64")?;
            let floats = casted
                .as_any()
                .downcast_ref::<Float64Array>()
                .context("expected Float64Array")?;
            values.extend(floats.iter().map(|v| v.filter(|x| !x.is_nan())));
        }
        ColumnData::Text(values) => {
            let casted = cast(array, &DataType::Utf8).context("casting to Utf8")?;
            let strings = casted
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            values.extend(strings.iter().map(|v| v.map(str::to_string)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::data::model::{CellValue, ColumnKind};

    fn parse(text: &str) -> Result<Dataset, ParseError> {
        parse_csv(text.as_bytes(), &PipelineOptions::default())
    }

    #[test]
    fn test_parse_with_missing_cell() {
        let ds = parse("a,b\n1,2\n3,\n5,6").unwrap();
        assert_eq!(ds.column_names(), vec!["a", "b"]);
        assert_eq!(ds.len(), 3);

        let a = ds.column("a").unwrap();
        assert_eq!(a.kind(), ColumnKind::Numeric);
        assert_eq!(a.numeric_values().unwrap(), &[Some(1.0), Some(3.0), Some(5.0)]);
        assert_eq!(a.missing_count(), 0);

        let b = ds.column("b").unwrap();
        assert_eq!(b.kind(), ColumnKind::Numeric);
        assert_eq!(b.numeric_values().unwrap(), &[Some(2.0), None, Some(6.0)]);
        assert_eq!(b.missing_count(), 1);
    }

    #[test]
    fn test_text_column_inference() {
        let ds = parse("name,score\nAlice,3.5\nBob,NA\n7,4").unwrap();
        let name = ds.column("name").unwrap();
        assert_eq!(name.kind(), ColumnKind::Text);
        assert_eq!(name.cell(2), CellValue::Text("7".into()));
        assert_eq!(ds.column("score").unwrap().missing_count(), 1);
    }

    #[test]
    fn test_numeric_parse_trims_whitespace() {
        let ds = parse("x\n 1 \n2.5\n-3e2").unwrap();
        assert_eq!(
            ds.columns[0].numeric_values().unwrap(),
            &[Some(1.0), Some(2.5), Some(-300.0)]
        );
    }

    #[test]
    fn test_all_missing_column_is_numeric() {
        let ds = parse("a,b\n1,\n2,NaN").unwrap();
        let b = ds.column("b").unwrap();
        assert_eq!(b.kind(), ColumnKind::Numeric);
        assert_eq!(b.missing_count(), 2);
    }

    #[test]
    fn test_header_only_is_empty_dataset() {
        let ds = parse("a,b\n").unwrap();
        assert_eq!(ds.width(), 2);
        assert!(ds.is_empty());
        assert_eq!(ds.columns[0].kind(), ColumnKind::Text);
    }

    #[test]
    fn test_quoted_fields() {
        let ds = parse("city,note\n\"New York, NY\",\"said \"\"hi\"\"\"\nLA,x").unwrap();
        assert_eq!(ds.columns[0].cell(0), CellValue::Text("New York, NY".into()));
        assert_eq!(ds.columns[1].cell(0), CellValue::Text("said \"hi\"".into()));
    }

    #[test]
    fn test_bom_is_ignored() {
        let ds = parse("\u{feff}a,b\n1,2").unwrap();
        assert_eq!(ds.column_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_input_is_error() {
        assert!(matches!(parse(""), Err(ParseError::Empty)));
        assert!(matches!(parse("  \n\n"), Err(ParseError::Empty)));
    }

    #[test]
    fn test_inconsistent_column_count_is_error() {
        let err = parse("a,b\n1,2\n3,4,5\n6,7").unwrap_err();
        match err {
            ParseError::ColumnCount {
                line,
                expected,
                found,
            } => {
                assert_eq!(line, 3);
                assert_eq!(expected, 2);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(parse("a,b\n1\n").is_err());
    }

    #[test]
    fn test_unbalanced_quotes_is_error() {
        let err = parse("a,b\n1,\"open\n2,3\n").unwrap_err();
        assert!(matches!(err, ParseError::UnbalancedQuotes { line: 2 }));
    }

    #[test]
    fn test_quote_inside_unquoted_field_is_literal() {
        let ds = parse("a\n5\"\n").unwrap();
        assert_eq!(ds.columns[0].cell(0), CellValue::Text("5\"".into()));
    }

    #[test]
    fn test_invalid_utf8_is_error() {
        let bytes = b"a,b\n1,\xff\xfe\n";
        let err = parse_csv(bytes, &PipelineOptions::default()).unwrap_err();
        assert!(matches!(err, ParseError::Encoding { .. }));
    }

    #[test]
    fn test_normalize_headers() {
        let headers = vec!["a".into(), "".into(), "a".into(), "a".into(), "a.1".into()];
        assert_eq!(
            normalize_headers(headers),
            vec!["a", "Unnamed: 1", "a.1", "a.2", "a.1.1"]
        );
    }

    #[test]
    fn test_custom_delimiter() {
        let opts = PipelineOptions::default().with_delimiter(b';');
        let ds = parse_csv(b"a;b\n1;x", &opts).unwrap();
        assert_eq!(ds.width(), 2);
        assert_eq!(ds.columns[1].kind(), ColumnKind::Text);
    }

    #[test]
    fn test_load_file_dispatch() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "x,y\n1,2\n3,4\n").unwrap();
        let ds = load_file(file.path(), &PipelineOptions::default()).unwrap();
        assert_eq!(ds.len(), 2);

        let other = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let err = load_file(other.path(), &PipelineOptions::default()).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }

    #[test]
    fn test_load_file_reports_parse_error() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "x,y\n1,2,3\n").unwrap();
        let err = load_file(file.path(), &PipelineOptions::default()).unwrap_err();
        assert!(err.downcast_ref::<ParseError>().is_some());
    }

    #[test]
    fn test_load_parquet() {
        use arrow::array::{BooleanArray, Int64Array};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("id", DataType::Int64, true),
            Field::new("name", DataType::Utf8, true),
            Field::new("passed", DataType::Boolean, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(vec![Some(1), None, Some(3)])),
                Arc::new(StringArray::from(vec![Some("a"), Some("b"), None])),
                Arc::new(BooleanArray::from(vec![true, false, true])),
            ],
        )
        .unwrap();

        let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
        let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path(), &PipelineOptions::default()).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(
            ds.column("id").unwrap().numeric_values().unwrap(),
            &[Some(1.0), None, Some(3.0)]
        );
        assert_eq!(ds.column("name").unwrap().missing_count(), 1);
        assert_eq!(
            ds.column("passed").unwrap().cell(1),
            CellValue::Text("false".into())
        );
    }
}
