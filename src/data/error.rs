use thiserror::Error;

/// Why an uploaded byte stream could not be read as a table.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("the file is empty or has no header row")]
    Empty,

    #[error("unbalanced quoting: a quoted field opened on line {line} is never closed")]
    UnbalancedQuotes { line: u64 },

    #[error("line {line} has {found} fields but the header has {expected}")]
    ColumnCount { line: u64, expected: u64, found: u64 },

    #[error("the file is not valid UTF-8 text (line {line})")]
    Encoding { line: u64 },

    #[error("unsupported input: {0}")]
    Unsupported(String),

    #[error("I/O error while reading: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed CSV: {0}")]
    Csv(csv::Error),
}

impl From<csv::Error> for ParseError {
    fn from(err: csv::Error) -> Self {
        let line = |pos: Option<&csv::Position>| pos.map_or(0, csv::Position::line);
        match err.kind() {
            csv::ErrorKind::UnequalLengths {
                pos,
                expected_len,
                len,
            } => ParseError::ColumnCount {
                line: line(pos.as_ref()),
                expected: *expected_len,
                found: *len,
            },
            csv::ErrorKind::Utf8 { pos, .. } => ParseError::Encoding {
                line: line(pos.as_ref()),
            },
            _ => ParseError::Csv(err),
        }
    }
}
