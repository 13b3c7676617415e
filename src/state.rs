use std::path::Path;

use crate::data::options::PipelineOptions;
use crate::data::pipeline::Session;

/// Shown above the error chain when a file cannot be processed.
pub const LOAD_ERROR_PREFIX: &str =
    "Error processing file: Ensure the file is a valid CSV and not corrupted. Details:";

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
#[derive(Default)]
pub struct AppState {
    /// Current file and its analysis (None until a file loads).
    pub session: Option<Session>,

    /// Numeric column chosen for the distribution view.
    pub selected_column: Option<String>,

    /// Ingestion settings applied to every open.
    pub options: PipelineOptions,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Open a file, replacing whatever was loaded before.
    ///
    /// A failed open still discards the previous session.
    pub fn open_path(&mut self, path: &Path) {
        self.session = None;
        self.selected_column = None;

        match Session::open(path, &self.options) {
            Ok(session) => {
                log::info!(
                    "Loaded {} rows with columns {:?}",
                    session.dataset.len(),
                    session.dataset.column_names()
                );
                self.set_session(session);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.status_message = Some(format!("{LOAD_ERROR_PREFIX} {e:#}"));
            }
        }
    }

    /// Install a freshly analysed session and pick a default column.
    pub fn set_session(&mut self, session: Session) {
        self.selected_column = session
            .analysis
            .numeric_columns
            .first()
            .map(str::to_string);
        self.session = Some(session);
        self.status_message = None;
    }

    /// Choose the column for the distribution view.
    pub fn select_column(&mut self, column: &str) {
        self.selected_column = Some(column.to_string());
    }

    /// Raw values of the selected column, if any.
    pub fn selected_values(&self) -> Option<&[Option<f64>]> {
        let session = self.session.as_ref()?;
        session.column_values(self.selected_column.as_deref()?)
    }

    /// Write the current analysis to `path`.
    pub fn export_report(&mut self, path: &Path) {
        let Some(session) = &self.session else {
            self.status_message = Some("Nothing to export: no dataset loaded.".to_string());
            return;
        };
        match session.export_report(path) {
            Ok(()) => self.status_message = None,
            Err(e) => {
                log::error!("Failed to export report: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
