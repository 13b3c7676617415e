use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::correlation::Relationships;
use crate::state::AppState;
use crate::ui::{plot, tables};

// ---------------------------------------------------------------------------
// Left side panel – dataset info, column selector, missing values
// ---------------------------------------------------------------------------

/// Render the left side panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Dataset");
    ui.separator();

    let Some(session) = &state.session else {
        ui.label("No dataset loaded.");
        return;
    };

    if let Some(name) = session.source_name() {
        ui.label(RichText::new(name).strong());
    }
    ui.label(format!(
        "{} rows × {} columns",
        session.analysis.rows, session.analysis.columns
    ));
    ui.separator();

    // Clone what we need so we can mutate state inside the combo box.
    let numeric: Vec<String> = session
        .analysis
        .numeric_columns
        .iter()
        .map(str::to_string)
        .collect();
    let missing = session.analysis.missing.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Primary column selector ----
            ui.strong("Select a primary column:");
            if numeric.is_empty() {
                ui.label("No numerical columns found for visual analysis.");
            } else {
                let current = state.selected_column.clone().unwrap_or_default();
                egui::ComboBox::from_id_salt("primary_column")
                    .selected_text(&current)
                    .show_ui(ui, |ui: &mut Ui| {
                        for col in &numeric {
                            if ui.selectable_label(current == *col, col).clicked() {
                                state.select_column(col);
                            }
                        }
                    });
            }
            ui.separator();

            // ---- Data consistency check ----
            ui.strong("B. Data Consistency Check");
            tables::missing_table(ui, &missing);
        });
}

// ---------------------------------------------------------------------------
// Central panel – overview, statistics, visual analysis
// ---------------------------------------------------------------------------

/// Render the analysis sections in the central panel.
pub fn analysis_panel(ui: &mut Ui, state: &AppState) {
    let Some(session) = &state.session else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Please open a CSV file to populate the analysis sections  (File → Open…)");
        });
        return;
    };
    let analysis = &session.analysis;

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("1. Data Overview");
            ui.label(RichText::new("A. Raw Data (First 5 Rows)").strong());
            tables::preview_table(ui, &analysis.preview);
            ui.separator();

            ui.heading("2. Descriptive Statistics");
            ui.label(RichText::new("C. Central Tendency & Spread").strong());
            tables::describe_table(ui, &analysis.describe);
            ui.separator();

            ui.heading("3. Visual Analysis");
            if analysis.numeric_columns.is_empty() {
                ui.colored_label(
                    Color32::from_rgb(220, 150, 40),
                    "No numerical columns found for visual analysis.",
                );
                return;
            }
            ui.label("Select a numerical column in the side panel for the distribution plot.");

            if let Some(column) = state.selected_column.as_deref() {
                ui.label(RichText::new(format!("D. Distribution of: {column}")).strong());
                match (analysis.describe_row(column), session.column_values(column)) {
                    (Some(stats), Some(values)) => plot::box_plot(ui, column, stats, values),
                    _ => {
                        ui.label(format!("Column '{column}' is not numeric."));
                    }
                }
            }
            ui.separator();

            ui.label(RichText::new("H. Correlation Matrix").strong());
            match &analysis.relationships {
                Relationships::Available(matrix) => {
                    ui.label("Correlation Between Numerical Variables");
                    plot::correlation_heatmap(ui, matrix);
                }
                Relationships::Unavailable { reason } => {
                    ui.colored_label(Color32::from_rgb(220, 150, 40), reason);
                }
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let can_export = state.session.is_some();
            if ui
                .add_enabled(can_export, egui::Button::new("Export report…"))
                .clicked()
            {
                export_report_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(session) = &state.session {
            let missing = session.analysis.missing.total();
            ui.label(format!(
                "{} rows, {} numeric columns, {missing} missing cells",
                session.analysis.rows,
                session.analysis.numeric_columns.len(),
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Choose a CSV file")
        .add_filter("Supported files", &["csv", "txt", "parquet", "pq"])
        .add_filter("CSV", &["csv", "txt"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open_path(&path);
    }
}

pub fn export_report_dialog(state: &mut AppState) {
    let default_name = state
        .session
        .as_ref()
        .and_then(|s| s.source_name())
        .map(|n| format!("{n}.report.json"))
        .unwrap_or_else(|| "report.json".to_string());

    let file = rfd::FileDialog::new()
        .set_title("Export analysis report")
        .set_file_name(default_name)
        .add_filter("JSON", &["json"])
        .save_file();

    if let Some(path) = file {
        state.export_report(&path);
    }
}
