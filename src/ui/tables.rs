use eframe::egui::{self, Align, Layout, RichText, ScrollArea, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::data::model::{CellValue, ColumnKind};
use crate::data::pipeline::Preview;
use crate::data::summary::DescribeRow;
use crate::data::validate::MissingReport;

const HEADER_HEIGHT: f32 = 22.0;
const ROW_HEIGHT: f32 = 18.0;

/// Format a statistic the way the describe table shows it.
pub fn format_stat(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{value:.4}")
    }
}

// ---------------------------------------------------------------------------
// Raw data preview
// ---------------------------------------------------------------------------

/// Render the first rows of the dataset, all columns.
pub fn preview_table(ui: &mut Ui, preview: &Preview) {
    if preview.rows.is_empty() {
        ui.label("The file has a header but no data rows.");
    }

    ui.push_id("preview_table", |ui: &mut Ui| {
        ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .cell_layout(Layout::left_to_right(Align::Center))
                .column(TableColumn::auto().at_least(32.0))
                .columns(TableColumn::auto().at_least(60.0), preview.columns.len())
                .header(HEADER_HEIGHT, |mut header| {
                    header.col(|ui: &mut Ui| {
                        ui.strong("#");
                    });
                    for (name, kind) in preview.columns.iter().zip(&preview.kinds) {
                        header.col(|ui: &mut Ui| {
                            ui.strong(name).on_hover_text(kind.to_string());
                        });
                    }
                })
                .body(|mut body| {
                    for (i, row) in preview.rows.iter().enumerate() {
                        body.row(ROW_HEIGHT, |mut table_row| {
                            table_row.col(|ui: &mut Ui| {
                                ui.weak(i.to_string());
                            });
                            for (cell, kind) in row.iter().zip(&preview.kinds) {
                                table_row.col(|ui: &mut Ui| {
                                    cell_label(ui, cell, *kind);
                                });
                            }
                        });
                    }
                });
        });
    });
}

fn cell_label(ui: &mut Ui, cell: &CellValue, kind: ColumnKind) {
    match (cell, kind) {
        (CellValue::Missing, _) => {
            ui.weak("NaN");
        }
        (_, ColumnKind::Numeric) => {
            ui.with_layout(Layout::right_to_left(Align::Center), |ui: &mut Ui| {
                ui.monospace(cell.to_string());
            });
        }
        _ => {
            ui.label(cell.to_string());
        }
    }
}

// ---------------------------------------------------------------------------
// Missing values
// ---------------------------------------------------------------------------

/// Render per-column missing counts plus the clean / warning banner.
pub fn missing_table(ui: &mut Ui, report: &MissingReport) {
    ui.strong("Missing Values per Column:");

    ui.push_id("missing_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .vscroll(false)
            .column(TableColumn::remainder().at_least(80.0))
            .column(TableColumn::auto().at_least(50.0))
            .header(HEADER_HEIGHT, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong("column");
                });
                header.col(|ui: &mut Ui| {
                    ui.strong("missing");
                });
            })
            .body(|mut body| {
                for entry in &report.counts {
                    body.row(ROW_HEIGHT, |mut row| {
                        row.col(|ui: &mut Ui| {
                            ui.label(&entry.column);
                        });
                        row.col(|ui: &mut Ui| {
                            let text = RichText::new(entry.missing.to_string()).monospace();
                            if entry.missing > 0 {
                                ui.label(text.color(egui::Color32::from_rgb(220, 150, 40)));
                            } else {
                                ui.label(text);
                            }
                        });
                    });
                }
            });
    });

    ui.add_space(6.0);
    if report.is_clean {
        ui.colored_label(
            egui::Color32::from_rgb(60, 170, 90),
            "The dataset is clean (No missing values).",
        );
    } else {
        ui.colored_label(
            egui::Color32::from_rgb(220, 150, 40),
            "Warning: Missing values detected!",
        );
    }
}

// ---------------------------------------------------------------------------
// Descriptive statistics
// ---------------------------------------------------------------------------

const DESCRIBE_HEADERS: [&str; 9] = ["", "count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// Render one row per numeric column: count, mean, std, min, quartiles, max.
pub fn describe_table(ui: &mut Ui, rows: &[DescribeRow]) {
    if rows.is_empty() {
        ui.label("No numerical columns to describe.");
        return;
    }

    ui.push_id("describe_table", |ui: &mut Ui| {
        ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
            TableBuilder::new(ui)
                .striped(true)
                .vscroll(false)
                .cell_layout(Layout::right_to_left(Align::Center))
                .columns(TableColumn::auto().at_least(70.0), DESCRIBE_HEADERS.len())
                .header(HEADER_HEIGHT, |mut header| {
                    for title in DESCRIBE_HEADERS {
                        header.col(|ui: &mut Ui| {
                            ui.strong(title);
                        });
                    }
                })
                .body(|mut body| {
                    for row in rows {
                        body.row(ROW_HEIGHT, |mut table_row| {
                            table_row.col(|ui: &mut Ui| {
                                ui.strong(&row.column);
                            });
                            table_row.col(|ui: &mut Ui| {
                                ui.monospace(row.count.to_string());
                            });
                            for value in [
                                row.mean, row.std, row.min, row.q25, row.median, row.q75, row.max,
                            ] {
                                table_row.col(|ui: &mut Ui| {
                                    ui.monospace(format_stat(value));
                                });
                            }
                        });
                    }
                });
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_stat() {
        assert_eq!(format_stat(2.5), "2.5000");
        assert_eq!(format_stat(f64::NAN), "NaN");
        assert_eq!(format_stat(-0.123456), "-0.1235");
    }
}
