use eframe::egui::{Align2, Color32, RichText, Stroke, Ui};
use egui_plot::{BoxElem, BoxPlot, BoxSpread, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use crate::color::DivergingColorMap;
use crate::data::correlation::CorrelationMatrix;
use crate::data::select::present_values;
use crate::data::summary::DescribeRow;

// ---------------------------------------------------------------------------
// Box plot geometry
// ---------------------------------------------------------------------------

/// Whiskers and outliers of a box plot, built on the describe quartiles.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxSummary {
    /// Whiskers reach the most extreme values within 1.5 × IQR of the box.
    pub fn new(stats: &DescribeRow, values: &[Option<f64>]) -> Option<Self> {
        if stats.count == 0 {
            return None;
        }
        let iqr = stats.q75 - stats.q25;
        let lo_fence = stats.q25 - 1.5 * iqr;
        let hi_fence = stats.q75 + 1.5 * iqr;

        let present = present_values(values);
        let inside = present.iter().copied().filter(|v| (lo_fence..=hi_fence).contains(v));
        let lower_whisker = inside.clone().fold(f64::INFINITY, f64::min).min(stats.q25);
        let upper_whisker = inside.fold(f64::NEG_INFINITY, f64::max).max(stats.q75);
        let outliers = present
            .into_iter()
            .filter(|v| !(lo_fence..=hi_fence).contains(v))
            .collect();

        Some(BoxSummary {
            lower_whisker,
            q25: stats.q25,
            median: stats.median,
            q75: stats.q75,
            upper_whisker,
            outliers,
        })
    }
}

/// Render a vertical box plot of one column.
pub fn box_plot(ui: &mut Ui, column: &str, stats: &DescribeRow, values: &[Option<f64>]) {
    let Some(summary) = BoxSummary::new(stats, values) else {
        ui.label(format!("Column '{column}' has no values to plot."));
        return;
    };

    let color = Color32::from_rgb(70, 130, 180);
    let elem = BoxElem::new(
        0.0,
        BoxSpread::new(
            summary.lower_whisker,
            summary.q25,
            summary.median,
            summary.q75,
            summary.upper_whisker,
        ),
    )
    .name(column)
    .box_width(0.5)
    .whisker_width(0.25)
    .fill(color.linear_multiply(0.35))
    .stroke(Stroke::new(1.5, color));

    let outliers: PlotPoints = summary.outliers.iter().map(|&v| [0.0, v]).collect();

    Plot::new("box_plot")
        .height(300.0)
        .width(320.0)
        .y_axis_label(column)
        .show_x(false)
        .include_x(-1.0)
        .include_x(1.0)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(vec![elem]).name(format!("Box Plot: {column}")));
            plot_ui.points(
                Points::new(outliers)
                    .radius(3.0)
                    .color(color)
                    .name("outliers"),
            );
        });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

/// Render the correlation matrix as an annotated grid of coloured cells.
///
/// Row `i` is drawn at the top, column `j` left to right.
pub fn correlation_heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    let n = matrix.len();
    let color_map = DivergingColorMap::default();
    let cell_px = (560.0 / n as f32).clamp(36.0, 90.0);

    Plot::new("correlation_heatmap")
        .data_aspect(1.0)
        .height(cell_px * n as f32 + 80.0)
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .include_x(-2.0)
        .include_x(n as f64)
        .include_y(-0.8)
        .include_y(n as f64)
        .show(ui, |plot_ui| {
            for (i, row) in matrix.values.iter().enumerate() {
                let y = (n - 1 - i) as f64;
                for (j, &value) in row.iter().enumerate() {
                    let x = j as f64;
                    let fill = color_map.color_for(value);
                    let square: PlotPoints =
                        vec![[x, y], [x + 1.0, y], [x + 1.0, y + 1.0], [x, y + 1.0]].into();
                    plot_ui.polygon(
                        Polygon::new(square)
                            .fill_color(fill)
                            .stroke(Stroke::new(0.5, Color32::from_gray(40))),
                    );

                    let label = if value.is_nan() {
                        "NaN".to_string()
                    } else {
                        format!("{value:.2}")
                    };
                    plot_ui.text(Text::new(
                        PlotPoint::new(x + 0.5, y + 0.5),
                        RichText::new(label).color(DivergingColorMap::text_color_for(fill)),
                    ));
                }

                plot_ui.text(
                    Text::new(
                        PlotPoint::new(-0.1, y + 0.5),
                        RichText::new(&matrix.columns[i]).strong(),
                    )
                    .anchor(Align2::RIGHT_CENTER),
                );
            }

            for (j, name) in matrix.columns.iter().enumerate() {
                plot_ui.text(
                    Text::new(
                        PlotPoint::new(j as f64 + 0.5, -0.1),
                        RichText::new(name).strong(),
                    )
                    .anchor(Align2::CENTER_TOP),
                );
            }
        });
}
