mod app;
mod color;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use app::RustyEdaApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let initial_file = std::env::args_os().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Rusty EDA – Dynamic Dataset Analyzer",
        options,
        Box::new(move |_cc| Ok(Box::new(RustyEdaApp::new(initial_file)))),
    )
}
