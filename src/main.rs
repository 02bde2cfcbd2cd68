mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use app::FleetDashboardApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    // Optional data file to open at start-up.
    let initial_file = std::env::args_os().nth(1).map(PathBuf::from);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Fleet Dashboard",
        options,
        Box::new(move |_cc| {
            let mut app = FleetDashboardApp::default();
            if let Some(path) = initial_file {
                ui::panels::load_into(&mut app.state, &path);
            }
            Ok(Box::new(app))
        }),
    )
}
