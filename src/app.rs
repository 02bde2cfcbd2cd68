use eframe::egui;

use crate::state::{AppState, Tab};
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FleetDashboardApp {
    pub state: AppState,
}

impl eframe::App for FleetDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar + tabs ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filter builder ----
        egui::SidePanel::left("filter_panel")
            .default_width(280.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: statistics + charts, or the vehicle table ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.tab {
            Tab::Overview => charts::overview(ui, &self.state),
            Tab::Vehicles => table::vehicle_table(ui, &self.state),
        });
    }
}
