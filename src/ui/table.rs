use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};
use fleet_dashboard::FieldName;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Vehicles tab: the filtered record set as a table
// ---------------------------------------------------------------------------

const ROW_HEIGHT: f32 = 20.0;

pub fn vehicle_table(ui: &mut Ui, state: &AppState) {
    if state.visible_indices.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("No vehicles match the current filters.");
        });
        return;
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(80.0), FieldName::ALL.len())
        .header(ROW_HEIGHT, |mut header| {
            for field in FieldName::ALL {
                header.col(|ui: &mut Ui| {
                    ui.strong(field.label());
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, state.visible_indices.len(), |mut row| {
                let record = &state.records[state.visible_indices[row.index()]];
                for field in FieldName::ALL {
                    row.col(|ui: &mut Ui| {
                        ui.label(field.extract(record).as_text().as_ref());
                    });
                }
            });
        });
}
