use std::path::Path;

use chrono::Local;
use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;
use fleet_dashboard::data::loader::load_file;
use fleet_dashboard::data::parse::parse_date;
use fleet_dashboard::{default_export_filename, FieldName, FilterSpec, FilterValue, Operator};

use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – filter builder
// ---------------------------------------------------------------------------

/// A change requested by a filter widget, applied after the list is drawn.
enum FilterEdit {
    Operator(String, Operator),
    Value(String, FilterValue),
    Remove(String),
}

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    if state.records.is_empty() {
        ui.label("No fleet loaded.");
        return;
    }

    // ---- Add filter ----
    ui.horizontal(|ui: &mut Ui| {
        egui::ComboBox::from_id_salt("new_filter_field")
            .selected_text(state.pending_field.label())
            .show_ui(ui, |ui: &mut Ui| {
                for field in FieldName::ALL {
                    ui.selectable_value(&mut state.pending_field, field, field.label());
                }
            });
        if ui.button("Add").clicked() {
            state.add_filter(state.pending_field);
        }
    });

    if state.has_active_filters() && ui.small_button("Clear all").clicked() {
        state.clear_filters();
    }
    ui.separator();

    let mut edits: Vec<FilterEdit> = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for filter in &state.filters {
                filter_card(ui, filter, &mut edits);
            }
        });

    for edit in edits {
        match edit {
            FilterEdit::Operator(id, op) => {
                state.set_filter_operator(&id, op);
            }
            FilterEdit::Value(id, value) => {
                state.set_filter_value(&id, value);
            }
            FilterEdit::Remove(id) => state.remove_filter(&id),
        }
    }
}

/// One active filter: label, remove button, operator selector, value editor.
fn filter_card(ui: &mut Ui, filter: &FilterSpec, edits: &mut Vec<FilterEdit>) {
    let id = &filter.id;
    ui.group(|ui: &mut Ui| {
        ui.horizontal(|ui: &mut Ui| {
            ui.strong(&filter.label).on_hover_text(filter.summary());
            if ui.small_button("✕").clicked() {
                edits.push(FilterEdit::Remove(id.clone()));
            }
        });

        ui.horizontal(|ui: &mut Ui| {
            egui::ComboBox::from_id_salt(format!("{id}_operator"))
                .selected_text(filter.operator.symbol())
                .width(48.0)
                .show_ui(ui, |ui: &mut Ui| {
                    for &op in filter.kind().operators() {
                        let selected = filter.operator == op;
                        if ui.selectable_label(selected, op.symbol()).clicked() {
                            edits.push(FilterEdit::Operator(id.clone(), op));
                        }
                    }
                });

            if let Some(value) = value_editor(ui, id, &filter.value) {
                edits.push(FilterEdit::Value(id.clone(), value));
            }
        });
    });
}

/// Editor matching the operand's kind. Returns the new operand when edited.
fn value_editor(ui: &mut Ui, id: &str, value: &FilterValue) -> Option<FilterValue> {
    match value {
        FilterValue::Text(text) => {
            let mut buffer = text.clone();
            ui.text_edit_singleline(&mut buffer)
                .changed()
                .then(|| FilterValue::Text(buffer))
        }
        FilterValue::Number(n) => {
            let mut v = *n;
            ui.add(egui::DragValue::new(&mut v).speed(10.0))
                .changed()
                .then_some(FilterValue::Number(v))
        }
        FilterValue::Date(text) => {
            let mut date = parse_date(text)
                .map(|d| d.date())
                .unwrap_or_else(|| Local::now().date_naive());
            let salt = format!("{id}_date");
            ui.add(DatePickerButton::new(&mut date).id_salt(&salt))
                .changed()
                .then(|| FilterValue::Date(date.format("%Y-%m-%d").to_string()))
        }
    }
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
            let can_export = !state.records.is_empty();
            if ui.add_enabled(can_export, egui::Button::new("Export CSV…")).clicked() {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.selectable_value(&mut state.tab, Tab::Overview, "Overview");
        ui.selectable_value(&mut state.tab, Tab::Vehicles, "Vehicles");
        ui.separator();

        if !state.records.is_empty() {
            let source = state.source_name.as_deref().unwrap_or("fleet");
            ui.label(format!(
                "{source}: {} vehicles, {} visible",
                state.records.len(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open fleet data")
        .add_filter("Supported files", &["json", "csv", "parquet", "pq"])
        .add_filter("JSON", &["json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        load_into(state, &path);
    }
}

/// Load `path` into the state, reporting failures in the status line.
pub fn load_into(state: &mut AppState, path: &Path) {
    match load_file(path) {
        Ok(records) => {
            let name = path.file_name().map(|n| n.to_string_lossy().into_owned());
            state.set_records(records, name);
        }
        Err(e) => {
            log::error!("Failed to load file: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let filtered = state.has_active_filters();
    let file = rfd::FileDialog::new()
        .set_title(if filtered { "Export filtered vehicles" } else { "Export all vehicles" })
        .set_file_name(default_export_filename(filtered, Local::now().date_naive()))
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_to(&path);
    }
}
