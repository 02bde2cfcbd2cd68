use std::ops::RangeInclusive;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_plot::{Bar, BarChart, GridMark, Plot};
use fleet_dashboard::config::UNKNOWN_LABEL;
use fleet_dashboard::{BarBucket, FleetStatistics, PieSlice};

use crate::color::CategoryColors;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Overview tab: stat cards + charts
// ---------------------------------------------------------------------------

const CHART_HEIGHT: f32 = 220.0;

const GREEN: Color32 = Color32::from_rgb(76, 175, 80);
const BLUE: Color32 = Color32::from_rgb(33, 150, 243);
const ORANGE: Color32 = Color32::from_rgb(255, 152, 0);
const PURPLE: Color32 = Color32::from_rgb(156, 39, 176);

/// Render the statistics cards and every chart in the central panel.
pub fn overview(ui: &mut Ui, state: &AppState) {
    if state.records.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a fleet file to get started  (File → Open…)");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            stat_cards(ui, &state.stats);
            ui.add_space(8.0);

            let charts = &state.charts;
            ui.columns(2, |cols| {
                let emissions = &charts.emissions_chart_data;
                bar_series(&mut cols[0], "emissions", "Emissions (g/km)", emissions, GREEN);
                bar_series(&mut cols[1], "fees", "Monthly fee (EUR)", &charts.fee_chart_data, BLUE);
            });
            let expiry = &charts.contract_expiry_chart_data;
            bar_series(ui, "expiry", "Contract expiry", expiry, ORANGE);
            bar_series(ui, "brands", "Vehicles per brand", &charts.brand_chart_data, PURPLE);

            ui.columns(3, |cols| {
                let lessors = &charts.noleggiatore_pie_data;
                category_series(&mut cols[0], "noleggiatore", "Leasing company", lessors);
                category_series(&mut cols[1], "societa", "Company", &charts.societa_pie_data);
                let fuels = &charts.alimentazione_pie_data;
                category_series(&mut cols[2], "alimentazione", "Fuel type", fuels);
            });
        });
}

fn stat_cards(ui: &mut Ui, stats: &FleetStatistics) {
    let cards = [
        ("Vehicles", stats.total_vehicles.to_string()),
        ("Brands", stats.brand_count.to_string()),
        ("Avg fee", format!("€ {:.2}", stats.avg_monthly_fee)),
        ("Fee range", format!("€ {:.2} – {:.2}", stats.min_monthly_fee, stats.max_monthly_fee)),
        ("Avg emissions", format!("{:.1} g/km", stats.avg_emissions)),
        (
            "Emissions range",
            format!("{:.0} – {:.0} g/km", stats.min_emissions, stats.max_emissions),
        ),
        ("Expiring ≤ 6 months", stats.expiring_contracts.to_string()),
    ];

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for (title, value) in cards {
            ui.group(|ui: &mut Ui| {
                ui.vertical(|ui: &mut Ui| {
                    ui.label(RichText::new(title).small());
                    ui.label(RichText::new(value).size(20.0).strong());
                });
            });
        }
    });
}

/// Axis formatter printing the label of the bar sitting on an integer mark.
fn label_formatter(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let v = mark.value;
        if v < 0.0 || v.fract() != 0.0 {
            return String::new();
        }
        labels.get(v as usize).cloned().unwrap_or_default()
    }
}

fn bar_series(ui: &mut Ui, id: &str, title: &str, buckets: &[BarBucket], color: Color32) {
    ui.strong(title);
    let bars: Vec<Bar> = buckets
        .iter()
        .enumerate()
        .map(|(i, b)| Bar::new(i as f64, b.count as f64).name(&b.bucket_label).width(0.7))
        .collect();
    let labels = buckets.iter().map(|b| b.bucket_label.clone()).collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_grid([false, true])
        .x_axis_formatter(label_formatter(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(color).name(title));
        });
}

/// Categorical share rendered as horizontal bars, one colour per category.
fn category_series(ui: &mut Ui, id: &str, title: &str, slices: &[PieSlice]) {
    ui.strong(title);
    if slices.is_empty() {
        ui.label("No data");
        return;
    }

    let colors = CategoryColors::new(slices.iter().map(|s| s.name.as_str()), UNKNOWN_LABEL);
    let total: usize = slices.iter().map(|s| s.value).sum();
    let bars: Vec<Bar> = slices
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let share = 100.0 * s.value as f64 / total.max(1) as f64;
            Bar::new(i as f64, s.value as f64)
                .name(format!("{} ({share:.0}%)", s.name))
                .fill(colors.color_for(&s.name))
                .width(0.7)
        })
        .collect();
    let labels = slices.iter().map(|s| s.name.clone()).collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .show_grid([true, false])
        .y_axis_formatter(label_formatter(labels))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).horizontal().name(title));
        });

    egui::Grid::new(format!("{id}_legend")).num_columns(2).show(ui, |ui: &mut Ui| {
        for s in slices {
            ui.label(RichText::new("■").color(colors.color_for(&s.name)));
            ui.label(format!("{}: {}", s.name, s.value));
            ui.end_row();
        }
    });
}
