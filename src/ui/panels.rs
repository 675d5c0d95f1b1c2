use std::path::Path;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use crate::data::export::{export_file_name, DEFAULT_EXPORT_NAME};
use crate::data::model::{Dataset, Dimension};
use crate::data::pipeline::DashboardViews;
use crate::data::DataError;
use crate::format;
use crate::state::{AppState, Status};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the date pickers and the per-dimension multiselects.
pub fn filter_controls(ui: &mut Ui, state: &mut AppState, dataset: &Dataset) {
    ui.heading("🔍 Filter Controls");
    ui.separator();

    // ---- Date range ----
    ui.strong("📅 Date Range");
    egui::Grid::new("date_range").num_columns(2).show(ui, |ui: &mut Ui| {
        ui.label("From");
        ui.add(DatePickerButton::new(&mut state.start_date).id_salt("start_date"));
        ui.end_row();
        ui.label("To");
        ui.add(DatePickerButton::new(&mut state.end_date).id_salt("end_date"));
        ui.end_row();
    });
    if ui.small_button("Reset filters").clicked() {
        state.reset_filters();
    }
    ui.separator();

    // ---- Per-dimension filter widgets (collapsible) ----
    ScrollArea::vertical()
        .id_salt("filter_scroll")
        .max_height(ui.available_height() * 0.6)
        .auto_shrink([false, true])
        .show(ui, |ui: &mut Ui| {
            for dim in Dimension::FILTERABLE {
                let all_values = dataset.values(dim);
                let n_selected = state.filters.get(&dim).map_or(0, |s| s.len());
                let header_text = format!("{}  ({n_selected}/{})", filter_title(dim), all_values.len());

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(dim.column())
                    .default_open(dim == Dimension::Category)
                    .show(ui, |ui: &mut Ui| {
                        // Select all / none buttons
                        ui.horizontal(|ui: &mut Ui| {
                            if ui.small_button("All").clicked() {
                                state.select_all(dim);
                            }
                            if ui.small_button("None").clicked() {
                                state.select_none(dim);
                            }
                        });

                        for val in &all_values {
                            let mut checked = state.filters.get(&dim).is_some_and(|s| s.contains(val));

                            // Categories carry their chart colour.
                            let mut text = RichText::new(val);
                            if dim == Dimension::Category {
                                if let Some(cm) = &state.color_map {
                                    text = text.color(cm.color_for(val));
                                }
                            }

                            if ui.checkbox(&mut checked, text).changed() {
                                state.toggle_filter_value(dim, val);
                            }
                        }
                    });
            }
        });
}

fn filter_title(dim: Dimension) -> String {
    match dim {
        Dimension::Category => "🏷 Categories".to_string(),
        Dimension::Region => "🌍 Regions".to_string(),
        Dimension::Channel => "📱 Channels".to_string(),
        other => other.label().to_string(),
    }
}

/// "Dataset Info" box under the filters.
pub fn dataset_info(ui: &mut Ui, views: Option<&DashboardViews<'_>>) {
    ui.separator();
    ui.strong("📊 Dataset Info");

    let Some(views) = views else {
        ui.weak("Fix the date range to see results.");
        return;
    };

    ui.label(format!("Records: {}", format::count(views.info.records)));
    match views.filtered.date_span() {
        Ok((first, last)) => {
            ui.label(format!(
                "Date Range: {} - {}",
                first.format("%b %d, %Y"),
                last.format("%b %d, %Y")
            ));
        }
        Err(e) => {
            ui.label(RichText::new(e.to_string()).color(Color32::YELLOW));
        }
    }
    ui.label(format!("Categories: {}", views.info.categories));
    ui.label(format!("Regions: {}", views.info.regions));
}

// ---------------------------------------------------------------------------
// Central panel fallbacks
// ---------------------------------------------------------------------------

/// Shown instead of the dashboard when the source could not be loaded.
pub fn fatal_error(ui: &mut Ui, message: &str, source: &Path) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.add_space(40.0);
        ui.heading(RichText::new(message).color(Color32::RED));
        ui.add_space(8.0);
        ui.label(format!("Data source: {}", source.display()));
        ui.label("Use File → Open… to pick another file, or File → Reload once it exists.");
    });
}

/// Shown instead of the views when the filter selection is invalid.
pub fn selection_error(ui: &mut Ui, err: &DataError) {
    ui.centered_and_justified(|ui: &mut Ui| {
        ui.heading(RichText::new(format!("⚠ {err}")).color(Color32::YELLOW));
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
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Quit").clicked() {
                ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.separator();
        ui.label(RichText::new("📊 Retail Business Analytics Dashboard").strong());
        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} transactions loaded from {}",
                format::count(ds.len()),
                state.source_path.display()
            ));
        }

        match &state.status {
            Some(Status::Info(msg)) => {
                ui.separator();
                ui.label(msg);
            }
            Some(Status::Error(msg)) => {
                ui.separator();
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open transaction data")
        .add_filter("Supported files", &["csv", "tsv", "txt", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(path);
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let name = state
        .dataset
        .as_deref()
        .map_or(DEFAULT_EXPORT_NAME, export_file_name);
    let file = rfd::FileDialog::new()
        .set_title("Download filtered data")
        .set_file_name(name)
        .add_filter("Delimited text", &["csv", "tsv", "txt"])
        .save_file();

    let Some(path) = file else {
        return;
    };

    state.status = Some(match state.export_filtered(&path) {
        Ok(n) => Status::Info(format!("Saved {} rows to {}", format::count(n), path.display())),
        Err(e) => {
            log::error!("Export failed: {e:#}");
            Status::Error(format!("Error: {e:#}"))
        }
    });
}
