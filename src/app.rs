use eframe::egui;

use crate::config::DashboardConfig;
use crate::data::pipeline;
use crate::state::AppState;
use crate::ui::{dashboard, panels};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub state: AppState,
}

impl DashboardApp {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            state: AppState::new(config),
        }
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Fatal load error: nothing else is drawn ----
        if let Some(msg) = &self.state.fatal_error {
            egui::CentralPanel::default().show(ctx, |ui| {
                panels::fatal_error(ui, msg, &self.state.source_path);
            });
            return;
        }

        let Some(dataset) = self.state.dataset.clone() else {
            egui::CentralPanel::default().show(ctx, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.heading("Open a file to view the dashboard  (File → Open…)");
                });
            });
            return;
        };

        // ---- Left side panel: filters, then the views for this pass ----
        let views = egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::filter_controls(ui, &mut self.state, &dataset);
                let views = match self.state.selection() {
                    Ok(selection) => Ok(pipeline::render(&dataset, &selection)),
                    Err(e) => {
                        log::warn!("Rejected filter selection: {e}");
                        Err(e)
                    }
                };
                panels::dataset_info(ui, views.as_ref().ok());
                views
            })
            .inner;

        // ---- Central panel: KPIs, charts, table ----
        egui::CentralPanel::default().show(ctx, |ui| match &views {
            Ok(views) => dashboard::show(ui, &mut self.state, views),
            Err(e) => panels::selection_error(ui, e),
        });
    }
}
