use eframe::egui;
use retail_dashboard::app::DashboardApp;
use retail_dashboard::config::DashboardConfig;

fn main() -> eframe::Result {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = DashboardConfig::from_env();
    log::info!("Data source: {}", config.data_path.display());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Retail Business Analytics Dashboard",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(config)))),
    )
}
