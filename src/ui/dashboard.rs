use eframe::egui::{RichText, ScrollArea, Ui};

use crate::color::hue;
use crate::data::pipeline::DashboardViews;
use crate::format;
use crate::state::AppState;
use crate::ui::panels::save_file_dialog;
use crate::ui::plot::{self, BarColor};
use crate::ui::{kpi, table};

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(12.0);
    ui.heading(RichText::new(title).strong());
    ui.separator();
}

/// The central dashboard, top to bottom.
pub fn show(ui: &mut Ui, state: &mut AppState, views: &DashboardViews<'_>) {
    ScrollArea::vertical()
        .id_salt("dashboard_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.label(
                "Comprehensive insights into retail performance, customer behavior, and sales trends. \
                 Use the filters in the sidebar to customize your view.",
            );

            section(ui, "📈 Key Performance Indicators (KPIs)");
            kpi::kpi_grid(ui, &views.kpis);

            section(ui, "📅 Revenue Trends Over Time");
            ui.columns(2, |cols| {
                plot::daily_revenue(&mut cols[0], &views.daily_revenue);
                plot::monthly_revenue(&mut cols[1], &views.monthly_revenue);
            });

            let category_colors = state.color_map.as_ref();

            section(ui, "📊 Performance by Category & Region");
            ui.columns(2, |cols| {
                let by_category = match category_colors {
                    Some(cm) => BarColor::Mapped(cm),
                    None => BarColor::Distinct,
                };
                plot::share_bars(
                    &mut cols[0],
                    "category_revenue",
                    "Revenue Distribution by Category",
                    "Category",
                    &views.revenue_by_category,
                    by_category,
                );
                plot::labelled_bars(
                    &mut cols[1],
                    "region_revenue",
                    "Revenue by Region",
                    "Region",
                    "Revenue ($)",
                    &views.revenue_by_region,
                    BarColor::Scale(hue::TEAL),
                );
            });

            section(ui, "👥 Customer & Channel Insights");
            ui.columns(2, |cols| {
                plot::labelled_bars(
                    &mut cols[0],
                    "segment_revenue",
                    "Revenue by Customer Segment",
                    "Customer Segment",
                    "Revenue ($)",
                    &views.revenue_by_segment,
                    BarColor::Scale(hue::GREEN),
                );
                plot::share_bars(
                    &mut cols[1],
                    "channel_revenue",
                    "Revenue Distribution by Channel",
                    "Channel",
                    &views.revenue_by_channel,
                    BarColor::Distinct,
                );
            });

            section(ui, "💰 Profit Margin Analysis");
            ui.columns(2, |cols| {
                if views.margin_by_category.is_empty() {
                    cols[0].weak("No profit margin data for the current selection.");
                } else {
                    plot::labelled_bars(
                        &mut cols[0],
                        "category_margin",
                        "Average Profit Margin by Category",
                        "Category",
                        "Profit Margin (%)",
                        &views.margin_by_category,
                        BarColor::Distinct,
                    );
                }
                plot::revenue_vs_profit(&mut cols[1], &views.revenue_vs_profit, category_colors);
            });

            section(ui, "💳 Payment Method Analysis");
            let payment_revenue: Vec<(String, f64)> = views
                .payment_methods
                .iter()
                .map(|p| (p.payment_method.clone(), p.revenue))
                .collect();
            ui.columns(2, |cols| {
                plot::labelled_bars(
                    &mut cols[0],
                    "payment_revenue",
                    "Revenue by Payment Method",
                    "Payment Method",
                    "Revenue ($)",
                    &payment_revenue,
                    BarColor::Scale(hue::PURPLE),
                );
                plot::payment_usage_vs_satisfaction(&mut cols[1], &views.payment_methods);
            });

            section(ui, "📋 Transaction Data Preview");
            ui.checkbox(&mut state.show_table, "Show detailed transaction data");
            if state.show_table {
                if ui.button("📥 Download Filtered Data as CSV").clicked() {
                    save_file_dialog(state);
                }
                ui.add_space(4.0);
                table::transactions_table(ui, &views.filtered, state.config.table_row_limit);
            }

            ui.add_space(16.0);
            ui.separator();
            ui.vertical_centered(|ui: &mut Ui| {
                ui.weak(RichText::new("📊 Retail Business Analytics Dashboard").strong());
                ui.weak(format!(
                    "Total records analyzed: {}",
                    format::count(views.filtered.len())
                ));
            });
            ui.add_space(8.0);
        });
}
