use eframe::egui::{self, RichText, Ui};

use crate::data::aggregate::Kpis;
use crate::format;

/// One metric card: label, value, hover help.
struct Card {
    label: &'static str,
    value: String,
    help: &'static str,
}

fn cards(k: &Kpis) -> [Card; 8] {
    [
        Card {
            label: "Total Revenue",
            value: format::currency(k.total_revenue),
            help: "Sum of all revenue from filtered transactions",
        },
        Card {
            label: "Average Order Value",
            value: format::currency(k.average_order_value),
            help: "Average revenue per transaction",
        },
        Card {
            label: "Total Profit",
            value: format::currency(k.total_profit),
            help: "Sum of all profit from filtered transactions",
        },
        Card {
            label: "Profit Margin",
            value: format::percent(k.profit_margin),
            help: "Overall profit margin percentage (N/A when revenue is zero)",
        },
        Card {
            label: "Total Transactions",
            value: format::count(k.transaction_count),
            help: "Number of transactions",
        },
        Card {
            label: "Avg. Customer Satisfaction",
            value: format!("{:.1}/5", k.average_satisfaction),
            help: "Average customer rating (1-5 scale)",
        },
        Card {
            label: "Avg. Quantity per Order",
            value: format!("{:.1}", k.average_quantity),
            help: "Average number of items per transaction",
        },
        Card {
            label: "Customer Segments",
            value: k.customer_segments.to_string(),
            help: "Number of unique customer segments",
        },
    ]
}

/// Two rows of four KPI cards.
pub fn kpi_grid(ui: &mut Ui, kpis: &Kpis) {
    let card_width = (ui.available_width() / 4.0 - 12.0).max(120.0);

    egui::Grid::new("kpi_grid")
        .num_columns(4)
        .spacing([8.0, 8.0])
        .show(ui, |ui: &mut Ui| {
            for (i, card) in cards(kpis).into_iter().enumerate() {
                egui::Frame::group(ui.style())
                    .show(ui, |ui: &mut Ui| {
                        ui.set_width(card_width);
                        ui.weak(card.label);
                        ui.label(RichText::new(&card.value).size(22.0).strong());
                    })
                    .response
                    .on_hover_text(card.help);
                if i % 4 == 3 {
                    ui.end_row();
                }
            }
        });
}
