use eframe::egui::{self, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::filter::FilteredDataset;
use crate::data::model::Transaction;
use crate::format;

/// Display text for one cell: money columns as currency, the rest as in
/// the source.
fn cell_text(column: &str, tx: &Transaction, raw: &str) -> String {
    match column {
        "unit_price" => format::currency(tx.unit_price),
        "revenue" => format::currency(tx.revenue),
        "cost" => format::currency(tx.cost),
        "profit" => format::currency(tx.profit),
        "profit_margin" => tx.profit_margin.map(|m| format!("{m:.2}%")).unwrap_or_default(),
        "date" => tx.date.format("%Y-%m-%d").to_string(),
        "customer_satisfaction" => format!("{:.1}", tx.customer_satisfaction),
        _ => raw.to_string(),
    }
}

fn column_title(column: &str) -> &str {
    match column {
        "date" => "Date",
        "customer_satisfaction" => "Satisfaction",
        other => other,
    }
}

/// Scrollable table of the filtered rows, capped at `row_limit`.
pub fn transactions_table(ui: &mut Ui, rows: &FilteredDataset<'_>, row_limit: Option<usize>) {
    let source = rows.source();
    let headers: Vec<&str> = source.headers.iter().collect();
    let shown = row_limit.map_or(rows.len(), |n| n.min(rows.len()));

    if shown < rows.len() {
        ui.weak(format!(
            "Showing the first {} of {} rows; the download contains all of them.",
            format::count(shown),
            format::count(rows.len())
        ));
    }

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(70.0), headers.len())
        .max_scroll_height(400.0)
        .header(20.0, |mut header| {
            for h in &headers {
                header.col(|ui| {
                    ui.strong(column_title(h));
                });
            }
        })
        .body(|body| {
            body.rows(18.0, shown, |mut row| {
                let idx = rows.indices()[row.index()];
                let tx = &source.rows[idx];
                let raw = &source.raw[idx];
                for (col, name) in headers.iter().enumerate() {
                    row.col(|ui| {
                        ui.label(cell_text(name, tx, raw.get(col).unwrap_or("")));
                    });
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::tx;

    #[test]
    fn money_columns_are_currency_formatted() {
        let t = tx("1", "2024-01-01", "A", "North", 1234.5, 20.0);
        assert_eq!(cell_text("revenue", &t, "1234.5"), "$1,234.50");
        assert_eq!(cell_text("profit", &t, "20"), "$20.00");
        assert_eq!(cell_text("date", &t, "2024-01-01 00:00:00"), "2024-01-01");
        assert_eq!(cell_text("note", &t, "as is"), "as is");
    }
}
