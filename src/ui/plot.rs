use chrono::{Datelike, NaiveDate};
use eframe::egui::{Color32, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Line, MarkerShape, Plot, PlotPoints, Points};

use crate::color::{generate_palette, hue, sequential, ColorMap};
use crate::data::aggregate::{MonthlyRevenue, PaymentMethodSummary, RevenueProfitPoint};
use crate::format;

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

fn day_to_x(date: NaiveDate) -> f64 {
    date.num_days_from_ce() as f64
}

fn x_to_day(x: f64) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(x.round() as i32)
}

/// Daily revenue as a line over calendar days.
pub fn daily_revenue(ui: &mut Ui, daily: &[(NaiveDate, f64)]) {
    ui.strong("Daily Revenue Trend");

    let points: PlotPoints = daily.iter().map(|(d, rev)| [day_to_x(*d), *rev]).collect();
    let line = Line::new(points)
        .name("Revenue")
        .color(Color32::from_rgb(0x3B, 0x82, 0xF6))
        .width(3.0);

    Plot::new("daily_revenue")
        .height(CHART_HEIGHT)
        .x_axis_label("Date")
        .y_axis_label("Revenue ($)")
        .x_axis_formatter(|mark: GridMark, _range| {
            x_to_day(mark.value)
                .map(|d| d.format("%b %d").to_string())
                .unwrap_or_default()
        })
        .label_formatter(|_name, value| match x_to_day(value.x) {
            Some(d) => format!("{}\n{}", d.format("%Y-%m-%d"), format::currency(value.y)),
            None => String::new(),
        })
        .allow_scroll(false)
        .allow_boxed_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui.line(line);
        });
}

/// Monthly revenue bars in chronological order, tinted by magnitude.
pub fn monthly_revenue(ui: &mut Ui, monthly: &[MonthlyRevenue]) {
    let groups: Vec<(String, f64)> = monthly.iter().map(|m| (m.label.clone(), m.revenue)).collect();
    labelled_bars(
        ui,
        "monthly_revenue",
        "Monthly Revenue",
        "Month",
        "Revenue ($)",
        &groups,
        BarColor::Scale(hue::BLUE),
    );
}

// ---------------------------------------------------------------------------
// Categorical bars
// ---------------------------------------------------------------------------

/// How the bars of a categorical chart are filled.
#[derive(Debug, Clone, Copy)]
pub enum BarColor<'a> {
    /// Light-to-dark scale of one hue by value.
    Scale(f32),
    /// One distinct colour per bar.
    Distinct,
    /// Fixed colours per label.
    Mapped(&'a ColorMap),
}

/// A bar per `(label, value)` group with the labels on the x axis.
pub fn labelled_bars(
    ui: &mut Ui,
    id: &str,
    title: &str,
    x_label: &str,
    y_label: &str,
    groups: &[(String, f64)],
    color: BarColor<'_>,
) {
    ui.strong(title);
    let ticks: Vec<String> = groups.iter().map(|(l, _)| l.clone()).collect();
    bar_plot(ui, id, x_label, y_label, groups, ticks, color);
}

/// Bars whose tick labels carry each group's share of the total, standing in
/// for a distribution donut.
pub fn share_bars(ui: &mut Ui, id: &str, title: &str, x_label: &str, groups: &[(String, f64)], color: BarColor<'_>) {
    ui.strong(title);
    let total: f64 = groups.iter().map(|(_, v)| v).sum();
    let ticks: Vec<String> = groups
        .iter()
        .map(|(label, v)| format!("{label} ({:.1}%)", share_percent(*v, total)))
        .collect();
    bar_plot(ui, id, x_label, "Revenue ($)", groups, ticks, color);
}

/// `value` as a percentage of `total`; zero when the total is zero.
fn share_percent(value: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        value / total * 100.0
    }
}

fn bar_plot(
    ui: &mut Ui,
    id: &str,
    x_label: &str,
    y_label: &str,
    groups: &[(String, f64)],
    ticks: Vec<String>,
    color: BarColor<'_>,
) {
    let max = groups.iter().map(|(_, v)| v.abs()).fold(0.0, f64::max);
    let palette = generate_palette(groups.len());

    let bars: Vec<Bar> = groups
        .iter()
        .zip(&ticks)
        .enumerate()
        .map(|(i, ((key, value), tick))| {
            let fill = match color {
                BarColor::Scale(h) => sequential(h, if max > 0.0 { value.abs() / max } else { 0.0 }),
                BarColor::Distinct => palette[i],
                BarColor::Mapped(cm) => cm.color_for(key),
            };
            Bar::new(i as f64, *value).name(tick).fill(fill).width(0.7)
        })
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .x_axis_label(x_label)
        .y_axis_label(y_label)
        .x_axis_formatter(move |mark: GridMark, _range| category_tick(&ticks, mark.value))
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name(y_label));
        });
}

/// Tick label for a bar index, blank between bars.
fn category_tick(labels: &[String], x: f64) -> String {
    let i = x.round();
    if (x - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    labels.get(i as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Scatter views
// ---------------------------------------------------------------------------

/// Revenue vs profit, one point per transaction, one series per category.
pub fn revenue_vs_profit(ui: &mut Ui, points: &[RevenueProfitPoint<'_>], colors: Option<&ColorMap>) {
    ui.strong("Revenue vs Profit Relationship");

    let mut categories: Vec<&str> = points.iter().map(|p| p.category).collect();
    categories.sort_unstable();
    categories.dedup();

    Plot::new("revenue_vs_profit")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Revenue ($)")
        .y_axis_label("Profit ($)")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for cat in &categories {
                let series: PlotPoints = points
                    .iter()
                    .filter(|p| p.category == *cat)
                    .map(|p| [p.revenue, p.profit])
                    .collect();
                let color = colors.map_or(Color32::LIGHT_BLUE, |cm| cm.color_for(cat));
                plot_ui.points(
                    Points::new(series)
                        .name(*cat)
                        .color(color)
                        .radius(2.5)
                        .shape(MarkerShape::Circle),
                );
            }
        });
}

/// Usage vs satisfaction per payment method; marker size follows revenue.
pub fn payment_usage_vs_satisfaction(ui: &mut Ui, summary: &[PaymentMethodSummary]) {
    ui.strong("Payment Methods: Usage vs Satisfaction");

    let max_revenue = summary.iter().map(|s| s.revenue).fold(0.0, f64::max);
    let palette = generate_palette(summary.len());

    Plot::new("payment_usage")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Number of Transactions")
        .y_axis_label("Avg. Customer Satisfaction")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (s, color) in summary.iter().zip(palette) {
                let radius = marker_radius(s.revenue, max_revenue);
                plot_ui.points(
                    Points::new(PlotPoints::from(vec![[s.transaction_count as f64, s.average_satisfaction]]))
                        .name(&s.payment_method)
                        .color(color)
                        .radius(radius)
                        .filled(true),
                );
            }
        });
}

/// Area-proportional marker radius between 4 and 20 px.
fn marker_radius(value: f64, max: f64) -> f32 {
    if max <= 0.0 || !value.is_finite() {
        return 4.0;
    }
    (4.0 + 16.0 * (value.max(0.0) / max).sqrt()) as f32
}
