//! Derived views over a filtered dataset.
//!
//! Every function here is a pure reduction of a [`FilteredDataset`]; an empty
//! input yields empty vectors and zero-valued scalars, never a panic.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate};

use super::filter::FilteredDataset;
use super::model::{Dimension, Transaction};

// ---------------------------------------------------------------------------
// KPI scalars
// ---------------------------------------------------------------------------

/// Headline metrics shown in the KPI cards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Kpis {
    pub total_revenue: f64,
    pub average_order_value: f64,
    pub total_profit: f64,
    /// `total_profit / total_revenue * 100`; `None` when revenue sums to zero.
    pub profit_margin: Option<f64>,
    pub transaction_count: usize,
    pub average_satisfaction: f64,
    pub average_quantity: f64,
    /// Number of distinct customer segments.
    pub customer_segments: usize,
}

impl Kpis {
    pub fn compute(rows: &FilteredDataset<'_>) -> Self {
        let n = rows.len();
        let total_revenue: f64 = rows.iter().map(|t| t.revenue).sum();
        let total_profit: f64 = rows.iter().map(|t| t.profit).sum();
        let segments: BTreeSet<&str> = rows.iter().map(|t| t.customer_segment.as_str()).collect();

        Kpis {
            total_revenue,
            average_order_value: mean(rows.iter().map(|t| t.revenue)),
            total_profit,
            profit_margin: margin_percent(total_profit, total_revenue),
            transaction_count: n,
            average_satisfaction: mean(rows.iter().map(|t| t.customer_satisfaction)),
            average_quantity: mean(rows.iter().map(|t| t.quantity)),
            customer_segments: segments.len(),
        }
    }
}

/// Profit as a percentage of revenue, guarded against zero revenue.
pub fn margin_percent(profit: f64, revenue: f64) -> Option<f64> {
    if revenue == 0.0 {
        None
    } else {
        Some(profit / revenue * 100.0)
    }
}

/// Arithmetic mean; `0.0` for an empty input.
fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}

// ---------------------------------------------------------------------------
// Time series
// ---------------------------------------------------------------------------

/// Revenue summed per calendar day, ascending by date.
pub fn daily_revenue(rows: &FilteredDataset<'_>) -> Vec<(NaiveDate, f64)> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for tx in rows.iter() {
        *by_day.entry(tx.date).or_default() += tx.revenue;
    }
    by_day.into_iter().collect()
}

/// One bar of the monthly revenue chart.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRevenue {
    /// e.g. `Jan 2024`
    pub label: String,
    pub revenue: f64,
}

/// Revenue summed per calendar month, in chronological order.
pub fn monthly_revenue(rows: &FilteredDataset<'_>) -> Vec<MonthlyRevenue> {
    let mut by_month: BTreeMap<(i32, u32), (String, f64)> = BTreeMap::new();
    for tx in rows.iter() {
        let entry = by_month
            .entry((tx.date.year(), tx.date.month()))
            .or_insert_with(|| (tx.month_year.clone(), 0.0));
        entry.1 += tx.revenue;
    }
    by_month
        .into_iter()
        .map(|(_, (label, revenue))| MonthlyRevenue { label, revenue })
        .collect()
}

// ---------------------------------------------------------------------------
// Categorical breakdowns
// ---------------------------------------------------------------------------

/// Sum `value` per group, then sort descending by the total (ties by label).
fn grouped_sum<'a>(
    rows: impl Iterator<Item = &'a Transaction>,
    key: impl Fn(&'a Transaction) -> &'a str,
    value: impl Fn(&Transaction) -> f64,
) -> Vec<(String, f64)> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for tx in rows {
        *totals.entry(key(tx)).or_default() += value(tx);
    }
    let mut out: Vec<(String, f64)> = totals.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
    sort_descending(&mut out);
    out
}

fn sort_descending(groups: &mut [(String, f64)]) {
    groups.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
}

/// Revenue per value of `dim`, largest first.
pub fn revenue_by(rows: &FilteredDataset<'_>, dim: Dimension) -> Vec<(String, f64)> {
    grouped_sum(rows.iter(), |t| dim.value_of(t), |t| t.revenue)
}

/// Mean `profit_margin` per category, largest first.
///
/// Rows without a margin are skipped; categories with no margin at all are
/// left out.
pub fn margin_by_category(rows: &FilteredDataset<'_>) -> Vec<(String, f64)> {
    let mut acc: HashMap<&str, (f64, usize)> = HashMap::new();
    for tx in rows.iter() {
        if let Some(m) = tx.profit_margin {
            let e = acc.entry(tx.category.as_str()).or_default();
            e.0 += m;
            e.1 += 1;
        }
    }
    let mut out: Vec<(String, f64)> = acc
        .into_iter()
        .map(|(k, (sum, n))| (k.to_string(), sum / n as f64))
        .collect();
    sort_descending(&mut out);
    out
}

// ---------------------------------------------------------------------------
// Payment methods
// ---------------------------------------------------------------------------

/// Revenue, usage and satisfaction for one payment method.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentMethodSummary {
    pub payment_method: String,
    pub revenue: f64,
    pub transaction_count: usize,
    pub average_satisfaction: f64,
}

/// One row per payment method, ordered by method name.
pub fn payment_methods(rows: &FilteredDataset<'_>) -> Vec<PaymentMethodSummary> {
    // (revenue, count, satisfaction sum)
    let mut acc: BTreeMap<&str, (f64, usize, f64)> = BTreeMap::new();
    for tx in rows.iter() {
        let e = acc.entry(tx.payment_method.as_str()).or_default();
        e.0 += tx.revenue;
        e.1 += 1;
        e.2 += tx.customer_satisfaction;
    }
    acc.into_iter()
        .map(|(method, (revenue, n, sat))| PaymentMethodSummary {
            payment_method: method.to_string(),
            revenue,
            transaction_count: n,
            average_satisfaction: sat / n as f64,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Relationship view
// ---------------------------------------------------------------------------

/// A transaction as a point on the revenue/profit plane.
#[derive(Debug, Clone, PartialEq)]
pub struct RevenueProfitPoint<'a> {
    pub revenue: f64,
    pub profit: f64,
    pub category: &'a str,
    pub region: &'a str,
    pub customer_segment: &'a str,
}

/// The filtered rows, unaggregated, as scatter points.
pub fn revenue_profit_points<'a>(rows: &FilteredDataset<'a>) -> Vec<RevenueProfitPoint<'a>> {
    rows.iter()
        .map(|t| RevenueProfitPoint {
            revenue: t.revenue,
            profit: t.profit,
            category: &t.category,
            region: &t.region,
            customer_segment: &t.customer_segment,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Sidebar summary
// ---------------------------------------------------------------------------

/// Counts shown under "Dataset Info".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DatasetInfo {
    pub records: usize,
    pub categories: usize,
    pub regions: usize,
}

impl DatasetInfo {
    pub fn compute(rows: &FilteredDataset<'_>) -> Self {
        let distinct = |dim: Dimension| rows.iter().map(|t| dim.value_of(t)).collect::<BTreeSet<_>>().len();
        DatasetInfo {
            records: rows.len(),
            categories: distinct(Dimension::Category),
            regions: distinct(Dimension::Region),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply, FilterSelection};
    use crate::data::model::fixtures::{dataset, three_rows, tx};

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn kpis_over_three_rows() {
        let ds = three_rows();
        let all = FilteredDataset::everything(&ds);
        let k = Kpis::compute(&all);
        assert!(approx(k.total_revenue, 600.0));
        assert!(approx(k.average_order_value, 200.0));
        assert!(approx(k.total_profit, 160.0));
        assert!(approx(k.profit_margin.unwrap(), 160.0 / 600.0 * 100.0));
        assert_eq!(k.transaction_count, 3);
        assert!(approx(k.average_satisfaction, 11.0 / 3.0));
        assert!(approx(k.average_quantity, 1.0));
        assert_eq!(k.customer_segments, 2);
    }

    #[test]
    fn empty_input_gives_zero_kpis_and_no_margin() {
        let ds = dataset(Vec::new());
        let k = Kpis::compute(&FilteredDataset::everything(&ds));
        assert_eq!(k, Kpis::default());
        assert!(k.profit_margin.is_none());
    }

    #[test]
    fn zero_revenue_margin_is_guarded() {
        let ds = dataset(vec![tx("1", "2024-01-01", "A", "North", 0.0, -5.0)]);
        let k = Kpis::compute(&FilteredDataset::everything(&ds));
        assert_eq!(k.profit_margin, None);
        assert!(approx(k.total_profit, -5.0));
        assert_eq!(margin_percent(1.0, 0.0), None);
    }

    #[test]
    fn daily_revenue_is_ascending_and_merges_same_day() {
        let ds = dataset(vec![
            tx("1", "2024-01-03", "A", "North", 10.0, 1.0),
            tx("2", "2024-01-01", "A", "North", 20.0, 1.0),
            tx("3", "2024-01-03", "B", "South", 5.0, 1.0),
        ]);
        let daily = daily_revenue(&FilteredDataset::everything(&ds));
        let dates: Vec<String> = daily.iter().map(|(d, _)| d.to_string()).collect();
        assert_eq!(dates, vec!["2024-01-01", "2024-01-03"]);
        assert!(approx(daily[1].1, 15.0));
    }

    #[test]
    fn monthly_revenue_is_chronological_not_alphabetical() {
        // "Apr 2024" sorts before "Jan 2024" as text.
        let ds = dataset(vec![
            tx("1", "2024-04-10", "A", "North", 1.0, 0.0),
            tx("2", "2024-01-10", "A", "North", 2.0, 0.0),
            tx("3", "2023-12-10", "A", "North", 4.0, 0.0),
        ]);
        let labels: Vec<String> = monthly_revenue(&FilteredDataset::everything(&ds))
            .into_iter()
            .map(|m| m.label)
            .collect();
        assert_eq!(labels, vec!["Dec 2023", "Jan 2024", "Apr 2024"]);
    }

    #[test]
    fn breakdowns_sort_descending() {
        let ds = three_rows();
        let all = FilteredDataset::everything(&ds);
        assert_eq!(
            revenue_by(&all, Dimension::Category),
            vec![("A".to_string(), 400.0), ("B".to_string(), 200.0)]
        );
        assert_eq!(revenue_by(&all, Dimension::Region)[0].0, "North");
        assert_eq!(revenue_by(&all, Dimension::CustomerSegment).len(), 2);
        assert_eq!(revenue_by(&all, Dimension::Channel)[1], ("Store".to_string(), 200.0));
    }

    #[test]
    fn equal_totals_break_ties_by_label() {
        let ds = dataset(vec![
            tx("1", "2024-01-01", "Z", "North", 50.0, 0.0),
            tx("2", "2024-01-01", "M", "North", 50.0, 0.0),
        ]);
        let cats: Vec<String> = revenue_by(&FilteredDataset::everything(&ds), Dimension::Category)
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(cats, vec!["M", "Z"]);
    }

    #[test]
    fn category_revenue_sums_to_total() {
        let ds = three_rows();
        let mut sel = FilterSelection::all(&ds).unwrap();
        sel.regions.remove("South");
        let filtered = apply(&ds, &sel);
        let sum: f64 = revenue_by(&filtered, Dimension::Category).iter().map(|(_, v)| v).sum();
        assert!(approx(sum, Kpis::compute(&filtered).total_revenue));
    }

    #[test]
    fn margin_by_category_averages_row_margins() {
        let mut no_margin = tx("4", "2024-01-05", "B", "South", 100.0, 10.0);
        no_margin.profit_margin = None;
        let ds = dataset(vec![
            tx("1", "2024-01-01", "A", "North", 100.0, 20.0),
            tx("2", "2024-01-02", "A", "North", 100.0, 40.0),
            tx("3", "2024-01-03", "B", "South", 100.0, 10.0),
            no_margin,
        ]);
        let margins = margin_by_category(&FilteredDataset::everything(&ds));
        assert_eq!(margins.len(), 2);
        assert_eq!(margins[0].0, "A");
        assert!(approx(margins[0].1, 30.0));
        assert!(approx(margins[1].1, 10.0));
    }

    #[test]
    fn payment_summary_joins_three_reductions() {
        let ds = three_rows();
        let summary = payment_methods(&FilteredDataset::everything(&ds));
        assert_eq!(summary.len(), 2);
        let card = summary.iter().find(|s| s.payment_method == "Card").unwrap();
        assert!(approx(card.revenue, 400.0));
        assert_eq!(card.transaction_count, 2);
        assert!(approx(card.average_satisfaction, 4.0));
        assert_eq!(summary[0].payment_method, "Card");
        assert_eq!(summary[1].payment_method, "Cash");
    }

    #[test]
    fn relationship_view_is_unaggregated() {
        let ds = three_rows();
        let points = revenue_profit_points(&FilteredDataset::everything(&ds));
        assert_eq!(points.len(), 3);
        assert_eq!(points[2].category, "A");
        assert!(approx(points[2].profit, 90.0));
    }

    #[test]
    fn dataset_info_counts_distinct_values() {
        let ds = three_rows();
        let info = DatasetInfo::compute(&FilteredDataset::everything(&ds));
        assert_eq!(info, DatasetInfo { records: 3, categories: 2, regions: 2 });
    }

    #[test]
    fn empty_input_gives_empty_views() {
        let ds = three_rows();
        let mut sel = FilterSelection::all(&ds).unwrap();
        sel.channels.clear();
        let none = apply(&ds, &sel);
        assert!(daily_revenue(&none).is_empty());
        assert!(monthly_revenue(&none).is_empty());
        assert!(revenue_by(&none, Dimension::Category).is_empty());
        assert!(margin_by_category(&none).is_empty());
        assert!(payment_methods(&none).is_empty());
        assert!(revenue_profit_points(&none).is_empty());
        assert_eq!(DatasetInfo::compute(&none), DatasetInfo::default());
    }
}
