use chrono::NaiveDate;

use super::aggregate::{
    daily_revenue, margin_by_category, monthly_revenue, payment_methods, revenue_by, revenue_profit_points,
    DatasetInfo, Kpis, MonthlyRevenue, PaymentMethodSummary, RevenueProfitPoint,
};
use super::filter::{apply, FilterSelection, FilteredDataset};
use super::model::{Dataset, Dimension};

/// Everything one rendering pass needs, computed from scratch.
#[derive(Debug, Clone)]
pub struct DashboardViews<'a> {
    pub filtered: FilteredDataset<'a>,
    pub info: DatasetInfo,
    pub kpis: Kpis,
    pub daily_revenue: Vec<(NaiveDate, f64)>,
    pub monthly_revenue: Vec<MonthlyRevenue>,
    pub revenue_by_category: Vec<(String, f64)>,
    pub revenue_by_region: Vec<(String, f64)>,
    pub revenue_by_segment: Vec<(String, f64)>,
    pub revenue_by_channel: Vec<(String, f64)>,
    pub margin_by_category: Vec<(String, f64)>,
    pub payment_methods: Vec<PaymentMethodSummary>,
    pub revenue_vs_profit: Vec<RevenueProfitPoint<'a>>,
}

/// Filter `dataset` by `selection` and compute every derived view.
///
/// Pure: the dataset is only read, and the same inputs always give the same
/// views.
pub fn render<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> DashboardViews<'a> {
    let filtered = apply(dataset, selection);
    log::debug!("selection kept {} of {} transactions", filtered.len(), dataset.len());

    DashboardViews {
        info: DatasetInfo::compute(&filtered),
        kpis: Kpis::compute(&filtered),
        daily_revenue: daily_revenue(&filtered),
        monthly_revenue: monthly_revenue(&filtered),
        revenue_by_category: revenue_by(&filtered, Dimension::Category),
        revenue_by_region: revenue_by(&filtered, Dimension::Region),
        revenue_by_segment: revenue_by(&filtered, Dimension::CustomerSegment),
        revenue_by_channel: revenue_by(&filtered, Dimension::Channel),
        margin_by_category: margin_by_category(&filtered),
        payment_methods: payment_methods(&filtered),
        revenue_vs_profit: revenue_profit_points(&filtered),
        filtered,
    }
}
