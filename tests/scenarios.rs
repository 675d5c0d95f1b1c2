use std::collections::BTreeSet;

use chrono::NaiveDate;
use retail_dashboard::data::export::to_csv_bytes;
use retail_dashboard::data::filter::{apply, DateRange, FilterSelection};
use retail_dashboard::data::loader::read_csv;
use retail_dashboard::data::model::{Dataset, Dimension};
use retail_dashboard::data::pipeline::render;

const THREE_ROWS: &str = "\
transaction_id,date,category,region,channel,payment_method,customer_segment,unit_price,quantity,revenue,cost,profit,profit_margin,customer_satisfaction
1,2024-01-01,A,North,Online,Card,Retail,100,1,100,80,20,20,4
2,2024-01-02,B,South,Online,Card,Retail,200,1,200,150,50,25,4
3,2024-02-01,A,North,Online,Card,Retail,300,1,300,210,90,30,4
";

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn three_rows() -> Dataset {
    read_csv(THREE_ROWS.as_bytes(), b',').unwrap()
}

#[test]
fn category_a_in_january_keeps_only_the_first_row() {
    let ds = three_rows();
    let mut sel = FilterSelection::all(&ds).unwrap();
    sel.categories = BTreeSet::from(["A".to_string()]);
    sel.date_range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();

    let views = render(&ds, &sel);
    assert_eq!(views.filtered.len(), 1);
    assert_eq!(views.filtered.get(0).unwrap().transaction_id, "1");
    assert!((views.kpis.total_revenue - 100.0).abs() < 1e-9);
    assert!((views.kpis.profit_margin.unwrap() - 20.0).abs() < 1e-9);
}

#[test]
fn full_selection_covers_all_three_rows() {
    let ds = three_rows();
    let sel = FilterSelection::all(&ds).unwrap();
    let views = render(&ds, &sel);

    assert!((views.kpis.total_revenue - 600.0).abs() < 1e-9);

    let monthly: Vec<(&str, f64)> = views
        .monthly_revenue
        .iter()
        .map(|m| (m.label.as_str(), m.revenue))
        .collect();
    assert_eq!(monthly, vec![("Jan 2024", 300.0), ("Feb 2024", 300.0)]);

    let days: Vec<NaiveDate> = views.daily_revenue.iter().map(|(d, _)| *d).collect();
    assert_eq!(days, vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 2, 1)]);
}

#[test]
fn category_breakdown_sums_to_total_for_every_single_category() {
    let ds = three_rows();
    for cat in ds.values(Dimension::Category) {
        let mut sel = FilterSelection::all(&ds).unwrap();
        sel.categories = BTreeSet::from([cat]);
        let views = render(&ds, &sel);
        let sum: f64 = views.revenue_by_category.iter().map(|(_, v)| v).sum();
        assert!((sum - views.kpis.total_revenue).abs() < 1e-9);
    }
}

#[test]
fn empty_inclusion_set_yields_empty_views_without_errors() {
    let ds = three_rows();
    for dim in Dimension::FILTERABLE {
        let mut sel = FilterSelection::all(&ds).unwrap();
        sel.selected_mut(dim).unwrap().clear();
        let views = render(&ds, &sel);
        assert!(views.filtered.is_empty());
        assert_eq!(views.kpis.total_revenue, 0.0);
        assert_eq!(views.kpis.average_order_value, 0.0);
        assert_eq!(views.kpis.profit_margin, None);
        assert!(views.filtered.date_span().is_err());
    }
}

#[test]
fn exported_rows_reload_to_the_same_dataset() {
    let ds = three_rows();
    let mut sel = FilterSelection::all(&ds).unwrap();
    sel.date_range = DateRange::new(date(2024, 1, 2), date(2024, 2, 1)).unwrap();
    let filtered = apply(&ds, &sel);

    let bytes = to_csv_bytes(&filtered).unwrap();
    let reloaded = read_csv(bytes.as_slice(), b',').unwrap();

    let expected: Vec<_> = filtered.iter().cloned().collect();
    assert_eq!(reloaded.rows, expected);
    assert_eq!(reloaded.headers, ds.headers);
    assert_eq!(String::from_utf8(bytes).unwrap().lines().nth(1), THREE_ROWS.lines().nth(2));
}
