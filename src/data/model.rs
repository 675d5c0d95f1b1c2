use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::NaiveDate;
use csv::StringRecord;

// ---------------------------------------------------------------------------
// Dimension – a low-cardinality categorical attribute of a transaction
// ---------------------------------------------------------------------------

/// The categorical columns a transaction can be grouped or filtered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    Category,
    Region,
    Channel,
    PaymentMethod,
    CustomerSegment,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Category,
        Dimension::Region,
        Dimension::Channel,
        Dimension::PaymentMethod,
        Dimension::CustomerSegment,
    ];

    /// Dimensions exposed as filter widgets.
    pub const FILTERABLE: [Dimension; 3] =
        [Dimension::Category, Dimension::Region, Dimension::Channel];

    /// Source column name.
    pub fn column(self) -> &'static str {
        match self {
            Dimension::Category => "category",
            Dimension::Region => "region",
            Dimension::Channel => "channel",
            Dimension::PaymentMethod => "payment_method",
            Dimension::CustomerSegment => "customer_segment",
        }
    }

    /// Human-readable label for axis titles and headers.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Category => "Category",
            Dimension::Region => "Region",
            Dimension::Channel => "Channel",
            Dimension::PaymentMethod => "Payment Method",
            Dimension::CustomerSegment => "Customer Segment",
        }
    }

    /// The transaction's value for this dimension.
    pub fn value_of(self, tx: &Transaction) -> &str {
        match self {
            Dimension::Category => &tx.category,
            Dimension::Region => &tx.region,
            Dimension::Channel => &tx.channel,
            Dimension::PaymentMethod => &tx.payment_method,
            Dimension::CustomerSegment => &tx.customer_segment,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Transaction – one row of the source table
// ---------------------------------------------------------------------------

/// A single sale.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub transaction_id: String,
    pub date: NaiveDate,
    pub category: String,
    pub region: String,
    pub channel: String,
    pub payment_method: String,
    pub customer_segment: String,
    pub unit_price: f64,
    pub quantity: f64,
    pub revenue: f64,
    pub cost: f64,
    pub profit: f64,
    /// Absent when the source has no `profit_margin` column or the cell is empty.
    pub profit_margin: Option<f64>,
    /// Rating on a 1–5 scale.
    pub customer_satisfaction: f64,
    /// Derived at load: `date` formatted as e.g. `Jan 2024`.
    pub month_year: String,
}

/// Label used for the monthly revenue view.
pub fn month_year_label(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset. Immutable once built.
///
/// `raw` keeps the exact text of every source row so exports reproduce the
/// source formatting; `raw[i]` belongs to `rows[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub headers: StringRecord,
    pub rows: Vec<Transaction>,
    pub raw: Vec<StringRecord>,
    /// Field separator of the source text; exports are written with it.
    pub delimiter: u8,
    /// Sorted unique values per dimension.
    pub unique_values: BTreeMap<Dimension, BTreeSet<String>>,
}

impl Dataset {
    /// Build the per-dimension indices from parsed rows.
    pub fn from_rows(headers: StringRecord, rows: Vec<Transaction>, raw: Vec<StringRecord>) -> Self {
        debug_assert_eq!(rows.len(), raw.len());

        let mut unique_values: BTreeMap<Dimension, BTreeSet<String>> = Dimension::ALL
            .iter()
            .map(|d| (*d, BTreeSet::new()))
            .collect();

        for tx in &rows {
            for dim in Dimension::ALL {
                unique_values
                    .entry(dim)
                    .or_default()
                    .insert(dim.value_of(tx).to_string());
            }
        }

        Dataset {
            headers,
            rows,
            raw,
            delimiter: b',',
            unique_values,
        }
    }

    /// Sorted unique values for a dimension (empty set if the dataset is empty).
    pub fn values(&self, dim: Dimension) -> BTreeSet<String> {
        self.unique_values.get(&dim).cloned().unwrap_or_default()
    }

    /// Earliest and latest transaction date, `None` when empty.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.rows.iter().map(|t| t.date).min()?;
        let max = self.rows.iter().map(|t| t.date).max()?;
        Some((min, max))
    }

    /// Number of transactions.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
