//! Write a synthetic `cleaned_data.csv` (or `.parquet`) so the dashboard can
//! run without the upstream ETL.
//!
//! Usage: `generate_sample [OUTPUT] [ROWS]`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::{Duration, NaiveDate};
use parquet::arrow::ArrowWriter;

const CATEGORIES: [(&str, f64, f64); 6] = [
    ("Electronics", 80.0, 1200.0),
    ("Clothing", 15.0, 150.0),
    ("Home & Garden", 20.0, 400.0),
    ("Sports", 10.0, 300.0),
    ("Books", 5.0, 60.0),
    ("Beauty", 8.0, 120.0),
];
const REGIONS: [&str; 4] = ["North", "South", "East", "West"];
const CHANNELS: [&str; 3] = ["Online", "In-Store", "Mobile App"];
const PAYMENT_METHODS: [&str; 4] = ["Credit Card", "Debit Card", "PayPal", "Cash"];
const SEGMENTS: [&str; 4] = ["New", "Regular", "Premium", "VIP"];

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

struct Row {
    id: i64,
    date: NaiveDate,
    category: &'static str,
    region: &'static str,
    channel: &'static str,
    payment_method: &'static str,
    customer_segment: &'static str,
    unit_price: f64,
    quantity: i64,
    revenue: f64,
    cost: f64,
    profit: f64,
    profit_margin: f64,
    customer_satisfaction: f64,
}

fn generate(n: usize, rng: &mut SimpleRng) -> Result<Vec<Row>> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).context("invalid start date")?;

    Ok((0..n)
        .map(|i| {
            let &(category, lo, hi) = rng.pick(&CATEGORIES);
            let unit_price = round2(rng.range(lo, hi));
            let quantity = 1 + (rng.next_u64() % 5) as i64;
            let revenue = round2(unit_price * quantity as f64);
            let cost = round2(revenue * rng.range(0.55, 0.85));
            let profit = round2(revenue - cost);
            let profit_margin = if revenue == 0.0 { 0.0 } else { round2(profit / revenue * 100.0) };
            let customer_satisfaction = (rng.range(1.0, 5.0) * 10.0).round() / 10.0;

            Row {
                id: 100_000 + i as i64,
                date: start + Duration::days((rng.next_u64() % 366) as i64),
                category,
                region: *rng.pick(&REGIONS),
                channel: *rng.pick(&CHANNELS),
                payment_method: *rng.pick(&PAYMENT_METHODS),
                customer_segment: *rng.pick(&SEGMENTS),
                unit_price,
                quantity,
                revenue,
                cost,
                profit,
                profit_margin,
                customer_satisfaction,
            }
        })
        .collect())
}

const HEADER: [&str; 14] = [
    "transaction_id",
    "date",
    "category",
    "region",
    "channel",
    "payment_method",
    "customer_segment",
    "unit_price",
    "quantity",
    "revenue",
    "cost",
    "profit",
    "profit_margin",
    "customer_satisfaction",
];

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    wtr.write_record(HEADER)?;
    for r in rows {
        wtr.write_record([
            r.id.to_string(),
            r.date.format("%Y-%m-%d").to_string(),
            r.category.to_string(),
            r.region.to_string(),
            r.channel.to_string(),
            r.payment_method.to_string(),
            r.customer_segment.to_string(),
            format!("{:.2}", r.unit_price),
            r.quantity.to_string(),
            format!("{:.2}", r.revenue),
            format!("{:.2}", r.cost),
            format!("{:.2}", r.profit),
            format!("{:.2}", r.profit_margin),
            format!("{:.1}", r.customer_satisfaction),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).context("invalid epoch")?;
    let text = |f: fn(&Row) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let num = |f: fn(&Row) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let int = |f: fn(&Row) -> i64| -> ArrayRef {
        Arc::new(Int64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let days: Vec<i32> = rows.iter().map(|r| (r.date - epoch).num_days() as i32).collect();

    let columns: Vec<ArrayRef> = vec![
        int(|r| r.id),
        Arc::new(Date32Array::from(days)) as ArrayRef,
        text(|r| r.category),
        text(|r| r.region),
        text(|r| r.channel),
        text(|r| r.payment_method),
        text(|r| r.customer_segment),
        num(|r| r.unit_price),
        int(|r| r.quantity),
        num(|r| r.revenue),
        num(|r| r.cost),
        num(|r| r.profit),
        num(|r| r.profit_margin),
        num(|r| r.customer_satisfaction),
    ];

    let types = [
        DataType::Int64,
        DataType::Date32,
        DataType::Utf8,
        DataType::Utf8,
        DataType::Utf8,
        DataType::Utf8,
        DataType::Utf8,
        DataType::Float64,
        DataType::Int64,
        DataType::Float64,
        DataType::Float64,
        DataType::Float64,
        DataType::Float64,
        DataType::Float64,
    ];
    let schema = Arc::new(Schema::new(
        HEADER
            .iter()
            .zip(types)
            .map(|(name, ty)| Field::new(*name, ty, false))
            .collect::<Vec<_>>(),
    ));

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let output = PathBuf::from(args.next().unwrap_or_else(|| "cleaned_data.csv".to_string()));
    let n: usize = match args.next() {
        Some(s) => s.parse().with_context(|| format!("'{s}' is not a row count"))?,
        None => 2000,
    };

    let mut rng = SimpleRng::new(42);
    let rows = generate(n, &mut rng)?;

    let ext = output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "csv" => write_csv(&output, &rows)?,
        "parquet" | "pq" => write_parquet(&output, &rows)?,
        other => bail!("Unsupported output extension: .{other}"),
    }

    log::info!("Wrote {} transactions to {}", rows.len(), output.display());
    println!("Wrote {} transactions to {}", rows.len(), output.display());
    Ok(())
}
