use std::fs::File;
use std::io::Read;
use std::path::Path;

use arrow::array::Array;
use arrow::util::display::array_value_to_string;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::StringRecord;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::error::DataError;
use super::model::{month_year_label, Dataset, Transaction};

/// Columns every source must provide. `profit_margin` is optional.
pub const REQUIRED_COLUMNS: [&str; 13] = [
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
    "customer_satisfaction",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a transaction dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.txt` – comma-delimited with a header row (the usual ETL output)
/// * `.tsv`          – tab-delimited with a header row
/// * `.json`         – `[{ "transaction_id": ..., "date": ..., ... }, ...]`
/// * `.parquet`      – flat table with the same column names
pub fn load_file(path: &Path) -> Result<Dataset, DataError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" | "txt" => read_csv(open(path)?, b',')?,
        "tsv" => read_csv(open(path)?, b'\t')?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(DataError::UnsupportedFormat(other.to_string())),
    };

    log::info!(
        "Loaded {} transactions ({} columns) from {}",
        dataset.len(),
        dataset.headers.len(),
        path.display()
    );
    Ok(dataset)
}

fn open(path: &Path) -> Result<File, DataError> {
    File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            DataError::SourceNotFound(path.to_path_buf())
        } else {
            DataError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse delimited text with a header row.
///
/// Fields are kept byte-for-byte in [`Dataset::raw`]; only headers are trimmed.
pub fn read_csv<R: Read>(reader: R, delimiter: u8) -> Result<Dataset, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = normalize_headers(reader.headers()?);

    let mut records = Vec::new();
    for result in reader.records() {
        records.push(result?);
    }

    // +2: 1-based lines, and the header occupies line 1.
    let mut dataset = build_dataset(headers, records, 2)?;
    dataset.delimiter = delimiter;
    Ok(dataset)
}

/// Excel and friends prepend a BOM to the first header; strip it so the
/// schema check does not report a missing column.
fn normalize_headers(headers: &StringRecord) -> StringRecord {
    headers
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}'))
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "transaction_id": 1, "date": "2024-01-01", "category": "Electronics", ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset, DataError> {
    let text = std::fs::read_to_string(path).map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => DataError::SourceNotFound(path.to_path_buf()),
        _ => DataError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    read_json(&text)
}

/// Parse a records-oriented JSON array.
pub fn read_json(text: &str) -> Result<Dataset, DataError> {
    let root: JsonValue = serde_json::from_str(text)?;
    let records = root.as_array().ok_or_else(|| DataError::Row {
        line: 1,
        message: "expected a top-level JSON array".to_string(),
    })?;

    // Column order: first appearance across all records.
    let mut columns: Vec<String> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or_else(|| DataError::Row {
            line: i + 1,
            message: "record is not a JSON object".to_string(),
        })?;
        for key in obj.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }

    let rows = records
        .iter()
        .filter_map(|rec| rec.as_object())
        .map(|obj| {
            columns
                .iter()
                .map(|col| obj.get(col).map(|v| json_cell(col, v)).unwrap_or_default())
                .collect::<StringRecord>()
        })
        .collect();

    let headers: StringRecord = columns.iter().map(String::as_str).collect();
    build_dataset(headers, rows, 1)
}

/// pandas writes datetime columns as epoch milliseconds in this layout.
fn json_cell(column: &str, val: &JsonValue) -> String {
    if column == "date" {
        if let Some(ts) = val.as_i64().and_then(DateTime::from_timestamp_millis) {
            return ts.date_naive().format("%Y-%m-%d").to_string();
        }
    }
    json_to_text(val)
}

fn json_to_text(val: &JsonValue) -> String {
    match val {
        JsonValue::String(s) => s.clone(),
        JsonValue::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a flat Parquet table, e.g. one written by `df.to_parquet()`.
///
/// Every cell is rendered to text with Arrow's display formatting and then
/// goes through the same row parser as CSV, so dates may be stored either as
/// strings or as `Date32` / timestamp columns.
fn load_parquet(path: &Path) -> Result<Dataset, DataError> {
    let file = open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let headers: StringRecord = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().as_str())
        .collect();

    let reader = builder.build()?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        for row in 0..batch.num_rows() {
            let mut record = StringRecord::new();
            for col in batch.columns() {
                if col.is_null(row) {
                    record.push_field("");
                } else {
                    record.push_field(&array_value_to_string(col, row)?);
                }
            }
            records.push(record);
        }
    }

    build_dataset(headers, records, 1)
}

// ---------------------------------------------------------------------------
// Shared row path
// ---------------------------------------------------------------------------

/// Typed view of one source row, before date parsing.
#[derive(Debug, Deserialize)]
struct TransactionRecord {
    transaction_id: String,
    date: String,
    category: String,
    region: String,
    channel: String,
    payment_method: String,
    customer_segment: String,
    unit_price: f64,
    quantity: f64,
    revenue: f64,
    cost: f64,
    profit: f64,
    #[serde(default)]
    profit_margin: Option<f64>,
    customer_satisfaction: f64,
}

impl TransactionRecord {
    fn into_transaction(self) -> Result<Transaction, String> {
        let date = parse_date(&self.date)?;
        Ok(Transaction {
            transaction_id: self.transaction_id,
            date,
            category: self.category,
            region: self.region,
            channel: self.channel,
            payment_method: self.payment_method,
            customer_segment: self.customer_segment,
            unit_price: self.unit_price,
            quantity: self.quantity,
            revenue: self.revenue,
            cost: self.cost,
            profit: self.profit,
            profit_margin: self.profit_margin,
            customer_satisfaction: self.customer_satisfaction,
            month_year: month_year_label(date),
        })
    }
}

fn build_dataset(headers: StringRecord, records: Vec<StringRecord>, first_line: usize) -> Result<Dataset, DataError> {
    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            return Err(DataError::MissingColumn(col.to_string()));
        }
    }

    let mut rows = Vec::with_capacity(records.len());
    for (i, record) in records.iter().enumerate() {
        let line = first_line + i;
        let parsed: TransactionRecord = record
            .deserialize(Some(&headers))
            .map_err(|e| DataError::Row {
                line,
                message: e.to_string(),
            })?;
        let tx = parsed
            .into_transaction()
            .map_err(|message| DataError::Row { line, message })?;
        rows.push(tx);
    }

    Ok(Dataset::from_rows(headers, rows, records))
}

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a calendar date; a time-of-day suffix is accepted and dropped.
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    let s = s.trim();
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt.date());
        }
    }
    Err(format!("'{s}' is not a recognised date"))
}
