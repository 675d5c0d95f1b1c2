use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::error::DataError;
use super::filter::FilteredDataset;
use super::model::Dataset;

/// Suggested name for the download of a comma-separated source.
pub const DEFAULT_EXPORT_NAME: &str = "filtered_transactions.csv";

/// Suggested download name; the extension follows the source delimiter.
pub fn export_file_name(dataset: &Dataset) -> &'static str {
    match dataset.delimiter {
        b'\t' => "filtered_transactions.tsv",
        _ => DEFAULT_EXPORT_NAME,
    }
}

/// Write the filtered rows in the source's delimited format: the source
/// header, then the untouched source text of every retained row.
pub fn write_csv<W: Write>(rows: &FilteredDataset<'_>, writer: W) -> Result<(), DataError> {
    let source = rows.source();
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(source.delimiter)
        .from_writer(writer);
    wtr.write_record(&source.headers)?;
    for &idx in rows.indices() {
        wtr.write_record(&source.raw[idx])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// The CSV export as bytes (UTF-8).
pub fn to_csv_bytes(rows: &FilteredDataset<'_>) -> Result<Vec<u8>, DataError> {
    let mut buf = Vec::new();
    write_csv(rows, &mut buf)?;
    Ok(buf)
}

/// Write the CSV export to `path`, replacing any existing file.
pub fn save_csv(rows: &FilteredDataset<'_>, path: &Path) -> Result<(), DataError> {
    let file = File::create(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(rows, file)?;
    log::info!("Exported {} transactions to {}", rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::filter::{apply, FilterSelection};
    use crate::data::loader::{load_file, read_csv};

    const SOURCE: &str = "transaction_id,date,category,region,channel,payment_method,customer_segment,unit_price,quantity,revenue,cost,profit,profit_margin,customer_satisfaction,note
T1,2024-01-01,A,North,Online,Card,Retail,50.00,2,100.00,80.00,20.00,20.0,4.5,first
T2,2024-01-02,B,South,Store,Cash,Wholesale,100,2,200,150,50,25,3,\"has, comma\"
T3,2024-02-01,A,North,Online,Card,Retail,150.000,2,300.000,210.000,90.000,30.0,5,
";

    #[test]
    fn export_reproduces_source_text() {
        let ds = read_csv(SOURCE.as_bytes(), b',').unwrap();
        let mut sel = FilterSelection::all(&ds).unwrap();
        sel.categories = BTreeSet::from(["A".to_string()]);

        let bytes = to_csv_bytes(&apply(&ds, &sel)).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), SOURCE.lines().next());
        assert_eq!(lines.next(), SOURCE.lines().nth(1));
        assert_eq!(lines.next(), SOURCE.lines().nth(3));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn quoted_fields_survive_export() {
        let ds = read_csv(SOURCE.as_bytes(), b',').unwrap();
        let sel = FilterSelection::all(&ds).unwrap();
        let text = String::from_utf8(to_csv_bytes(&apply(&ds, &sel)).unwrap()).unwrap();
        assert!(text.contains("\"has, comma\""));
    }

    #[test]
    fn export_then_reload_round_trips() {
        let ds = read_csv(SOURCE.as_bytes(), b',').unwrap();
        let mut sel = FilterSelection::all(&ds).unwrap();
        sel.regions.remove("North");
        let filtered = apply(&ds, &sel);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_EXPORT_NAME);
        save_csv(&filtered, &path).unwrap();
        let reloaded = load_file(&path).unwrap();

        assert_eq!(reloaded.headers, ds.headers);
        assert_eq!(reloaded.len(), filtered.len());
        for (i, tx) in filtered.iter().enumerate() {
            assert_eq!(&reloaded.rows[i], tx);
            assert_eq!(reloaded.raw[i], ds.raw[filtered.indices()[i]]);
        }
    }

    #[test]
    fn tab_separated_source_exports_as_tsv() {
        let tsv = SOURCE.replace(",\"has, comma\"", ",quoted").replace(',', "\t");
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("data.tsv");
        std::fs::write(&src, &tsv).unwrap();

        let ds = load_file(&src).unwrap();
        assert_eq!(export_file_name(&ds), "filtered_transactions.tsv");

        let sel = FilterSelection::all(&ds).unwrap();
        let out = dir.path().join(export_file_name(&ds));
        save_csv(&apply(&ds, &sel), &out).unwrap();

        assert_eq!(std::fs::read_to_string(&out).unwrap(), tsv);
        assert_eq!(load_file(&out).unwrap().rows, ds.rows);
    }

    #[test]
    fn comma_source_keeps_csv_name() {
        let ds = read_csv(SOURCE.as_bytes(), b',').unwrap();
        assert_eq!(export_file_name(&ds), DEFAULT_EXPORT_NAME);
    }

    #[test]
    fn empty_selection_exports_header_only() {
        let ds = read_csv(SOURCE.as_bytes(), b',').unwrap();
        let mut sel = FilterSelection::all(&ds).unwrap();
        sel.channels.clear();
        let text = String::from_utf8(to_csv_bytes(&apply(&ds, &sel)).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
