use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Amount, DrugDataset, DrugRecord};

/// Columns a source must provide. Rows with an empty value in any of them are
/// dropped during cleaning.
const REQUIRED_COLUMNS: [&str; 5] = [
    "ndc",
    "drug_name",
    "generic_name",
    "therapeutic_class",
    "pmpm_cost",
];

// ---------------------------------------------------------------------------
// Cell – a raw value before cleaning
// ---------------------------------------------------------------------------

/// A single untyped cell as read from a file or a backend payload.
#[derive(Debug, Clone, PartialEq)]
enum Cell {
    Text(String),
    Number(f64),
    Null,
}

type Row = BTreeMap<String, Cell>;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a drug dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one drug per line
/// * `.json`    – `[{...}, ...]` or the backend's `{ "drugs": [...] }`
/// * `.parquet` – flat columns, as written by Pandas or Polars
pub fn load_file(path: &Path) -> Result<DrugDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path)?,
        "json" => load_json(path)?,
        "csv" => load_csv(path)?,
        other => bail!("Unsupported file extension: .{other}"),
    };

    Ok(DrugDataset::from_records(records))
}

/// Clean backend JSON records (the `drugs` array of `/api/drugs`).
pub fn records_from_json(values: &[JsonValue]) -> Result<Vec<DrugRecord>> {
    let rows = values
        .iter()
        .enumerate()
        .map(|(i, rec)| -> Result<Row> {
            let obj = rec
                .as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))?;
            Ok(obj
                .iter()
                .map(|(k, v)| (k.trim().to_string(), json_to_cell(v)))
                .collect())
        })
        .collect::<Result<Vec<Row>>>()?;
    Ok(clean_rows(rows))
}

// ---------------------------------------------------------------------------
// Cleaning
// ---------------------------------------------------------------------------

fn clean_rows(rows: Vec<Row>) -> Vec<DrugRecord> {
    let total = rows.len();
    let records: Vec<DrugRecord> = rows
        .iter()
        .enumerate()
        .filter_map(|(i, row)| {
            let record = record_from_row(row);
            if record.is_none() {
                log::debug!("Row {i}: missing a required field, skipped");
            }
            record
        })
        .collect();

    let dropped = total - records.len();
    if dropped > 0 {
        log::info!("Dropped {dropped} of {total} rows with missing required fields");
    }
    records
}

/// Build a record from a raw row, or `None` if a required field is empty.
fn record_from_row(row: &Row) -> Option<DrugRecord> {
    let pmpm = amount(row, "pmpm_cost")?.as_cost()?;

    Some(DrugRecord {
        ndc: text(row, "ndc")?,
        drug_name: text(row, "drug_name")?.to_uppercase(),
        generic_name: text(row, "generic_name")?.to_uppercase(),
        therapeutic_class: text(row, "therapeutic_class")?,
        atc_code: text(row, "atc_code").unwrap_or_default(),
        therapeutic_equivalence_code: Some(
            text(row, "therapeutic_equivalence_code").unwrap_or_else(|| "NA".to_string()),
        ),
        total_drug_cost: amount(row, "total_drug_cost"),
        member_count: amount(row, "member_count"),
        avg_age: amount(row, "avg_age").and_then(|a| a.as_cost()),
        state: text(row, "state").unwrap_or_default(),
        pmpm_cost: Some(Amount::Number(pmpm)),
    })
}

fn text(row: &Row, key: &str) -> Option<String> {
    match row.get(key)? {
        Cell::Text(s) => Some(s.trim().to_string()).filter(|s| !s.is_empty()),
        Cell::Number(n) => Some(number_to_text(*n)),
        Cell::Null => None,
    }
}

fn amount(row: &Row, key: &str) -> Option<Amount> {
    match row.get(key)? {
        Cell::Text(s) => {
            let s = s.trim();
            (!s.is_empty()).then(|| Amount::Text(s.to_string()))
        }
        Cell::Number(n) if n.is_finite() => Some(Amount::Number(*n)),
        _ => None,
    }
}

/// Whole numbers render without a trailing `.0` so numeric NDCs stay readable.
fn number_to_text(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn check_columns(columns: &[String], source: &str) -> Result<()> {
    for required in REQUIRED_COLUMNS {
        if !columns.iter().any(|c| c == required) {
            bail!("{source} missing '{required}' column");
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "ndc": "00093-1712-01",
///     "drug_name": "Atorvastatin 40mg Tablets",
///     "total_drug_cost": "$385,000",
///     "member_count": 4120,
///     ...
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<DrugRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = match &root {
        JsonValue::Array(items) => items,
        JsonValue::Object(obj) => obj
            .get("drugs")
            .and_then(|d| d.as_array())
            .context("Expected a top-level array or a 'drugs' array")?,
        _ => bail!("Expected top-level JSON array"),
    };

    records_from_json(records)
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::String(s) => Cell::Text(s.clone()),
        JsonValue::Number(n) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Null),
        JsonValue::Null => Cell::Null,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one drug per line. Cost and
/// count columns may hold plain numbers or formatted text such as `$1,200`.
fn load_csv(path: &Path) -> Result<Vec<DrugRecord>> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<DrugRecord>> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    check_columns(&headers, "CSV")?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let row: Row = headers
            .iter()
            .zip(record.iter())
            .map(|(col, value)| (col.clone(), guess_cell_type(value)))
            .collect();
        rows.push(row);
    }

    Ok(clean_rows(rows))
}

/// Plain numbers become numbers; everything else, including `"$1,200"`,
/// stays text for the normalisation step.
fn guess_cell_type(s: &str) -> Cell {
    let s = s.trim();
    if s.is_empty() {
        return Cell::Null;
    }
    // NDCs and ATC codes are identifiers even when they look numeric.
    if s.starts_with('0') && s.len() > 1 && !s.starts_with("0.") {
        return Cell::Text(s.to_string());
    }
    match s.parse::<f64>() {
        Ok(f) if f.is_finite() => Cell::Number(f),
        _ => Cell::Text(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file containing one drug per row.
///
/// String, integer, float and boolean columns are read; anything else is
/// treated as missing.
fn load_parquet(path: &Path) -> Result<Vec<DrugRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let columns: Vec<String> = schema
            .fields()
            .iter()
            .map(|f| f.name().trim().to_string())
            .collect();
        check_columns(&columns, "Parquet file")?;

        for row in 0..batch.num_rows() {
            let cells: Row = columns
                .iter()
                .enumerate()
                .map(|(col_idx, name)| (name.clone(), extract_cell(batch.column(col_idx), row)))
                .collect();
            rows.push(cells);
        }
    }

    Ok(clean_rows(rows))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Cell {
    if col.is_null(row) {
        return Cell::Null;
    }
    match col.data_type() {
        DataType::Utf8 => Cell::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Cell::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => Cell::Number(col.as_primitive::<Int32Type>().value(row) as f64),
        DataType::Int64 => Cell::Number(col.as_primitive::<Int64Type>().value(row) as f64),
        DataType::Float32 => Cell::Number(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => Cell::Number(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Cell::Text(col.as_boolean().value(row).to_string()),
        other => {
            log::debug!("Unsupported parquet column type {other:?}, treated as missing");
            Cell::Null
        }
    }
}
