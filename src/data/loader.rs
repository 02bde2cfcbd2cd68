use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{
    Array, AsArray, BooleanArray, Date32Array, Float32Array, Float64Array, Int32Array, Int64Array,
};
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{FieldName, FleetRecord};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a fleet record set from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.json`    – `[{ "marca": "Fiat", "canoneMensile": 850, ... }, ...]`
/// * `.csv`     – header row with the same camelCase keys
/// * `.parquet` – one column per key (text, integer, float or date cells)
///
/// Columns that do not name a known field are ignored. Dirty cells never fail
/// the load; only an unreadable or structurally wrong file does.
pub fn load_file(path: &Path) -> Result<Vec<FleetRecord>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }?;

    log::info!("Loaded {} fleet records from {}", records.len(), path.display());
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

fn load_json(path: &Path) -> Result<Vec<FleetRecord>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

/// Parse a records-oriented JSON array. Rows that are not objects are skipped.
pub fn parse_json(text: &str) -> Result<Vec<FleetRecord>> {
    let root: JsonValue = serde_json::from_str(text).context("parsing JSON")?;
    let rows = root.as_array().context("Expected top-level JSON array")?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        if !row.is_object() {
            log::warn!("Row {i} is not a JSON object, skipping");
            continue;
        }
        match serde_json::from_value::<FleetRecord>(row.clone()) {
            Ok(record) => records.push(record),
            Err(e) => log::warn!("Row {i} skipped: {e}"),
        }
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

fn load_csv(path: &Path) -> Result<Vec<FleetRecord>> {
    let reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    read_csv(reader)
}

/// Read CSV rows by header name, through the same field setters as Parquet.
pub fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Vec<FleetRecord>> {
    let columns: Vec<Option<FieldName>> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| FieldName::from_key(h.trim()))
        .collect();

    if columns.iter().all(Option::is_none) {
        log::warn!("CSV header names no known fleet field");
    }

    let mut records = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let row = result.with_context(|| format!("CSV row {row_no}"))?;
        let mut record = FleetRecord::default();
        for (cell, field) in row.iter().zip(&columns) {
            if let Some(field) = field {
                field.assign(&mut record, cell);
            }
        }
        records.push(record);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per fleet field.
///
/// Works with files written by **Pandas** (`df.to_parquet()`), **Polars**
/// and the bundled `generate_sample` tool.
fn load_parquet(path: &Path) -> Result<Vec<FleetRecord>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let columns: Vec<(usize, FieldName)> = schema
            .fields()
            .iter()
            .enumerate()
            .filter_map(|(i, f)| FieldName::from_key(f.name()).map(|field| (i, field)))
            .collect();

        for row in 0..batch.num_rows() {
            let mut record = FleetRecord::default();
            for (col_idx, field) in &columns {
                let col = batch.column(*col_idx);
                if let Some(value) = cell_number(col, row) {
                    field.assign_number(&mut record, value);
                } else if let Some(text) = cell_text(col, row) {
                    field.assign(&mut record, &text);
                }
            }
            records.push(record);
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

/// Value of an integer or float cell. `None` for nulls and non-numeric types.
fn cell_number(col: &Arc<dyn Array>, row: usize) -> Option<f64> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| f64::from(a.value(row))),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row) as f64),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| f64::from(a.value(row))),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row)),
        _ => None,
    }
}

/// Render a single Arrow cell as the text a CSV export would carry.
/// Null cells and unsupported types yield `None`. Numeric cells normally go
/// through [`cell_number`] first.
fn cell_text(col: &Arc<dyn Array>, row: usize) -> Option<String> {
    if col.is_null(row) {
        return None;
    }
    match col.data_type() {
        DataType::Utf8 => Some(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Some(col.as_string::<i64>().value(row).to_string()),
        DataType::Int32 => col
            .as_any()
            .downcast_ref::<Int32Array>()
            .map(|a| a.value(row).to_string()),
        DataType::Int64 => col
            .as_any()
            .downcast_ref::<Int64Array>()
            .map(|a| a.value(row).to_string()),
        DataType::Float32 => col
            .as_any()
            .downcast_ref::<Float32Array>()
            .map(|a| a.value(row).to_string()),
        DataType::Float64 => col
            .as_any()
            .downcast_ref::<Float64Array>()
            .map(|a| a.value(row).to_string()),
        DataType::Boolean => col
            .as_any()
            .downcast_ref::<BooleanArray>()
            .map(|a| a.value(row).to_string()),
        DataType::Date32 => col
            .as_any()
            .downcast_ref::<Date32Array>()
            .and_then(|a| a.value_as_date(row))
            .map(|d| d.format("%Y-%m-%d").to_string()),
        other => {
            log::debug!("Unsupported parquet column type {other:?}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_skips_non_object_rows() {
        let json = r#"[{"marca": "Fiat"}, 42, {"marca": "BMW", "colore": "blu"}]"#;
        let records = parse_json(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].marca, "BMW");
    }

    #[test]
    fn json_must_be_an_array() {
        assert!(parse_json(r#"{"marca": "Fiat"}"#).is_err());
    }

    #[test]
    fn csv_maps_known_headers_only() {
        let data = "marca,colore,canoneMensile,emissioni\n\
                    Fiat,rosso,\"850,50\",120 g/km\n\
                    BMW,blu,,\n";
        let reader = csv::ReaderBuilder::new().from_reader(data.as_bytes());
        let records = read_csv(reader).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].marca, "Fiat");
        assert_eq!(records[0].canone_mensile, Some(850.5));
        assert_eq!(records[0].emissioni, "120 g/km");
        assert_eq!(records[1].canone_mensile, None);
    }

    #[test]
    fn unsupported_extension_is_an_error() {
        assert!(load_file(Path::new("fleet.xlsx")).is_err());
    }
}
