use std::path::{Path, PathBuf};

use arrow::array::{
    Array, ArrayRef, Float32Array, Float64Array, Int32Array, Int64Array, LargeStringArray,
    StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use thiserror::Error;

use super::model::{Dataset, Field, Record};

/// Why a dataset could not be loaded. Always fatal at startup.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("dataset file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
    #[error("missing required column '{}'", .0.column_name())]
    MissingColumn(Field),
    #[error("row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: csv::Error,
    },
    #[error("row {row}: invalid value {value:?} in column '{column}'")]
    InvalidValue {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("column '{column}' has unsupported type {data_type}")]
    ColumnType {
        column: &'static str,
        data_type: DataType,
    },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a salary dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv` / `.tsv` – delimited text with a header row
/// * `.json`         – `[{ "year": 2023, "seniority": "Senior", ... }, ...]`
/// * `.parquet`      – one flat column per field
///
/// Column headers may be the canonical names or the Portuguese aliases of the
/// source dataset (`ano`, `senioridade`, `usd`, ...). Extra columns are ignored.
pub fn load_file(path: &Path) -> Result<Dataset, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let records = match ext.as_str() {
        "csv" => load_delimited(path, b',')?,
        "tsv" => load_delimited(path, b'\t')?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => return Err(LoadError::UnsupportedFormat(other.to_string())),
    };
    Ok(Dataset::from_records(records))
}

/// Write records with canonical headers, e.g. to export the filtered view.
pub fn write_csv<'a>(
    path: &Path,
    records: impl IntoIterator<Item = &'a Record>,
) -> Result<usize, LoadError> {
    // Header written by hand so an empty export still loads back.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(Field::ALL.map(Field::column_name))?;
    let mut written = 0;
    for record in records {
        writer.serialize(record)?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

// ---------------------------------------------------------------------------
// Delimited text loader
// ---------------------------------------------------------------------------

fn load_delimited(path: &Path, delimiter: u8) -> Result<Vec<Record>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    for field in Field::ALL {
        if !headers.iter().any(|h| field.matches_header(h)) {
            return Err(LoadError::MissingColumn(field));
        }
    }

    let mut records = Vec::new();
    for (i, result) in reader.deserialize::<Record>().enumerate() {
        let row = i + 1;
        let record = result.map_err(|source| LoadError::Row { row, source })?;
        check_record(&record, row)?;
        records.push(record);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default of `df.to_json(orient='records')`.
///
/// Each object is checked for every required key before it is deserialized,
/// so an absent column reports `MissingColumn` rather than a serde error.
fn load_json(path: &Path) -> Result<Vec<Record>, LoadError> {
    let text = std::fs::read_to_string(path)?;
    let rows: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(&text)?;

    let mut records = Vec::with_capacity(rows.len());
    for (i, row) in rows.into_iter().enumerate() {
        if let Some(field) = Field::ALL
            .into_iter()
            .find(|field| !row.keys().any(|key| field.matches_header(key)))
        {
            return Err(LoadError::MissingColumn(field));
        }
        let record: Record = serde_json::from_value(serde_json::Value::Object(row))?;
        check_record(&record, i + 1)?;
        records.push(record);
    }
    Ok(records)
}

fn check_record(record: &Record, row: usize) -> Result<(), LoadError> {
    if !record.salary_usd.is_finite() {
        return Err(LoadError::InvalidValue {
            row,
            column: Field::SalaryUsd.column_name(),
            value: record.salary_usd.to_string(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per field.
///
/// Text columns may be `Utf8` or `LargeUtf8`, the year any integer width and
/// the salary any float or integer width. Works with files written by both
/// **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Vec<Record>, LoadError> {
    let file = std::fs::File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let schema = builder.schema();
    for field in Field::ALL {
        if !schema.fields().iter().any(|f| field.matches_header(f.name())) {
            return Err(LoadError::MissingColumn(field));
        }
    }
    let reader = builder.build()?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result?;
        let year = column(&batch, Field::Year)?;
        let seniority = column(&batch, Field::Seniority)?;
        let contract = column(&batch, Field::ContractType)?;
        let size = column(&batch, Field::CompanySize)?;
        let title = column(&batch, Field::JobTitle)?;
        let remote = column(&batch, Field::RemoteType)?;
        let country = column(&batch, Field::ResidenceCountry)?;
        let salary = column(&batch, Field::SalaryUsd)?;

        for i in 0..batch.num_rows() {
            let row = records.len() + 1;
            let record = Record {
                year: int_at(year, i, row, Field::Year)?,
                seniority: string_at(seniority, i, row, Field::Seniority)?,
                contract_type: string_at(contract, i, row, Field::ContractType)?,
                company_size: string_at(size, i, row, Field::CompanySize)?,
                job_title: string_at(title, i, row, Field::JobTitle)?,
                remote_type: string_at(remote, i, row, Field::RemoteType)?,
                residence_country_code: string_at(country, i, row, Field::ResidenceCountry)?,
                salary_usd: float_at(salary, i, row, Field::SalaryUsd)?,
            };
            check_record(&record, row)?;
            records.push(record);
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

fn column(batch: &RecordBatch, field: Field) -> Result<&ArrayRef, LoadError> {
    batch
        .schema_ref()
        .fields()
        .iter()
        .position(|f| field.matches_header(f.name()))
        .map(|i| batch.column(i))
        .ok_or(LoadError::MissingColumn(field))
}

fn null_value(row: usize, field: Field) -> LoadError {
    LoadError::InvalidValue {
        row,
        column: field.column_name(),
        value: "null".to_string(),
    }
}

fn wrong_type(col: &ArrayRef, field: Field) -> LoadError {
    LoadError::ColumnType {
        column: field.column_name(),
        data_type: col.data_type().clone(),
    }
}

fn string_at(col: &ArrayRef, i: usize, row: usize, field: Field) -> Result<String, LoadError> {
    if col.is_null(i) {
        return Err(null_value(row, field));
    }
    if let Some(arr) = col.as_any().downcast_ref::<StringArray>() {
        Ok(arr.value(i).trim().to_string())
    } else if let Some(arr) = col.as_any().downcast_ref::<LargeStringArray>() {
        Ok(arr.value(i).trim().to_string())
    } else {
        Err(wrong_type(col, field))
    }
}

fn int_at(col: &ArrayRef, i: usize, row: usize, field: Field) -> Result<i64, LoadError> {
    if col.is_null(i) {
        return Err(null_value(row, field));
    }
    if let Some(arr) = col.as_any().downcast_ref::<Int64Array>() {
        Ok(arr.value(i))
    } else if let Some(arr) = col.as_any().downcast_ref::<Int32Array>() {
        Ok(arr.value(i) as i64)
    } else {
        Err(wrong_type(col, field))
    }
}

fn float_at(col: &ArrayRef, i: usize, row: usize, field: Field) -> Result<f64, LoadError> {
    if col.is_null(i) {
        return Err(null_value(row, field));
    }
    if let Some(arr) = col.as_any().downcast_ref::<Float64Array>() {
        Ok(arr.value(i))
    } else if let Some(arr) = col.as_any().downcast_ref::<Float32Array>() {
        Ok(arr.value(i) as f64)
    } else if let Some(arr) = col.as_any().downcast_ref::<Int64Array>() {
        Ok(arr.value(i) as f64)
    } else if let Some(arr) = col.as_any().downcast_ref::<Int32Array>() {
        Ok(arr.value(i) as f64)
    } else {
        Err(wrong_type(col, field))
    }
}
