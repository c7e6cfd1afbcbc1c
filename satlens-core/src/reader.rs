use std::fs::File;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;

use arrow::compute::concat_batches;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::record_batch::RecordBatch;
use log::debug;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use satlens_common::{Result, SatLensError};

const CSV_INFER_ROWS: usize = 1000;

/// Load a whole `.csv` or `.parquet` file as a single batch.
pub fn read_table(path: &Path) -> Result<RecordBatch> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let batch = match ext.as_deref() {
        Some("csv") => read_csv(path)?,
        Some("parquet") | Some("pq") => read_parquet(path)?,
        _ => return Err(SatLensError::UnsupportedFormat(path.display().to_string())),
    };
    debug!(
        "loaded {}: {} rows x {} columns",
        path.display(),
        batch.num_rows(),
        batch.num_columns()
    );
    Ok(batch)
}

fn read_csv(path: &Path) -> Result<RecordBatch> {
    let mut file = File::open(path)?;
    let format = Format::default().with_header(true);
    let (schema, _) = format.infer_schema(&mut file, Some(CSV_INFER_ROWS))?;
    file.rewind()?;
    let schema = Arc::new(schema);
    let reader = ReaderBuilder::new(schema.clone())
        .with_format(format)
        .build(file)?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(concat_batches(&schema, &batches)?)
}

fn read_parquet(path: &Path) -> Result<RecordBatch> {
    let file = File::open(path)?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(concat_batches(&schema, &batches)?)
}
