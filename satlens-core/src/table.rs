use std::sync::Arc;

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, FieldRef, Float64Type, Schema};
use arrow::record_batch::RecordBatch;
use satlens_common::{Result, SatLensError};

/// How a column takes part in comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ColumnKind {
    Numeric,
    Text,
    Other,
}

pub(crate) fn column_kind(dt: &DataType) -> ColumnKind {
    match dt {
        DataType::Boolean => ColumnKind::Numeric, // compares as 0/1
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View => ColumnKind::Text,
        DataType::Dictionary(_, values) => column_kind(values),
        dt if dt.is_numeric() => ColumnKind::Numeric,
        _ => ColumnKind::Other,
    }
}

pub fn column_names(batch: &RecordBatch) -> Vec<String> {
    batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect()
}

pub fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a ArrayRef> {
    batch
        .column_by_name(name)
        .ok_or_else(|| SatLensError::MissingField {
            field: name.to_owned(),
            available: column_names(batch).join(", "),
        })
}

/// Place `right`'s columns after `left`'s, aligned by row position.
pub fn concat_columns(left: &RecordBatch, right: &RecordBatch) -> Result<RecordBatch> {
    if left.num_rows() != right.num_rows() {
        return Err(SatLensError::RowCountMismatch {
            features: left.num_rows(),
            outcomes: right.num_rows(),
        });
    }
    let left_schema = left.schema();
    let right_schema = right.schema();
    for field in right_schema.fields() {
        if left_schema.index_of(field.name()).is_ok() {
            return Err(SatLensError::DuplicateColumn(field.name().clone()));
        }
    }
    let fields: Vec<FieldRef> = left_schema
        .fields()
        .iter()
        .chain(right_schema.fields().iter())
        .cloned()
        .collect();
    let columns: Vec<ArrayRef> = left
        .columns()
        .iter()
        .chain(right.columns().iter())
        .cloned()
        .collect();
    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}

/// Keep only `names`, in the order given.
pub fn project(batch: &RecordBatch, names: &[&str]) -> Result<RecordBatch> {
    let schema = batch.schema();
    let indices = names
        .iter()
        .map(|name| {
            schema.index_of(name).map_err(|_| SatLensError::MissingField {
                field: (*name).to_owned(),
                available: column_names(batch).join(", "),
            })
        })
        .collect::<Result<Vec<usize>>>()?;
    Ok(batch.project(&indices)?)
}

/// Separate the outcome column from a combined table: `(features, outcomes)`.
pub fn split_outcomes(batch: &RecordBatch, outcome_column: &str) -> Result<(RecordBatch, RecordBatch)> {
    let schema = batch.schema();
    let outcome_idx = schema
        .index_of(outcome_column)
        .map_err(|_| SatLensError::MissingField {
            field: outcome_column.to_owned(),
            available: column_names(batch).join(", "),
        })?;
    let feature_idx: Vec<usize> = (0..schema.fields().len())
        .filter(|&i| i != outcome_idx)
        .collect();
    Ok((batch.project(&feature_idx)?, batch.project(&[outcome_idx])?))
}

/// Finite values of a numeric column; nulls and NaN are skipped.
pub fn numeric_values(batch: &RecordBatch, name: &str) -> Result<Vec<f64>> {
    let arr = column(batch, name)?;
    if column_kind(arr.data_type()) != ColumnKind::Numeric {
        return Err(SatLensError::NonNumericFeature {
            field: name.to_owned(),
            data_type: arr.data_type().to_string(),
        });
    }
    let floats = cast(arr, &DataType::Float64)?;
    Ok(floats
        .as_primitive::<Float64Type>()
        .iter()
        .flatten()
        .filter(|v| v.is_finite())
        .collect())
}
