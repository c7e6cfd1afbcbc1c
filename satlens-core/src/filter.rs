use std::fmt;
use std::str::FromStr;

use arrow::array::{Array, AsArray, BooleanArray, BooleanBuilder};
use arrow::compute::{cast, filter_record_batch};
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use log::debug;
use satlens_common::{Result, SatLensError};

use crate::table::{column, column_kind, ColumnKind};

// --- AST ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Ne,
}

impl CmpOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CmpOp::Gt => ">",
            CmpOp::Lt => "<",
            CmpOp::Ge => ">=",
            CmpOp::Le => "<=",
            CmpOp::Eq => "==",
            CmpOp::Ne => "!=",
        }
    }

    fn is_ordering(self) -> bool {
        !matches!(self, CmpOp::Eq | CmpOp::Ne)
    }
}

impl FromStr for CmpOp {
    type Err = SatLensError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            ">" => Ok(CmpOp::Gt),
            "<" => Ok(CmpOp::Lt),
            ">=" => Ok(CmpOp::Ge),
            "<=" => Ok(CmpOp::Le),
            "==" => Ok(CmpOp::Eq),
            "!=" => Ok(CmpOp::Ne),
            other => Err(SatLensError::UnsupportedOperator(other.to_owned())),
        }
    }
}

impl fmt::Display for CmpOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(f64),
    Text(String),
}

impl Literal {
    /// Numeric if the token parses as a float, otherwise text with surrounding quotes removed.
    pub fn coerce(token: &str) -> Self {
        match token.parse::<f64>() {
            Ok(v) => Literal::Number(v),
            Err(_) => Literal::Text(token.trim_matches(|c| c == '\'' || c == '"').to_owned()),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Number(v) => write!(f, "{v}"),
            Literal::Text(s) => write!(f, "'{s}'"),
        }
    }
}

/// A single `<field> <op> <value>` condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub field: String,
    pub op: CmpOp,
    pub value: Literal,
}

impl Comparison {
    pub fn new(field: impl Into<String>, op: CmpOp, value: Literal) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.op, self.value)
    }
}

impl FromStr for Comparison {
    type Err = SatLensError;

    fn from_str(s: &str) -> Result<Self> {
        parse_condition(s)
    }
}

// --- parser ---

pub fn parse_condition(condition: &str) -> Result<Comparison> {
    let tokens: Vec<&str> = condition.split_whitespace().collect();
    let [field, op, value] = tokens.as_slice() else {
        return Err(SatLensError::MalformedCondition {
            condition: condition.to_owned(),
            tokens: tokens.len(),
        });
    };
    let value = Literal::coerce(value);
    let op: CmpOp = op.parse()?;
    Ok(Comparison::new(*field, op, value))
}

// --- evaluation ---

/// Row mask for `cmp`; the result has the batch's length and no nulls.
pub fn build_mask(batch: &RecordBatch, cmp: &Comparison) -> Result<BooleanArray> {
    let arr = column(batch, &cmp.field)?;
    let n = arr.len();
    // a null cell only ever satisfies `!=`
    let null_match = cmp.op == CmpOp::Ne;
    match (column_kind(arr.data_type()), &cmp.value) {
        (ColumnKind::Numeric, Literal::Number(cv)) => {
            let floats = cast(arr, &DataType::Float64)?;
            let a = floats.as_primitive::<Float64Type>();
            let mut b = BooleanBuilder::with_capacity(n);
            for i in 0..n {
                if a.is_null(i) {
                    b.append_value(null_match);
                    continue;
                }
                b.append_value(cmp_f64(a.value(i), cmp.op, *cv));
            }
            Ok(b.finish())
        }
        (ColumnKind::Text, Literal::Text(sv)) => {
            let strings = cast(arr, &DataType::Utf8)?;
            let a = strings.as_string::<i32>();
            let mut b = BooleanBuilder::with_capacity(n);
            for i in 0..n {
                if a.is_null(i) {
                    b.append_value(null_match);
                    continue;
                }
                b.append_value(cmp_str(a.value(i), cmp.op, sv));
            }
            Ok(b.finish())
        }
        _ if cmp.op.is_ordering() => Err(SatLensError::IncomparableTypes {
            field: cmp.field.clone(),
            data_type: arr.data_type().to_string(),
            op: cmp.op.symbol().to_owned(),
        }),
        // equality across kinds never holds
        _ => Ok(BooleanArray::from(vec![cmp.op == CmpOp::Ne; n])),
    }
}

fn cmp_f64(v: f64, op: CmpOp, cv: f64) -> bool {
    match op {
        CmpOp::Eq => v == cv,
        CmpOp::Ne => v != cv,
        CmpOp::Lt => v < cv,
        CmpOp::Le => v <= cv,
        CmpOp::Gt => v > cv,
        CmpOp::Ge => v >= cv,
    }
}

fn cmp_str(v: &str, op: CmpOp, cv: &str) -> bool {
    match op {
        CmpOp::Eq => v == cv,
        CmpOp::Ne => v != cv,
        CmpOp::Lt => v < cv,
        CmpOp::Le => v <= cv,
        CmpOp::Gt => v > cv,
        CmpOp::Ge => v >= cv,
    }
}

pub fn apply(batch: &RecordBatch, cmp: &Comparison) -> Result<RecordBatch> {
    let mask = build_mask(batch, cmp)?;
    let out = filter_record_batch(batch, &mask)?;
    debug!("filter `{cmp}`: {} -> {} rows", batch.num_rows(), out.num_rows());
    Ok(out)
}

/// Parse `condition` and keep only the matching rows.
pub fn filter(batch: &RecordBatch, condition: &str) -> Result<RecordBatch> {
    apply(batch, &parse_condition(condition)?)
}

/// Narrow `batch` by each condition in turn.
pub fn apply_all<S: AsRef<str>>(batch: &RecordBatch, conditions: &[S]) -> Result<RecordBatch> {
    let mut current = batch.clone();
    for condition in conditions {
        current = filter(&current, condition.as_ref())?;
    }
    Ok(current)
}
