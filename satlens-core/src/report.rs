use arrow::record_batch::RecordBatch;
use log::{debug, warn};
use satlens_common::{ReportConfig, Result, SatLensError};
use serde::{Deserialize, Serialize};

use crate::filter::{apply, apply_all, CmpOp, Comparison, Literal};
use crate::histogram::{BinEdges, HistogramBin};
use crate::render::{RenderedFigure, Renderer};
use crate::table::{concat_columns, numeric_values, project};

/// Legend label of the `outcome == 0` series.
pub const SATISFIED_LABEL: &str = "Satisfied";
/// Legend label of the `outcome == 1` series.
pub const NOT_SATISFIED_LABEL: &str = "Not Satisfied";

const SERIES_ALPHA: f64 = 0.6;
const LEGEND_ALPHA: f64 = 0.8;

#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub bins: usize,
    pub outcome_column: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportConfig::default().into()
    }
}

impl From<ReportConfig> for ReportOptions {
    fn from(cfg: ReportConfig) -> Self {
        Self {
            bins: cfg.histogram_bins,
            outcome_column: cfg.outcome_column,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesColor {
    Red,
    Green,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramSeries {
    pub label: String,
    pub outcome: i64,
    pub color: SeriesColor,
    pub alpha: f64,
    pub values: Vec<f64>,
    pub counts: Vec<u64>,
}

/// Everything a renderer needs to draw the satisfaction comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub edges: BinEdges,
    pub series: Vec<HistogramSeries>,
    pub legend_alpha: f64,
}

impl HistogramSpec {
    pub fn max_count(&self) -> u64 {
        self.series
            .iter()
            .flat_map(|s| s.counts.iter().copied())
            .max()
            .unwrap_or(0)
    }

    pub fn bins(&self, series: usize) -> Vec<HistogramBin> {
        self.series
            .get(series)
            .map(|s| self.edges.bins(&s.counts))
            .unwrap_or_default()
    }
}

/// Join, filter, partition and bin; no rendering.
pub fn build_histogram_spec<S: AsRef<str>>(
    features: &RecordBatch,
    outcomes: &RecordBatch,
    key: &str,
    filters: &[S],
    opts: &ReportOptions,
) -> Result<HistogramSpec> {
    if features.schema().index_of(key).is_err() {
        let err = SatLensError::UnknownKey(key.to_owned());
        warn!("{err}");
        return Err(err);
    }
    let all = concat_columns(features, outcomes)?;
    let all = apply_all(&all, filters)?;
    let all = project(&all, &[key, opts.outcome_column.as_str()])?;

    let edges = BinEdges::auto(&numeric_values(&all, key)?, opts.bins);
    let group = |outcome: i64, label: &str, color: SeriesColor| -> Result<HistogramSeries> {
        let rows = apply(
            &all,
            &Comparison::new(opts.outcome_column.as_str(), CmpOp::Eq, Literal::Number(outcome as f64)),
        )?;
        let values = numeric_values(&rows, key)?;
        let counts = edges.counts(&values);
        Ok(HistogramSeries {
            label: label.to_owned(),
            outcome,
            color,
            alpha: SERIES_ALPHA,
            values,
            counts,
        })
    };
    let satisfied = group(0, SATISFIED_LABEL, SeriesColor::Red)?;
    let not_satisfied = group(1, NOT_SATISFIED_LABEL, SeriesColor::Green)?;
    debug!(
        "report '{key}': {} rows after {} filter(s), {} satisfied / {} not satisfied",
        all.num_rows(),
        filters.len(),
        satisfied.values.len(),
        not_satisfied.values.len()
    );

    Ok(HistogramSpec {
        title: format!("Customer Satisfaction Statistics With '{key}' Feature"),
        x_label: key.to_owned(),
        y_label: "Count".into(),
        edges,
        series: vec![satisfied, not_satisfied],
        legend_alpha: LEGEND_ALPHA,
    })
}

/// Build the comparison histogram for `key` and hand it to `renderer`.
///
/// An unknown `key` fails with [`SatLensError::UnknownKey`] before anything is
/// rendered. Filter and type errors propagate unchanged.
pub fn satisfaction_stats<S: AsRef<str>>(
    features: &RecordBatch,
    outcomes: &RecordBatch,
    key: &str,
    filters: &[S],
    opts: &ReportOptions,
    renderer: &mut dyn Renderer,
) -> Result<RenderedFigure> {
    let spec = build_histogram_spec(features, outcomes, key, filters, opts)?;
    renderer.render(&spec)?;
    Ok(RenderedFigure::new(renderer.name(), &spec))
}
