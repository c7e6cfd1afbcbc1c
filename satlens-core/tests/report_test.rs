use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::record_batch::RecordBatch;
use satlens_core::{
    build_histogram_spec, satisfaction_stats, HistogramSpec, Renderer, ReportOptions, Result,
    SatLensError, SeriesColor, TextRenderer, NOT_SATISFIED_LABEL, SATISFIED_LABEL,
};
use std::sync::Arc;

#[derive(Default)]
struct Recording {
    specs: Vec<HistogramSpec>,
}

impl Renderer for Recording {
    fn name(&self) -> &'static str {
        "recording"
    }
    fn render(&mut self, spec: &HistogramSpec) -> Result<()> {
        self.specs.push(spec.clone());
        Ok(())
    }
}

fn features() -> RecordBatch {
    RecordBatch::try_from_iter(vec![
        ("var15", Arc::new(Int64Array::from(vec![23, 34, 23, 37, 39, 23, 70])) as ArrayRef),
        ("var38", Arc::new(Float64Array::from(vec![39205.0, 49278.0, 67333.0, 64007.0, 117310.0, 87975.0, 94956.0])) as ArrayRef),
        ("segment", Arc::new(StringArray::from(vec!["a", "b", "a", "b", "a", "a", "b"])) as ArrayRef),
    ])
    .unwrap()
}

fn outcomes() -> RecordBatch {
    RecordBatch::try_from_iter(vec![(
        "TARGET",
        Arc::new(Int64Array::from(vec![0, 0, 1, 0, 1, 0, 1])) as ArrayRef,
    )])
    .unwrap()
}

#[test]
fn partitions_by_outcome_with_literal_labels() {
    let spec = build_histogram_spec::<&str>(&features(), &outcomes(), "var15", &[], &ReportOptions::default()).unwrap();
    assert_eq!(spec.series.len(), 2);
    let (s0, s1) = (&spec.series[0], &spec.series[1]);
    assert_eq!(s0.label, SATISFIED_LABEL);
    assert_eq!(s0.outcome, 0);
    assert_eq!(s0.color, SeriesColor::Red);
    assert_eq!(s0.values, vec![23.0, 34.0, 37.0, 23.0]);
    assert_eq!(s1.label, NOT_SATISFIED_LABEL);
    assert_eq!(s1.outcome, 1);
    assert_eq!(s1.color, SeriesColor::Green);
    assert_eq!(s1.values, vec![23.0, 39.0, 70.0]);
    assert!((s0.alpha - 0.6).abs() < f64::EPSILON);
    assert!((spec.legend_alpha - 0.8).abs() < f64::EPSILON);
}

#[test]
fn labels_and_title_name_the_feature() {
    let spec = build_histogram_spec::<&str>(&features(), &outcomes(), "var38", &[], &ReportOptions::default()).unwrap();
    assert_eq!(spec.title, "Customer Satisfaction Statistics With 'var38' Feature");
    assert_eq!(spec.x_label, "var38");
    assert_eq!(spec.y_label, "Count");
}

#[test]
fn both_series_share_bin_edges_over_full_range() {
    let opts = ReportOptions { bins: 4, ..ReportOptions::default() };
    let spec = build_histogram_spec::<&str>(&features(), &outcomes(), "var15", &[], &opts).unwrap();
    assert_eq!(spec.edges.bin_count(), 4);
    assert_eq!(spec.edges.lower(), 23.0);
    assert_eq!(spec.edges.upper(), 70.0);
    for s in &spec.series {
        assert_eq!(s.counts.len(), 4);
        assert_eq!(s.counts.iter().sum::<u64>() as usize, s.values.len());
    }
}

#[test]
fn filters_narrow_before_partitioning() {
    let spec = build_histogram_spec(
        &features(),
        &outcomes(),
        "var15",
        &["var15 > 23", "segment == 'b'"],
        &ReportOptions::default(),
    )
    .unwrap();
    assert_eq!(spec.series[0].values, vec![34.0, 37.0]);
    assert_eq!(spec.series[1].values, vec![70.0]);
    assert_eq!(spec.edges.lower(), 34.0);
    assert_eq!(spec.edges.upper(), 70.0);
}

#[test]
fn unknown_key_fails_without_rendering() {
    let mut rec = Recording::default();
    let err = satisfaction_stats::<&str>(&features(), &outcomes(), "nonexistent_col", &[], &ReportOptions::default(), &mut rec)
        .unwrap_err();
    assert!(matches!(err, SatLensError::UnknownKey(ref k) if k == "nonexistent_col"));
    assert_eq!(
        err.to_string(),
        "'nonexistent_col' is not a feature of the dataset. Did you spell something wrong?"
    );
    assert!(rec.specs.is_empty());
}

#[test]
fn outcome_column_is_not_a_feature_key() {
    let mut rec = Recording::default();
    let err = satisfaction_stats::<&str>(&features(), &outcomes(), "TARGET", &[], &ReportOptions::default(), &mut rec)
        .unwrap_err();
    assert!(matches!(err, SatLensError::UnknownKey(_)));
}

#[test]
fn successful_report_renders_once_and_returns_handle() {
    let mut rec = Recording::default();
    let fig = satisfaction_stats(&features(), &outcomes(), "var15", &["var15 < 60"], &ReportOptions::default(), &mut rec)
        .unwrap();
    assert_eq!(rec.specs.len(), 1);
    assert_eq!(fig.backend, "recording");
    assert_eq!(fig.series_totals, vec![4, 2]);
    assert_eq!(fig.bin_count, 10);
}

#[test]
fn filter_errors_propagate() {
    let mut rec = Recording::default();
    let err = satisfaction_stats(&features(), &outcomes(), "var15", &["var15 => 3"], &ReportOptions::default(), &mut rec)
        .unwrap_err();
    assert!(matches!(err, SatLensError::UnsupportedOperator(_)));
    assert!(rec.specs.is_empty());
}

#[test]
fn filters_may_reference_the_outcome() {
    let spec = build_histogram_spec(&features(), &outcomes(), "var15", &["TARGET == 1"], &ReportOptions::default()).unwrap();
    assert!(spec.series[0].values.is_empty());
    assert_eq!(spec.series[1].values.len(), 3);
}

#[test]
fn non_binary_outcomes_fall_in_neither_group() {
    let outcomes = RecordBatch::try_from_iter(vec![(
        "TARGET",
        Arc::new(Int64Array::from(vec![0, 2, 1, 0, 1, 0, 1])) as ArrayRef,
    )])
    .unwrap();
    let spec = build_histogram_spec::<&str>(&features(), &outcomes, "var15", &[], &ReportOptions::default()).unwrap();
    assert_eq!(spec.series[0].values.len() + spec.series[1].values.len(), 6);
}

#[test]
fn row_count_mismatch_is_an_error() {
    let short = RecordBatch::try_from_iter(vec![("TARGET", Arc::new(Int64Array::from(vec![0, 1])) as ArrayRef)]).unwrap();
    let err = build_histogram_spec::<&str>(&features(), &short, "var15", &[], &ReportOptions::default()).unwrap_err();
    assert!(matches!(err, SatLensError::RowCountMismatch { features: 7, outcomes: 2 }));
}

#[test]
fn string_feature_cannot_be_binned() {
    let err = build_histogram_spec::<&str>(&features(), &outcomes(), "segment", &[], &ReportOptions::default()).unwrap_err();
    assert!(matches!(err, SatLensError::NonNumericFeature { .. }));
}

#[test]
fn custom_outcome_column() {
    let outcomes = RecordBatch::try_from_iter(vec![(
        "churned",
        Arc::new(Int64Array::from(vec![1, 1, 1, 1, 0, 0, 0])) as ArrayRef,
    )])
    .unwrap();
    let opts = ReportOptions { bins: 10, outcome_column: "churned".into() };
    let spec = build_histogram_spec::<&str>(&features(), &outcomes, "var15", &[], &opts).unwrap();
    assert_eq!(spec.series[0].values, vec![39.0, 23.0, 70.0]);
}

#[test]
fn text_renderer_end_to_end() {
    let mut r = TextRenderer::new(Vec::new());
    let fig = satisfaction_stats::<&str>(&features(), &outcomes(), "var15", &[], &ReportOptions::default(), &mut r).unwrap();
    assert_eq!(fig.backend, "text");
    let out = String::from_utf8(r.into_inner()).unwrap();
    assert!(out.contains("Satisfied (n=4)"));
    assert!(out.contains("Not Satisfied (n=3)"));
}
