pub mod filter;
pub mod histogram;
pub mod reader;
pub mod render;
pub mod report;
pub mod table;

pub use filter::{apply, apply_all, build_mask, filter, parse_condition, CmpOp, Comparison, Literal};
pub use histogram::{BinEdges, HistogramBin};
pub use reader::read_table;
pub use render::{RenderedFigure, Renderer, TextRenderer};
pub use report::{
    build_histogram_spec, satisfaction_stats, HistogramSeries, HistogramSpec, ReportOptions,
    SeriesColor, NOT_SATISFIED_LABEL, SATISFIED_LABEL,
};
pub use satlens_common::{Result, SatLensError};
pub use table::{column, column_names, concat_columns, numeric_values, project, split_outcomes};
