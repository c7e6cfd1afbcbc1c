use std::io::Write;

use satlens_common::Result;
use serde::{Deserialize, Serialize};

use crate::histogram::HistogramBin;
use crate::report::{HistogramSpec, SeriesColor};

/// A display backend for a satisfaction histogram.
pub trait Renderer {
    fn name(&self) -> &'static str;
    fn render(&mut self, spec: &HistogramSpec) -> Result<()>;
}

/// Handle describing what was rendered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedFigure {
    pub backend: String,
    pub title: String,
    pub bin_count: usize,
    pub series_totals: Vec<usize>,
}

impl RenderedFigure {
    pub fn new(backend: &str, spec: &HistogramSpec) -> Self {
        Self {
            backend: backend.to_owned(),
            title: spec.title.clone(),
            bin_count: spec.edges.bin_count(),
            series_totals: spec.series.iter().map(|s| s.values.len()).collect(),
        }
    }
}

fn series_mark(color: SeriesColor) -> char {
    match color {
        SeriesColor::Red => '█',
        SeriesColor::Green => '▒',
    }
}

/// Plain-text bars, one line per bin and series.
pub struct TextRenderer<W: Write> {
    out: W,
    bar_width: usize,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, bar_width: 40 }
    }

    pub fn with_bar_width(mut self, bar_width: usize) -> Self {
        self.bar_width = bar_width.max(1);
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Renderer for TextRenderer<W> {
    fn name(&self) -> &'static str {
        "text"
    }

    fn render(&mut self, spec: &HistogramSpec) -> Result<()> {
        let bw = self.bar_width;
        let max_c = spec.max_count().max(1);
        writeln!(self.out, "{}", spec.title)?;
        writeln!(self.out, "{:<16} {}", "x:", spec.x_label)?;
        writeln!(self.out, "{:<16} {}", "y:", spec.y_label)?;
        for s in &spec.series {
            writeln!(self.out, "{:<16} {} {} (n={})", "legend:", series_mark(s.color), s.label, s.values.len())?;
        }
        writeln!(self.out)?;
        let per_series: Vec<Vec<HistogramBin>> = (0..spec.series.len()).map(|j| spec.bins(j)).collect();
        for i in 0..spec.edges.bin_count() {
            for (j, s) in spec.series.iter().enumerate() {
                let Some(bin) = per_series[j].get(i) else { continue };
                let count = bin.count;
                let blen = (count as f64 / max_c as f64 * bw as f64).round() as usize;
                let range = if j == 0 {
                    format!("{:10.2}-{:10.2}", bin.range_start, bin.range_end)
                } else {
                    String::new()
                };
                let bar: String = std::iter::repeat(series_mark(s.color)).take(blen).collect();
                writeln!(self.out, "{range:<21} |{bar:<bw$}| {count}")?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}
