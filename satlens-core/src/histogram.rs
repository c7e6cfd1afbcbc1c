use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramBin {
    pub range_start: f64,
    pub range_end: f64,
    pub count: u64,
}

/// Equal-width bin edges; every bin is half-open except the last, which is closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinEdges {
    edges: Vec<f64>,
}

impl BinEdges {
    pub fn from_range(min: f64, max: f64, bins: usize) -> Self {
        let bins = bins.max(1);
        // a degenerate range is widened by half a unit on each side
        let (lo, hi) = if max == min {
            (min - 0.5, max + 0.5)
        } else {
            (min, max)
        };
        let width = (hi - lo) / bins as f64;
        let mut edges: Vec<f64> = (0..bins).map(|i| lo + i as f64 * width).collect();
        edges.push(hi);
        Self { edges }
    }

    /// Edges spanning the finite values; `[0, 1]` when there are none.
    pub fn auto(values: &[f64], bins: usize) -> Self {
        let (min, max) = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
        if min > max {
            return Self::from_range(0.0, 1.0, bins);
        }
        Self::from_range(min, max, bins)
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn bin_count(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn lower(&self) -> f64 {
        self.edges[0]
    }

    pub fn upper(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    pub fn bin_index(&self, v: f64) -> Option<usize> {
        let n = self.bin_count();
        let (lo, hi) = (self.lower(), self.upper());
        if !v.is_finite() || v < lo || v > hi {
            return None;
        }
        if v == hi {
            return Some(n - 1);
        }
        let width = (hi - lo) / n as f64;
        let mut idx = (((v - lo) / width) as usize).min(n - 1);
        // float rounding can land one bin off near an edge
        if v < self.edges[idx] {
            idx -= 1;
        } else if idx + 1 < n && v >= self.edges[idx + 1] {
            idx += 1;
        }
        Some(idx)
    }

    pub fn counts(&self, values: &[f64]) -> Vec<u64> {
        let mut counts = vec![0u64; self.bin_count()];
        for &v in values {
            if let Some(idx) = self.bin_index(v) {
                counts[idx] += 1;
            }
        }
        counts
    }

    pub fn bins(&self, counts: &[u64]) -> Vec<HistogramBin> {
        self.edges
            .windows(2)
            .zip(counts)
            .map(|(w, &count)| HistogramBin {
                range_start: w[0],
                range_end: w[1],
                count,
            })
            .collect()
    }
}
