use crate::geometry::LineRange;
use std::collections::HashMap;

/// A block of lines summarised by how often each character occurs in it.
/// Every line contributes its characters plus one `\n`.
#[derive(Debug, Clone)]
pub struct LineRangeFragment {
    pub range: LineRange,
    /// Index of the change this block was taken from.
    pub source: usize,
    histogram: HashMap<char, usize>,
    total_count: usize,
}

impl LineRangeFragment {
    pub fn new<S: AsRef<str>>(range: LineRange, lines: &[S], source: usize) -> Self {
        let mut histogram: HashMap<char, usize> = HashMap::new();
        let mut total_count = 0;
        for line in range.to_offset_range().slice(lines) {
            for c in line.as_ref().chars().chain(['\n']) {
                *histogram.entry(c).or_default() += 1;
                total_count += 1;
            }
        }

        Self {
            range,
            source,
            histogram,
            total_count,
        }
    }

    /// `1.0` for identical histograms, down to `0.0` for blocks sharing no
    /// character.
    pub fn compute_similarity(&self, other: &LineRangeFragment) -> f64 {
        let count = |fragment: &LineRangeFragment, c: &char| {
            fragment.histogram.get(c).copied().unwrap_or_default()
        };
        let sum_differences: usize = self
            .histogram
            .keys()
            .chain(other.histogram.keys().filter(|c| !self.histogram.contains_key(c)))
            .map(|c| count(self, c).abs_diff(count(other, c)))
            .sum();

        1.0 - sum_differences as f64 / (self.total_count + other.total_count) as f64
    }
}
