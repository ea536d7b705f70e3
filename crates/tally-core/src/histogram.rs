//! Fixed-bucket cumulative histograms.
//!
//! Bounds are shared by every histogram family, latency and size alike.

use serde::Serialize;

use crate::labels::Labels;

/// Finite upper bounds; the implicit last bucket is `+Inf`.
pub const BUCKET_BOUNDS: [f64; 6] = [0.1, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Finite bounds plus `+Inf`.
pub const BUCKET_COUNT: usize = BUCKET_BOUNDS.len() + 1;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub name: String,
    pub labels: Labels,
    pub count: u64,
    pub sum: f64,
    /// Cumulative counts, one per entry of `BUCKET_BOUNDS` then `+Inf`.
    pub buckets: [u64; BUCKET_COUNT],
}

impl Histogram {
    pub fn new(name: &str, labels: Labels) -> Self {
        Self {
            name: name.to_string(),
            labels,
            count: 0,
            sum: 0.0,
            buckets: [0; BUCKET_COUNT],
        }
    }

    /// Cumulative buckets: increment every bucket whose bound holds `value`.
    pub fn observe(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        for (i, &b) in BUCKET_BOUNDS.iter().enumerate() {
            if value <= b {
                self.buckets[i] += 1;
            }
        }
        self.buckets[BUCKET_COUNT - 1] += 1;
    }

    /// `sum / count`, 0 when empty.
    pub fn average(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }

    /// `(le, cumulative count)` pairs in bound order, ending with `+Inf`.
    pub fn bucket_counts(&self) -> impl Iterator<Item = (String, u64)> + '_ {
        self.buckets.iter().enumerate().map(|(i, &c)| (bucket_label(i), c))
    }
}

/// Text of the `le` label for bucket `i`.
pub fn bucket_label(i: usize) -> String {
    match BUCKET_BOUNDS.get(i) {
        Some(b) => b.to_string(),
        None => "+Inf".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_are_cumulative() {
        let mut h = Histogram::new("h", Labels::default());
        h.observe(0.3);
        h.observe(3.0);
        h.observe(50.0);
        assert_eq!(h.buckets, [0, 1, 1, 1, 2, 2, 3]);
        assert_eq!(h.count, 3);
        assert!(h.buckets.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn boundary_value_lands_in_its_bucket() {
        let mut h = Histogram::new("h", Labels::default());
        h.observe(0.1);
        assert_eq!(h.buckets[0], 1);
    }

    #[test]
    fn labels_render_like_prometheus() {
        let labels: Vec<String> = (0..BUCKET_COUNT).map(bucket_label).collect();
        assert_eq!(labels, ["0.1", "0.5", "1", "2.5", "5", "10", "+Inf"]);
    }

    #[test]
    fn average_of_empty_is_zero() {
        assert_eq!(Histogram::new("h", Labels::default()).average(), 0.0);
    }
}
