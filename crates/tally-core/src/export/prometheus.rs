//! Prometheus text exposition (format 0.0.4).
//!
//! Families are grouped by name and emitted with one `# TYPE` line each.
//! Line order within the output is not meaningful to scrapers.

use std::collections::BTreeMap;
use std::fmt::Write;

use crate::histogram::bucket_label;
use crate::labels::Labels;
use crate::store::MetricStore;

pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render every counter, histogram and gauge family in the store.
pub fn render(store: &MetricStore) -> String {
    let mut out = String::new();

    let mut counters: BTreeMap<String, Vec<(Labels, f64)>> = BTreeMap::new();
    for (_, c) in store.counters() {
        counters.entry(c.name).or_default().push((c.labels, c.value));
    }
    render_samples(&mut out, "counter", &counters);

    let mut histograms = BTreeMap::new();
    for (_, h) in store.histograms() {
        histograms.entry(h.name.clone()).or_insert_with(Vec::new).push(h);
    }
    for (name, series) in &histograms {
        let _ = writeln!(out, "# TYPE {name} histogram");
        for h in series {
            let labels = h.labels.render(None);
            let _ = writeln!(out, "{name}_count{labels} {}", h.count);
            let _ = writeln!(out, "{name}_sum{labels} {}", fmt_value(h.sum));
            for (i, &count) in h.buckets.iter().enumerate() {
                let le = bucket_label(i);
                let labels = h.labels.render(Some(("le", &le)));
                let _ = writeln!(out, "{name}_bucket{labels} {count}");
            }
        }
    }

    let mut gauges: BTreeMap<String, Vec<(Labels, f64)>> = BTreeMap::new();
    for (_, g) in store.gauges() {
        gauges.entry(g.name).or_default().push((g.labels, g.value));
    }
    render_samples(&mut out, "gauge", &gauges);

    out
}

fn render_samples(out: &mut String, kind: &str, families: &BTreeMap<String, Vec<(Labels, f64)>>) {
    for (name, series) in families {
        let _ = writeln!(out, "# TYPE {name} {kind}");
        for (labels, value) in series {
            let _ = writeln!(out, "{name}{} {}", labels.render(None), fmt_value(*value));
        }
    }
}

/// Prometheus float text: `NaN`, `+Inf`, `-Inf`, otherwise shortest decimal.
pub fn fmt_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.is_infinite() {
        if v > 0.0 { "+Inf" } else { "-Inf" }.to_string()
    } else {
        v.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_special_values() {
        assert_eq!(fmt_value(3.0), "3");
        assert_eq!(fmt_value(0.15), "0.15");
        assert_eq!(fmt_value(f64::NAN), "NaN");
        assert_eq!(fmt_value(f64::INFINITY), "+Inf");
        assert_eq!(fmt_value(f64::NEG_INFINITY), "-Inf");
    }

    #[test]
    fn empty_store_renders_nothing() {
        assert_eq!(render(&MetricStore::new()), "");
    }
}
