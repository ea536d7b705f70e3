//! Pull-based process sampler.
//!
//! Reads memory and CPU figures for the current process on demand. Nothing
//! runs on a timer: callers sample right before exporting.
//!
//! On Linux the figures come from `/proc/self/status` and `/proc/self/stat`.
//! Elsewhere, or when `/proc` is unreadable, every figure reads as zero.

use std::time::Instant;

use serde::Serialize;

use crate::store::MetricStore;

pub const MEMORY_USAGE_BYTES: &str = "memory_usage_bytes";

/// `/proc/self/stat` reports CPU time in clock ticks; USER_HZ is 100 on every
/// mainstream Linux target.
const MICROS_PER_TICK: u64 = 10_000;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryUsage {
    /// Anonymous resident memory (`RssAnon`).
    pub heap_used: u64,
    /// Data segment size (`VmData`).
    pub heap_total: u64,
    /// Resident set size (`VmRSS`).
    pub rss: u64,
    /// File-backed resident memory (`RssFile`).
    pub external: u64,
}

/// Cumulative CPU time in microseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CpuUsage {
    pub user: u64,
    pub system: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSnapshot {
    /// Seconds since the sampler was created.
    pub uptime: f64,
    pub memory_usage: MemoryUsage,
    pub cpu_usage: CpuUsage,
}

pub struct SystemSampler {
    started: Instant,
}

impl Default for SystemSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemSampler {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    pub fn uptime(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    pub fn memory_usage(&self) -> MemoryUsage {
        read_proc("/proc/self/status")
            .map(|s| parse_status(&s))
            .unwrap_or_default()
    }

    pub fn cpu_usage(&self) -> CpuUsage {
        read_proc("/proc/self/stat")
            .and_then(|s| parse_stat(&s))
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> SystemSnapshot {
        self.snapshot_with(self.memory_usage())
    }

    /// Snapshot around an already-read memory figure.
    pub fn snapshot_with(&self, memory_usage: MemoryUsage) -> SystemSnapshot {
        SystemSnapshot {
            uptime: self.uptime(),
            memory_usage,
            cpu_usage: self.cpu_usage(),
        }
    }

    /// Write the current memory figures into `memory_usage_bytes{type}` and
    /// return them.
    pub fn record_memory_usage(&self, store: &MetricStore) -> MemoryUsage {
        let mem = self.memory_usage();
        for (ty, v) in [
            ("heap_used", mem.heap_used),
            ("heap_total", mem.heap_total),
            ("rss", mem.rss),
            ("external", mem.external),
        ] {
            store.set_gauge(MEMORY_USAGE_BYTES, v as f64, &[("type", ty)]);
        }
        mem
    }
}

#[cfg(target_os = "linux")]
fn read_proc(path: &str) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(s) => Some(s),
        Err(e) => {
            tracing::debug!(%path, error = %e, "process stats unavailable");
            None
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn read_proc(_path: &str) -> Option<String> {
    None
}

/// Parse the `kB` fields of `/proc/<pid>/status`.
pub fn parse_status(content: &str) -> MemoryUsage {
    let mut mem = MemoryUsage::default();
    for line in content.lines() {
        let Some((field, rest)) = line.split_once(':') else {
            continue;
        };
        let slot = match field {
            "RssAnon" => &mut mem.heap_used,
            "VmData" => &mut mem.heap_total,
            "VmRSS" => &mut mem.rss,
            "RssFile" => &mut mem.external,
            _ => continue,
        };
        if let Some(kb) = rest.split_whitespace().next().and_then(|n| n.parse::<u64>().ok()) {
            *slot = kb * 1024;
        }
    }
    mem
}

/// Parse `utime`/`stime` out of `/proc/<pid>/stat`.
pub fn parse_stat(content: &str) -> Option<CpuUsage> {
    // comm (field 2) may contain spaces; fields after it start at `state`.
    let (_, rest) = content.rsplit_once(')')?;
    let fields: Vec<&str> = rest.split_whitespace().collect();
    let utime: u64 = fields.get(11)?.parse().ok()?;
    let stime: u64 = fields.get(12)?.parse().ok()?;
    Some(CpuUsage {
        user: utime * MICROS_PER_TICK,
        system: stime * MICROS_PER_TICK,
    })
}
