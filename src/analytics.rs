//! In-process usage analytics.
//!
//! The recorder counts tool calls, resource reads and timing samples behind a
//! single `parking_lot::Mutex`. Nothing here can fail a request: every
//! tracking method is infallible, and flush errors are logged and dropped.
//!
//! Counters live for the process lifetime (or until [`AnalyticsRecorder::reset`]).
//! [`AnalyticsRecorder::flush`] logs the current summary and, when a snapshot
//! path is configured, writes it as JSON. The snapshot is a convenience for
//! operators, not a store: it is never read back.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::config::AnalyticsConfig;
use crate::models::ToolCallRecord;

/// Number of calls kept in the recent-call ring.
pub const RECENT_CALLS: usize = 50;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceCount {
    pub uri: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceSummary {
    pub samples: u64,
    pub average_ms: f64,
    pub max_ms: f64,
}

/// Point-in-time view of the counters.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_calls: u64,
    pub by_tool: BTreeMap<String, u64>,
    pub average_duration_ms: f64,
    pub top_resources: Vec<ResourceCount>,
    /// Oldest first.
    pub recent_calls: Vec<ToolCallRecord>,
    pub performance: PerformanceSummary,
    /// When counting started (process start or last reset), RFC 3339.
    pub since: String,
}

struct Counters {
    since: DateTime<Utc>,
    total_calls: u64,
    total_duration_ms: f64,
    by_tool: HashMap<String, u64>,
    resources: HashMap<String, u64>,
    recent: VecDeque<ToolCallRecord>,
    perf_samples: u64,
    perf_total_ms: f64,
    perf_max_ms: f64,
}

impl Counters {
    fn new() -> Self {
        Self {
            since: Utc::now(),
            total_calls: 0,
            total_duration_ms: 0.0,
            by_tool: HashMap::new(),
            resources: HashMap::new(),
            recent: VecDeque::with_capacity(RECENT_CALLS),
            perf_samples: 0,
            perf_total_ms: 0.0,
            perf_max_ms: 0.0,
        }
    }
}

fn sanitize(duration_ms: f64) -> f64 {
    if duration_ms.is_finite() && duration_ms > 0.0 {
        duration_ms
    } else {
        0.0
    }
}

pub struct AnalyticsRecorder {
    counters: Mutex<Counters>,
    top_resources: usize,
    snapshot_path: Option<PathBuf>,
}

impl Default for AnalyticsRecorder {
    fn default() -> Self {
        Self::new(&AnalyticsConfig::default())
    }
}

impl AnalyticsRecorder {
    pub fn new(config: &AnalyticsConfig) -> Self {
        Self {
            counters: Mutex::new(Counters::new()),
            top_resources: config.top_resources.max(1),
            snapshot_path: config.snapshot_path.clone(),
        }
    }

    pub fn track_tool_call(&self, tool: &str, duration_ms: f64) {
        let duration_ms = sanitize(duration_ms);
        let mut c = self.counters.lock();
        c.total_calls += 1;
        c.total_duration_ms += duration_ms;
        *c.by_tool.entry(tool.to_string()).or_insert(0) += 1;
        if c.recent.len() == RECENT_CALLS {
            c.recent.pop_front();
        }
        c.recent.push_back(ToolCallRecord {
            tool_name: tool.to_string(),
            timestamp_ms: Utc::now().timestamp_millis(),
            duration_ms,
        });
    }

    pub fn track_resource_access(&self, uri: &str) {
        let mut c = self.counters.lock();
        *c.resources.entry(uri.to_string()).or_insert(0) += 1;
    }

    pub fn track_performance(&self, duration_ms: f64) {
        let duration_ms = sanitize(duration_ms);
        let mut c = self.counters.lock();
        c.perf_samples += 1;
        c.perf_total_ms += duration_ms;
        c.perf_max_ms = c.perf_max_ms.max(duration_ms);
    }

    pub fn summary(&self) -> AnalyticsSummary {
        let c = self.counters.lock();
        self.summarize(&c)
    }

    /// Swap in fresh counters.
    pub fn reset(&self) {
        *self.counters.lock() = Counters::new();
        tracing::info!("analytics reset");
    }

    /// Summary of the counters being discarded, taken under the same lock as
    /// the reset so no concurrent update falls between the two.
    pub fn summary_and_reset(&self) -> AnalyticsSummary {
        let old = {
            let mut guard = self.counters.lock();
            std::mem::replace(&mut *guard, Counters::new())
        };
        tracing::info!("analytics reset");
        self.summarize(&old)
    }

    fn summarize(&self, c: &Counters) -> AnalyticsSummary {
        let mut top: Vec<ResourceCount> = c
            .resources
            .iter()
            .map(|(uri, count)| ResourceCount {
                uri: uri.clone(),
                count: *count,
            })
            .collect();
        top.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.uri.cmp(&b.uri)));
        top.truncate(self.top_resources);

        AnalyticsSummary {
            total_calls: c.total_calls,
            by_tool: c.by_tool.iter().map(|(k, v)| (k.clone(), *v)).collect(),
            average_duration_ms: if c.total_calls == 0 {
                0.0
            } else {
                c.total_duration_ms / c.total_calls as f64
            },
            top_resources: top,
            recent_calls: c.recent.iter().cloned().collect(),
            performance: PerformanceSummary {
                samples: c.perf_samples,
                average_ms: if c.perf_samples == 0 {
                    0.0
                } else {
                    c.perf_total_ms / c.perf_samples as f64
                },
                max_ms: c.perf_max_ms,
            },
            since: c.since.to_rfc3339(),
        }
    }

    /// Log the summary and write the snapshot file, if configured.
    pub fn flush(&self) {
        let summary = self.summary();
        tracing::info!(
            total_calls = summary.total_calls,
            tools = summary.by_tool.len(),
            average_duration_ms = summary.average_duration_ms,
            resources = summary.top_resources.len(),
            "analytics flush"
        );
        if let Some(path) = &self.snapshot_path {
            if let Err(e) = write_snapshot(path, &summary) {
                tracing::warn!(path = %path.display(), error = %e, "analytics snapshot failed");
            }
        }
    }

    /// Flush every `interval` on the current tokio runtime.
    pub fn spawn_flush_task(self: Arc<Self>, interval: Duration) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                self.flush();
            }
        })
    }
}

fn write_snapshot(path: &std::path::Path, summary: &AnalyticsSummary) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_vec_pretty(summary)?;
    std::fs::write(path, body)?;
    Ok(())
}
