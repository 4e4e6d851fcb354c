//! Metric registry seam.
//!
//! Reporters only read from a registry: each export pass takes a snapshot.
//! `InMemoryRegistry` is a small thread-safe implementation used by the
//! binary and by tests.

use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Point-in-time value of one metric.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    Counter(i64),
    Gauge(f64),
    /// `mean_rate` is in events per second.
    Meter { count: u64, mean_rate: f64 },
    /// All durations are in nanoseconds.
    Timer {
        count: u64,
        mean: f64,
        min: u64,
        max: u64,
    },
}

impl MetricValue {
    pub fn kind(&self) -> &'static str {
        match self {
            MetricValue::Counter(_) => "counter",
            MetricValue::Gauge(_) => "gauge",
            MetricValue::Meter { .. } => "meter",
            MetricValue::Timer { .. } => "timer",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricSample {
    pub name: String,
    pub value: MetricValue,
}

impl MetricSample {
    pub fn new(name: impl Into<String>, value: MetricValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

pub trait MetricRegistry: Send + Sync {
    /// Current value of every metric, sorted by name.
    fn snapshot(&self) -> Vec<MetricSample>;
}

enum Entry {
    Counter(i64),
    Gauge(f64),
    Meter { count: u64, since: Instant },
    Timer { count: u64, sum: u128, min: u64, max: u64 },
}

impl Entry {
    fn value(&self) -> MetricValue {
        match *self {
            Entry::Counter(v) => MetricValue::Counter(v),
            Entry::Gauge(v) => MetricValue::Gauge(v),
            Entry::Meter { count, since } => {
                let elapsed = since.elapsed().as_secs_f64();
                let mean_rate = if elapsed > 0.0 {
                    count as f64 / elapsed
                } else {
                    0.0
                };
                MetricValue::Meter { count, mean_rate }
            }
            Entry::Timer {
                count,
                sum,
                min,
                max,
            } => MetricValue::Timer {
                count,
                mean: if count == 0 {
                    0.0
                } else {
                    sum as f64 / count as f64
                },
                min,
                max,
            },
        }
    }
}

/// 基于 DashMap 的内存 registry。同名但类型不同的写入会替换旧值。
#[derive(Default)]
pub struct InMemoryRegistry {
    entries: DashMap<String, Entry>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_counter(&self, name: &str, delta: i64) {
        let mut entry = self
            .entries
            .entry(name.to_string())
            .or_insert(Entry::Counter(0));
        match entry.value_mut() {
            Entry::Counter(v) => *v += delta,
            other => *other = Entry::Counter(delta),
        }
    }

    pub fn set_gauge(&self, name: &str, value: f64) {
        self.entries.insert(name.to_string(), Entry::Gauge(value));
    }

    pub fn mark(&self, name: &str, events: u64) {
        let mut entry = self.entries.entry(name.to_string()).or_insert(Entry::Meter {
            count: 0,
            since: Instant::now(),
        });
        match entry.value_mut() {
            Entry::Meter { count, .. } => *count += events,
            other => {
                *other = Entry::Meter {
                    count: events,
                    since: Instant::now(),
                }
            }
        }
    }

    pub fn record_duration(&self, name: &str, duration: Duration) {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        let mut entry = self.entries.entry(name.to_string()).or_insert(Entry::Timer {
            count: 0,
            sum: 0,
            min: u64::MAX,
            max: 0,
        });
        match entry.value_mut() {
            Entry::Timer {
                count,
                sum,
                min,
                max,
            } => {
                *count += 1;
                *sum += u128::from(nanos);
                *min = (*min).min(nanos);
                *max = (*max).max(nanos);
            }
            other => {
                *other = Entry::Timer {
                    count: 1,
                    sum: u128::from(nanos),
                    min: nanos,
                    max: nanos,
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MetricRegistry for InMemoryRegistry {
    fn snapshot(&self) -> Vec<MetricSample> {
        let mut samples: Vec<MetricSample> = self
            .entries
            .iter()
            .map(|entry| MetricSample::new(entry.key().clone(), entry.value().value()))
            .collect();
        samples.sort_by(|a, b| a.name.cmp(&b.name));
        samples
    }
}
