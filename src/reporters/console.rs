//! Console reporter: a human-readable block per export pass.

use chrono::{DateTime, SecondsFormat, Utc};
use std::io::Write;
use std::sync::Arc;

use super::scheduled::{ReporterBackend, ScheduledReporter};
use crate::config::ReporterConfig;
use crate::engine::{ExportEngine, MetricSink, ScheduledExporter, ValueFormat};
use crate::errors::Result;
use crate::filters::MetricFilter;
use crate::registry::{MetricRegistry, MetricSample, MetricValue};

pub type ConsoleReporter = ScheduledReporter<ConsoleBackend>;

#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleBackend;

impl ReporterBackend for ConsoleBackend {
    fn name(&self) -> &'static str {
        "console"
    }

    fn build_engine(
        &self,
        registry: Arc<dyn MetricRegistry>,
        filter: Option<Arc<dyn MetricFilter>>,
        config: &ReporterConfig,
    ) -> Result<Box<dyn ExportEngine>> {
        let format = ValueFormat::from_config(config)?;
        Ok(Box::new(ScheduledExporter::new(
            self.name(),
            registry,
            filter,
            Box::new(ConsoleSink::stdout()),
            format,
        )))
    }
}

pub struct ConsoleSink {
    out: Box<dyn Write + Send>,
}

impl ConsoleSink {
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Self { out }
    }

    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }
}

const SECTIONS: [(&str, &str); 4] = [
    ("gauge", "Gauges"),
    ("counter", "Counters"),
    ("meter", "Meters"),
    ("timer", "Timers"),
];

impl MetricSink for ConsoleSink {
    fn write(
        &mut self,
        timestamp: DateTime<Utc>,
        samples: &[MetricSample],
        format: &ValueFormat,
    ) -> Result<()> {
        let mut block = String::new();
        block.push_str(&format!(
            "{} {}\n",
            timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            "=".repeat(40)
        ));

        for (kind, title) in SECTIONS {
            let section: Vec<&MetricSample> =
                samples.iter().filter(|s| s.value.kind() == kind).collect();
            if section.is_empty() {
                continue;
            }
            block.push_str(&format!("-- {} {}\n", title, "-".repeat(36 - title.len())));
            for sample in section {
                block.push_str(&sample.name);
                block.push('\n');
                for line in describe(&sample.value, format) {
                    block.push_str(&format!("    {}\n", line));
                }
            }
        }
        block.push('\n');

        self.out.write_all(block.as_bytes())?;
        self.out.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

fn describe(value: &MetricValue, format: &ValueFormat) -> Vec<String> {
    match value {
        MetricValue::Counter(count) => vec![format!("count = {}", count)],
        MetricValue::Gauge(v) => vec![format!("value = {}", format.decimal(*v))],
        MetricValue::Meter { count, mean_rate } => vec![
            format!("count = {}", count),
            format!(
                "mean rate = {} {}",
                format.rate(*mean_rate),
                format.rate_label()
            ),
        ],
        MetricValue::Timer {
            count,
            mean,
            min,
            max,
        } => {
            let unit = format.duration_unit.abbreviation();
            vec![
                format!("count = {}", count),
                format!("min = {} {}", format.duration(*min as f64), unit),
                format!("max = {} {}", format.duration(*max as f64), unit),
                format!("mean = {} {}", format.duration(*mean), unit),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_block_groups_by_kind() {
        let buffer = SharedBuffer::default();
        let mut sink = ConsoleSink::new(Box::new(buffer.clone()));
        let samples = vec![
            MetricSample::new("requests", MetricValue::Counter(4)),
            MetricSample::new("load", MetricValue::Gauge(0.5)),
        ];
        sink.write(Utc::now(), &samples, &ValueFormat::default())
            .unwrap();

        let output = String::from_utf8(buffer.0.lock().clone()).unwrap();
        let gauges = output.find("-- Gauges").unwrap();
        let counters = output.find("-- Counters").unwrap();
        assert!(gauges < counters);
        assert!(output.contains("value = 0.500000"));
        assert!(output.contains("count = 4"));
        assert!(!output.contains("-- Timers"));
    }

    #[test]
    fn test_timer_uses_duration_unit() {
        let lines = describe(
            &MetricValue::Timer {
                count: 1,
                mean: 2_000_000.0,
                min: 1_000_000,
                max: 3_000_000,
            },
            &ValueFormat::default(),
        );
        assert_eq!(lines[1], "min = 1.000000 ms");
        assert_eq!(lines[3], "mean = 2.000000 ms");
    }
}
