//! CSV file reporter
//!
//! Writes one file per metric, `<csv.log.dir>/<metric name>.csv`. The header
//! row is written when the file is created; each export pass appends one row
//! whose first column `t` is the pass time in unix seconds. When a metric
//! changes kind and `<name>.csv` already carries another header, rows go to
//! `<name>.<kind>.csv` instead.

use chrono::{DateTime, Utc};
use csv::{Writer, WriterBuilder};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use super::scheduled::{ReporterBackend, ScheduledReporter};
use crate::config::{ReporterConfig, keys};
use crate::engine::{ExportEngine, MetricSink, ScheduledExporter, ValueFormat};
use crate::errors::{ReporterError, Result};
use crate::filters::MetricFilter;
use crate::registry::{MetricRegistry, MetricSample, MetricValue};

pub const DEFAULT_CSV_LOG_DIR: &str = "./metrics";

pub type CsvReporter = ScheduledReporter<CsvBackend>;

#[derive(Debug, Default, Clone, Copy)]
pub struct CsvBackend;

impl ReporterBackend for CsvBackend {
    fn name(&self) -> &'static str {
        "csv"
    }

    // 停止前再导出一次，避免丢失最后一个周期的数据
    fn flush_on_stop_default(&self) -> bool {
        true
    }

    fn build_engine(
        &self,
        registry: Arc<dyn MetricRegistry>,
        filter: Option<Arc<dyn MetricFilter>>,
        config: &ReporterConfig,
    ) -> Result<Box<dyn ExportEngine>> {
        let format = ValueFormat::from_config(config)?;
        let dir = config
            .get_string(keys::CSV_LOG_DIR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_LOG_DIR));
        debug!("CSV metrics directory: {}", dir.display());

        Ok(Box::new(ScheduledExporter::new(
            self.name(),
            registry,
            filter,
            Box::new(CsvSink::new(dir)),
            format,
        )))
    }
}

pub struct CsvSink {
    dir: PathBuf,
    // 按 (指标名, 类型) 缓存，类型变化时不会写入表头不同的文件
    writers: HashMap<(String, &'static str), Writer<File>>,
}

impl CsvSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            writers: HashMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 指标名中的路径分隔符替换为 `_`
    pub fn file_name(metric: &str) -> String {
        format!("{}.csv", sanitize(metric))
    }

    /// File used for `kind` rows once `<name>.csv` holds another kind.
    pub fn kind_file_name(metric: &str, kind: &str) -> String {
        format!("{}.{}.csv", sanitize(metric), kind)
    }

    fn writer_for(&mut self, sample: &MetricSample) -> Result<&mut Writer<File>> {
        let key = (sample.name.clone(), sample.value.kind());
        if !self.writers.contains_key(&key) {
            let writer = self.open_writer(sample)?;
            self.writers.insert(key.clone(), writer);
        }
        self.writers.get_mut(&key).ok_or_else(|| {
            ReporterError::file_operation(format!("No writer for {}", sample.name))
        })
    }

    fn open_writer(&self, sample: &MetricSample) -> Result<Writer<File>> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            ReporterError::file_operation(format!(
                "Failed to create metrics directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;
        let header = header(&sample.value);
        let primary = self.dir.join(Self::file_name(&sample.name));
        let path = if header_matches(&primary, &header) {
            primary
        } else {
            let path = self
                .dir
                .join(Self::kind_file_name(&sample.name, sample.value.kind()));
            warn!(
                "{} is now a {}, writing to {}",
                sample.name,
                sample.value.kind(),
                path.display()
            );
            path
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                ReporterError::file_operation(format!("Failed to open {}: {}", path.display(), e))
            })?;
        let is_new = file.metadata().map(|m| m.len() == 0).unwrap_or(true);
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);
        if is_new {
            writer.write_record(&header)?;
        }
        Ok(writer)
    }
}

fn sanitize(metric: &str) -> String {
    metric
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' => '_',
            c => c,
        })
        .collect()
}

/// 文件不存在、为空或表头与 `header` 一致
fn header_matches(path: &Path, header: &[String]) -> bool {
    let Ok(file) = File::open(path) else {
        return true;
    };
    let mut first = String::new();
    match BufReader::new(file).read_line(&mut first) {
        Ok(0) | Err(_) => true,
        Ok(_) => first.trim_end() == header.join(","),
    }
}

fn header(value: &MetricValue) -> Vec<String> {
    let columns: &[&str] = match value {
        MetricValue::Counter(_) => &["t", "count"],
        MetricValue::Gauge(_) => &["t", "value"],
        MetricValue::Meter { .. } => &["t", "count", "mean_rate", "rate_unit"],
        MetricValue::Timer { .. } => &["t", "count", "mean", "min", "max", "duration_unit"],
    };
    columns.iter().map(|c| c.to_string()).collect()
}

fn row(timestamp: i64, value: &MetricValue, format: &ValueFormat) -> Vec<String> {
    let t = timestamp.to_string();
    match value {
        MetricValue::Counter(count) => vec![t, count.to_string()],
        MetricValue::Gauge(v) => vec![t, format.decimal(*v)],
        MetricValue::Meter { count, mean_rate } => vec![
            t,
            count.to_string(),
            format.rate(*mean_rate),
            format.rate_label(),
        ],
        MetricValue::Timer {
            count,
            mean,
            min,
            max,
        } => vec![
            t,
            count.to_string(),
            format.duration(*mean),
            format.duration(*min as f64),
            format.duration(*max as f64),
            format.duration_label(),
        ],
    }
}

impl MetricSink for CsvSink {
    fn write(
        &mut self,
        timestamp: DateTime<Utc>,
        samples: &[MetricSample],
        format: &ValueFormat,
    ) -> Result<()> {
        let t = timestamp.timestamp();
        let mut first_error = None;
        for sample in samples {
            // 单个文件失败不影响其他指标
            let result = self.writer_for(sample).and_then(|writer| {
                writer.write_record(row(t, &sample.value, format))?;
                writer.flush()?;
                Ok(())
            });
            if let Err(e) = result {
                warn!("CSV export of {} failed: {}", sample.name, e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn close(&mut self) -> Result<()> {
        let mut failed = Vec::new();
        for ((name, _), mut writer) in self.writers.drain() {
            if let Err(e) = writer.flush() {
                failed.push(format!("{}: {}", name, e));
            }
        }
        if failed.is_empty() {
            Ok(())
        } else {
            Err(ReporterError::resource_release(format!(
                "Failed to flush CSV files: {}",
                failed.join(", ")
            )))
        }
    }
}
