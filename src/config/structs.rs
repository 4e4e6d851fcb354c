use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use super::ReporterConfig;
use crate::errors::{ReporterError, Result};

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "metrics.toml";

/// 环境变量前缀，分隔符 `__`，示例：MR__LOGGING__LEVEL=debug
pub const ENV_PREFIX: &str = "MR";

/// 进程级配置（从 TOML 加载，启动时使用）
///
/// - logging: 日志配置
/// - reporters: 每个 reporter 一个表，`class` 指定插件名，其余键交给 reporter 自己解析
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MetricsConfig {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub reporters: Vec<Map<String, Value>>,
}

impl MetricsConfig {
    /// 从 TOML 文件和环境变量加载配置
    ///
    /// 优先级：ENV > 配置文件 > 默认值。文件不存在时使用默认值。
    pub fn load(path: &str) -> Result<Self> {
        use config::{Config, Environment, File, FileFormat};

        let settings = Config::builder()
            .add_source(File::new(path, FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config = settings.try_deserialize::<MetricsConfig>()?;
        if std::path::Path::new(path).exists() {
            tracing::debug!("Configuration loaded from: {}", path);
        }
        Ok(config)
    }

    /// 从 TOML 字符串解析（测试和内嵌配置使用）
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            ReporterError::configuration(format!("Failed to parse configuration: {}", e))
        })
    }

    pub fn reporter_configs(&self) -> Vec<ReporterConfig> {
        self.reporters
            .iter()
            .cloned()
            .map(ReporterConfig::new)
            .collect()
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let csv = json!({
            "class": "csv",
            "report.period": 10,
            "report.period.units": "SECONDS",
            "csv.log.dir": "./metrics",
            "rate.unit": "SECONDS",
            "duration.unit": "MILLISECONDS",
            "filter": { "class": "regex", "expression": "^process\\." }
        });
        let console = json!({
            "class": "console",
            "report.period": 1,
            "report.period.units": "MINUTES",
            "locale": "en-US"
        });
        let sample = MetricsConfig {
            logging: LoggingConfig::default(),
            reporters: [csv, console]
                .into_iter()
                .filter_map(|v| match v {
                    Value::Object(map) => Some(map),
                    _ => None,
                })
                .collect(),
        };
        toml::to_string_pretty(&sample)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default)]
    pub enable_rotation: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}
