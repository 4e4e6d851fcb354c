use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReporterError {
    Configuration(String),
    PluginNotFound(String),
    LifecycleOrder(String),
    ResourceRelease(String),
    FileOperation(String),
    Serialization(String),
}

impl ReporterError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            ReporterError::Configuration(_) => "E001",
            ReporterError::PluginNotFound(_) => "E002",
            ReporterError::LifecycleOrder(_) => "E003",
            ReporterError::ResourceRelease(_) => "E004",
            ReporterError::FileOperation(_) => "E005",
            ReporterError::Serialization(_) => "E006",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            ReporterError::Configuration(_) => "Configuration Error",
            ReporterError::PluginNotFound(_) => "Plugin Not Found",
            ReporterError::LifecycleOrder(_) => "Lifecycle Order Error",
            ReporterError::ResourceRelease(_) => "Resource Release Error",
            ReporterError::FileOperation(_) => "File Operation Error",
            ReporterError::Serialization(_) => "Serialization Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            ReporterError::Configuration(msg) => msg,
            ReporterError::PluginNotFound(msg) => msg,
            ReporterError::LifecycleOrder(msg) => msg,
            ReporterError::ResourceRelease(msg) => msg,
            ReporterError::FileOperation(msg) => msg,
            ReporterError::Serialization(msg) => msg,
        }
    }

    /// 格式化为彩色输出（用于 CLI 启动报告）
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 配置错误和插件加载错误在 `prepare` 阶段是致命的
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ReporterError::Configuration(_) | ReporterError::PluginNotFound(_)
        )
    }
}

impl fmt::Display for ReporterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for ReporterError {}

// 便捷的构造函数
impl ReporterError {
    pub fn configuration<T: Into<String>>(msg: T) -> Self {
        ReporterError::Configuration(msg.into())
    }

    pub fn plugin_not_found<T: Into<String>>(msg: T) -> Self {
        ReporterError::PluginNotFound(msg.into())
    }

    pub fn lifecycle_order<T: Into<String>>(msg: T) -> Self {
        ReporterError::LifecycleOrder(msg.into())
    }

    pub fn resource_release<T: Into<String>>(msg: T) -> Self {
        ReporterError::ResourceRelease(msg.into())
    }

    pub fn file_operation<T: Into<String>>(msg: T) -> Self {
        ReporterError::FileOperation(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        ReporterError::Serialization(msg.into())
    }
}

impl From<std::io::Error> for ReporterError {
    fn from(err: std::io::Error) -> Self {
        ReporterError::FileOperation(err.to_string())
    }
}

impl From<csv::Error> for ReporterError {
    fn from(err: csv::Error) -> Self {
        if err.is_io_error() {
            ReporterError::FileOperation(err.to_string())
        } else {
            ReporterError::Serialization(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ReporterError {
    fn from(err: serde_json::Error) -> Self {
        ReporterError::Serialization(err.to_string())
    }
}

impl From<config::ConfigError> for ReporterError {
    fn from(err: config::ConfigError) -> Self {
        ReporterError::Configuration(err.to_string())
    }
}

impl From<regex::Error> for ReporterError {
    fn from(err: regex::Error) -> Self {
        ReporterError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReporterError>;
