//! Typed access to a single reporter's configuration block.
//!
//! A reporter block is an untyped string-keyed mapping (as read from TOML,
//! JSON or built in code). Keys may be written flat (`"report.period" = 5`)
//! or nested (`[filter] class = "regex"`); lookups try the literal key first
//! and then walk nested maps along the dots.

use serde_json::{Map, Value};
use std::str::FromStr;
use std::sync::Arc;

use crate::errors::{ReporterError, Result};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReporterConfig {
    entries: Arc<Map<String, Value>>,
}

impl ReporterConfig {
    pub fn new(entries: Map<String, Value>) -> Self {
        Self {
            entries: Arc::new(entries),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// 从 JSON 值构建，值必须是对象
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self::new(map)),
            other => Err(ReporterError::configuration(format!(
                "Reporter configuration must be a table, got: {}",
                other
            ))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        lookup(&self.entries, key)
    }

    /// Integer value of `key`. Numeric strings are accepted; anything else
    /// (including fractional numbers) yields `None`.
    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            Value::Number(n) => n.as_i64().or_else(|| {
                n.as_f64()
                    .filter(|f| f.fract() == 0.0 && f.is_finite())
                    .map(|f| f as i64)
            }),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    pub fn get_int_or(&self, key: &str, default: i64) -> i64 {
        self.get_int(key).unwrap_or(default)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        match self.get(key)? {
            Value::Bool(b) => Some(*b),
            Value::String(s) => match s.trim() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// 字符串列表：支持数组或逗号分隔的字符串
    pub fn get_string_list(&self, key: &str) -> Option<Vec<String>> {
        match self.get(key)? {
            Value::Array(items) => Some(
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect(),
            ),
            Value::String(s) => Some(
                s.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            _ => None,
        }
    }

    /// Parses the string at `key` into `T`.
    ///
    /// Absent key ⇒ `Ok(None)`. A present value that is not a string or does
    /// not parse is a configuration error naming the key and the value.
    pub fn get_enum<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };
        let Some(raw) = value.as_str() else {
            return Err(ReporterError::configuration(format!(
                "Invalid value {} for key '{}': expected a string",
                value, key
            )));
        };
        raw.parse::<T>().map(Some).map_err(|e| {
            ReporterError::configuration(format!(
                "Invalid value '{}' for key '{}': {}",
                raw, key, e
            ))
        })
    }

    /// Nested block at `key`: either a table, or the flat `key.*` entries
    /// with the prefix stripped.
    pub fn sub_config(&self, key: &str) -> Option<ReporterConfig> {
        if let Some(Value::Object(map)) = self.get(key) {
            return Some(ReporterConfig::new(map.clone()));
        }
        let prefix = format!("{}.", key);
        let flat: Map<String, Value> = self
            .entries
            .iter()
            .filter_map(|(k, v)| {
                k.strip_prefix(&prefix)
                    .map(|rest| (rest.to_string(), v.clone()))
            })
            .collect();
        (!flat.is_empty()).then(|| ReporterConfig::new(flat))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.entries
    }
}

impl From<Map<String, Value>> for ReporterConfig {
    fn from(entries: Map<String, Value>) -> Self {
        Self::new(entries)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for ReporterConfig {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

fn lookup<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    if let Some(value) = map.get(key) {
        return Some(value);
    }
    // 逐个尝试点号分隔的前缀：a.b.c -> a / b.c, a.b / c
    for (idx, _) in key.match_indices('.') {
        let (head, rest) = (&key[..idx], &key[idx + 1..]);
        if let Some(Value::Object(nested)) = map.get(head)
            && let Some(found) = lookup(nested, rest)
        {
            return Some(found);
        }
    }
    None
}
