//! 配置环境
//!
//! 分层配置：TOML 配置文件打底，带前缀的环境变量覆盖。
//! 环境变量命名规则：去掉前缀后转小写，双下划线 `__` 分隔层级，
//! 例如 `GLINT_SERVER__PORT=9090` 覆盖 `server.port`

use std::collections::HashMap;
use std::path::Path;

/// 配置值
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl ConfigValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(i) => Some(*i),
            ConfigValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Boolean(b) => Some(*b),
            ConfigValue::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

/// 从环境变量字符串推断配置值类型
fn parse_env_value(raw: &str) -> ConfigValue {
    if let Ok(b) = raw.parse::<bool>() {
        ConfigValue::Boolean(b)
    } else if let Ok(i) = raw.parse::<i64>() {
        ConfigValue::Integer(i)
    } else if let Ok(f) = raw.parse::<f64>() {
        ConfigValue::Float(f)
    } else {
        ConfigValue::String(raw.to_string())
    }
}

/// 配置环境
///
/// 所有键使用点分路径，如 `server.port`、`logging.level`
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, ConfigValue>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// 加载配置：先读配置文件（可缺失），再用环境变量覆盖
    pub fn load(config_file: &str, env_prefix: &str) -> Self {
        let mut env = Self::new();

        if Path::new(config_file).exists() {
            match std::fs::read_to_string(config_file) {
                Ok(content) => match env.merge_toml(&content) {
                    Ok(()) => tracing::info!("Loaded configuration from: {}", config_file),
                    Err(e) => tracing::warn!("Failed to parse {}: {}", config_file, e),
                },
                Err(e) => tracing::warn!("Failed to read {}: {}", config_file, e),
            }
        } else {
            tracing::debug!("Configuration file not found: {}", config_file);
        }

        env.merge_env_vars(env_prefix);
        env
    }

    /// 合并一段 TOML 配置，嵌套表展平为点分路径
    pub fn merge_toml(&mut self, content: &str) -> Result<(), String> {
        let table: toml::Table = content.parse().map_err(|e| format!("{}", e))?;
        Self::flatten_table("", &table, &mut self.values);
        Ok(())
    }

    fn flatten_table(prefix: &str, table: &toml::Table, values: &mut HashMap<String, ConfigValue>) {
        for (key, value) in table {
            let full_key = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };

            match value {
                toml::Value::Table(nested) => Self::flatten_table(&full_key, nested, values),
                toml::Value::String(s) => {
                    values.insert(full_key, ConfigValue::String(s.clone()));
                }
                toml::Value::Integer(i) => {
                    values.insert(full_key, ConfigValue::Integer(*i));
                }
                toml::Value::Float(f) => {
                    values.insert(full_key, ConfigValue::Float(*f));
                }
                toml::Value::Boolean(b) => {
                    values.insert(full_key, ConfigValue::Boolean(*b));
                }
                other => {
                    tracing::debug!(key = %full_key, "Ignoring unsupported config value: {}", other);
                }
            }
        }
    }

    /// 用带前缀的环境变量覆盖已有配置
    pub fn merge_env_vars(&mut self, prefix: &str) {
        for (name, raw) in std::env::vars() {
            if let Some(stripped) = name.strip_prefix(prefix) {
                let key = stripped.to_lowercase().replace("__", ".");
                self.values.insert(key, parse_env_value(&raw));
            }
        }
    }

    /// 手工设置配置项
    pub fn set(&mut self, key: impl Into<String>, value: ConfigValue) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(|v| match v {
            ConfigValue::String(s) => Some(s.clone()),
            ConfigValue::Integer(i) => Some(i.to_string()),
            ConfigValue::Float(f) => Some(f.to_string()),
            ConfigValue::Boolean(b) => Some(b.to_string()),
        })
    }

    pub fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_string(key).unwrap_or_else(|| default.to_string())
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(ConfigValue::as_i64)
    }

    pub fn get_i64_or(&self, key: &str, default: i64) -> i64 {
        self.get_i64(key).unwrap_or(default)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(ConfigValue::as_bool)
    }

    pub fn get_bool_or(&self, key: &str, default: bool) -> bool {
        self.get_bool(key).unwrap_or(default)
    }
}
