//! 结构化业务错误
//!
//! 提供类似 Spring 生态中带错误码的基础异常类型
//!
//! 所有业务失败都应携带一个稳定的、机器可读的错误码，
//! 在失败点构造，沿调用栈原样向上传播，最终由全局异常处理器消费一次后丢弃

use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// 结构化业务错误
///
/// 携带 `(错误码, 可读信息, 时间戳, 可选上下文, 可选原因)`，构造后不可变。
/// 应用中所有领域错误都应包装或转换为该类型，由全局异常处理器统一映射为 HTTP 响应。
///
/// # 示例
///
/// ```ignore
/// use glint_web::GlintError;
///
/// let error = GlintError::new("USER_NOT_FOUND", "User with ID 42 not found")
///     .context("userId", 42);
/// ```
#[derive(Debug)]
pub struct GlintError {
    /// 稳定的机器可读错误码，全局唯一标识一类失败
    code: String,

    /// 人类可读的错误信息，参数已替换完成
    message: String,

    /// 构造时刻，之后不再变更
    timestamp: DateTime<Utc>,

    /// 自由格式的诊断上下文，`None` 表示无上下文
    context: Option<HashMap<String, Value>>,

    /// 引发本错误的底层原因
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl GlintError {
    /// 以 `(错误码, 信息)` 构造错误
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            timestamp: Utc::now(),
            context: None,
            source: None,
        }
    }

    /// 附加引发本错误的底层原因
    pub fn caused_by(mut self, cause: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(cause));
        self
    }

    /// 附加单个上下文键值对
    pub fn context(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.context
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// 附加整个上下文映射
    pub fn with_context(mut self, context: HashMap<String, Value>) -> Self {
        self.context = Some(context);
        self
    }

    /// 错误码
    pub fn code(&self) -> &str {
        &self.code
    }

    /// 错误信息
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 构造时刻
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// 诊断上下文
    pub fn error_context(&self) -> Option<&HashMap<String, Value>> {
        self.context.as_ref()
    }
}

impl fmt::Display for GlintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for GlintError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_new_sets_code_message_and_timestamp() {
        let before = Utc::now();
        let error = GlintError::new("USER_NOT_FOUND", "User with ID 42 not found");
        let after = Utc::now();

        assert_eq!(error.code(), "USER_NOT_FOUND");
        assert_eq!(error.message(), "User with ID 42 not found");
        assert!(error.timestamp() >= before && error.timestamp() <= after);
        assert!(error.error_context().is_none());
    }

    #[test]
    fn test_context_builder_accumulates_entries() {
        let error = GlintError::new("ORDER_REJECTED", "Order rejected")
            .context("orderId", 7)
            .context("reason", "out of stock");

        let context = error.error_context().unwrap();
        assert_eq!(context.len(), 2);
        assert_eq!(context["orderId"], serde_json::json!(7));
        assert_eq!(context["reason"], serde_json::json!("out of stock"));
    }

    #[test]
    fn test_display_includes_code_and_message() {
        let error = GlintError::new("INVALID_USER_ID", "Invalid user ID: -1");
        assert_eq!(error.to_string(), "[INVALID_USER_ID] Invalid user ID: -1");
    }

    #[test]
    fn test_caused_by_preserves_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let error = GlintError::new("CONFIG_MISSING", "Configuration not found").caused_by(io);

        let source = error.source().unwrap();
        assert!(source.to_string().contains("file missing"));
    }
}
