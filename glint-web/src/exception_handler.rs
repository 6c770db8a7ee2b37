//! 全局异常处理模块
//!
//! 提供类似 Spring Boot @ControllerAdvice 的全局异常处理功能
//!
//! ## 处理流程
//!
//! 1. 应用代码在请求处理过程中抛出类型化错误（`GlintError` 或 `WebError`）
//! 2. 全局异常处理中间件携带请求路径调用注册表
//! 3. 注册表按优先级尝试自定义处理器，无人处理时落到内置默认映射
//! 4. 默认映射按「最具体者优先」把错误分类映射为 `(HTTP 状态码, ErrorResponse)`
//!
//! 每个分支都会先在服务端记录完整错误详情，再返回脱敏后的公开响应：
//! 内部细节永远不会泄露给调用方，同时服务端保留完整的诊断信息

use async_trait::async_trait;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;

use crate::error::GlintError;
use crate::error_code;

/// 响应时间戳格式，形如 `2024-01-31T09:30:00.123`
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

// ============================================================================
// Web 层错误分类
// ============================================================================

/// Web 层错误分类
///
/// 全局异常处理器的分派依据，按「最具体者优先」排列：
/// 领域错误最具体，`Unexpected` 是绝对兜底。
/// 应用代码不应捕获这些错误做恢复，而是让其传播到顶层拦截点
#[derive(Error, Debug)]
pub enum WebError {
    /// 领域错误 - 携带稳定错误码，默认 400，可由错误码注册表覆盖状态码
    #[error("{0}")]
    Domain(GlintError),

    /// 参数验证错误 - 400
    #[error("Validation failed")]
    Validation {
        /// 字段级错误详情：字段名 -> 该字段的错误信息
        field_errors: HashMap<String, String>,
    },

    /// 路由未匹配 - 404
    #[error("Resource not found")]
    NotFound,

    /// 非法参数 - 400（路径/查询/请求体解析失败也归入此类）
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// 其他运行时错误（含 handler panic）- 500，对外信息脱敏
    #[error("Internal error: {0}")]
    Internal(String),

    /// 兜底错误 - 500，对外信息脱敏
    #[error("Unexpected error: {0}")]
    Unexpected(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl WebError {
    /// 构造非法参数错误
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        WebError::InvalidArgument(message.into())
    }

    /// 构造内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        WebError::Internal(message.into())
    }

    /// 从装箱错误构造，最具体者优先：能识别为 `GlintError` 则归入领域错误，
    /// 否则落入兜底分类
    pub fn from_boxed(error: Box<dyn std::error::Error + Send + Sync>) -> Self {
        match error.downcast::<GlintError>() {
            Ok(domain) => WebError::Domain(*domain),
            Err(other) => WebError::Unexpected(other),
        }
    }

    /// 错误对应的 HTTP 状态码
    ///
    /// 领域错误先查询错误码注册表，未注册的错误码默认 400
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebError::Domain(error) => {
                error_code::status_for(error.code()).unwrap_or(StatusCode::BAD_REQUEST)
            }
            WebError::Validation { .. } => StatusCode::BAD_REQUEST,
            WebError::NotFound => StatusCode::NOT_FOUND,
            WebError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            WebError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            WebError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 响应中的 errorCode 字段
    pub fn error_code(&self) -> &str {
        match self {
            WebError::Domain(error) => error.code(),
            WebError::Validation { .. } => "VALIDATION_ERROR",
            WebError::NotFound => "NOT_FOUND",
            WebError::InvalidArgument(_) => "INVALID_ARGUMENT",
            WebError::Internal(_) => "INTERNAL_ERROR",
            WebError::Unexpected(_) => "UNEXPECTED_ERROR",
        }
    }

    /// 对外公开的错误信息
    ///
    /// `Internal`/`Unexpected` 永远返回固定文案，绝不泄露原始错误内容
    pub fn public_message(&self) -> String {
        match self {
            WebError::Domain(error) => error.message().to_string(),
            WebError::Validation { .. } => "Validation failed".to_string(),
            WebError::NotFound => "Resource not found".to_string(),
            WebError::InvalidArgument(message) => message.clone(),
            WebError::Internal(_) => "An internal error occurred".to_string(),
            WebError::Unexpected(_) => "An unexpected error occurred".to_string(),
        }
    }

    /// 随响应一起返回的上下文
    ///
    /// 领域错误透传自身上下文；验证错误以「字段名 -> 错误信息」的形式返回，
    /// 每个失败字段恰好一条
    pub fn response_context(&self) -> Option<HashMap<String, Value>> {
        match self {
            WebError::Domain(error) => error.error_context().cloned(),
            WebError::Validation { field_errors } => Some(
                field_errors
                    .iter()
                    .map(|(field, message)| (field.clone(), Value::String(message.clone())))
                    .collect(),
            ),
            _ => None,
        }
    }
}

impl From<GlintError> for WebError {
    fn from(error: GlintError) -> Self {
        WebError::Domain(error)
    }
}

impl From<validator::ValidationErrors> for WebError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let field_errors = errors
            .field_errors()
            .iter()
            .map(|(field, errors)| {
                let message = errors
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| format!("Invalid value for field '{}'", field));
                (field.to_string(), message)
            })
            .collect();

        WebError::Validation { field_errors }
    }
}

/// 实现 IntoResponse，使 WebError 可以直接作为 handler 返回值
///
/// 注意：此处会把 WebError 存入响应的 Extension，
/// 全局异常处理中间件据此用真实请求路径和 traceId 重新映射。
/// 提取器/IntoResponse 阶段看不到请求 Uri，path 先填占位值 "unknown"，
/// 未安装全局中间件时该占位值会原样出现在响应里响应
impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let mut body = ErrorResponse::new(self.error_code(), self.public_message(), "unknown");
        if let Some(context) = self.response_context() {
            body = body.with_response_context(context);
        }

        let mut response = (status, Json(body)).into_response();
        response.extensions_mut().insert(Arc::new(self));
        response
    }
}

// ============================================================================
// 标准错误响应
// ============================================================================

/// 标准错误响应格式（线上实体）
///
/// `context`/`traceId` 缺失时从序列化输出中省略，而不是输出 null
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// 错误码，必定存在
    pub error_code: String,

    /// 对外公开的错误信息
    pub message: String,

    /// 请求路径
    pub path: String,

    /// 构造时刻，格式见 [`TIMESTAMP_FORMAT`]
    pub timestamp: String,

    /// 诊断上下文
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<HashMap<String, Value>>,

    /// 链路追踪标识
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl ErrorResponse {
    /// 构造错误响应，时间戳取当前时刻
    pub fn new(
        error_code: impl Into<String>,
        message: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            path: path.into(),
            timestamp: Utc::now().format(TIMESTAMP_FORMAT).to_string(),
            context: None,
            trace_id: None,
        }
    }

    /// 附加上下文
    pub fn with_response_context(mut self, context: HashMap<String, Value>) -> Self {
        self.context = Some(context);
        self
    }

    /// 附加链路追踪标识
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }
}

// ============================================================================
// 全局异常处理器
// ============================================================================

/// 全局异常处理器 trait - 类似 Spring 的 @ControllerAdvice
///
/// 用户可以实现此 trait 自定义某类错误的响应，
/// 配合 `#[derive(ExceptionHandler)]` 在编译期自动注册
///
/// # 示例
///
/// ```ignore
/// use glint_web::prelude::*;
///
/// #[derive(ExceptionHandler, Default)]
/// pub struct QuotaExceptionHandler;
///
/// #[async_trait]
/// impl GlobalExceptionHandler for QuotaExceptionHandler {
///     fn name(&self) -> &str {
///         "QuotaExceptionHandler"
///     }
///
///     fn can_handle(&self, error: &WebError) -> bool {
///         matches!(error, WebError::Domain(e) if e.code() == "QUOTA_EXCEEDED")
///     }
///
///     async fn handle_error(
///         &self,
///         error: &WebError,
///         request_path: &str,
///     ) -> Option<(StatusCode, ErrorResponse)> {
///         Some((
///             StatusCode::TOO_MANY_REQUESTS,
///             ErrorResponse::new(error.error_code(), error.public_message(), request_path),
///         ))
///     }
/// }
/// ```
#[async_trait]
pub trait GlobalExceptionHandler: Send + Sync {
    fn name(&self) -> &str;

    /// 优先级，数字越小优先级越高
    fn priority(&self) -> i32 {
        100
    }

    /// 判断是否可以处理该错误
    fn can_handle(&self, error: &WebError) -> bool;

    /// 处理错误
    ///
    /// 返回 `Some` 表示已处理，返回 `None` 交给后续处理器或默认映射
    async fn handle_error(
        &self,
        error: &WebError,
        request_path: &str,
    ) -> Option<(StatusCode, ErrorResponse)>;
}

/// 异常处理器注册表
///
/// 持有按优先级排序的处理器列表，并内置兜底的默认映射。
/// 注册表本身绝不失败：自定义处理器 panic 会被捕获并降级到默认映射
pub struct GlobalExceptionHandlerRegistry {
    handlers: Vec<Arc<dyn GlobalExceptionHandler>>,
}

impl GlobalExceptionHandlerRegistry {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn register<H: GlobalExceptionHandler + 'static>(&mut self, handler: H) {
        self.handlers.push(Arc::new(handler));
        self.handlers.sort_by_key(|h| h.priority());
    }

    pub fn register_boxed(&mut self, handler: Box<dyn GlobalExceptionHandler>) {
        self.handlers.push(Arc::from(handler));
        self.handlers.sort_by_key(|h| h.priority());
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// 处理错误，返回 `(HTTP 状态码, 标准错误响应)`
    ///
    /// 处理流程：
    /// 1. 按优先级依次尝试自定义处理器
    /// 2. 无人处理（或处理器自身失败）时使用内置默认映射
    pub async fn handle_error(
        &self,
        error: &WebError,
        request_path: &str,
    ) -> (StatusCode, ErrorResponse) {
        for handler in &self.handlers {
            if !handler.can_handle(error) {
                continue;
            }

            // 处理器自身的失败不能泄露到传输层，捕获后降级到默认映射
            match AssertUnwindSafe(handler.handle_error(error, request_path))
                .catch_unwind()
                .await
            {
                Ok(Some(response)) => {
                    tracing::debug!(
                        handler = handler.name(),
                        error = %error,
                        "Error handled by custom handler"
                    );
                    return response;
                }
                Ok(None) => {}
                Err(_) => {
                    tracing::error!(
                        handler = handler.name(),
                        error = %error,
                        "Exception handler panicked, falling back to default mapping"
                    );
                }
            }
        }

        self.default_error_response(error, request_path)
    }

    /// 内置默认映射
    ///
    /// 每个分支先记录完整错误详情，再构造脱敏后的响应
    fn default_error_response(
        &self,
        error: &WebError,
        request_path: &str,
    ) -> (StatusCode, ErrorResponse) {
        let status = error.status_code();

        tracing::error!(
            error = ?error,
            path = request_path,
            status = %status.as_u16(),
            code = error.error_code(),
            "Request failed"
        );

        let mut response = ErrorResponse::new(error.error_code(), error.public_message(), request_path);
        if let Some(context) = error.response_context() {
            response = response.with_response_context(context);
        }

        (status, response)
    }
}

impl Default for GlobalExceptionHandlerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> GlobalExceptionHandlerRegistry {
        GlobalExceptionHandlerRegistry::new()
    }

    #[tokio::test]
    async fn test_domain_error_maps_to_400_with_own_code() {
        let error = WebError::from(
            GlintError::new("INVALID_USER_ID", "Invalid user ID: -1").context("userId", -1),
        );

        let (status, response) = registry().handle_error(&error, "/api/v1/users/-1").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error_code, "INVALID_USER_ID");
        assert_eq!(response.message, "Invalid user ID: -1");
        assert_eq!(response.path, "/api/v1/users/-1");
        assert_eq!(response.context.unwrap()["userId"], serde_json::json!(-1));
    }

    inventory::submit! {
        crate::error_code::ErrorCodeRegistration {
            code: "TEST_EMAIL_TAKEN",
            message: "Email is already in use",
            http_status: 409,
            category: "USER",
        }
    }

    #[tokio::test]
    async fn test_registered_code_status_overrides_domain_default() {
        let error = WebError::from(
            GlintError::new("TEST_EMAIL_TAKEN", "Email 'alice@example.com' is already in use"),
        );

        let (status, response) = registry().handle_error(&error, "/api/v1/users").await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(response.error_code, "TEST_EMAIL_TAKEN");
        assert_eq!(response.message, "Email 'alice@example.com' is already in use");
    }

    #[tokio::test]
    async fn test_validation_error_context_has_one_entry_per_field() {
        let mut field_errors = HashMap::new();
        field_errors.insert("name".to_string(), "name is too short".to_string());
        field_errors.insert("email".to_string(), "invalid email".to_string());
        field_errors.insert("age".to_string(), "must be positive".to_string());
        let error = WebError::Validation { field_errors };

        let (status, response) = registry().handle_error(&error, "/api/v1/users").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error_code, "VALIDATION_ERROR");
        assert_eq!(response.message, "Validation failed");
        let context = response.context.unwrap();
        assert_eq!(context.len(), 3);
        assert_eq!(context["name"], serde_json::json!("name is too short"));
    }

    #[tokio::test]
    async fn test_not_found_maps_to_404() {
        let (status, response) = registry()
            .handle_error(&WebError::NotFound, "/api/v1/unknown")
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(response.error_code, "NOT_FOUND");
        assert_eq!(response.message, "Resource not found");
    }

    #[tokio::test]
    async fn test_invalid_argument_keeps_original_message() {
        let error = WebError::invalid_argument("id must be numeric");
        let (status, response) = registry().handle_error(&error, "/api/v1/users/abc").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error_code, "INVALID_ARGUMENT");
        assert_eq!(response.message, "id must be numeric");
    }

    #[tokio::test]
    async fn test_internal_error_never_leaks_original_message() {
        let error = WebError::internal("connection to db-secret-host:5432 refused");
        let (status, response) = registry().handle_error(&error, "/api/v1/users").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.error_code, "INTERNAL_ERROR");
        assert_eq!(response.message, "An internal error occurred");
        assert!(!response.message.contains("db-secret-host"));
    }

    #[tokio::test]
    async fn test_unexpected_error_never_leaks_original_message() {
        let source = std::io::Error::new(std::io::ErrorKind::Other, "token=abc123");
        let error = WebError::Unexpected(Box::new(source));
        let (status, response) = registry().handle_error(&error, "/api/v1/users").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.error_code, "UNEXPECTED_ERROR");
        assert_eq!(response.message, "An unexpected error occurred");
        assert!(!response.message.contains("token"));
    }

    #[tokio::test]
    async fn test_mapping_is_idempotent() {
        let error = WebError::from(GlintError::new("ORDER_REJECTED", "Order rejected"));
        let registry = registry();

        let (first_status, first) = registry.handle_error(&error, "/api/v1/orders").await;
        let (second_status, second) = registry.handle_error(&error, "/api/v1/orders").await;

        assert_eq!(first_status, second_status);
        assert_eq!(first.error_code, second.error_code);
        assert_eq!(first.message, second.message);
    }

    #[tokio::test]
    async fn test_from_boxed_prefers_domain_error() {
        let boxed: Box<dyn std::error::Error + Send + Sync> =
            Box::new(GlintError::new("USER_NOT_FOUND", "User with ID 7 not found"));
        let error = WebError::from_boxed(boxed);
        assert!(matches!(error, WebError::Domain(_)));

        let boxed: Box<dyn std::error::Error + Send + Sync> =
            Box::new(std::fmt::Error);
        let error = WebError::from_boxed(boxed);
        assert!(matches!(error, WebError::Unexpected(_)));
    }

    #[tokio::test]
    async fn test_validation_errors_conversion_flattens_fields() {
        use validator::Validate;

        #[derive(Validate)]
        struct Payload {
            #[validate(length(min = 2, message = "name is too short"))]
            name: String,
            #[validate(email(message = "invalid email"))]
            email: String,
        }

        let payload = Payload {
            name: "a".to_string(),
            email: "not-an-email".to_string(),
        };
        let error = WebError::from(payload.validate().unwrap_err());

        match &error {
            WebError::Validation { field_errors } => {
                assert_eq!(field_errors.len(), 2);
                assert_eq!(field_errors["name"], "name is too short");
                assert_eq!(field_errors["email"], "invalid email");
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_standalone_rendering_uses_placeholder_path() {
        let response = WebError::NotFound.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.error_code, "NOT_FOUND");
        assert_eq!(parsed.path, "unknown");
    }

    #[test]
    fn test_error_response_omits_absent_optional_fields() {
        let response = ErrorResponse::new("NOT_FOUND", "Resource not found", "/missing");
        let value = serde_json::to_value(&response).unwrap();
        let object = value.as_object().unwrap();

        assert_eq!(object["errorCode"], "NOT_FOUND");
        assert_eq!(object["path"], "/missing");
        assert!(!object.contains_key("context"));
        assert!(!object.contains_key("traceId"));
    }

    #[test]
    fn test_error_response_serializes_optional_fields_when_present() {
        let mut context = HashMap::new();
        context.insert("userId".to_string(), serde_json::json!(42));
        let response = ErrorResponse::new("USER_NOT_FOUND", "User with ID 42 not found", "/users/42")
            .with_response_context(context)
            .with_trace_id("trace-123");

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["context"]["userId"], serde_json::json!(42));
        assert_eq!(value["traceId"], "trace-123");
    }

    #[test]
    fn test_timestamp_matches_wire_pattern() {
        let response = ErrorResponse::new("NOT_FOUND", "Resource not found", "/missing");
        // yyyy-MM-ddTHH:mm:ss.SSS
        let timestamp = &response.timestamp;
        assert_eq!(timestamp.len(), 23, "unexpected timestamp: {}", timestamp);
        assert_eq!(&timestamp[4..5], "-");
        assert_eq!(&timestamp[10..11], "T");
        assert_eq!(&timestamp[19..20], ".");
    }

    struct RewritingHandler;

    #[async_trait]
    impl GlobalExceptionHandler for RewritingHandler {
        fn name(&self) -> &str {
            "RewritingHandler"
        }

        fn priority(&self) -> i32 {
            10
        }

        fn can_handle(&self, error: &WebError) -> bool {
            matches!(error, WebError::Domain(e) if e.code() == "EMAIL_TAKEN")
        }

        async fn handle_error(
            &self,
            error: &WebError,
            request_path: &str,
        ) -> Option<(StatusCode, ErrorResponse)> {
            Some((
                StatusCode::CONFLICT,
                ErrorResponse::new(error.error_code(), error.public_message(), request_path),
            ))
        }
    }

    struct PanickingHandler;

    #[async_trait]
    impl GlobalExceptionHandler for PanickingHandler {
        fn name(&self) -> &str {
            "PanickingHandler"
        }

        fn priority(&self) -> i32 {
            1
        }

        fn can_handle(&self, _error: &WebError) -> bool {
            true
        }

        async fn handle_error(
            &self,
            _error: &WebError,
            _request_path: &str,
        ) -> Option<(StatusCode, ErrorResponse)> {
            panic!("handler bug");
        }
    }

    #[tokio::test]
    async fn test_custom_handler_takes_precedence() {
        let mut registry = GlobalExceptionHandlerRegistry::new();
        registry.register(RewritingHandler);

        let error = WebError::from(GlintError::new("EMAIL_TAKEN", "Email already registered"));
        let (status, response) = registry.handle_error(&error, "/api/v1/users").await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(response.error_code, "EMAIL_TAKEN");
    }

    #[tokio::test]
    async fn test_panicking_handler_falls_back_to_default_mapping() {
        let mut registry = GlobalExceptionHandlerRegistry::new();
        registry.register(PanickingHandler);

        let (status, response) = registry
            .handle_error(&WebError::NotFound, "/api/v1/unknown")
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(response.error_code, "NOT_FOUND");
    }
}
