//! 中间件模块
//!
//! 提供请求日志、链路追踪标识和全局异常处理中间件。
//! 全局异常处理中间件包裹所有下游阶段，把任何传播上来的失败转换为标准错误响应

use axum::{
    extract::Request,
    http::Uri,
    middleware::Next,
    response::{IntoResponse, Response},
    Extension, Json,
};
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;
use std::{sync::Arc, time::Instant};

use crate::exception_handler::{GlobalExceptionHandlerRegistry, WebError};

/// 链路追踪标识的请求/响应头
pub const TRACE_ID_HEADER: &str = "X-Trace-Id";

/// 请求日志中间件
pub async fn request_logging(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let start = Instant::now();

    let response = next.run(req).await;

    let elapsed = start.elapsed();
    let status = response.status();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %status.as_u16(),
        elapsed = ?elapsed,
        "Request completed"
    );

    response
}

/// 链路追踪中间件
///
/// 为每个请求生成 UUID 形式的 traceId，写入请求和响应头；
/// 全局异常处理中间件会把它带进错误响应体
pub async fn trace_id(mut req: Request, next: Next) -> Response {
    let trace_id = uuid::Uuid::new_v4().to_string();

    if let Ok(value) = trace_id.parse() {
        req.headers_mut().insert(TRACE_ID_HEADER, value);
    }

    let mut response = next.run(req).await;

    if let Ok(value) = trace_id.parse() {
        response.headers_mut().insert(TRACE_ID_HEADER, value);
    }

    response
}

/// 全局异常处理中间件
///
/// 1. 捕获下游 panic，映射为 `WebError::Internal`
/// 2. 检出响应 Extension 中的 `WebError`，用真实请求路径和 traceId 重新映射
///
/// 单个请求内的顺序保证：记录日志先于构造响应，构造响应先于序列化
pub async fn global_exception_handler(
    uri: Uri,
    Extension(registry): Extension<Arc<GlobalExceptionHandlerRegistry>>,
    req: Request,
    next: Next,
) -> Response {
    let path = uri.path().to_string();
    let trace_id = req
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let response = match AssertUnwindSafe(next.run(req)).catch_unwind().await {
        Ok(response) => response,
        Err(panic) => {
            let panic_message = if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else if let Some(s) = panic.downcast_ref::<&str>() {
                s.to_string()
            } else {
                "Unknown panic occurred".to_string()
            };

            tracing::error!(path = %path, error = %panic_message, "Handler panicked");

            let web_error = WebError::internal(panic_message);
            return render_error(&registry, &web_error, &path, trace_id).await;
        }
    };

    // WebError 直接作为 handler 返回值时，其 IntoResponse 实现会把自身
    // 存入 Extension，此处用真实路径重新映射
    if let Some(web_error) = response.extensions().get::<Arc<WebError>>().cloned() {
        return render_error(&registry, web_error.as_ref(), &path, trace_id).await;
    }

    response
}

async fn render_error(
    registry: &GlobalExceptionHandlerRegistry,
    error: &WebError,
    path: &str,
    trace_id: Option<String>,
) -> Response {
    let (status, mut body) = registry.handle_error(error, path).await;
    if let Some(id) = trace_id {
        body = body.with_trace_id(id);
    }
    (status, Json(body)).into_response()
}

/// 路由未匹配时的兜底 handler
///
/// 由应用装配阶段注册为 Router fallback，保证 404 也返回标准错误响应
pub async fn fallback_not_found() -> WebError {
    WebError::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GlintError;
    use crate::exception_handler::ErrorResponse;
    use crate::extractors::PathVariable;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::Router;
    use tower::util::ServiceExt;

    /// 按应用装配阶段的层叠顺序搭建测试路由
    fn test_app() -> Router {
        let registry = Arc::new(GlobalExceptionHandlerRegistry::new());

        Router::new()
            .route(
                "/api/v1/users/:id",
                get(|PathVariable(id): PathVariable<i64>| async move {
                    if id <= 0 {
                        return Err(WebError::from(
                            GlintError::new("INVALID_USER_ID", format!("Invalid user ID: {}", id))
                                .context("userId", id),
                        ));
                    }
                    Ok(Json(serde_json::json!({ "id": id })))
                }),
            )
            .route(
                "/boom",
                get(|| async {
                    if std::env::var("GLINT_NEVER_SET").is_err() {
                        panic!("secret kaboom detail");
                    }
                    StatusCode::OK
                }),
            )
            .fallback(fallback_not_found)
            .layer(axum::middleware::from_fn(global_exception_handler))
            .layer(Extension(registry))
            .layer(axum::middleware::from_fn(trace_id))
    }

    async fn send(app: Router, uri: &str) -> (StatusCode, ErrorResponse) {
        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri(uri)
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        (status, parsed)
    }

    #[tokio::test]
    async fn test_domain_error_carries_real_request_path() {
        let (status, response) = send(test_app(), "/api/v1/users/-1").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response.error_code, "INVALID_USER_ID");
        assert_eq!(response.message, "Invalid user ID: -1");
        assert_eq!(response.path, "/api/v1/users/-1");
    }

    #[tokio::test]
    async fn test_unmatched_route_returns_structured_404() {
        let (status, response) = send(test_app(), "/api/v1/unknown").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(response.error_code, "NOT_FOUND");
        assert_eq!(response.message, "Resource not found");
        assert_eq!(response.path, "/api/v1/unknown");
    }

    #[tokio::test]
    async fn test_panic_is_sanitized_to_internal_error() {
        let (status, response) = send(test_app(), "/boom").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.error_code, "INTERNAL_ERROR");
        assert_eq!(response.message, "An internal error occurred");
        assert!(!response.message.contains("kaboom"));
    }

    #[tokio::test]
    async fn test_trace_id_is_propagated_into_error_body_and_header() {
        let response = test_app()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/v1/unknown")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let header_id = response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .expect("trace id header missing");

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(parsed.trace_id.as_deref(), Some(header_id.as_str()));
    }

    #[tokio::test]
    async fn test_successful_responses_pass_through_untouched() {
        let response = test_app()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/v1/users/7")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed["id"], 7);
    }
}
