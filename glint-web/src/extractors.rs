//! 自定义提取器
//!
//! 对 Axum 原生提取器的语义化封装，解析失败统一转换为 `WebError`，
//! 由全局异常处理器映射为标准错误响应

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::exception_handler::WebError;

/// PathVariable 提取器 - 类似 Spring Boot 的 @PathVariable
///
/// 从路径参数中提取值，解析失败归入非法参数
///
/// ```ignore
/// #[get_mapping("/:id")]
/// async fn get_user(&self, PathVariable(id): PathVariable<u64>) -> impl IntoResponse {
///     ResponseEntity::ok(id)
/// }
/// ```
pub struct PathVariable<T>(pub T);

impl<T> PathVariable<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

#[async_trait]
impl<S, T> FromRequestParts<S> for PathVariable<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| WebError::invalid_argument(format!("Invalid path parameter: {}", e)))?;

        Ok(PathVariable(value))
    }
}

/// RequestParam 提取器 - 类似 Spring Boot 的 @RequestParam
///
/// 从 Query 参数反序列化对象，解析失败归入非法参数
pub struct RequestParam<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for RequestParam<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let axum::extract::Query(value) =
            axum::extract::Query::<T>::from_request_parts(parts, state)
                .await
                .map_err(|e| {
                    WebError::invalid_argument(format!("Invalid query parameter: {}", e))
                })?;

        Ok(RequestParam(value))
    }
}

/// RequestBody 提取器 - 类似 Spring Boot 的 @RequestBody
///
/// 从 JSON 请求体反序列化对象（不验证）；需要验证请使用 [`ValidatedRequestBody`]
pub struct RequestBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for RequestBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::debug!(error = %e, "JSON parse error");
            WebError::invalid_argument(format!("Invalid request body: {}", e))
        })?;

        Ok(RequestBody(value))
    }
}

/// ValidatedRequestBody 提取器 - 类似 Spring Boot 的 @Valid @RequestBody
///
/// 反序列化后执行 `validator` 验证，失败时返回字段级的验证错误，
/// 每个失败字段在响应上下文中恰好一条
///
/// ```ignore
/// #[derive(Deserialize, Validate)]
/// struct CreateUserRequest {
///     #[validate(length(min = 2, message = "name is too short"))]
///     name: String,
///     #[validate(email(message = "invalid email"))]
///     email: String,
/// }
///
/// #[post_mapping("")]
/// async fn create_user(
///     &self,
///     ValidatedRequestBody(request): ValidatedRequestBody<CreateUserRequest>,
/// ) -> impl IntoResponse {
///     ResponseEntity::created(request)
/// }
/// ```
pub struct ValidatedRequestBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedRequestBody<T>
where
    T: DeserializeOwned + validator::Validate,
    S: Send + Sync,
{
    type Rejection = WebError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            tracing::debug!(error = %e, "JSON parse error");
            WebError::invalid_argument(format!("Invalid request body: {}", e))
        })?;

        value.validate().map_err(|e| {
            tracing::debug!(error = ?e, "Validation error");
            WebError::from(e)
        })?;

        Ok(ValidatedRequestBody(value))
    }
}
