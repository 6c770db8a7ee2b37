//! 自定义异常处理器

use glint_web::async_trait;
use glint_web::prelude::*;
use glint_web_macros::ExceptionHandler;

/// 审计异常处理器
///
/// 记录所有领域错误用于审计，不改写响应，
/// 返回 `None` 后由默认映射继续处理
#[derive(Debug, Default, ExceptionHandler)]
pub struct AuditExceptionHandler;

#[async_trait]
impl GlobalExceptionHandler for AuditExceptionHandler {
    fn name(&self) -> &str {
        "AuditExceptionHandler"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn can_handle(&self, error: &WebError) -> bool {
        matches!(error, WebError::Domain(_))
    }

    async fn handle_error(
        &self,
        error: &WebError,
        request_path: &str,
    ) -> Option<(StatusCode, ErrorResponse)> {
        tracing::warn!(
            path = request_path,
            code = error.error_code(),
            "Audit: domain error observed"
        );
        None
    }
}
