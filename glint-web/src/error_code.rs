//! 错误码注册表
//!
//! 使用 inventory 在编译期收集 `#[error_code]` 声明的错误码元数据，
//! 作为错误码到 HTTP 状态码映射的唯一事实来源：
//! 全局异常处理器在映射领域错误时会查询本注册表，
//! 未注册的错误码回退到默认的 400
//!
//! 注册表同时可供文档与工具链枚举应用的全部错误码

use axum::http::StatusCode;

/// 错误码注册信息
///
/// 通常由 `#[error_code]` 宏提交，一条记录描述一类失败：
/// `(错误码, 信息模板, HTTP 状态码, 分类)`
pub struct ErrorCodeRegistration {
    /// 稳定的错误码标识
    pub code: &'static str,

    /// 信息模板，支持 `{0}`、`{1}` 形式的占位符（仅用于文档）
    pub message: &'static str,

    /// 该错误对应的 HTTP 状态码
    pub http_status: u16,

    /// 错误分类，用于分组展示
    pub category: &'static str,
}

inventory::collect!(ErrorCodeRegistration);

/// 遍历所有注册的错误码
pub fn all_error_codes() -> impl Iterator<Item = &'static ErrorCodeRegistration> {
    inventory::iter::<ErrorCodeRegistration>()
}

/// 按错误码查找注册信息
///
/// 同一错误码重复注册时取首个匹配
pub fn lookup(code: &str) -> Option<&'static ErrorCodeRegistration> {
    all_error_codes().find(|registration| registration.code == code)
}

/// 查询错误码对应的 HTTP 状态码
///
/// 未注册或状态码非法时返回 `None`，由调用方决定默认值
pub fn status_for(code: &str) -> Option<StatusCode> {
    lookup(code).and_then(|registration| StatusCode::from_u16(registration.http_status).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    inventory::submit! {
        ErrorCodeRegistration {
            code: "TEST_USER_NOT_FOUND",
            message: "User with ID {0} not found",
            http_status: 404,
            category: "USER",
        }
    }

    inventory::submit! {
        ErrorCodeRegistration {
            code: "TEST_BROKEN_STATUS",
            message: "Broken",
            http_status: 1,
            category: "GENERAL",
        }
    }

    #[test]
    fn test_lookup_registered_code() {
        let registration = lookup("TEST_USER_NOT_FOUND").unwrap();
        assert_eq!(registration.http_status, 404);
        assert_eq!(registration.category, "USER");
        assert_eq!(registration.message, "User with ID {0} not found");
    }

    #[test]
    fn test_lookup_unknown_code() {
        assert!(lookup("NO_SUCH_CODE").is_none());
    }

    #[test]
    fn test_status_for_registered_code() {
        assert_eq!(status_for("TEST_USER_NOT_FOUND"), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn test_status_for_invalid_status_falls_back_to_none() {
        assert_eq!(status_for("TEST_BROKEN_STATUS"), None);
        assert_eq!(status_for("NO_SUCH_CODE"), None);
    }
}
