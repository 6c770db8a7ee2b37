//! 用户模块错误码
//!
//! `#[error_code]` 声明的错误码会进入全局错误码注册表，
//! 全局异常处理器据此决定对应的 HTTP 状态码

use glint_web::prelude::GlintError;
use glint_web_macros::error_code;

#[error_code(code = "USER_NOT_FOUND", message = "User not found", status = 404, category = "USER")]
pub struct UserNotFound;

#[error_code(code = "EMAIL_TAKEN", message = "Email is already in use", status = 409, category = "USER")]
pub struct EmailTaken;

#[error_code(code = "INVALID_USER_ID", message = "Invalid user ID", status = 400, category = "USER")]
pub struct InvalidUserId;

pub fn user_not_found(id: u64) -> GlintError {
    GlintError::new(UserNotFound::CODE, format!("User with ID {} not found", id)).context("userId", id)
}

pub fn email_taken(email: &str) -> GlintError {
    GlintError::new(EmailTaken::CODE, format!("Email '{}' is already in use", email))
        .context("email", email)
}

pub fn invalid_user_id(raw: i64) -> GlintError {
    GlintError::new(InvalidUserId::CODE, format!("Invalid user ID: {}", raw)).context("userId", raw)
}
