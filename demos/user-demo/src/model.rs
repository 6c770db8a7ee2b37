//! 用户数据模型

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub name: String,
    pub email: String,
}

/// 创建用户请求
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 2, max = 64, message = "name must be 2 to 64 characters"))]
    pub name: String,

    #[validate(email(message = "email must be a valid email address"))]
    pub email: String,
}

/// 更新用户请求，缺省字段保持原值
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[validate(length(min = 2, max = 64, message = "name must be 2 to 64 characters"))]
    pub name: Option<String>,

    #[validate(email(message = "email must be a valid email address"))]
    pub email: Option<String>,
}
