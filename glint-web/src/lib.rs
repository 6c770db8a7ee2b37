//! # Glint Web
//!
//! Spring Boot 风格的 Rust Web 框架，基于 Axum 构建
//!
//! ## 核心特性
//!
//! - **注解驱动** - 使用宏实现 @Controller、@Service、@ErrorCode 等
//! - **全局异常处理** - 统一的错误分类与标准错误响应
//! - **自动装配** - 控制器、服务、异常处理器基于 inventory 自动发现
//! - **类型安全** - 基于 Axum 的类型安全提取器
//! - **分层配置** - TOML 配置文件 + 环境变量覆盖

pub mod application;
pub mod constants;
pub mod controller;
pub mod env;
pub mod error;
pub mod error_code;
pub mod exception_handler;
pub mod exception_handler_registry;
pub mod extractors;
pub mod logging;
pub mod middleware;
pub mod server;
pub mod service;

// 宏展开代码依赖的第三方 crate，统一从本 crate 再导出
pub use async_trait::async_trait;
pub use axum;
pub use inventory;

pub mod prelude {
    //! 预导入模块

    pub use crate::application::{ApplicationError, ApplicationResult, GlintApplication};
    pub use crate::controller::{
        get_all_controllers, ControllerRegistration, ResponseEntity, RouteInfo,
    };
    pub use crate::env::{ConfigValue, Environment};
    pub use crate::error::GlintError;
    pub use crate::error_code::ErrorCodeRegistration;
    pub use crate::exception_handler::{
        ErrorResponse, GlobalExceptionHandler, GlobalExceptionHandlerRegistry, WebError,
    };
    pub use crate::exception_handler_registry::ExceptionHandlerRegistration;
    pub use crate::extractors::{PathVariable, RequestBody, RequestParam, ValidatedRequestBody};
    pub use crate::logging::{LogFormat, LogLevel, LoggingConfig};
    pub use crate::server::{GlintWebServer, ServerProperties};
    pub use crate::service::ServiceRegistration;

    pub use crate::async_trait;

    pub use axum;
    pub use axum::extract::{Json, Path, Query, State};
    pub use axum::http::StatusCode;
    pub use axum::response::{IntoResponse, Response};
    pub use axum::routing::{delete, get, patch, post, put};
    pub use axum::Router;
}
