//! 应用启动模块
//!
//! `GlintApplication` 把配置加载、日志初始化、组件自动发现、
//! 中间件装配和服务器启动串成一条启动流水线，
//! 对使用者只暴露一个构建器

use axum::{Extension, Router};
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::CorsLayer;

use crate::constants::defaults;
use crate::controller::get_all_controllers;
use crate::env::Environment;
use crate::exception_handler_registry::build_exception_handler_registry_from_inventory;
use crate::logging::LoggingConfig;
use crate::middleware;
use crate::server::{GlintWebServer, ServerProperties};
use crate::service::get_all_services;

/// 应用级错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 日志初始化失败
    #[error("Logging initialization failed: {0}")]
    LoggingInitFailed(String),

    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(String),

    /// 服务器错误
    #[error("Server error: {0}")]
    Server(String),

    /// 其他错误
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// 应用级结果
pub type ApplicationResult<T> = Result<T, ApplicationError>;

const BANNER: &str = r#"
   ________    _       __
  / ____/ /   (_)___  / /_
 / / __/ /   / / __ \/ __/
/ /_/ / /___/ / / / / /_
\____/_____/_/_/ /_/\__/
"#;

/// Glint 应用构建器
///
/// ```ignore
/// GlintApplication::new("user-demo")
///     .config_file("application.toml")
///     .run()
///     .await
/// ```
pub struct GlintApplication {
    name: String,
    config_file: String,
    env_prefix: String,
    show_banner: bool,
    logging: Option<LoggingConfig>,
    router: Router,
}

impl GlintApplication {
    /// 创建应用
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            config_file: defaults::CONFIG_FILE.to_string(),
            env_prefix: defaults::ENV_PREFIX.to_string(),
            show_banner: true,
            logging: None,
            router: Router::new(),
        }
    }

    /// 设置配置文件路径（默认 application.toml）
    pub fn config_file(mut self, path: impl Into<String>) -> Self {
        self.config_file = path.into();
        self
    }

    /// 设置环境变量前缀（默认 GLINT_）
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// 是否打印启动横幅
    pub fn banner(mut self, show: bool) -> Self {
        self.show_banner = show;
        self
    }

    /// 覆盖日志配置（默认从 Environment 读取）
    pub fn logging(mut self, config: LoggingConfig) -> Self {
        self.logging = Some(config);
        self
    }

    /// 追加手工路由，与自动注册的控制器路由合并
    pub fn router(mut self, router: Router) -> Self {
        self.router = self.router.merge(router);
        self
    }

    /// 启动应用
    pub async fn run(self) -> ApplicationResult<()> {
        let env = Environment::load(&self.config_file, &self.env_prefix);

        let logging = self
            .logging
            .unwrap_or_else(|| LoggingConfig::from_environment(&env));
        logging.init()?;

        if self.show_banner {
            println!("{}", BANNER);
        }

        tracing::info!("Starting application: {}", self.name);

        for service in get_all_services() {
            tracing::info!(
                "Auto-registered service: {} (name: {}, read_only: {})",
                service.type_name,
                service.name,
                service.read_only
            );
        }

        let registry = Arc::new(build_exception_handler_registry_from_inventory());
        let properties = ServerProperties::from_environment(&env);
        let router = Self::build_router(self.router, &properties, Arc::clone(&registry));

        GlintWebServer::new(properties, router).run().await
    }

    /// 装配路由与中间件
    ///
    /// 层的添加顺序决定执行顺序：后加的层在外。全局异常处理必须
    /// 位于 traceId 层之内，才能从请求头读到 traceId
    fn build_router(
        base: Router,
        properties: &ServerProperties,
        registry: Arc<crate::exception_handler::GlobalExceptionHandlerRegistry>,
    ) -> Router {
        let mut router = base;

        for controller in get_all_controllers() {
            tracing::info!(
                "Auto-registered controller: {} (base path: {})",
                controller.type_name,
                controller.base_path
            );
            for route in controller.get_routes() {
                tracing::info!("  {} {}", route.method, route.path);
            }
            router = (controller.register)(router);
        }

        router = router
            .fallback(middleware::fallback_not_found)
            .layer(axum::middleware::from_fn(
                middleware::global_exception_handler,
            ))
            .layer(Extension(registry))
            .layer(axum::middleware::from_fn(middleware::trace_id));

        if properties.enable_request_logging {
            router = router.layer(axum::middleware::from_fn(middleware::request_logging));
        }

        if properties.enable_cors {
            tracing::info!("CORS enabled (permissive)");
            router = router.layer(CorsLayer::permissive());
        }

        router
    }
}
