//! Web 服务器模块
//!
//! 基于 Axum 的 Web 服务器实现

use axum::Router;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::application::{ApplicationError, ApplicationResult};
use crate::constants::{config_keys, defaults};
use crate::env::Environment;

/// Web 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerProperties {
    /// 服务器监听地址
    pub host: String,

    /// 服务器监听端口
    pub port: u16,

    /// 是否启用 CORS
    pub enable_cors: bool,

    /// 是否启用请求日志
    pub enable_request_logging: bool,
}

impl Default for ServerProperties {
    fn default() -> Self {
        Self {
            host: defaults::SERVER_HOST.to_string(),
            port: defaults::SERVER_PORT,
            enable_cors: false,
            enable_request_logging: true,
        }
    }
}

impl ServerProperties {
    /// 从 Environment 加载配置
    pub fn from_environment(env: &Environment) -> Self {
        Self {
            host: env.get_string_or(config_keys::SERVER_HOST, defaults::SERVER_HOST),
            port: env.get_i64_or(config_keys::SERVER_PORT, defaults::SERVER_PORT as i64) as u16,
            enable_cors: env.get_bool_or(config_keys::SERVER_ENABLE_CORS, false),
            enable_request_logging: env
                .get_bool_or(config_keys::SERVER_ENABLE_REQUEST_LOGGING, true),
        }
    }

    /// 获取服务器地址
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Glint Web 服务器
pub struct GlintWebServer {
    config: ServerProperties,
    router: Router,
}

impl GlintWebServer {
    /// 创建新的 Web 服务器
    pub fn new(config: ServerProperties, router: Router) -> Self {
        Self { config, router }
    }

    /// 启动服务器，直至收到 Ctrl+C 信号
    pub async fn run(self) -> ApplicationResult<()> {
        let addr = self.config.address();
        let app = self.router.into_make_service();

        tracing::info!("🚀 Starting Glint Web Server on {}", addr);

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| ApplicationError::Server(format!("Failed to bind to {}: {}", addr, e)))?;

        tracing::info!("✅ Server listening on http://{}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ApplicationError::Server(format!("Server error: {}", e)))?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
    }
}
