//! 框架常量

/// 配置键
pub mod config_keys {
    /// 服务器监听地址
    pub const SERVER_HOST: &str = "server.host";

    /// 服务器监听端口
    pub const SERVER_PORT: &str = "server.port";

    /// 是否启用 CORS
    pub const SERVER_ENABLE_CORS: &str = "server.enable_cors";

    /// 是否启用请求日志
    pub const SERVER_ENABLE_REQUEST_LOGGING: &str = "server.enable_request_logging";

    /// 日志级别
    pub const LOGGING_LEVEL: &str = "logging.level";

    /// 日志格式
    pub const LOGGING_FORMAT: &str = "logging.format";
}

/// 默认配置
pub mod defaults {
    /// 默认监听地址
    pub const SERVER_HOST: &str = "0.0.0.0";

    /// 默认监听端口
    pub const SERVER_PORT: u16 = 8080;

    /// 默认配置文件
    pub const CONFIG_FILE: &str = "application.toml";

    /// 默认环境变量前缀
    pub const ENV_PREFIX: &str = "GLINT_";
}
