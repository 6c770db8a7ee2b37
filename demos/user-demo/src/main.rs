//! 用户管理演示应用
//!
//! 演示注解驱动的控制器、服务、错误码与全局异常处理：
//!
//! ```bash
//! cargo run -p user-demo
//! curl http://localhost:8080/api/v1/users
//! curl http://localhost:8080/api/v1/users/999   # 404 USER_NOT_FOUND
//! curl http://localhost:8080/api/v1/users/-1    # 400 INVALID_USER_ID
//! ```

mod controller;
mod error;
mod handlers;
mod model;
mod repository;
mod service;

use glint_web::prelude::*;

#[tokio::main]
async fn main() -> ApplicationResult<()> {
    println!("📋 Endpoints:");
    println!("  GET    /api/v1/users");
    println!("  GET    /api/v1/users/:id");
    println!("  POST   /api/v1/users");
    println!("  PUT    /api/v1/users/:id");
    println!("  DELETE /api/v1/users/:id");

    GlintApplication::new("user-demo")
        .config_file("demos/user-demo/application.toml")
        .env_prefix("GLINT_")
        .run()
        .await
}
