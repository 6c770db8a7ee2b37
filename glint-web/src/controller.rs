//! 控制器支持
//!
//! 提供类似 Spring MVC 的控制器功能：
//! `ResponseEntity` 响应实体与基于 inventory 的控制器自动注册

use axum::{
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::Serialize;

/// HTTP 响应实体
///
/// 类似 Spring 的 ResponseEntity，允许控制状态码、响应头和响应体
#[derive(Debug)]
pub struct ResponseEntity<T> {
    status: StatusCode,
    headers: HeaderMap,
    body: Option<T>,
}

impl<T> ResponseEntity<T> {
    /// 创建一个新的响应实体
    pub fn new(status: StatusCode, body: T) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Some(body),
        }
    }

    /// 200 OK
    pub fn ok(body: T) -> Self {
        Self::new(StatusCode::OK, body)
    }

    /// 201 Created
    pub fn created(body: T) -> Self {
        Self::new(StatusCode::CREATED, body)
    }

    /// 204 No Content
    pub fn no_content() -> ResponseEntity<()> {
        ResponseEntity {
            status: StatusCode::NO_CONTENT,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// 添加响应头
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// 覆盖状态码
    pub fn status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }
}

impl<T> IntoResponse for ResponseEntity<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        let mut response = match self.body {
            Some(body) => (self.status, Json(body)).into_response(),
            None => self.status.into_response(),
        };

        let headers = response.headers_mut();
        for (name, value) in self.headers {
            if let Some(name) = name {
                headers.insert(name, value);
            }
        }

        response
    }
}

/// 路由信息
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteInfo {
    /// HTTP 方法
    pub method: &'static str,
    /// 完整路径（包含基础路径）
    pub path: String,
}

/// 拼接基础路径与方法路径
///
/// 空路径或 `/` 表示方法挂载在基础路径本身上
pub fn join_paths(base: &str, path: &str) -> String {
    if path.is_empty() || path == "/" {
        if base.is_empty() {
            "/".to_string()
        } else {
            base.to_string()
        }
    } else if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// 控制器注册信息
///
/// 由 `#[derive(Controller)]` 提交，应用启动时自动发现并注册路由
pub struct ControllerRegistration {
    /// 控制器类型名称
    pub type_name: &'static str,

    /// 基础路径
    pub base_path: &'static str,

    /// API 版本（声明式元数据）
    pub version: &'static str,

    /// 是否记录该控制器的请求日志（声明式元数据）
    pub log_requests: bool,

    /// 路由注册函数
    pub register: fn(Router) -> Router,

    /// 路由列表函数（用于启动日志与冲突排查）
    pub get_route_list: fn() -> &'static [(&'static str, &'static str)],
}

impl ControllerRegistration {
    /// 获取所有路由信息
    pub fn get_routes(&self) -> Vec<RouteInfo> {
        (self.get_route_list)()
            .iter()
            .map(|(method, path)| RouteInfo {
                method,
                path: join_paths(self.base_path, path),
            })
            .collect()
    }
}

inventory::collect!(ControllerRegistration);

/// 获取所有注册的控制器
pub fn get_all_controllers() -> impl Iterator<Item = &'static ControllerRegistration> {
    inventory::iter::<ControllerRegistration>()
}
