//! Glint Web Macros
//!
//! 提供 Web 相关的过程宏，类似 Spring MVC 的注解

mod controller;
mod error_code;
mod exception_handler;
mod route;
mod service;
mod utils;

use proc_macro::TokenStream;

/// Controller 派生宏
///
/// 将结构体标记为控制器并提交到全局注册表，应用启动时自动注册路由。
/// 路由方法由 `#[controller]` 实现块提供
///
/// # 示例
///
/// ```ignore
/// #[derive(Controller, Default)]
/// #[route("/api/v1/users")]
/// #[version("v1")]
/// struct UserController {
///     service: UserService,
/// }
/// ```
#[proc_macro_derive(Controller, attributes(route, version, disable_request_logging))]
pub fn derive_controller(input: TokenStream) -> TokenStream {
    controller::derive_controller_impl(input)
}

/// 处理控制器实现块，提取路由方法
///
/// # 示例
///
/// ```ignore
/// #[controller]
/// impl UserController {
///     #[get_mapping("/:id")]
///     async fn get_user(&self, PathVariable(id): PathVariable<u64>) -> impl IntoResponse {
///         // ...
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn controller(attr: TokenStream, item: TokenStream) -> TokenStream {
    route::controller_impl(attr, item)
}

/// GET 路由标记，由 `#[controller]` 读取
#[proc_macro_attribute]
pub fn get_mapping(attr: TokenStream, item: TokenStream) -> TokenStream {
    route::route_mapping_impl("get", attr, item)
}

/// POST 路由标记，由 `#[controller]` 读取
#[proc_macro_attribute]
pub fn post_mapping(attr: TokenStream, item: TokenStream) -> TokenStream {
    route::route_mapping_impl("post", attr, item)
}

/// PUT 路由标记，由 `#[controller]` 读取
#[proc_macro_attribute]
pub fn put_mapping(attr: TokenStream, item: TokenStream) -> TokenStream {
    route::route_mapping_impl("put", attr, item)
}

/// DELETE 路由标记，由 `#[controller]` 读取
#[proc_macro_attribute]
pub fn delete_mapping(attr: TokenStream, item: TokenStream) -> TokenStream {
    route::route_mapping_impl("delete", attr, item)
}

/// PATCH 路由标记，由 `#[controller]` 读取
#[proc_macro_attribute]
pub fn patch_mapping(attr: TokenStream, item: TokenStream) -> TokenStream {
    route::route_mapping_impl("patch", attr, item)
}

/// 任意方法路由标记，由 `#[controller]` 读取
#[proc_macro_attribute]
pub fn request_mapping(attr: TokenStream, item: TokenStream) -> TokenStream {
    route::route_mapping_impl("any", attr, item)
}

/// ExceptionHandler 派生宏
///
/// 自动生成 inventory 注册代码，将异常处理器提交到全局注册表。
/// 结构体需要实现 `GlobalExceptionHandler` 与 `Default`
///
/// # 示例
///
/// ```ignore
/// #[derive(ExceptionHandler, Default)]
/// struct AuditExceptionHandler;
///
/// #[async_trait]
/// impl GlobalExceptionHandler for AuditExceptionHandler {
///     fn name(&self) -> &str { "AuditExceptionHandler" }
///     fn priority(&self) -> i32 { 10 }
///     // ...
/// }
/// ```
#[proc_macro_derive(ExceptionHandler)]
pub fn derive_exception_handler(input: TokenStream) -> TokenStream {
    exception_handler::derive_exception_handler(input)
}

/// Service 注解
///
/// 声明服务组件，提交逻辑名称与只读提示到全局注册表
///
/// # 示例
///
/// ```ignore
/// #[service(name = "userService", read_only = false)]
/// #[derive(Default)]
/// struct UserService {
///     repository: UserRepository,
/// }
/// ```
#[proc_macro_attribute]
pub fn service(attr: TokenStream, item: TokenStream) -> TokenStream {
    service::service_impl(attr, item)
}

/// ErrorCode 注解
///
/// 为标记类型声明错误码元数据并提交到全局错误码注册表，
/// 全局异常处理器据此决定领域错误的 HTTP 状态码
///
/// # 示例
///
/// ```ignore
/// #[error_code(code = "USER_NOT_FOUND", message = "User not found", status = 404, category = "USER")]
/// struct UserNotFound;
/// ```
#[proc_macro_attribute]
pub fn error_code(attr: TokenStream, item: TokenStream) -> TokenStream {
    error_code::error_code_impl(attr, item)
}
