//! Controller 宏实现

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

use crate::utils;

/// Controller 派生宏实现
///
/// 提取 `#[route]`、`#[version]`、`#[disable_request_logging]` 属性，
/// 生成提交到全局控制器注册表的代码。路由注册函数本身由
/// `#[controller]` 实现块生成
pub fn derive_controller_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let base_path = utils::extract_string_attr(&input.attrs, "route").unwrap_or_default();
    let version = utils::extract_string_attr(&input.attrs, "version").unwrap_or_default();
    let log_requests = !utils::has_marker_attr(&input.attrs, "disable_request_logging");

    let expanded = quote! {
        impl #name {
            pub fn __base_path() -> &'static str {
                #base_path
            }
        }

        ::glint_web::inventory::submit! {
            ::glint_web::controller::ControllerRegistration {
                type_name: stringify!(#name),
                base_path: #base_path,
                version: #version,
                log_requests: #log_requests,
                register: #name::__register_routes,
                get_route_list: #name::__get_routes,
            }
        }
    };

    TokenStream::from(expanded)
}
