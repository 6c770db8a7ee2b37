//! 路由相关宏实现

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, FnArg, ImplItem, ImplItemFn, ItemImpl, Type};

use crate::utils;

/// 路由映射标记集合
const MAPPING_ATTRS: &[(&str, &str)] = &[
    ("get_mapping", "get"),
    ("post_mapping", "post"),
    ("put_mapping", "put"),
    ("delete_mapping", "delete"),
    ("patch_mapping", "patch"),
    ("request_mapping", "any"),
];

/// controller 宏实现
///
/// 处理控制器实现块，扫描路由标记方法并生成路由注册代码。
/// 控制器实例在注册时创建一次（要求实现 `Default`），
/// 所有请求共享同一个 `Arc` 实例
///
/// 支持的方法签名：
/// 1. 无参数：`async fn handler(&self) -> impl IntoResponse`
/// 2. 带提取器：`async fn handler(&self, PathVariable(id): PathVariable<u64>, RequestBody(data): RequestBody<User>) -> impl IntoResponse`
pub fn controller_impl(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut input = parse_macro_input!(item as ItemImpl);
    let self_ty = input.self_ty.clone();

    let mut route_registrations = Vec::new();
    let mut route_info_list = Vec::new();

    for item in &mut input.items {
        if let ImplItem::Fn(method) = item {
            if let Some((http_method, path)) = extract_route_info(method) {
                let method_name = &method.sig.ident;

                route_info_list.push((http_method.to_string(), path.clone()));

                let params = extract_method_params(method);
                let param_patterns: Vec<_> = params.iter().map(|p| &p.pattern).collect();
                let param_types: Vec<_> = params.iter().map(|p| &p.ty).collect();

                // 元组结构体模式同时也是合法的构造表达式，
                // 绑定与转发使用同一份 token
                let handler = quote! {
                    {
                        let full_path = ::glint_web::controller::join_paths(
                            #self_ty::__base_path(),
                            #path,
                        );
                        let controller = ::std::sync::Arc::clone(&instance);
                        router = router.route(
                            &full_path,
                            ::glint_web::axum::routing::#http_method(
                                move |#(#param_patterns: #param_types),*| async move {
                                    use ::glint_web::axum::response::IntoResponse;
                                    controller.#method_name(#(#param_patterns),*).await.into_response()
                                }
                            ),
                        );
                    }
                };
                route_registrations.push(handler);

                // 移除路由标记属性，避免在展开后的实现块中重复处理
                strip_mapping_attrs(method);
            }
        }
    }

    let route_info_tokens: Vec<_> = route_info_list
        .iter()
        .map(|(method, path)| {
            let method = method.to_uppercase();
            quote! { (#method, #path) }
        })
        .collect();

    let expanded = quote! {
        #input

        impl #self_ty {
            /// 注册控制器的所有路由
            pub fn __register_routes(
                mut router: ::glint_web::axum::Router,
            ) -> ::glint_web::axum::Router {
                let instance = ::std::sync::Arc::new(
                    <#self_ty as ::std::default::Default>::default(),
                );
                #(#route_registrations)*
                router
            }

            /// 获取所有路由信息（用于启动日志与冲突排查）
            pub fn __get_routes() -> &'static [(&'static str, &'static str)] {
                &[#(#route_info_tokens),*]
            }
        }
    };

    TokenStream::from(expanded)
}

/// 方法参数信息
struct MethodParam {
    pattern: syn::Pat,
    ty: Type,
}

/// 提取方法的所有参数（跳过 &self）
fn extract_method_params(method: &ImplItemFn) -> Vec<MethodParam> {
    let mut params = Vec::new();

    for arg in &method.sig.inputs {
        match arg {
            FnArg::Receiver(_) => continue,
            FnArg::Typed(pat_type) => {
                params.push(MethodParam {
                    pattern: (*pat_type.pat).clone(),
                    ty: (*pat_type.ty).clone(),
                });
            }
        }
    }

    params
}

/// 从方法中提取路由信息
fn extract_route_info(method: &ImplItemFn) -> Option<(syn::Ident, String)> {
    for attr in &method.attrs {
        if let Some(ident) = attr.path().get_ident() {
            let ident_str = ident.to_string();

            if let Some((_, http_method)) = MAPPING_ATTRS
                .iter()
                .find(|(marker, _)| *marker == ident_str)
            {
                let path = extract_path_from_attr(attr).unwrap_or_else(|| "/".to_string());
                let method_ident = syn::Ident::new(http_method, ident.span());
                return Some((method_ident, path));
            }
        }
    }
    None
}

/// 从属性中提取路径字面量
fn extract_path_from_attr(attr: &Attribute) -> Option<String> {
    utils::extract_string_literal(attr)
}

/// 移除方法上的路由标记属性
fn strip_mapping_attrs(method: &mut ImplItemFn) {
    method.attrs.retain(|attr| {
        attr.path()
            .get_ident()
            .map(|ident| {
                let ident = ident.to_string();
                !MAPPING_ATTRS.iter().any(|(marker, _)| *marker == ident)
            })
            .unwrap_or(true)
    });
}

/// 路由映射宏实现
///
/// 这些宏只是标记，实际的路由注册由 controller 宏完成
pub fn route_mapping_impl(_method: &str, _attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}
