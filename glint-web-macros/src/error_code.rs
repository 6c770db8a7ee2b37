//! ErrorCode 宏实现

use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, Expr, ItemStruct, Lit, Meta, Token};

/// error_code 宏实现
///
/// 解析 `code`（必填）、`message`（必填）、`status`（默认 400）、
/// `category`（默认 "GENERAL"），为标记类型生成错误码常量并
/// 提交到全局错误码注册表
pub fn error_code_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr with Punctuated::<Meta, Token![,]>::parse_terminated);
    let input = parse_macro_input!(item as ItemStruct);
    let name = &input.ident;

    let mut code: Option<String> = None;
    let mut message: Option<String> = None;
    let mut status: u16 = 400;
    let mut category = "GENERAL".to_string();

    for meta in &args {
        if let Meta::NameValue(name_value) = meta {
            let value = &name_value.value;
            if name_value.path.is_ident("code") {
                if let Some(lit) = string_value(value) {
                    code = Some(lit);
                }
            } else if name_value.path.is_ident("message") {
                if let Some(lit) = string_value(value) {
                    message = Some(lit);
                }
            } else if name_value.path.is_ident("status") {
                if let Expr::Lit(expr_lit) = value {
                    if let Lit::Int(lit) = &expr_lit.lit {
                        match lit.base10_parse::<u16>() {
                            Ok(parsed) => status = parsed,
                            Err(e) => return e.to_compile_error().into(),
                        }
                    }
                }
            } else if name_value.path.is_ident("category") {
                if let Some(lit) = string_value(value) {
                    category = lit;
                }
            }
        }
    }

    let code = match code {
        Some(code) => code,
        None => {
            return syn::Error::new_spanned(name, "error_code requires a `code = \"...\"` argument")
                .to_compile_error()
                .into();
        }
    };
    let message = match message {
        Some(message) => message,
        None => {
            return syn::Error::new_spanned(
                name,
                "error_code requires a `message = \"...\"` argument",
            )
            .to_compile_error()
            .into();
        }
    };

    let expanded = quote! {
        #input

        impl #name {
            /// 错误码
            pub const CODE: &'static str = #code;

            /// 默认错误消息
            pub const MESSAGE: &'static str = #message;
        }

        ::glint_web::inventory::submit! {
            ::glint_web::error_code::ErrorCodeRegistration {
                code: #code,
                message: #message,
                http_status: #status,
                category: #category,
            }
        }
    };

    TokenStream::from(expanded)
}

fn string_value(expr: &Expr) -> Option<String> {
    if let Expr::Lit(expr_lit) = expr {
        if let Lit::Str(lit) = &expr_lit.lit {
            return Some(lit.value());
        }
    }
    None
}
