//! Service 宏实现

use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::{parse_macro_input, Expr, ItemStruct, Lit, Meta, Token};

use crate::utils;

/// service 宏实现
///
/// 解析可选参数 `name = "..."` 与 `read_only = true|false`，
/// 默认逻辑名称由类型名首字母小写推导，默认只读
pub fn service_impl(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr with Punctuated::<Meta, Token![,]>::parse_terminated);
    let input = parse_macro_input!(item as ItemStruct);
    let name = &input.ident;

    let mut bean_name: Option<String> = None;
    let mut read_only = true;

    for meta in &args {
        if let Meta::NameValue(name_value) = meta {
            if name_value.path.is_ident("name") {
                if let Expr::Lit(expr_lit) = &name_value.value {
                    if let Lit::Str(lit) = &expr_lit.lit {
                        bean_name = Some(lit.value());
                    }
                }
            } else if name_value.path.is_ident("read_only") {
                if let Expr::Lit(expr_lit) = &name_value.value {
                    if let Lit::Bool(lit) = &expr_lit.lit {
                        read_only = lit.value();
                    }
                }
            }
        }
    }

    let bean_name = bean_name.unwrap_or_else(|| utils::decapitalize(&name.to_string()));

    let expanded = quote! {
        #input

        ::glint_web::inventory::submit! {
            ::glint_web::service::ServiceRegistration {
                type_name: stringify!(#name),
                name: #bean_name,
                read_only: #read_only,
            }
        }
    };

    TokenStream::from(expanded)
}
