//! ExceptionHandler 宏实现
//!
//! 自动为实现了 GlobalExceptionHandler trait 的结构体生成 inventory 注册代码

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// ExceptionHandler 派生宏实现
pub fn derive_exception_handler(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let name_str = name.to_string();

    let expanded = quote! {
        ::glint_web::inventory::submit! {
            ::glint_web::exception_handler_registry::ExceptionHandlerRegistration::new(
                #name_str,
                || Box::new(<#name as ::std::default::Default>::default())
                    as Box<dyn ::glint_web::exception_handler::GlobalExceptionHandler>
            )
        }
    };

    TokenStream::from(expanded)
}
