//! 宏辅助工具函数

use syn::{Attribute, Meta};

/// 从属性列表中提取形如 `#[name("value")]` 的字符串值
pub fn extract_string_attr(attrs: &[Attribute], name: &str) -> Option<String> {
    attrs
        .iter()
        .find(|attr| attr.path().is_ident(name))
        .and_then(extract_string_literal)
}

/// 判断属性列表中是否存在形如 `#[name]` 的标记
pub fn has_marker_attr(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

/// 从属性中提取第一个字符串字面量
pub fn extract_string_literal(attr: &Attribute) -> Option<String> {
    if let Meta::List(meta_list) = &attr.meta {
        meta_list
            .tokens
            .clone()
            .into_iter()
            .next()
            .and_then(|token| {
                syn::parse2::<syn::LitStr>(token.into())
                    .ok()
                    .map(|lit| lit.value())
            })
    } else {
        None
    }
}

/// 首字母小写，用于从类型名推导默认 bean 名称
pub fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
