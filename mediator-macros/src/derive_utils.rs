use quote::ToTokens;
use syn::{Attribute, Token, punctuated::Punctuated};

// 归一化 derive 的 key，避免 Serialize/serde::Serialize 重复
fn derive_key(p: &syn::Path) -> String {
    match p.segments.last() {
        Some(last) => last.ident.to_string(),
        None => p.to_token_stream().to_string(),
    }
}

/// 将 `required` 派生与结构体上已有的 derive 合并为单个 `#[derive(...)]`
/// - required 优先且按给定顺序；已有派生去重后追加
/// - 非 derive 属性原样保留在其后
pub(crate) fn apply_derives(attrs: &mut Vec<Attribute>, required: Vec<syn::Path>) {
    let mut retained = Vec::new();
    let mut existing = Vec::new();
    for attr in attrs.drain(..) {
        if !attr.path().is_ident("derive") {
            retained.push(attr);
            continue;
        }
        if let Ok(list) =
            attr.parse_args_with(Punctuated::<syn::Path, Token![,]>::parse_terminated)
        {
            existing.extend(list);
        }
    }

    let mut seen = std::collections::HashSet::<String>::new();
    let merged: Vec<syn::Path> = required
        .into_iter()
        .chain(existing)
        .filter(|p| seen.insert(derive_key(p)))
        .collect();

    attrs.push(syn::parse_quote!(#[derive(#(#merged),*)]));
    attrs.extend(retained);
}
