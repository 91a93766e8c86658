use syn::{Field, FieldsNamed, Token, Type, punctuated::Punctuated};

fn field_is(field: &Field, name: &str) -> bool {
    field.ident.as_ref().map(|i| i == name).unwrap_or(false)
}

/// 确保具名字段结构体包含所需字段
/// - required: (字段名, 字段类型) 列表，按给定顺序处理
/// - reposition_existing: 为 true 时把已存在的所需字段也移至最前；
///   为 false 时仅在缺失时追加到最前，保留既有顺序
pub(crate) fn ensure_required_fields(
    fields_named: &mut FieldsNamed,
    required: &[(&str, &Type)],
    reposition_existing: bool,
) {
    let old_named = fields_named.named.clone();
    let mut new_named: Punctuated<Field, Token![,]> = Punctuated::new();

    for (name, ty) in required.iter() {
        match old_named.iter().find(|f| field_is(f, name)) {
            Some(existing) if reposition_existing => new_named.push(existing.clone()),
            Some(_) => {}
            None => {
                let ident = syn::Ident::new(name, proc_macro2::Span::call_site());
                new_named.push(syn::parse_quote! { #ident: #ty });
            }
        }
    }

    for f in old_named.into_iter() {
        let moved = reposition_existing && required.iter().any(|(n, _)| field_is(&f, n));
        if !moved {
            new_named.push(f);
        }
    }

    fields_named.named = new_named;
}
