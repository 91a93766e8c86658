use crate::field_utils::ensure_required_fields;
use proc_macro::TokenStream;
use quote::quote;
use syn::punctuated::Punctuated;
use syn::spanned::Spanned;
use syn::{
    Item, ItemStruct, LitStr, Result, Token, Type, parse::Parse, parse::ParseStream,
    parse_macro_input,
};

/// #[aggregate] 宏实现
/// - 若缺失则追加字段：`root: AggregateRoot<Event>`，并置于字段最前
/// - 自动实现 `Entity`（id/version）与 `Aggregate`（TYPE/Event/root/root_mut）
pub(crate) fn expand(attr: TokenStream, item: TokenStream) -> TokenStream {
    let cfg = parse_macro_input!(attr as AggregateAttrConfig);
    let input = parse_macro_input!(item as Item);

    let mut st = match input {
        Item::Struct(s) => s,
        other => {
            return syn::Error::new(other.span(), "#[aggregate] only on struct")
                .to_compile_error()
                .into();
        }
    };

    let Some(event_ty) = cfg.event_ty else {
        return syn::Error::new(
            st.ident.span(),
            "#[aggregate] requires an event type, e.g. #[aggregate(event = OrderEvent)]",
        )
        .to_compile_error()
        .into();
    };

    // 仅支持具名字段结构体
    let fields_named = match &mut st.fields {
        syn::Fields::Named(f) => f,
        _ => {
            return syn::Error::new(st.span(), "only supports named-field struct")
                .to_compile_error()
                .into();
        }
    };

    let root_ty: Type =
        syn::parse_quote! { ::mediator_domain::aggregate_root::AggregateRoot<#event_ty> };
    ensure_required_fields(fields_named, &[("root", &root_ty)], true);

    let out_struct = ItemStruct { ..st };

    let ident = &out_struct.ident;
    let type_name = cfg
        .name
        .unwrap_or_else(|| LitStr::new(&ident.to_string(), ident.span()));
    let generics = out_struct.generics.clone();
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let expanded = quote! {
        #out_struct

        impl #impl_generics ::mediator_domain::entity::Entity for #ident #ty_generics #where_clause {
            fn id(&self) -> &str { self.root.id() }

            fn version(&self) -> ::mediator_domain::value_object::Version { self.root.version() }
        }

        impl #impl_generics ::mediator_domain::aggregate::Aggregate for #ident #ty_generics #where_clause {
            const TYPE: &'static str = #type_name;

            type Event = #event_ty;

            fn root(&self) -> &::mediator_domain::aggregate_root::AggregateRoot<#event_ty> {
                &self.root
            }

            fn root_mut(&mut self) -> &mut ::mediator_domain::aggregate_root::AggregateRoot<#event_ty> {
                &mut self.root
            }
        }
    };

    TokenStream::from(expanded)
}

// -------- parsing --------

struct AggregateAttrConfig {
    event_ty: Option<Type>,
    name: Option<LitStr>,
}

impl Parse for AggregateAttrConfig {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut event_ty: Option<Type> = None;
        let mut name: Option<LitStr> = None;

        if input.is_empty() {
            return Ok(Self { event_ty, name });
        }

        let elems: Punctuated<AggregateAttrElem, Token![,]> =
            Punctuated::<AggregateAttrElem, Token![,]>::parse_terminated(input)?;

        for elem in elems.into_iter() {
            match elem {
                AggregateAttrElem::Event(ty) => {
                    if event_ty.is_some() {
                        return Err(syn::Error::new(
                            ty.span(),
                            "duplicate key 'event' in attribute",
                        ));
                    }
                    event_ty = Some(*ty);
                }
                AggregateAttrElem::Name(lit) => {
                    if name.is_some() {
                        return Err(syn::Error::new(
                            lit.span(),
                            "duplicate key 'name' in attribute",
                        ));
                    }
                    name = Some(lit);
                }
            }
        }

        Ok(Self { event_ty, name })
    }
}

enum AggregateAttrElem {
    Event(Box<Type>),
    Name(LitStr),
}

impl Parse for AggregateAttrElem {
    fn parse(input: ParseStream) -> Result<Self> {
        let key: syn::Ident = input.parse()?;
        let _eq: Token![=] = input.parse()?;
        if key == "event" {
            let ty: Type = input.parse()?;
            Ok(AggregateAttrElem::Event(Box::new(ty)))
        } else if key == "name" {
            let lit: LitStr = input.parse()?;
            Ok(AggregateAttrElem::Name(lit))
        } else {
            Err(syn::Error::new(
                key.span(),
                "unknown key in attribute; expected 'event' or 'name'",
            ))
        }
    }
}
