use quote::quote;
use syn::parse::Parse;
use syn::{parse_macro_input, DeriveInput, LitStr, Token};

struct IndexSpec {
    fields: Vec<String>,
    unique: bool,
    sort_order: i32,
    name: Option<String>,
}

pub fn expand_index_model_provider(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let name = &ast.ident;

    let mut specs = vec![];
    for attr in &ast.attrs {
        if !attr.path().is_ident("mongo_index") {
            continue;
        }
        let mut spec = IndexSpec { fields: vec![], unique: false, sort_order: 1, name: None };
        let parsed = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("fields") {
                let content;
                syn::parenthesized!(content in meta.input);
                let lits = content.parse_terminated(<LitStr as Parse>::parse, Token![,])?;
                spec.fields.extend(lits.into_iter().map(|lit| lit.value()));
            } else if meta.path.is_ident("unique") {
                spec.unique = true;
            } else if meta.path.is_ident("order") {
                let lit: LitStr = meta.value()?.parse()?;
                if lit.value().eq_ignore_ascii_case("desc") {
                    spec.sort_order = -1;
                }
            } else if meta.path.is_ident("name") {
                let lit: LitStr = meta.value()?.parse()?;
                spec.name = Some(lit.value());
            } else {
                return Err(meta.error("unsupported mongo_index option"));
            }
            Ok(())
        });
        if let Err(e) = parsed {
            return e.to_compile_error().into();
        }
        if spec.fields.is_empty() {
            return syn::Error::new_spanned(attr, "mongo_index requires fields(..)").to_compile_error().into();
        }
        specs.push(spec);
    }

    let index_exprs = specs.iter().map(|spec| {
        let order = spec.sort_order;
        let fields = &spec.fields;
        let mut options = quote! { ::mongodb::options::IndexOptions::builder() };
        if spec.unique {
            options = quote! { #options.unique(true) };
        }
        if let Some(ref index_name) = spec.name {
            options = quote! { #options.name(#index_name.to_string()) };
        }
        quote! {
            {
                let mut keys = ::mongodb::bson::Document::new();
                #( keys.insert(#fields, #order); )*
                ::mongodb::IndexModel::builder()
                    .keys(keys)
                    .options(#options.build())
                    .build()
            }
        }
    });

    let expanded = quote! {
        impl MongoIndexModelProvider for #name {
            fn index_models() -> Vec<::mongodb::IndexModel> {
                vec![
                    #(#index_exprs),*
                ]
            }
        }
    };

    expanded.into()
}
