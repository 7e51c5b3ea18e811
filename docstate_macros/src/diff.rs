use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields};

pub fn derive_diff(input: TokenStream) -> TokenStream {
    let input = syn::parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return syn::Error::new_spanned(
                    name,
                    "Diff derive only supports structs with named fields",
                )
                .to_compile_error()
                .into()
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "Diff derive only supports structs")
                .to_compile_error()
                .into()
        }
    };

    // Bookkeeping fields opt out with #[diff(skip)]; transient ones with #[serde(skip)]
    let compared: Vec<_> = fields
        .iter()
        .filter(|field| !has_skip(&field.attrs, "diff") && !has_skip(&field.attrs, "serde"))
        .filter_map(|field| field.ident.clone())
        .collect();

    let field_names: Vec<String> = compared.iter().map(|ident| ident.to_string()).collect();

    let comparisons = compared.iter().zip(field_names.iter()).map(|(ident, label)| {
        quote! {
            if self.#ident != other.#ident {
                changes.record(#label, &self.#ident, &other.#ident)?;
            }
        }
    });

    let expanded = quote! {
        impl ::docstate::Diff for #name {
            const FIELDS: &'static [&'static str] = &[#(#field_names),*];

            fn diff(&self, other: &Self) -> ::std::result::Result<::docstate::ChangeSet, ::docstate::DiffError> {
                let mut changes = ::docstate::ChangeSet::new();
                #(#comparisons)*
                Ok(changes)
            }
        }
    };

    TokenStream::from(expanded)
}

fn has_skip(attrs: &[syn::Attribute], namespace: &str) -> bool {
    for attr in attrs {
        if !attr.path().is_ident(namespace) {
            continue;
        }

        let mut found_skip = false;
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("skip") {
                found_skip = true;
            } else if meta.input.peek(syn::Token![=]) {
                // consume values like `rename = "_id"` so parsing continues
                let _: syn::Expr = meta.value()?.parse()?;
            }
            Ok(())
        });

        if found_skip {
            return true;
        }
    }
    false
}
