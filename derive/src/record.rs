use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Field, Fields};

use crate::attr::field_tag;
use crate::kind::{classify_field, FieldKind};

// derive_record
pub fn derive_record(input: TokenStream) -> TokenStream {
    match expand(input) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn expand(input: TokenStream) -> Result<TokenStream, Error> {
    let input: DeriveInput = syn::parse2(input)?;
    let ident = &input.ident;
    let type_name = ident.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            other => {
                return Err(Error::new_spanned(
                    other,
                    "CsvRecord can only be derived for structs with named fields",
                ))
            }
        },
        _ => {
            return Err(Error::new_spanned(
                ident,
                "CsvRecord can only be derived for structs with named fields",
            ))
        }
    };

    let descriptors = fields
        .iter()
        .map(field_descriptor)
        .collect::<Result<Vec<_>, Error>>()?;

    Ok(quote! {
        impl #impl_generics ::csvtag::Record for #ident #ty_generics #where_clause {
            fn descriptor() -> ::csvtag::TypeDescriptor<Self> {
                ::csvtag::TypeDescriptor::handle_to_struct(
                    #type_name,
                    ::std::vec![#(#descriptors),*],
                )
            }
        }
    })
}

fn field_descriptor(field: &Field) -> Result<TokenStream, Error> {
    let field_ident = field
        .ident
        .as_ref()
        .ok_or_else(|| Error::new_spanned(field, "expected a named field"))?;
    let name = field_ident.to_string();
    let name = name.strip_prefix("r#").unwrap_or(&name);
    let tag = field_tag(&field.attrs)?;

    let tokens = match classify_field(&field.ty) {
        FieldKind::Text => quote! {
            ::csvtag::FieldDescriptor::text(
                #name,
                #tag,
                |record: &mut Self, value: ::std::string::String| record.#field_ident = value,
            )
        },
        kind => {
            let kind = kind.to_tokens();
            quote! {
                ::csvtag::FieldDescriptor::untyped(#name, #kind, #tag)
            }
        }
    };
    Ok(tokens)
}
