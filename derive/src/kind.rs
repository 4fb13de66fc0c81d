use proc_macro2::TokenStream;
use quote::quote;
use syn::Type;

///
/// FieldKind
///

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Bool,
    Char,
    Integer,
    Float,
    Other,
}

impl FieldKind {
    pub fn to_tokens(self) -> TokenStream {
        match self {
            Self::Text => quote!(::csvtag::Kind::Text),
            Self::Bool => quote!(::csvtag::Kind::Bool),
            Self::Char => quote!(::csvtag::Kind::Char),
            Self::Integer => quote!(::csvtag::Kind::Integer),
            Self::Float => quote!(::csvtag::Kind::Float),
            Self::Other => quote!(::csvtag::Kind::Other),
        }
    }
}

// Only `String` is text. Aliases of it classify as Other.
pub fn classify_field(ty: &Type) -> FieldKind {
    let ty = strip_groups(ty);
    let Type::Path(path) = ty else {
        return FieldKind::Other;
    };
    if path.qself.is_some() {
        return FieldKind::Other;
    }
    let Some(segment) = path.path.segments.last() else {
        return FieldKind::Other;
    };
    if !segment.arguments.is_empty() {
        return FieldKind::Other;
    }

    match segment.ident.to_string().as_str() {
        "String" => FieldKind::Text,
        "bool" => FieldKind::Bool,
        "char" => FieldKind::Char,
        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
        | "u128" | "usize" => FieldKind::Integer,
        "f32" | "f64" => FieldKind::Float,
        _ => FieldKind::Other,
    }
}

fn strip_groups(ty: &Type) -> &Type {
    match ty {
        Type::Group(group) => strip_groups(&group.elem),
        Type::Paren(paren) => strip_groups(&paren.elem),
        _ => ty,
    }
}
