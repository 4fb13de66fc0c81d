use syn::{Attribute, Error, LitStr};

pub const ATTR_NAME: &str = "csv";

/// Raw annotation string of a field, empty when it has no `#[csv(...)]`.
pub fn field_tag(attrs: &[Attribute]) -> Result<String, Error> {
    let mut tag: Option<LitStr> = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident(ATTR_NAME)) {
        let lit: LitStr = attr.parse_args().map_err(|_| {
            Error::new_spanned(attr, "expected a string annotation, e.g. #[csv(\"column\")]")
        })?;
        if tag.is_some() {
            return Err(Error::new_spanned(attr, "duplicate #[csv] attribute"));
        }
        tag = Some(lit);
    }

    Ok(tag.map(|lit| lit.value()).unwrap_or_default())
}
