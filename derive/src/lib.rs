//! Derive macro for `csvtag::Record`.
//!
//! ```rust,ignore
//! #[derive(Default, CsvRecord)]
//! struct Work {
//!     #[csv("title")]
//!     title: String,
//!     #[csv("-")]
//!     scratch: String,
//!     year: u16,
//! }
//! ```

use proc_macro::TokenStream;

mod attr;
mod kind;
mod record;

#[proc_macro_derive(CsvRecord, attributes(csv))]
pub fn derive_csv_record(input: TokenStream) -> TokenStream {
    record::derive_record(input.into()).into()
}
