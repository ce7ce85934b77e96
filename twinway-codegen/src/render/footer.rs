use proc_macro2::Literal;
use quote::quote;

use crate::error::{Pass, Result};
use crate::model::FileDescriptor;

use super::{pretty, swagger_def_ident};

/// Embed the API description blob as an opaque byte string.
pub fn render_footer(file: &FileDescriptor, blob: &[u8]) -> Result<String> {
    let name = swagger_def_ident(file);
    let bytes = Literal::byte_string(blob);
    pretty(
        quote! {
            pub static #name: &[u8] = #bytes;
        },
        Pass::Footer,
    )
}
