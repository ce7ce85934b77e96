//! Rendering passes.
//!
//! Every pass builds a token tree with `quote!`, parses it back into a
//! `syn::File` and pretty-prints it, so a malformed tree surfaces as a
//! [`Error::Render`] naming the pass instead of as broken output.

mod client;
mod footer;
mod header;
mod implementation;
mod registration;
mod unmarshal;

pub use client::render_client;
pub use footer::render_footer;
pub use header::render_header;
pub use implementation::render_implementation;
pub use registration::render_registration;
pub use unmarshal::render_unmarshalers;

use heck::{ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, ToTokens};

use crate::context::GenerationContext;
use crate::error::{Error, Pass, Result};
use crate::model::{Binding, FileDescriptor, Method, Service, TypeRef};
use crate::names;

pub(crate) fn pretty(tokens: TokenStream, pass: Pass) -> Result<String> {
    let file: syn::File =
        syn::parse2(tokens).map_err(|source| Error::Render { pass, source })?;
    Ok(prettyplease::unparse(&file))
}

/// Path generated code uses to reach the runtime crate.
pub(crate) fn runtime_path(ctx: &GenerationContext) -> Result<TokenStream> {
    parse_path(&ctx.runtime_crate)
}

pub(crate) fn parse_path(path: &str) -> Result<TokenStream> {
    syn::parse_str::<syn::Path>(path)
        .map(|p| p.into_token_stream())
        .map_err(|source| Error::InvalidPath {
            path: path.to_string(),
            source,
        })
}

pub(crate) fn parse_type(ty: &str, pass: Pass) -> Result<TokenStream> {
    syn::parse_str::<syn::Type>(ty)
        .map(|t| t.into_token_stream())
        .map_err(|source| Error::Render { pass, source })
}

/// Type of a message as seen from the generated descriptor file, which is
/// included inside the prost module of the file's package.
pub(crate) fn message_type(file: &FileDescriptor, ty: &TypeRef, pass: Pass) -> Result<TokenStream> {
    parse_type(&names::rust_type_path(ty, &file.package, None), pass)
}

/// Names tonic-build gives the server side of a service.
pub(crate) struct ServerNames {
    pub module: Ident,
    pub trait_name: Ident,
    pub server: Ident,
}

impl ServerNames {
    pub fn new(service: &Service) -> Self {
        let trait_name = format_ident!("{}", service.name.to_upper_camel_case());
        Self {
            module: format_ident!("{}_server", service.name.to_snake_case()),
            server: format_ident!("{}Server", trait_name),
            trait_name,
        }
    }
}

/// Symbol stems of one binding.
pub(crate) struct BindingSymbols {
    pub pattern: Ident,
    pub builder: Ident,
    pub bound_params: Ident,
    pub unmarshaler: Ident,
    pub client_request: Ident,
}

impl BindingSymbols {
    pub fn new(service: &Service, method: &Method, binding: &Binding) -> Self {
        let key = names::symbol_key(&service.name, &method.name, binding.index);
        let shouty = key.to_shouty_snake_case();
        Self {
            pattern: format_ident!("PATTERN_{}", shouty),
            builder: format_ident!("pattern_{}_builder", key),
            bound_params: format_ident!("UNMARSHALER_{}_BOUND_PARAMS", shouty),
            unmarshaler: format_ident!("unmarshaler_{}", key),
            client_request: format_ident!("client_{}_request", key),
        }
    }
}

/// Name of the embedded documentation static for a file.
pub(crate) fn swagger_def_ident(file: &FileDescriptor) -> Ident {
    format_ident!(
        "SWAGGER_DEF_{}",
        names::var_name(&file.name).to_shouty_snake_case()
    )
}

/// Iterate `(method, binding)` pairs of a service in declaration order.
pub(crate) fn bindings(service: &Service) -> impl Iterator<Item = (&Method, &Binding)> {
    service
        .methods
        .iter()
        .flat_map(|m| m.bindings.iter().map(move |b| (m, b)))
}
