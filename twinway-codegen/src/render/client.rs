use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::context::GenerationContext;
use crate::error::{Pass, Result};
use crate::model::{Binding, Body, FileDescriptor, PathParam, ScalarType};
use crate::names;
use crate::plan;

use super::{bindings, message_type, pretty, runtime_path, BindingSymbols, ServerNames};

/// Request constructors per binding and a typed HTTP client per service.
pub fn render_client(file: &FileDescriptor, ctx: &GenerationContext) -> Result<String> {
    let rt = runtime_path(ctx)?;
    let mut items = Vec::new();

    for service in &file.services {
        for (method, binding) in bindings(service) {
            let symbols = BindingSymbols::new(service, method, binding);
            let request = message_type(file, &method.request_type, Pass::Client)?;
            items.push(render_request(&symbols, binding, &request, &rt));
        }

        if !service.has_bindings() {
            continue;
        }
        let client = format_ident!("{}HttpClient", ServerNames::new(service).trait_name);
        let mut calls = Vec::new();
        for method in service.methods.iter().filter(|m| !m.bindings.is_empty()) {
            let binding = &method.bindings[0];
            let symbols = BindingSymbols::new(service, method, binding);
            let request_fn = &symbols.client_request;
            let rpc = names::method_ident(&method.name);
            let request = message_type(file, &method.request_type, Pass::Client)?;
            let response = message_type(file, &method.response_type, Pass::Client)?;
            calls.push(quote! {
                pub async fn #rpc(&self, req: &#request) -> Result<#response, #rt::ClientError> {
                    self.inner.execute(#request_fn(req)?).await
                }
            });
        }

        items.push(quote! {
            /// JSON+HTTP client calling the first binding of every bound method.
            #[derive(Debug, Clone)]
            pub struct #client {
                inner: #rt::HttpClient,
            }

            impl #client {
                pub fn new(inner: #rt::HttpClient) -> Self {
                    Self { inner }
                }

                #(#calls)*
            }
        });
    }

    pretty(quote! { #(#items)* }, Pass::Client)
}

fn render_request(
    symbols: &BindingSymbols,
    binding: &Binding,
    request: &TokenStream,
    rt: &TokenStream,
) -> TokenStream {
    let BindingSymbols {
        builder,
        client_request,
        ..
    } = symbols;
    let method = format_ident!("{}", binding.method.as_str());

    let mut lets = Vec::new();
    let mut args = Vec::new();
    for param in &binding.path_params {
        let name = names::param_ident(&param.field);
        let value = read_path_field(param);
        lets.push(match param.ty {
            ScalarType::String => quote! { let #name = #rt::encode_path_segment(&#value); },
            _ => quote! { let #name = #value; },
        });
        args.push(match param.ty {
            ScalarType::String | ScalarType::Bytes => quote! { &#name },
            _ => quote! { #name },
        });
    }

    let query = plan::client_query_exclusions(binding).map(|exclude| {
        quote! { let request = request.with_query(req, &[#(#exclude),*])?; }
    });

    let body = binding.body.as_ref().map(|body| {
        let value = body_value(body);
        quote! { let request = request.with_json(#value)?; }
    });

    quote! {
        pub fn #client_request(req: &#request) -> Result<#rt::ClientRequest, #rt::ClientError> {
            #(#lets)*
            let request = #rt::ClientRequest::new(
                #rt::http::Method::#method,
                #builder(#(#args),*),
            );
            #query
            #body
            Ok(request)
        }
    }
}

/// Value of a (possibly nested) path field. Nested and bytes fields are
/// owned; a top-level string is read in place. Missing intermediate messages
/// yield the scalar's default.
fn read_path_field(param: &PathParam) -> TokenStream {
    let segments: Vec<_> = param.field.split('.').map(names::field_ident).collect();
    let owned = match param.ty {
        ScalarType::String | ScalarType::Bytes => quote! { .clone() },
        _ => quote! {},
    };
    match segments.split_last() {
        Some((last, [])) if param.ty == ScalarType::String => quote! { req.#last },
        Some((last, [])) => quote! { req.#last #owned },
        Some((last, [first, rest @ ..])) => quote! {
            req.#first.as_ref()
                #(.and_then(|v| v.#rest.as_ref()))*
                .map(|v| v.#last #owned)
                .unwrap_or_default()
        },
        None => quote! { Default::default() },
    }
}

/// Reference to the part of the request sent as JSON payload.
fn body_value(body: &Body) -> TokenStream {
    let Some((first, rest)) = body.field_path.split_first() else {
        return quote! { req };
    };
    let first_ident = names::field_ident(&first.name);
    let mut value = if first.message {
        quote! { req.#first_ident.as_ref() }
    } else {
        quote! { Some(&req.#first_ident) }
    };
    for segment in rest {
        let ident = names::field_ident(&segment.name);
        value = if segment.message {
            quote! { #value.and_then(|v| v.#ident.as_ref()) }
        } else {
            quote! { #value.map(|v| &v.#ident) }
        };
    }
    quote! { &#value }
}
