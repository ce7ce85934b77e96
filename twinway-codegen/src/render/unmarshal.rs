use proc_macro2::TokenStream;
use quote::quote;

use crate::context::GenerationContext;
use crate::error::{Pass, Result};
use crate::model::{Body, FileDescriptor};
use crate::names;
use crate::plan::{self, Step};

use super::{bindings, message_type, pretty, runtime_path, BindingSymbols};

/// One `unmarshaler_<key>` per binding, running the binding's plan.
pub fn render_unmarshalers(file: &FileDescriptor, ctx: &GenerationContext) -> Result<String> {
    let rt = runtime_path(ctx)?;
    let mut items = Vec::new();

    for service in &file.services {
        for (method, binding) in bindings(service) {
            let symbols = BindingSymbols::new(service, method, binding);
            let request = message_type(file, &method.request_type, Pass::Unmarshal)?;
            let plan = plan::plan(binding);
            let steps: Vec<TokenStream> = plan
                .steps
                .iter()
                .map(|step| render_step(step, &symbols, &rt))
                .collect();
            let unmarshaler = &symbols.unmarshaler;
            let prelude = render_prelude(&plan.steps, &request);

            items.push(quote! {
                pub async fn #unmarshaler(
                    request: #rt::axum::extract::Request,
                ) -> Result<#request, #rt::HttpError> {
                    #prelude
                    #(#steps)*
                    Ok(req)
                }
            });
        }
    }

    pretty(quote! { #(#items)* }, Pass::Unmarshal)
}

/// Split the request and declare the target, binding only what the steps use.
fn render_prelude(steps: &[Step], request: &TokenStream) -> TokenStream {
    if steps.is_empty() {
        return quote! {
            let _ = request;
            let req = <#request as Default>::default();
        };
    }
    let parts = if steps.contains(&Step::PathScan) {
        quote! { mut parts }
    } else {
        quote! { parts }
    };
    let body = if steps.iter().any(|s| matches!(s, Step::BodyDecode(_))) {
        quote! { body }
    } else {
        quote! { _ }
    };
    quote! {
        let (#parts, #body) = request.into_parts();
        let mut req = <#request as Default>::default();
    }
}

fn render_step(step: &Step, symbols: &BindingSymbols, rt: &TokenStream) -> TokenStream {
    match step {
        Step::QueryScan {
            bound_params,
            path_params,
        } => {
            let skip = match bound_params {
                Some(_) => {
                    let table = &symbols.bound_params;
                    Some(quote! {
                        if #table.contains(&key.to_lowercase().as_str()) {
                            continue;
                        }
                    })
                }
                None if !path_params.is_empty() => Some(quote! {
                    if [#(#path_params),*].contains(&key.to_lowercase().as_str()) {
                        continue;
                    }
                }),
                None => None,
            };
            quote! {
                for (key, value) in #rt::query_params(&parts.uri) {
                    #skip
                    #rt::populate_query_field(&mut req, &key, &value)
                        .map_err(|err| err.context("couldn't populate field from query"))
                        .map_err(#rt::transform_unmarshaler_error)?;
                }
            }
        }
        Step::BodyDecode(body) => {
            let target = body_target(body);
            quote! {
                let marshaler = #rt::marshaler_for_request(&parts.headers);
                let payload = #rt::read_body(body)
                    .await
                    .map_err(#rt::transform_unmarshaler_error)?;
                marshaler
                    .unmarshal_into(&payload, #target)
                    .map_err(|err| err.context("couldn't read request payload"))
                    .map_err(#rt::transform_unmarshaler_error)?;
            }
        }
        Step::PathScan => quote! {
            let params = #rt::path_params(&mut parts)
                .await
                .map_err(#rt::transform_unmarshaler_error)?;
            for (key, value) in params {
                #rt::populate_field_from_path(&mut req, &key, &value)
                    .map_err(|err| err.context("couldn't populate field from path"))
                    .map_err(#rt::transform_unmarshaler_error)?;
            }
        },
    }
}

/// Mutable place the payload is decoded into. Absent messages along the path
/// are created first.
fn body_target(body: &Body) -> TokenStream {
    let Some((last, init)) = body.field_path.split_last() else {
        return quote! { &mut req };
    };
    let mut place = quote! { req };
    for segment in init {
        let ident = names::field_ident(&segment.name);
        place = quote! { #place.#ident.get_or_insert_with(Default::default) };
    }
    let ident = names::field_ident(&last.name);
    if last.message {
        quote! { #place.#ident.get_or_insert_with(Default::default) }
    } else {
        quote! { &mut #place.#ident }
    }
}
