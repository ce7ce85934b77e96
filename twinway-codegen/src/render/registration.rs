use heck::ToSnakeCase;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

use crate::context::GenerationContext;
use crate::error::{Pass, Result};
use crate::model::{Binding, FileDescriptor, HttpMethod, ScalarType, Service};
use crate::names;
use crate::path_template;
use crate::plan;

use super::{
    bindings, parse_type, pretty, runtime_path, swagger_def_ident, BindingSymbols,
    ServerNames,
};

/// Pattern constants, URL builders, bound-params tables and one service
/// description per service.
pub fn render_registration(file: &FileDescriptor, ctx: &GenerationContext) -> Result<String> {
    let rt = runtime_path(ctx)?;
    let mut items = Vec::new();

    for service in &file.services {
        for (method, binding) in bindings(service) {
            let symbols = BindingSymbols::new(service, method, binding);
            items.push(render_patterns(&symbols, binding, &rt)?);
        }
        items.push(render_desc(file, service, ctx, &rt)?);
    }

    pretty(quote! { #(#items)* }, Pass::Registration)
}

/// Builder argument type and how the argument is handed to `PathValue`.
fn builder_arg(ty: ScalarType) -> (&'static str, bool) {
    match ty {
        ScalarType::String => ("&str", false),
        ScalarType::Bytes => ("&[u8]", false),
        other => (names::primitive_type(other), true),
    }
}

fn render_patterns(
    symbols: &BindingSymbols,
    binding: &Binding,
    rt: &TokenStream,
) -> Result<TokenStream> {
    let BindingSymbols {
        pattern,
        builder,
        bound_params,
        ..
    } = symbols;
    let literal = path_template::to_literal_pattern(&binding.path_template);

    let mut args = Vec::new();
    let mut values = Vec::new();
    for param in &binding.path_params {
        let name = names::param_ident(&param.field);
        let (ty, by_ref) = builder_arg(param.ty);
        let ty = parse_type(ty, Pass::Registration)?;
        args.push(quote! { #name: #ty });
        values.push(if by_ref {
            quote! { #rt::PathValue::to_path_value(&#name) }
        } else {
            quote! { #rt::PathValue::to_path_value(#name) }
        });
    }

    let body = if values.is_empty() {
        quote! { #pattern.to_string() }
    } else {
        let interpolation = path_template::to_interpolation_template(&binding.path_template);
        quote! { format!(#interpolation, #(#values),*) }
    };

    let table = plan::bound_params(binding).map(|names| {
        quote! {
            pub const #bound_params: &[&str] = &[#(#names),*];
        }
    });

    Ok(quote! {
        pub const #pattern: &str = #literal;

        pub fn #builder(#(#args),*) -> String {
            #body
        }

        #table
    })
}

fn verb(method: HttpMethod) -> proc_macro2::Ident {
    format_ident!("{}", method.as_str().to_lowercase())
}

fn render_desc(
    file: &FileDescriptor,
    service: &Service,
    ctx: &GenerationContext,
    rt: &TokenStream,
) -> Result<TokenStream> {
    let server = ServerNames::new(service);
    let ServerNames {
        module,
        trait_name,
        server,
    } = &server;
    let desc = format_ident!("{}Desc", trait_name);
    let constructor = format_ident!("new_{}_service_desc", service.name.to_snake_case());
    let bound = quote! { S: #module::#trait_name };

    let (middleware_field, middleware_init, middleware_setter) = if ctx.apply_middlewares {
        (
            quote! { middlewares: #rt::Middlewares, },
            quote! { middlewares: #rt::Middlewares::default(), },
            quote! {
                /// Middlewares wrapped around every HTTP route of this service.
                pub fn with_middlewares(mut self, middlewares: #rt::Middlewares) -> Self {
                    self.middlewares = middlewares;
                    self
                }
            },
        )
    } else {
        (quote! {}, quote! {}, quote! {})
    };

    let mut routes = Vec::new();
    for (method, binding) in bindings(service) {
        let symbols = BindingSymbols::new(service, method, binding);
        let pattern = &symbols.pattern;
        let unmarshaler = &symbols.unmarshaler;
        let rpc = names::method_ident(&method.name);
        let verb = verb(binding.method);

        let handler = quote! {
            #rt::axum::routing::#verb({
                let svc = self.svc.clone();
                move |request: #rt::axum::extract::Request| {
                    let svc = svc.clone();
                    async move {
                        let req = match #unmarshaler(request).await {
                            Ok(req) => req,
                            Err(err) => return #rt::axum::response::IntoResponse::into_response(err),
                        };
                        #rt::respond(
                            <S as #module::#trait_name>::#rpc(&*svc, #rt::tonic::Request::new(req)).await,
                        )
                    }
                }
            })
        };
        let handler = if ctx.apply_middlewares {
            quote! { self.middlewares.apply(#handler) }
        } else {
            handler
        };
        routes.push(quote! {
            let router = router.route(#pattern, #handler);
        });
    }

    let swagger_def = if ctx.doc_blob.is_some() {
        let def = swagger_def_ident(file);
        quote! { Some(#def) }
    } else {
        quote! { None }
    };

    Ok(quote! {
        /// HTTP and gRPC registration of a service implementation.
        pub struct #desc<S> {
            svc: ::std::sync::Arc<S>,
            #middleware_field
        }

        pub fn #constructor<#bound>(svc: S) -> #desc<S> {
            #desc::from_arc(::std::sync::Arc::new(svc))
        }

        impl<#bound> #desc<S> {
            pub fn from_arc(svc: ::std::sync::Arc<S>) -> Self {
                Self {
                    svc,
                    #middleware_init
                }
            }

            #middleware_setter
        }

        impl<#bound> #rt::ServiceDesc for #desc<S> {
            fn register_grpc(&self, routes: #rt::tonic::service::Routes) -> #rt::tonic::service::Routes {
                routes.add_service(#module::#server::from_arc(self.svc.clone()))
            }

            fn register_http(&self, router: #rt::axum::Router) -> #rt::axum::Router {
                #(#routes)*
                router
            }

            fn swagger_def(&self) -> Option<&'static [u8]> {
                #swagger_def
            }
        }
    })
}
