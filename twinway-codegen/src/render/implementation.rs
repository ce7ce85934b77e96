use heck::ToSnakeCase;
use quote::{format_ident, quote};

use crate::context::GenerationContext;
use crate::error::{Pass, Result};
use crate::model::FileDescriptor;
use crate::names;

use super::{header, parse_path, parse_type, pretty, runtime_path, ServerNames};

pub const BANNER: &str = "// Code generated by protoc-gen-twinway, but you can (must) modify it.";

/// Hand-completed skeleton: one struct per service implementing the tonic
/// server trait with every method returning `unimplemented`.
///
/// Lives outside the generated module, so paths are resolved against the
/// context's current path when one is set.
pub fn render_implementation(file: &FileDescriptor, ctx: &GenerationContext) -> Result<String> {
    let rt = runtime_path(ctx)?;
    let base = ctx.current_path.as_deref();
    let scoped = |item: String| match base {
        Some(base) => format!("{base}::{item}"),
        None => item,
    };

    let imports = header::render_imports(ctx.imports.iter().filter(|i| i.standard))?
        .into_iter()
        .chain(header::render_imports(ctx.imports.iter().filter(|i| !i.standard))?);

    let mut items = Vec::new();
    for service in &file.services {
        let ServerNames {
            module, trait_name, ..
        } = ServerNames::new(service);
        let implementation = format_ident!("{}Implementation", trait_name);
        let server_trait = parse_path(&scoped(format!("{module}::{trait_name}")))?;
        let desc = parse_path(&scoped(format!("{trait_name}Desc")))?;
        let constructor = parse_path(&scoped(format!(
            "new_{}_service_desc",
            service.name.to_snake_case()
        )))?;

        let mut methods = Vec::new();
        for method in &service.methods {
            let rpc = names::method_ident(&method.name);
            let request = parse_type(
                &names::rust_type_path(&method.request_type, &file.package, base),
                Pass::Implementation,
            )?;
            let response = parse_type(
                &names::rust_type_path(&method.response_type, &file.package, base),
                Pass::Implementation,
            )?;
            methods.push(quote! {
                async fn #rpc(
                    &self,
                    _request: #rt::tonic::Request<#request>,
                ) -> Result<#rt::tonic::Response<#response>, #rt::tonic::Status> {
                    Err(#rt::tonic::Status::unimplemented("not implemented"))
                }
            });
        }

        items.push(quote! {
            #[derive(Debug, Default, Clone)]
            pub struct #implementation;

            impl #implementation {
                pub fn new() -> Self {
                    Self
                }

                /// Registration of this implementation, ready to be served.
                pub fn description(self) -> #desc<Self> {
                    #constructor(self)
                }
            }

            #[#rt::tonic::async_trait]
            impl #server_trait for #implementation {
                #(#methods)*
            }
        });
    }

    let tokens = quote! {
        #(#imports)*
        #(#items)*
    };

    Ok(format!(
        "{BANNER}\n// source: {}\n\n{}",
        file.name,
        pretty(tokens, Pass::Implementation)?
    ))
}
