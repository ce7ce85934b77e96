use quote::quote;

use crate::context::GenerationContext;
use crate::error::{Error, Pass, Result};
use crate::model::{FileDescriptor, Import};

use super::{parse_path, pretty, runtime_path};

pub const BANNER: &str = "// Code generated by protoc-gen-twinway. DO NOT EDIT.";

/// Banner, imports (standard group first) and the runtime version assertion.
pub fn render_header(file: &FileDescriptor, ctx: &GenerationContext) -> Result<String> {
    let rt = runtime_path(ctx)?;

    let standard = render_imports(ctx.imports.iter().filter(|i| i.standard))?;
    let third_party = render_imports(ctx.imports.iter().filter(|i| !i.standard))?;

    let tokens = quote! {
        #(#standard)*
        #(#third_party)*

        const _: () = #rt::IS_VERSION_1;
    };

    Ok(format!(
        "{BANNER}\n// source: {}\n\n{}",
        file.name,
        pretty(tokens, Pass::Header)?
    ))
}

pub(super) fn render_imports<'a>(
    imports: impl Iterator<Item = &'a Import>,
) -> Result<Vec<proc_macro2::TokenStream>> {
    imports
        .map(|import| {
            let path = parse_path(&import.path)?;
            Ok(match &import.alias {
                Some(alias) => {
                    let alias: syn::Ident =
                        syn::parse_str(alias).map_err(|source| Error::InvalidPath {
                            path: alias.clone(),
                            source,
                        })?;
                    quote! {
                        #[allow(unused_imports)]
                        use #path as #alias;
                    }
                }
                None => quote! {
                    #[allow(unused_imports)]
                    use #path;
                },
            })
        })
        .collect()
}
