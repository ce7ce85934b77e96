//! Per-file orchestration of the rendering passes.

use std::path::Path;

use tracing::{debug, warn};

use crate::context::{GenerationContext, GeneratorOptions};
use crate::error::{Error, Result};
use crate::model::FileDescriptor;
use crate::render;

/// One output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// File name relative to the output directory.
    pub name: String,
    pub content: String,
}

/// Outputs of one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// Registration, client and unmarshaler code, plus the embedded
    /// description when one was supplied. Regenerated on every run.
    pub descriptor: GeneratedFile,
    /// Implementation skeleton, meant to be written once and then edited.
    pub implementation: GeneratedFile,
}

/// Generate both artifacts for one file.
///
/// Fails without output when the file declares no service or any pass fails.
pub fn generate(file: &FileDescriptor, ctx: &GenerationContext) -> Result<Artifacts> {
    if file.services.is_empty() {
        warn!(file = %file.name, "no target service defined, skipping file");
        return Err(Error::NoTargetService {
            file: file.name.clone(),
        });
    }

    let bindings: usize = file
        .services
        .iter()
        .flat_map(|s| &s.methods)
        .map(|m| m.bindings.len())
        .sum();
    debug!(
        file = %file.name,
        services = file.services.len(),
        bindings,
        middlewares = ctx.apply_middlewares,
        "generating service descriptors"
    );

    let mut descriptor = String::new();
    descriptor.push_str(&render::render_header(file, ctx)?);
    descriptor.push('\n');
    descriptor.push_str(&render::render_registration(file, ctx)?);
    descriptor.push('\n');
    descriptor.push_str(&render::render_client(file, ctx)?);
    descriptor.push('\n');
    descriptor.push_str(&render::render_unmarshalers(file, ctx)?);
    if let Some(blob) = &ctx.doc_blob {
        descriptor.push('\n');
        descriptor.push_str(&render::render_footer(file, blob)?);
    }

    let implementation = render::render_implementation(file, ctx)?;

    let stem = file_stem(&file.name);
    Ok(Artifacts {
        descriptor: GeneratedFile {
            name: format!("{stem}.twinway.rs"),
            content: descriptor,
        },
        implementation: GeneratedFile {
            name: format!("{stem}.impl.rs"),
            content: implementation,
        },
    })
}

/// Generate every file independently; a failing file does not affect the
/// others.
pub fn generate_batch<'a, I>(
    files: I,
    options: &GeneratorOptions,
) -> Vec<(String, Result<Artifacts>)>
where
    I: IntoIterator<Item = (&'a FileDescriptor, Option<Vec<u8>>)>,
{
    files
        .into_iter()
        .map(|(file, doc_blob)| {
            let ctx = GenerationContext::for_file(file, options, doc_blob);
            (file.name.clone(), generate(file, &ctx))
        })
        .collect()
}

/// `strings/strings.proto` -> `strings/strings`.
fn file_stem(name: &str) -> String {
    let path = Path::new(name);
    match path.extension() {
        Some(_) => path.with_extension("").to_string_lossy().into_owned(),
        None => name.to_string(),
    }
}
