use std::fmt;

/// Identifies the rendering pass that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Header,
    Registration,
    Client,
    Unmarshal,
    Footer,
    Implementation,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Pass::Header => "header",
            Pass::Registration => "registration",
            Pass::Client => "client",
            Pass::Unmarshal => "unmarshal",
            Pass::Footer => "footer",
            Pass::Implementation => "implementation",
        };
        f.write_str(name)
    }
}

/// Errors raised while resolving bindings or generating a file.
///
/// Generation is all-or-nothing per file: any of these aborts the file being
/// generated and yields no artifacts for it.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no target service defined in the file `{file}`")]
    NoTargetService { file: String },

    #[error("{pass} pass failed: {source}")]
    Render {
        pass: Pass,
        #[source]
        source: syn::Error,
    },

    #[error("`{path}` is not a valid Rust path: {source}")]
    InvalidPath {
        path: String,
        #[source]
        source: syn::Error,
    },

    #[error("path template `{template}` binds unknown field `{field}`")]
    UnknownPathField { template: String, field: String },

    #[error("field `{field}` is not a scalar and cannot be bound from text")]
    NonScalarField { field: String },

    #[error("invalid generator option `{key}={value}`")]
    InvalidOption { key: String, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
