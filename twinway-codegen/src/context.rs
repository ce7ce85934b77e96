//! Generator options and the per-file rendering context.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::{FileDescriptor, Import};

pub const DEFAULT_RUNTIME_CRATE: &str = "::twinway_runtime";

/// User-facing knobs, usually passed as the plugin parameter string.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct GeneratorOptions {
    /// Wrap every generated route with the desc's middleware chain.
    pub apply_middlewares: bool,
    /// Path generated code uses to reach the runtime crate.
    pub runtime_crate: String,
    /// Module the implementation stub lives in relative to the prost output,
    /// e.g. `crate::pb::strings`.
    pub impl_module: Option<String>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            apply_middlewares: false,
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
            impl_module: None,
        }
    }
}

impl GeneratorOptions {
    /// Parse `key=value` pairs separated by commas. A bare key sets a boolean
    /// option to `true`.
    pub fn from_parameter(parameter: &str) -> Result<Self> {
        let mut options = Self::default();
        for pair in parameter.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (key, value) = match pair.split_once('=') {
                Some((key, value)) => (key.trim(), Some(value.trim())),
                None => (pair, None),
            };
            let invalid = || Error::InvalidOption {
                key: key.to_string(),
                value: value.unwrap_or_default().to_string(),
            };
            match (key, value) {
                ("apply_middlewares", None) => options.apply_middlewares = true,
                ("apply_middlewares", Some(v)) => {
                    options.apply_middlewares = v.parse().map_err(|_| invalid())?
                }
                ("runtime_crate", Some(v)) if !v.is_empty() => options.runtime_crate = v.to_string(),
                ("impl_module", Some(v)) if !v.is_empty() => options.impl_module = Some(v.to_string()),
                _ => return Err(invalid()),
            }
        }
        Ok(options)
    }
}

/// State shared unchanged by every rendering pass of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationContext {
    pub imports: Vec<Import>,
    /// Pre-rendered API description; `None` disables the footer.
    pub doc_blob: Option<Vec<u8>>,
    pub apply_middlewares: bool,
    /// Module path used to resolve type references outside the prost module.
    pub current_path: Option<String>,
    pub runtime_crate: String,
}

impl Default for GenerationContext {
    fn default() -> Self {
        Self {
            imports: Vec::new(),
            doc_blob: None,
            apply_middlewares: false,
            current_path: None,
            runtime_crate: DEFAULT_RUNTIME_CRATE.to_string(),
        }
    }
}

impl GenerationContext {
    pub fn for_file(
        file: &FileDescriptor,
        options: &GeneratorOptions,
        doc_blob: Option<Vec<u8>>,
    ) -> Self {
        Self {
            imports: file.imports.clone(),
            doc_blob,
            apply_middlewares: options.apply_middlewares,
            current_path: options.impl_module.clone(),
            runtime_crate: options.runtime_crate.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_string_sets_options() {
        let options = GeneratorOptions::from_parameter(
            "apply_middlewares, runtime_crate=::twinway::runtime,impl_module=crate::pb",
        )
        .unwrap();
        assert!(options.apply_middlewares);
        assert_eq!(options.runtime_crate, "::twinway::runtime");
        assert_eq!(options.impl_module.as_deref(), Some("crate::pb"));
    }

    #[test]
    fn empty_parameter_is_default() {
        assert_eq!(
            GeneratorOptions::from_parameter("").unwrap(),
            GeneratorOptions::default()
        );
    }

    #[test]
    fn bad_options_are_rejected() {
        let err = GeneratorOptions::from_parameter("apply_middlewares=maybe").unwrap_err();
        assert!(matches!(err, Error::InvalidOption { key, value } if key == "apply_middlewares" && value == "maybe"));
        assert!(GeneratorOptions::from_parameter("colour=blue").is_err());
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: GeneratorOptions =
            serde_json::from_str(r#"{"apply_middlewares": true}"#).unwrap();
        assert!(options.apply_middlewares);
        assert_eq!(options.runtime_crate, DEFAULT_RUNTIME_CRATE);
    }
}
