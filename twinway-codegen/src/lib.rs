//! Binding resolution and code synthesis for serving gRPC methods over
//! JSON+HTTP.
//!
//! Given a service definition whose methods carry HTTP bindings, the engine
//! emits Rust glue for an axum router next to the tonic service:
//!
//! - `<stem>.twinway.rs`: route patterns, URL builders, request unmarshalers,
//!   a typed HTTP client and a `ServiceDesc` per service. Include it in the
//!   module holding the prost/tonic output of the same package.
//! - `<stem>.impl.rs`: an implementation skeleton, written once and edited
//!   by hand afterwards.
//!
//! Generated code talks to `twinway-runtime` and expects the prost messages
//! to derive serde, see [`MESSAGE_ATTRIBUTES`] and [`ENUM_ATTRIBUTES`].
//!
//! # Example
//!
//! ```ignore
//! use twinway_codegen::{generate, GenerationContext, GeneratorOptions};
//!
//! let ctx = GenerationContext::for_file(&file, &GeneratorOptions::default(), None);
//! let artifacts = generate(&file, &ctx)?;
//! std::fs::write(out_dir.join(&artifacts.descriptor.name), artifacts.descriptor.content)?;
//! ```

pub mod classify;
pub mod context;
pub mod error;
pub mod generate;
pub mod model;
pub mod names;
pub mod path_template;
pub mod plan;
pub mod render;

pub use classify::{classify, field_source, Classification, FieldSource};
pub use context::{GenerationContext, GeneratorOptions};
pub use error::{Error, Pass, Result};
pub use generate::{generate, generate_batch, Artifacts, GeneratedFile};
pub use model::{
    Binding, Body, BodyField, Field, FileDescriptor, HttpMethod, Import, Method, MessageType,
    PathParam, ScalarType, Service, TypeRef,
};
pub use plan::{client_query_exclusions, plan, Step, UnmarshalPlan};

/// Attribute for `prost_build::Config::message_attribute(".", ..)` making
/// messages usable by the generated unmarshalers and client.
pub const MESSAGE_ATTRIBUTES: &str =
    "#[derive(serde::Serialize, serde::Deserialize)] #[serde(default)]";

/// Attribute for `prost_build::Config::enum_attribute(".", ..)`, needed by
/// oneof fields of serde-enabled messages.
pub const ENUM_ATTRIBUTES: &str = "#[derive(serde::Serialize, serde::Deserialize)]";
