//! Runtime support for code generated by `twinway-codegen`.
//!
//! Generated descriptors reach `axum`, `tonic` and `http` through the
//! re-exports below, so a service crate only depends on this crate (or on
//! the `twinway` facade).
//!
//! # Example
//!
//! ```ignore
//! use twinway_runtime::{swagger_router, ServiceDesc};
//!
//! let desc = pb::ItemsImplementation::new().description();
//! let app = desc
//!     .register_http(axum::Router::new())
//!     .merge(swagger_router(&desc, "/swagger.json"));
//! let grpc = desc.register_grpc(tonic::service::Routes::default());
//! ```

pub mod client;
pub mod desc;
pub mod error;
pub mod marshal;
pub mod middleware;
pub mod params;
pub mod path_value;
pub mod populate;
pub mod respond;

pub use client::{encode_path_segment, ClientError, ClientRequest, HttpClient};
pub use desc::{swagger_router, ServiceDesc};
pub use error::{error_response, http_status, transform_unmarshaler_error, HttpError, UnmarshalError};
pub use marshal::{marshaler_for_request, Marshaler};
pub use middleware::Middlewares;
pub use params::{path_params, query_params, read_body, MAX_BODY_BYTES};
pub use path_value::PathValue;
pub use populate::{populate_field_from_path, populate_query_field};
pub use respond::respond;

// Re-exported for use by generated code.
pub use axum;
pub use http;
pub use tonic;

/// Generated files assert this exists; bumped when generated code and the
/// runtime stop being compatible.
pub const IS_VERSION_1: () = ();
