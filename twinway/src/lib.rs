//! twinway: one tonic service implementation, reachable over gRPC and over
//! JSON+HTTP.
//!
//! This facade re-exports the runtime used by generated code at the top
//! level, so generated files can target it with
//! `runtime_crate=::twinway`. The generator itself sits behind the
//! `codegen` feature, for use from `build.rs`.
//!
//! # Feature flags
//!
//! | Feature   | Default | Crate             |
//! |-----------|---------|-------------------|
//! | `codegen` | no      | `twinway-codegen` |

pub extern crate twinway_runtime;

pub use twinway_runtime::*;

#[cfg(feature = "codegen")]
pub use twinway_codegen as codegen;
