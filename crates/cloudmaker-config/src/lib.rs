//! Cloudmaker Config
//!
//! This crate contains the serializable types a caller hands to the pipeline
//! handler. A [`Request`] is kept close to its JSON shape on purpose: fields the
//! validator has to inspect (`data`, `functions`) stay as raw JSON so that a
//! missing field, an array where an object is expected, or a falsy value can
//! each be reported with its own message.
//!
//! Once validated, the request is turned into typed values ([`SourceData`],
//! [`FunctionCall`]) that the executor consumes.

mod handler;
mod request;

pub use handler::{DEFAULT_OUTPUT_BUCKET, HandlerConfig};
pub use request::{FunctionCall, Parameters, Request, RequestBody, SourceData};
