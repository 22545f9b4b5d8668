//! Cloudmaker Pipeline
//!
//! Validates image pipeline requests and executes them one step at a time.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Handler                            │
//! │  - handle(request) → ObjectRef                              │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     RequestValidator                        │
//! │  - body / data / functions structure                        │
//! │  - per-function parameter checks against the schema         │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     PipelineExecutor                        │
//! │  - resolve parameters (defaults + overrides)                │
//! │  - invoke each operation with the previous output           │
//! │  - copy the last output to the output bucket                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation failures ([`PipelineError::MalformedRequest`],
//! [`PipelineError::UnknownOperation`], [`PipelineError::InvalidParameter`])
//! happen before any operation runs. An operation failure stops the pipeline
//! at that step.

mod error;
mod executor;
mod handler;
mod resolve;
mod result;
mod validate;

pub use error::PipelineError;
pub use executor::PipelineExecutor;
pub use handler::Handler;
pub use resolve::{ParameterResolver, resolve_parameters};
pub use result::{ExecutionResult, StepResult};
pub use validate::{RequestValidator, ValidatedRequest, validate_against_schema, validate_data};
