//! Error types for request validation and pipeline execution.

use cloudmaker_registry::OperationError;
use cloudmaker_store::StoreError;
use thiserror::Error;

/// The single error a failed request produces.
///
/// The first three variants are raised during validation, before any
/// operation runs. The last two are raised while executing.
#[derive(Debug, Error)]
pub enum PipelineError {
  /// The request is missing a required part or has the wrong shape.
  #[error("{message}")]
  MalformedRequest { message: String },

  /// A requested function name is not registered.
  #[error("No function exists with name {name}")]
  UnknownOperation { name: String },

  /// A parameter key is not accepted, or its value was rejected.
  #[error("{message}")]
  InvalidParameter {
    operation: String,
    key: String,
    message: String,
  },

  /// An operation failed while running.
  #[error("function {operation} failed at step {step}: {source}")]
  OperationFailure {
    step: usize,
    operation: String,
    #[source]
    source: OperationError,
  },

  /// Copying the final object to the output bucket failed.
  #[error("failed to copy result to output bucket: {source}")]
  FinalizationFailure {
    #[source]
    source: StoreError,
  },
}

impl PipelineError {
  pub(crate) fn malformed(message: impl Into<String>) -> Self {
    Self::MalformedRequest {
      message: message.into(),
    }
  }

  /// Whether the error was raised before any operation ran.
  pub fn is_rejection(&self) -> bool {
    matches!(
      self,
      Self::MalformedRequest { .. } | Self::UnknownOperation { .. } | Self::InvalidParameter { .. }
    )
  }
}
