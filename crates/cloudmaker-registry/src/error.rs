use cloudmaker_store::StoreError;
use thiserror::Error;

/// Errors that can occur when working with the function registry.
#[derive(Debug, Error)]
pub enum RegistryError {
  /// No operation is registered under the name.
  #[error("No function exists with name {name}")]
  NotFound { name: String },

  /// An operation with the same name was registered twice.
  #[error("function already registered: {name}")]
  AlreadyRegistered { name: String },
}

/// Errors raised by an operation while transforming an object.
#[derive(Debug, Error)]
pub enum OperationError {
  /// Reading or writing the object store failed.
  #[error("store error: {0}")]
  Store(#[from] StoreError),

  /// The external image tool exited unsuccessfully.
  #[error("{program} failed ({status}): {stderr}")]
  Tool {
    program: String,
    status: String,
    stderr: String,
  },

  /// Local scratch file handling failed.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// The resolved parameters cannot be applied to this input.
  #[error("invalid input: {message}")]
  InvalidInput { message: String },
}
