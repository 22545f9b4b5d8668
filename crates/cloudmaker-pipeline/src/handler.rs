//! Request entry point: validate, execute, finalize.

use std::sync::Arc;

use cloudmaker_config::{HandlerConfig, Request};
use cloudmaker_registry::FunctionRegistry;
use cloudmaker_store::{ObjectRef, ObjectStore};
use tracing::warn;

use crate::error::PipelineError;
use crate::executor::PipelineExecutor;
use crate::result::ExecutionResult;
use crate::validate::{RequestValidator, ValidatedRequest};

/// Handles pipeline requests against a fixed registry and store.
///
/// The handler keeps no per-request state, so one instance can serve any
/// number of concurrent requests.
pub struct Handler {
  registry: Arc<FunctionRegistry>,
  executor: PipelineExecutor,
}

impl Handler {
  pub fn new(
    registry: Arc<FunctionRegistry>,
    store: Arc<dyn ObjectStore>,
    config: HandlerConfig,
  ) -> Self {
    let executor = PipelineExecutor::new(registry.clone(), store, config);
    Self { registry, executor }
  }

  pub fn registry(&self) -> &FunctionRegistry {
    &self.registry
  }

  /// Validate a request without executing anything.
  pub fn validate(&self, request: &Request) -> Result<ValidatedRequest, PipelineError> {
    RequestValidator::new(&self.registry)
      .validate(request)
      .inspect_err(|e| warn!(error = %e, "request_rejected"))
  }

  /// Handle a request, returning the full execution record.
  pub async fn run(&self, request: &Request) -> Result<ExecutionResult, PipelineError> {
    let validated = self.validate(request)?;
    self.executor.execute(&validated).await
  }

  /// Handle a request, returning the reference of the finalized object.
  pub async fn handle(&self, request: &Request) -> Result<ObjectRef, PipelineError> {
    self.run(request).await.map(|result| result.output)
  }
}
