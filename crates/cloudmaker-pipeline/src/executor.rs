//! Sequential pipeline executor.

use std::sync::Arc;

use cloudmaker_config::HandlerConfig;
use cloudmaker_registry::FunctionRegistry;
use cloudmaker_store::{ObjectRef, ObjectStore};
use tracing::{Span, error, info, instrument};

use crate::error::PipelineError;
use crate::resolve::resolve_parameters;
use crate::result::{ExecutionResult, StepResult};
use crate::validate::ValidatedRequest;

/// Runs validated pipelines.
///
/// Steps run strictly in list order. Each step's output reference is the
/// input of the next one, and the first failing step aborts the pipeline:
/// later steps never start and no finalization copy is made.
pub struct PipelineExecutor {
  registry: Arc<FunctionRegistry>,
  store: Arc<dyn ObjectStore>,
  config: HandlerConfig,
}

impl PipelineExecutor {
  pub fn new(
    registry: Arc<FunctionRegistry>,
    store: Arc<dyn ObjectStore>,
    config: HandlerConfig,
  ) -> Self {
    Self {
      registry,
      store,
      config,
    }
  }

  /// Execute a validated pipeline and copy its result to the output bucket.
  #[instrument(
    name = "pipeline_execute",
    skip(self, request),
    fields(
      source = %format!("{}/{}", request.source.bucket, request.source.name),
      steps = request.functions.len(),
      execution_id = tracing::field::Empty,
    )
  )]
  pub async fn execute(&self, request: &ValidatedRequest) -> Result<ExecutionResult, PipelineError> {
    let execution_id = uuid::Uuid::new_v4().to_string();
    Span::current().record("execution_id", execution_id.as_str());

    info!(
      execution_id = %execution_id,
      bucket = %request.source.bucket,
      name = %request.source.name,
      "pipeline_started"
    );

    let result = self.run_steps(request, &execution_id).await;

    match &result {
      Ok(result) => {
        info!(
          execution_id = %execution_id,
          output = %result.output,
          "pipeline_completed"
        );
      }
      Err(e) => {
        error!(
          execution_id = %execution_id,
          error = %e,
          "pipeline_failed"
        );
      }
    }

    result
  }

  async fn run_steps(
    &self,
    request: &ValidatedRequest,
    execution_id: &str,
  ) -> Result<ExecutionResult, PipelineError> {
    let mut current = self
      .store
      .get(&request.source.bucket, &request.source.name);
    let mut steps = Vec::with_capacity(request.functions.len());

    for (step, call) in request.functions.iter().enumerate() {
      let registered = self
        .registry
        .lookup(&call.name)
        .map_err(|_| PipelineError::UnknownOperation {
          name: call.name.clone(),
        })?;

      let parameters = resolve_parameters(registered.schema(), &call.parameters);

      info!(
        execution_id = %execution_id,
        step,
        operation = %call.name,
        input = %current,
        "step_started"
      );

      let output = match registered
        .operation()
        .invoke(current.clone(), &parameters)
        .await
      {
        Ok(output) => output,
        Err(e) => {
          error!(
            execution_id = %execution_id,
            step,
            operation = %call.name,
            error = %e,
            "step_failed"
          );
          return Err(PipelineError::OperationFailure {
            step,
            operation: call.name.clone(),
            source: e,
          });
        }
      };

      info!(
        execution_id = %execution_id,
        step,
        operation = %call.name,
        output = %output,
        "step_completed"
      );

      steps.push(StepResult {
        step,
        operation: call.name.clone(),
        parameters,
        input: std::mem::replace(&mut current, output.clone()),
        output,
      });
    }

    let output = self.finalize(&current).await?;

    Ok(ExecutionResult {
      execution_id: execution_id.to_string(),
      steps,
      output,
    })
  }

  /// Copy the last reference into the output bucket under the same name.
  async fn finalize(&self, object: &ObjectRef) -> Result<ObjectRef, PipelineError> {
    self
      .store
      .copy(object, &self.config.output_bucket, &object.name)
      .await
      .map_err(|source| PipelineError::FinalizationFailure { source })
  }
}
