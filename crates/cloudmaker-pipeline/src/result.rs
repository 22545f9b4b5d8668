use cloudmaker_config::Parameters;
use cloudmaker_store::ObjectRef;
use serde::{Deserialize, Serialize};

/// Result of a single pipeline step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResult {
  /// Zero-based position in the pipeline.
  pub step: usize,

  /// Name of the operation that ran.
  pub operation: String,

  /// The resolved parameters the operation was invoked with.
  pub parameters: Parameters,

  /// The reference handed to the operation.
  pub input: ObjectRef,

  /// The reference the operation resolved to.
  pub output: ObjectRef,
}

/// Result of a completed pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
  /// Unique ID for this execution.
  pub execution_id: String,

  /// Per-step results, in execution order.
  pub steps: Vec<StepResult>,

  /// The finalized object in the output bucket.
  pub output: ObjectRef,
}
