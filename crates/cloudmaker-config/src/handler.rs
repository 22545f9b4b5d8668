use serde::{Deserialize, Serialize};

/// Bucket the final artifact of every pipeline is copied into.
pub const DEFAULT_OUTPUT_BUCKET: &str = "cloud-maker-outputs-final";

/// Configuration for the pipeline handler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HandlerConfig {
  /// Destination bucket for the finalization copy.
  #[serde(default = "default_output_bucket")]
  pub output_bucket: String,
}

fn default_output_bucket() -> String {
  DEFAULT_OUTPUT_BUCKET.to_string()
}

impl Default for HandlerConfig {
  fn default() -> Self {
    Self {
      output_bucket: default_output_bucket(),
    }
  }
}
