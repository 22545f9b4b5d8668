use async_trait::async_trait;
use cloudmaker_config::Parameters;
use cloudmaker_store::ObjectRef;

use crate::error::OperationError;

/// A named image transform step.
///
/// An operation receives the reference produced by the previous step and a
/// complete, already validated parameter set, and resolves to the reference
/// of the object it wrote.
#[async_trait]
pub trait Operation: Send + Sync {
  async fn invoke(&self, input: ObjectRef, params: &Parameters) -> Result<ObjectRef, OperationError>;
}
