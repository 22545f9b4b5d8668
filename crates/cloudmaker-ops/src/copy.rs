use std::sync::Arc;

use async_trait::async_trait;
use cloudmaker_config::Parameters;
use cloudmaker_registry::{Operation, OperationError, ParamSpec, ParameterSchema};
use cloudmaker_store::{ObjectRef, ObjectStore};

use crate::helpers::create_output_file_name;
use crate::transform::output_bucket;

pub const NAME: &str = "copyImage";

/// Duplicates the input into `outputBucketName` with a store-side copy.
pub struct CopyImage {
  store: Arc<dyn ObjectStore>,
}

impl CopyImage {
  pub fn new(store: Arc<dyn ObjectStore>) -> Self {
    Self { store }
  }
}

pub fn schema() -> ParameterSchema {
  ParameterSchema::new()
    .with("outputBucketName", ParamSpec::any("outputs-copied"))
    .with("outputPrefix", ParamSpec::any("copied"))
}

#[async_trait]
impl Operation for CopyImage {
  async fn invoke(&self, input: ObjectRef, params: &Parameters) -> Result<ObjectRef, OperationError> {
    let bucket = output_bucket(params)?;
    let name = create_output_file_name(&input.name, params);
    Ok(self.store.copy(&input, bucket, &name).await?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use cloudmaker_store::{MemoryObjectStore, StoreError};
  use serde_json::json;

  #[tokio::test]
  async fn test_copy_with_defaults() {
    let store = Arc::new(MemoryObjectStore::new());
    let input = store.insert("b", "img.png", "pixels");

    let output = CopyImage::new(store.clone())
      .invoke(input, &schema().defaults())
      .await
      .unwrap();

    assert_eq!(output, ObjectRef::new("outputs-copied", "copied-img.png"));
    assert_eq!(store.read(&output).unwrap(), "pixels");
  }

  #[tokio::test]
  async fn test_copy_without_prefix() {
    let store = Arc::new(MemoryObjectStore::new());
    let input = store.insert("b", "img.png", "pixels");
    let mut params = schema().defaults();
    params.insert("outputPrefix".to_string(), json!(false));

    let output = CopyImage::new(store).invoke(input, &params).await.unwrap();

    assert_eq!(output.name, "img.png.out");
  }

  #[tokio::test]
  async fn test_missing_input_fails() {
    let store = Arc::new(MemoryObjectStore::new());
    let err = CopyImage::new(store)
      .invoke(ObjectRef::new("b", "missing.png"), &schema().defaults())
      .await
      .unwrap_err();

    assert!(matches!(err, OperationError::Store(StoreError::NotFound { .. })));
  }
}
