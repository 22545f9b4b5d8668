//! Shared download → convert → upload wrapper for ImageMagick operations.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cloudmaker_config::Parameters;
use cloudmaker_registry::{Operation, OperationError};
use cloudmaker_store::{ByteStream, ObjectRef, ObjectStore, StoreError, content_type_for};
use futures::StreamExt;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use tracing::{debug, warn};

use crate::helpers::{base_name, create_output_file_name, create_temp_file_name};
use crate::magick::MagickConfig;

/// An image transform expressed as a single `convert` invocation.
pub trait ImageTransform: Send + Sync {
  /// Name of the object the transform writes.
  fn output_name(&self, input_name: &str, params: &Parameters) -> Result<String, OperationError> {
    Ok(create_output_file_name(input_name, params))
  }

  /// Arguments for `convert`, including the input and output paths.
  fn arguments(
    &self,
    input: &Path,
    output: &Path,
    params: &Parameters,
  ) -> Result<Vec<OsString>, OperationError>;
}

/// Runs an [`ImageTransform`] against stored objects.
///
/// The input object is downloaded to a scratch file, converted, and the
/// result uploaded to the `outputBucketName` parameter's bucket. Scratch
/// files are removed whether or not the conversion succeeds.
pub struct MagickOperation<T> {
  transform: T,
  store: Arc<dyn ObjectStore>,
  magick: Arc<MagickConfig>,
}

impl<T: ImageTransform> MagickOperation<T> {
  pub fn new(transform: T, store: Arc<dyn ObjectStore>, magick: Arc<MagickConfig>) -> Self {
    Self {
      transform,
      store,
      magick,
    }
  }

  async fn render(
    &self,
    input: &ObjectRef,
    bucket: &str,
    output_name: &str,
    params: &Parameters,
    scratch: &Scratch,
  ) -> Result<ObjectRef, OperationError> {
    fs::create_dir_all(&self.magick.temp_dir).await?;
    self.download_to(input, &scratch.input).await?;

    let args = self
      .transform
      .arguments(&scratch.input, &scratch.output, params)?;
    self.magick.run(&args).await?;

    self.upload_from(&scratch.output, bucket, output_name).await
  }

  async fn download_to(&self, object: &ObjectRef, path: &Path) -> Result<(), OperationError> {
    let mut stream = self.store.download(object).await?;
    let mut file = File::create(path).await?;
    while let Some(chunk) = stream.next().await {
      file.write_all(&chunk?).await?;
    }
    file.flush().await?;
    Ok(())
  }

  async fn upload_from(
    &self,
    path: &Path,
    bucket: &str,
    name: &str,
  ) -> Result<ObjectRef, OperationError> {
    let file = File::open(path).await?;
    let stream: ByteStream = Box::pin(ReaderStream::new(file).map(|r| r.map_err(StoreError::Io)));
    Ok(
      self
        .store
        .upload(bucket, name, stream, content_type_for(name))
        .await?,
    )
  }
}

#[async_trait]
impl<T: ImageTransform> Operation for MagickOperation<T> {
  async fn invoke(&self, input: ObjectRef, params: &Parameters) -> Result<ObjectRef, OperationError> {
    let bucket = output_bucket(params)?;
    let output_name = self.transform.output_name(&input.name, params)?;
    let scratch = Scratch::new(&self.magick.temp_dir, &input.name, &output_name);

    let result = self
      .render(&input, bucket, &output_name, params, &scratch)
      .await;
    scratch.remove().await;
    result
  }
}

/// The `outputBucketName` parameter.
pub(crate) fn output_bucket(params: &Parameters) -> Result<&str, OperationError> {
  params
    .get("outputBucketName")
    .and_then(|v| v.as_str())
    .filter(|s| !s.is_empty())
    .ok_or_else(|| OperationError::InvalidInput {
      message: "outputBucketName must be a non-empty string".to_string(),
    })
}

/// Per-invocation scratch paths, unique so concurrent requests never collide.
struct Scratch {
  input: PathBuf,
  output: PathBuf,
}

impl Scratch {
  fn new(dir: &Path, input_name: &str, output_name: &str) -> Self {
    let id = uuid::Uuid::new_v4();
    Self {
      input: create_temp_file_name(dir, &format!("{}-in-{}", id, base_name(input_name))),
      output: create_temp_file_name(dir, &format!("{}-out-{}", id, base_name(output_name))),
    }
  }

  async fn remove(&self) {
    for path in [&self.input, &self.output] {
      match fs::remove_file(path).await {
        Ok(()) => debug!(path = %path.display(), "removed scratch file"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "failed to remove scratch file"),
      }
    }
  }
}
