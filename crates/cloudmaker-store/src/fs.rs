use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use futures::StreamExt;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use uuid::Uuid;

use crate::{ByteStream, ObjectRef, ObjectStore, StoreError};

/// Filesystem-based object store.
///
/// Stores each object at `{root}/{bucket}/{name}`. Object names may contain
/// slashes; parent directories are created automatically.
pub struct FsObjectStore {
  root: PathBuf,
}

impl FsObjectStore {
  /// Create a new filesystem store rooted at the given directory.
  pub fn new(root: impl Into<PathBuf>) -> Self {
    Self { root: root.into() }
  }

  fn object_path(&self, bucket: &str, name: &str) -> Result<PathBuf, StoreError> {
    if bucket.is_empty() || bucket.contains(['/', '\\']) || bucket == "." || bucket == ".." {
      return Err(StoreError::InvalidName(format!("bucket '{}'", bucket)));
    }

    let relative = Path::new(name);
    let only_normal = relative
      .components()
      .all(|c| matches!(c, Component::Normal(_)));
    if name.is_empty() || !only_normal {
      return Err(StoreError::InvalidName(format!("object '{}'", name)));
    }

    Ok(self.root.join(bucket).join(relative))
  }
}

fn not_found(object: &ObjectRef, e: std::io::Error) -> StoreError {
  if e.kind() == std::io::ErrorKind::NotFound {
    StoreError::NotFound {
      bucket: object.bucket.clone(),
      name: object.name.clone(),
    }
  } else {
    StoreError::Io(e)
  }
}

/// Hidden sibling of `path` that a copy is written to before the rename.
fn staging_path(path: &Path) -> PathBuf {
  let name = path
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_default();
  path.with_file_name(format!(".{}.{}.partial", name, Uuid::new_v4()))
}

async fn ensure_parent(path: &Path) -> Result<(), StoreError> {
  if let Some(parent) = path.parent() {
    fs::create_dir_all(parent).await?;
  }
  Ok(())
}

#[async_trait]
impl ObjectStore for FsObjectStore {
  async fn copy(
    &self,
    source: &ObjectRef,
    dest_bucket: &str,
    dest_name: &str,
  ) -> Result<ObjectRef, StoreError> {
    let from = self.object_path(&source.bucket, &source.name)?;
    let to = self.object_path(dest_bucket, dest_name)?;

    if !fs::try_exists(&from).await? {
      return Err(not_found(
        source,
        std::io::Error::from(std::io::ErrorKind::NotFound),
      ));
    }

    if from == to {
      return Ok(ObjectRef::new(dest_bucket, dest_name));
    }

    ensure_parent(&to).await?;
    let staging = staging_path(&to);
    if let Err(e) = fs::copy(&from, &staging).await {
      let _ = fs::remove_file(&staging).await;
      return Err(not_found(source, e));
    }
    if let Err(e) = fs::rename(&staging, &to).await {
      let _ = fs::remove_file(&staging).await;
      return Err(e.into());
    }

    Ok(ObjectRef::new(dest_bucket, dest_name))
  }

  async fn download(&self, object: &ObjectRef) -> Result<ByteStream, StoreError> {
    let path = self.object_path(&object.bucket, &object.name)?;
    let file = File::open(&path).await.map_err(|e| not_found(object, e))?;
    let stream = ReaderStream::new(file).map(|r| r.map_err(StoreError::Io));
    Ok(Box::pin(stream))
  }

  async fn upload(
    &self,
    bucket: &str,
    name: &str,
    mut data: ByteStream,
    _content_type: &str,
  ) -> Result<ObjectRef, StoreError> {
    let path = self.object_path(bucket, name)?;
    ensure_parent(&path).await?;

    let mut file = File::create(&path).await?;
    while let Some(chunk) = data.next().await {
      let bytes = chunk?;
      file.write_all(&bytes).await?;
    }
    file.flush().await?;

    Ok(ObjectRef::new(bucket, name))
  }

  async fn exists(&self, object: &ObjectRef) -> Result<bool, StoreError> {
    let path = self.object_path(&object.bucket, &object.name)?;
    Ok(fs::try_exists(&path).await?)
  }
}
