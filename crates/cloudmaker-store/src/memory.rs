use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use bytes::Bytes;

use crate::{ByteStream, ObjectRef, ObjectStore, StoreError, collect_stream, stream_from_bytes};

/// In-memory object store.
///
/// Useful for tests and dry runs; contents are lost when the store is dropped.
#[derive(Default)]
pub struct MemoryObjectStore {
  objects: RwLock<HashMap<ObjectRef, Bytes>>,
}

impl MemoryObjectStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Insert an object directly, bypassing the async API.
  pub fn insert(&self, bucket: &str, name: &str, data: impl Into<Bytes>) -> ObjectRef {
    let object = ObjectRef::new(bucket, name);
    self
      .objects
      .write()
      .unwrap_or_else(|e| e.into_inner())
      .insert(object.clone(), data.into());
    object
  }

  /// Read an object's bytes directly.
  pub fn read(&self, object: &ObjectRef) -> Option<Bytes> {
    self
      .objects
      .read()
      .unwrap_or_else(|e| e.into_inner())
      .get(object)
      .cloned()
  }

  /// All stored object handles, sorted.
  pub fn objects(&self) -> Vec<ObjectRef> {
    let mut objects: Vec<ObjectRef> = self
      .objects
      .read()
      .unwrap_or_else(|e| e.into_inner())
      .keys()
      .cloned()
      .collect();
    objects.sort_by(|a, b| (&a.bucket, &a.name).cmp(&(&b.bucket, &b.name)));
    objects
  }

  fn lookup(&self, object: &ObjectRef) -> Result<Bytes, StoreError> {
    self.read(object).ok_or_else(|| StoreError::NotFound {
      bucket: object.bucket.clone(),
      name: object.name.clone(),
    })
  }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
  async fn copy(
    &self,
    source: &ObjectRef,
    dest_bucket: &str,
    dest_name: &str,
  ) -> Result<ObjectRef, StoreError> {
    let data = self.lookup(source)?;
    Ok(self.insert(dest_bucket, dest_name, data))
  }

  async fn download(&self, object: &ObjectRef) -> Result<ByteStream, StoreError> {
    Ok(stream_from_bytes(self.lookup(object)?))
  }

  async fn upload(
    &self,
    bucket: &str,
    name: &str,
    data: ByteStream,
    _content_type: &str,
  ) -> Result<ObjectRef, StoreError> {
    let data = collect_stream(data).await?;
    Ok(self.insert(bucket, name, data))
  }

  async fn exists(&self, object: &ObjectRef) -> Result<bool, StoreError> {
    Ok(self.read(object).is_some())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_copy_and_list() {
    let store = MemoryObjectStore::new();
    let source = store.insert("b", "img.png", "data");

    let copied = store.copy(&source, "out", "copy.png").await.unwrap();

    assert_eq!(store.read(&copied).unwrap(), Bytes::from("data"));
    assert_eq!(store.objects(), vec![source, copied]);
  }

  #[tokio::test]
  async fn test_copy_missing() {
    let store = MemoryObjectStore::new();
    let result = store.copy(&ObjectRef::new("b", "x"), "out", "x").await;
    assert!(matches!(result, Err(StoreError::NotFound { .. })));
  }
}
