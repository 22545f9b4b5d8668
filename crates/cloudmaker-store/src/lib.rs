//! Cloudmaker Store
//!
//! This crate provides the object store trait and implementations for cloudmaker.
//! Objects are addressed by bucket and name. The pipeline never holds object
//! bytes itself: it passes [`ObjectRef`] handles between steps, and only the
//! operations that need pixels stream bytes in and out through the store.
//!
//! The trait uses async streaming for efficient handling of large images.

mod fs;
mod memory;

pub use fs::FsObjectStore;
pub use memory::MemoryObjectStore;

use std::fmt;
use std::pin::Pin;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};

/// A boxed stream of bytes for object data.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StoreError>> + Send>>;

/// Error type for object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  /// The requested object was not found.
  #[error("object not found: {bucket}/{name}")]
  NotFound { bucket: String, name: String },

  /// The bucket or object name cannot be mapped onto the backend.
  #[error("invalid object name: {0}")]
  InvalidName(String),

  /// An I/O error occurred.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),
}

/// Handle to a stored object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectRef {
  pub bucket: String,
  pub name: String,
}

impl ObjectRef {
  pub fn new(bucket: impl Into<String>, name: impl Into<String>) -> Self {
    Self {
      bucket: bucket.into(),
      name: name.into(),
    }
  }
}

impl fmt::Display for ObjectRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}/{}", self.bucket, self.name)
  }
}

/// Object store trait.
///
/// Implementations provide the actual storage backend (filesystem, memory,
/// cloud storage).
#[async_trait]
pub trait ObjectStore: Send + Sync {
  /// Build a handle for an object. No I/O is performed.
  fn get(&self, bucket: &str, name: &str) -> ObjectRef {
    ObjectRef::new(bucket, name)
  }

  /// Copy an object to a new bucket and name, returning the new handle.
  async fn copy(
    &self,
    source: &ObjectRef,
    dest_bucket: &str,
    dest_name: &str,
  ) -> Result<ObjectRef, StoreError>;

  /// Stream the contents of an object.
  async fn download(&self, object: &ObjectRef) -> Result<ByteStream, StoreError>;

  /// Store bytes at a location, returning the handle of the written object.
  async fn upload(
    &self,
    bucket: &str,
    name: &str,
    data: ByteStream,
    content_type: &str,
  ) -> Result<ObjectRef, StoreError>;

  /// Whether an object exists.
  async fn exists(&self, object: &ObjectRef) -> Result<bool, StoreError>;
}

/// Wrap an in-memory buffer as a [`ByteStream`].
pub fn stream_from_bytes(data: impl Into<Bytes>) -> ByteStream {
  let data = data.into();
  Box::pin(futures::stream::once(async move { Ok(data) }))
}

/// Drain a [`ByteStream`] into a single buffer.
pub async fn collect_stream(mut stream: ByteStream) -> Result<Bytes, StoreError> {
  let mut buf = BytesMut::new();
  while let Some(chunk) = stream.next().await {
    buf.extend_from_slice(&chunk?);
  }
  Ok(buf.freeze())
}

/// Guess a content type from an object name's extension.
pub fn content_type_for(name: &str) -> &'static str {
  let ext = name
    .rsplit_once('.')
    .map(|(_, ext)| ext.to_ascii_lowercase())
    .unwrap_or_default();
  match ext.as_str() {
    "png" => "image/png",
    "jpg" | "jpeg" => "image/jpeg",
    "gif" => "image/gif",
    _ => "application/octet-stream",
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_object_ref_display() {
    assert_eq!(ObjectRef::new("b", "img.png").to_string(), "b/img.png");
  }

  #[test]
  fn test_content_type_for() {
    assert_eq!(content_type_for("a.PNG"), "image/png");
    assert_eq!(content_type_for("a.jpeg"), "image/jpeg");
    assert_eq!(content_type_for("a.gif"), "image/gif");
    assert_eq!(content_type_for("a.png.out"), "application/octet-stream");
    assert_eq!(content_type_for("noext"), "application/octet-stream");
  }

  #[tokio::test]
  async fn test_stream_roundtrip() {
    let bytes = collect_stream(stream_from_bytes("pixels")).await.unwrap();
    assert_eq!(&bytes[..], b"pixels");
  }
}
