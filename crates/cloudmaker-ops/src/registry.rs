use std::sync::Arc;

use cloudmaker_registry::{FunctionRegistry, RegistryError};
use cloudmaker_store::ObjectStore;

use crate::annotate::{self, Annotate};
use crate::blur::{self, Blur};
use crate::convert::{self, ConvertRasterFormat};
use crate::copy::{self, CopyImage};
use crate::crop::{self, Crop};
use crate::magick::MagickConfig;
use crate::transform::MagickOperation;

/// Build the registry of every built-in operation.
pub fn default_registry(
  store: Arc<dyn ObjectStore>,
  magick: MagickConfig,
) -> Result<FunctionRegistry, RegistryError> {
  let magick = Arc::new(magick);

  Ok(
    FunctionRegistry::builder()
      .register(
        blur::NAME,
        blur::schema(),
        MagickOperation::new(Blur, store.clone(), magick.clone()),
      )?
      .register(
        crop::NAME,
        crop::schema(),
        MagickOperation::new(Crop, store.clone(), magick.clone()),
      )?
      .register(
        convert::NAME,
        convert::schema(),
        MagickOperation::new(ConvertRasterFormat, store.clone(), magick.clone()),
      )?
      .register(
        annotate::NAME,
        annotate::schema(),
        MagickOperation::new(Annotate, store.clone(), magick),
      )?
      .register(copy::NAME, copy::schema(), CopyImage::new(store))?
      .build(),
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use cloudmaker_store::MemoryObjectStore;

  #[test]
  fn test_registers_all_operations() {
    let registry =
      default_registry(Arc::new(MemoryObjectStore::new()), MagickConfig::default()).unwrap();
    assert_eq!(
      registry.names(),
      vec!["annotate", "blur", "convertRasterFormat", "copyImage", "crop"]
    );
  }

  #[test]
  fn test_output_defaults_live_in_schemas() {
    let registry =
      default_registry(Arc::new(MemoryObjectStore::new()), MagickConfig::default()).unwrap();
    let copy = registry.lookup("copyImage").unwrap().schema().defaults();
    assert_eq!(copy["outputBucketName"], "outputs-copied");
    assert_eq!(copy["outputPrefix"], "copied");

    let blur = registry.lookup("blur").unwrap().schema().defaults();
    assert_eq!(blur["outputBucketName"], "cloud-maker-outputs-blurred");
  }
}
