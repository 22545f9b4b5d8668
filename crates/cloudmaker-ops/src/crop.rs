use std::ffi::OsString;
use std::path::Path;

use cloudmaker_config::Parameters;
use cloudmaker_registry::{OperationError, ParamSpec, ParameterSchema, validators};
use serde_json::{Value, json};

use crate::helpers::annotation_to_shape;
use crate::params;
use crate::transform::ImageTransform;

pub const NAME: &str = "crop";

/// Crops to the bounding box of `vertices`, optionally squared off.
pub struct Crop;

fn is_crop_region(value: &Value) -> bool {
  params::is_vertex_list(value) && value.as_array().is_some_and(|points| points.len() >= 2)
}

/// The default region is empty and must be overridden.
pub fn schema() -> ParameterSchema {
  ParameterSchema::new()
    .with(
      "outputBucketName",
      ParamSpec::new("cloud-maker-outputs-cropped", validators::non_empty_string),
    )
    .with(
      "outputPrefix",
      ParamSpec::new("cropped", validators::string_or_false),
    )
    .with("vertices", ParamSpec::new(json!([]), is_crop_region))
    .with(
      "shape",
      ParamSpec::new("rectangle", validators::one_of(&["rectangle", "square"])),
    )
}

impl ImageTransform for Crop {
  fn arguments(
    &self,
    input: &Path,
    output: &Path,
    params: &Parameters,
  ) -> Result<Vec<OsString>, OperationError> {
    let region = params::annotation(params)?;
    if region.bounding_poly.vertices.is_empty() {
      return Err(OperationError::InvalidInput {
        message: "crop requires a region: pass vertices".to_string(),
      });
    }
    let geometry = annotation_to_shape(&region, params::shape(params)?)?;

    Ok(vec![
      input.into(),
      "-crop".into(),
      geometry.into(),
      "+repage".into(),
      output.into(),
    ])
  }
}
