use std::ffi::OsString;
use std::path::Path;

use cloudmaker_config::Parameters;
use cloudmaker_registry::{OperationError, ParamSpec, ParameterSchema, validators};
use serde_json::json;

use crate::helpers::{Shape, annotation_to_shape, annotations_to_polygons};
use crate::params;
use crate::transform::ImageTransform;

pub const NAME: &str = "annotate";

/// Outlines the region spanned by `vertices` as a polygon or a circle.
pub struct Annotate;

pub fn schema() -> ParameterSchema {
  ParameterSchema::new()
    .with(
      "outputBucketName",
      ParamSpec::new("cloud-maker-outputs-annotated", validators::non_empty_string),
    )
    .with(
      "outputPrefix",
      ParamSpec::new("annotated", validators::string_or_false),
    )
    .with("vertices", ParamSpec::new(json!([]), params::is_vertex_list))
    .with(
      "shape",
      ParamSpec::new("polygon", validators::one_of(&["polygon", "circle"])),
    )
    .with("stroke", ParamSpec::new("red", validators::non_empty_string))
}

impl ImageTransform for Annotate {
  fn arguments(
    &self,
    input: &Path,
    output: &Path,
    params: &Parameters,
  ) -> Result<Vec<OsString>, OperationError> {
    let region = params::annotation(params)?;
    if region.bounding_poly.vertices.is_empty() {
      return Err(OperationError::InvalidInput {
        message: "annotate requires vertices".to_string(),
      });
    }

    let draw = if params::string(params, "shape")?.eq_ignore_ascii_case("circle") {
      annotation_to_shape(&region, Shape::Circle)?
    } else {
      annotations_to_polygons(std::slice::from_ref(&region))
    };

    Ok(vec![
      input.into(),
      "-fill".into(),
      "none".into(),
      "-stroke".into(),
      params::string(params, "stroke")?.into(),
      "-strokewidth".into(),
      "3".into(),
      "-draw".into(),
      draw.into(),
      output.into(),
    ])
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn resolved(overrides: serde_json::Value) -> Parameters {
    let mut params = schema().defaults();
    params.extend(overrides.as_object().cloned().unwrap());
    params
  }

  #[test]
  fn test_polygon_outline() {
    let params = resolved(json!({
      "vertices": [{ "x": 1, "y": 2 }, { "x": 3, "y": 4 }, { "x": 5, "y": 6 }]
    }));
    let args = Annotate
      .arguments(Path::new("in.png"), Path::new("out.png"), &params)
      .unwrap();
    assert_eq!(
      args,
      [
        "in.png",
        "-fill",
        "none",
        "-stroke",
        "red",
        "-strokewidth",
        "3",
        "-draw",
        "polygon 1,2 3,4 5,6",
        "out.png"
      ]
    );
  }

  #[test]
  fn test_circle_outline() {
    let params = resolved(json!({
      "shape": "circle",
      "stroke": "#00ff00",
      "vertices": [{ "x": 10, "y": 15 }, { "x": 100, "y": 100 }]
    }));
    let args = Annotate
      .arguments(Path::new("in.png"), Path::new("out.png"), &params)
      .unwrap();
    assert_eq!(args[4], "#00ff00");
    assert_eq!(args[8], "circle 56,58 13,58");
  }

  #[test]
  fn test_requires_vertices() {
    let err = Annotate
      .arguments(Path::new("in.png"), Path::new("out.png"), &schema().defaults())
      .unwrap_err();
    assert!(matches!(err, OperationError::InvalidInput { .. }));
  }
}
