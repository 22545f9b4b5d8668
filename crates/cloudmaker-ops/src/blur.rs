use std::ffi::OsString;
use std::path::Path;

use cloudmaker_config::Parameters;
use cloudmaker_registry::{OperationError, ParamSpec, ParameterSchema, validators};
use serde_json::json;

use crate::helpers::{Shape, annotation_to_shape};
use crate::params;
use crate::transform::ImageTransform;

pub const NAME: &str = "blur";

/// Gaussian blur over the whole image, or over the region spanned by `vertices`.
pub struct Blur;

pub fn schema() -> ParameterSchema {
  ParameterSchema::new()
    .with(
      "outputBucketName",
      ParamSpec::new("cloud-maker-outputs-blurred", validators::non_empty_string),
    )
    .with(
      "outputPrefix",
      ParamSpec::new("blurred", validators::string_or_false),
    )
    .with("sigma", ParamSpec::new(24, validators::positive_number))
    .with("vertices", ParamSpec::new(json!([]), params::is_vertex_list))
}

impl ImageTransform for Blur {
  fn arguments(
    &self,
    input: &Path,
    output: &Path,
    params: &Parameters,
  ) -> Result<Vec<OsString>, OperationError> {
    let sigma = params::number(params, "sigma")?;
    let region = params::annotation(params)?;

    let mut args: Vec<OsString> = vec![input.into(), "-channel".into(), "RGBA".into()];
    if !region.bounding_poly.vertices.is_empty() {
      args.push("-region".into());
      args.push(annotation_to_shape(&region, Shape::Rectangle)?.into());
    }
    args.push("-blur".into());
    args.push(format!("0x{}", sigma).into());
    args.push(output.into());
    Ok(args)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::helpers::create_output_file_name;

  fn resolved(overrides: serde_json::Value) -> Parameters {
    let mut params = schema().defaults();
    params.extend(overrides.as_object().cloned().unwrap());
    params
  }

  #[test]
  fn test_default_arguments() {
    let args = Blur
      .arguments(Path::new("in.png"), Path::new("out.png"), &resolved(json!({})))
      .unwrap();
    assert_eq!(args, ["in.png", "-channel", "RGBA", "-blur", "0x24", "out.png"]);
  }

  #[test]
  fn test_region_and_sigma() {
    let params = resolved(json!({
      "sigma": 2.5,
      "vertices": [{ "x": 10, "y": 15 }, { "x": 100, "y": 100 }]
    }));
    let args = Blur
      .arguments(Path::new("in.png"), Path::new("out.png"), &params)
      .unwrap();
    assert_eq!(
      args,
      ["in.png", "-channel", "RGBA", "-region", "90x85+10+15", "-blur", "0x2.5", "out.png"]
    );
  }

  #[test]
  fn test_output_name() {
    let name = Blur.output_name("dir/img.png", &resolved(json!({}))).unwrap();
    assert_eq!(name, "blurred-img.png");
    assert_eq!(name, create_output_file_name("img.png", &schema().defaults()));
  }
}
