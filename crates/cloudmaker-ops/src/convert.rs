use std::ffi::OsString;
use std::path::Path;

use cloudmaker_config::Parameters;
use cloudmaker_registry::{OperationError, ParamSpec, ParameterSchema, validators};

use crate::helpers::{change_extension, create_output_file_name};
use crate::params;
use crate::transform::ImageTransform;

pub const NAME: &str = "convertRasterFormat";

/// Extensions `convertRasterFormat` can produce.
pub const EXTENSIONS: &[&str] = &[".gif", ".png", ".jpg"];

/// Re-encodes the image in another raster format, chosen by `extension`.
pub struct ConvertRasterFormat;

pub fn schema() -> ParameterSchema {
  ParameterSchema::new()
    .with(
      "outputBucketName",
      ParamSpec::new("cloud-maker-outputs-converted", validators::non_empty_string),
    )
    .with(
      "outputPrefix",
      ParamSpec::new("converted", validators::string_or_false),
    )
    .with("extension", ParamSpec::new(".png", validators::one_of(EXTENSIONS)))
}

impl ImageTransform for ConvertRasterFormat {
  fn output_name(&self, input_name: &str, params: &Parameters) -> Result<String, OperationError> {
    let extension = params::string(params, "extension")?.to_ascii_lowercase();
    Ok(change_extension(
      &create_output_file_name(input_name, params),
      &extension,
    ))
  }

  fn arguments(
    &self,
    input: &Path,
    output: &Path,
    _params: &Parameters,
  ) -> Result<Vec<OsString>, OperationError> {
    Ok(vec![input.into(), output.into()])
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_accepts_only_known_extensions() {
    let schema = schema();
    let extension = schema.get("extension").unwrap();
    for ok in [".gif", ".PNG", ".jpg"] {
      assert!(extension.validate(&json!(ok)), "{ok}");
    }
    for bad in [".asdf", "false", ".jpeg"] {
      assert!(!extension.validate(&json!(bad)), "{bad}");
    }
  }

  #[test]
  fn test_output_name_changes_extension() {
    let mut params = schema().defaults();
    params.insert("extension".to_string(), json!(".JPG"));
    let name = ConvertRasterFormat.output_name("img.png", &params).unwrap();
    assert_eq!(name, "converted-img.jpg");
  }

  #[test]
  fn test_arguments_are_input_then_output() {
    let args = ConvertRasterFormat
      .arguments(Path::new("in.png"), Path::new("out.gif"), &schema().defaults())
      .unwrap();
    assert_eq!(args, ["in.png", "out.gif"]);
  }
}
