//! Request validation.
//!
//! Checks run in a fixed order and the first failure is returned. Nothing is
//! executed and nothing is written while validating.
//!
//! A field counts as missing when it is absent or holds a falsy JSON value
//! (`null`, `false`, `0`, `""`).

use cloudmaker_config::{FunctionCall, Parameters, Request, SourceData};
use cloudmaker_registry::{FunctionRegistry, ParameterSchema, RegisteredOperation, RegistryError};
use serde_json::Value;

use crate::error::PipelineError;

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
  pub source: SourceData,
  pub functions: Vec<FunctionCall>,
}

/// Validates requests against a function registry.
pub struct RequestValidator<'a> {
  registry: &'a FunctionRegistry,
}

impl<'a> RequestValidator<'a> {
  pub fn new(registry: &'a FunctionRegistry) -> Self {
    Self { registry }
  }

  /// Validate a whole request.
  pub fn validate(&self, request: &Request) -> Result<ValidatedRequest, PipelineError> {
    let body = request
      .body
      .as_ref()
      .ok_or_else(|| PipelineError::malformed("Invalid request: Missing body parameter."))?;

    let data = body
      .data
      .as_ref()
      .filter(|v| is_truthy(v))
      .ok_or_else(|| PipelineError::malformed("Invalid request: Missing input data."))?;

    let functions = body
      .functions
      .as_ref()
      .filter(|v| is_truthy(v))
      .ok_or_else(|| PipelineError::malformed("Invalid request: Missing functions list."))?;

    let source = validate_data(data)?;

    let entries = functions
      .as_array()
      .ok_or_else(|| PipelineError::malformed("Functions should be a list of function invocations"))?;

    let functions = entries
      .iter()
      .map(|entry| self.validate_function(entry))
      .collect::<Result<Vec<_>, _>>()?;

    Ok(ValidatedRequest { source, functions })
  }

  /// Validate one entry of the `functions` list.
  ///
  /// The name is checked first, then resolved in the registry, then the
  /// parameters are checked against that operation's schema.
  pub fn validate_function(&self, entry: &Value) -> Result<FunctionCall, PipelineError> {
    let name = entry
      .get("name")
      .filter(|v| is_truthy(v))
      .map(display_value)
      .ok_or_else(|| PipelineError::malformed("No function name specified"))?;

    let registered = self.lookup(&name)?;

    let parameters = match entry.get("parameters") {
      None | Some(Value::Null) => Parameters::new(),
      Some(Value::Object(map)) => map.clone(),
      Some(_) => {
        return Err(PipelineError::malformed(format!(
          "Parameters for function {} should be an object",
          name
        )));
      }
    };

    validate_against_schema(&name, registered.schema(), &parameters)?;

    Ok(FunctionCall { name, parameters })
  }

  /// Validate caller-supplied parameters for a named operation.
  pub fn validate_parameters(&self, name: &str, parameters: &Parameters) -> Result<(), PipelineError> {
    let registered = self.lookup(name)?;
    validate_against_schema(name, registered.schema(), parameters)
  }

  fn lookup(&self, name: &str) -> Result<&'a RegisteredOperation, PipelineError> {
    self.registry.lookup(name).map_err(|e| match e {
      RegistryError::NotFound { name } => PipelineError::UnknownOperation { name },
      other => PipelineError::malformed(other.to_string()),
    })
  }
}

/// Validate the `data` section describing the source object.
pub fn validate_data(data: &Value) -> Result<SourceData, PipelineError> {
  if data.is_array() {
    return Err(PipelineError::malformed(
      "Data should be a single object, not an array",
    ));
  }

  let gcs_source_uri = required_field(data, "gcsSourceUri")?;
  let bucket = required_field(data, "bucket")?;
  let name = required_field(data, "name")?;

  Ok(SourceData {
    bucket,
    name,
    gcs_source_uri,
  })
}

/// Check every supplied key exists in the schema and passes its validator.
pub fn validate_against_schema(
  operation: &str,
  schema: &ParameterSchema,
  parameters: &Parameters,
) -> Result<(), PipelineError> {
  for (key, value) in parameters {
    let Some(spec) = schema.get(key) else {
      let expected: Vec<&str> = schema.keys().collect();
      return Err(PipelineError::InvalidParameter {
        operation: operation.to_string(),
        key: key.clone(),
        message: format!(
          "Parameter {} not expected for function {}. Expected one of {}",
          key,
          operation,
          expected.join(",")
        ),
      });
    };

    if !spec.validate(value) {
      return Err(PipelineError::InvalidParameter {
        operation: operation.to_string(),
        key: key.clone(),
        message: format!(
          "Parameter {} with value {} was rejected by {}",
          key,
          display_value(value),
          operation
        ),
      });
    }
  }

  Ok(())
}

fn required_field(data: &Value, field: &str) -> Result<String, PipelineError> {
  data
    .get(field)
    .and_then(Value::as_str)
    .filter(|s| !s.is_empty())
    .map(str::to_string)
    .ok_or_else(|| PipelineError::malformed(format!("No {} specified", field)))
}

/// JSON truthiness: `null`, `false`, zero and the empty string are falsy.
pub(crate) fn is_truthy(value: &Value) -> bool {
  match value {
    Value::Null => false,
    Value::Bool(b) => *b,
    Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
    Value::String(s) => !s.is_empty(),
    Value::Array(_) | Value::Object(_) => true,
  }
}

/// Strings render bare, everything else as JSON.
fn display_value(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}
