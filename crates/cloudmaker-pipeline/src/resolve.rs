//! Parameter resolution: schema defaults merged with caller overrides.

use cloudmaker_config::Parameters;
use cloudmaker_registry::{FunctionRegistry, ParameterSchema};

use crate::error::PipelineError;

/// Merge a schema's defaults with caller overrides.
///
/// Overrides are taken as-is; they are expected to have passed validation
/// already. The result is built fresh on every call.
pub fn resolve_parameters(schema: &ParameterSchema, overrides: &Parameters) -> Parameters {
  let mut resolved = schema.defaults();
  for (key, value) in overrides {
    resolved.insert(key.clone(), value.clone());
  }
  resolved
}

/// Resolves parameters for operations looked up by name.
pub struct ParameterResolver<'a> {
  registry: &'a FunctionRegistry,
}

impl<'a> ParameterResolver<'a> {
  pub fn new(registry: &'a FunctionRegistry) -> Self {
    Self { registry }
  }

  /// Resolve the complete parameter set for `name`, with optional overrides.
  pub fn resolve(
    &self,
    name: &str,
    overrides: Option<&Parameters>,
  ) -> Result<Parameters, PipelineError> {
    let registered = self
      .registry
      .lookup(name)
      .map_err(|_| PipelineError::UnknownOperation {
        name: name.to_string(),
      })?;

    Ok(match overrides {
      Some(overrides) => resolve_parameters(registered.schema(), overrides),
      None => registered.schema().defaults(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use async_trait::async_trait;
  use cloudmaker_registry::{Operation, OperationError, ParamSpec};
  use cloudmaker_store::ObjectRef;
  use serde_json::json;

  struct Noop;

  #[async_trait]
  impl Operation for Noop {
    async fn invoke(
      &self,
      input: ObjectRef,
      _params: &Parameters,
    ) -> Result<ObjectRef, OperationError> {
      Ok(input)
    }
  }

  fn schema() -> ParameterSchema {
    ParameterSchema::new()
      .with("outputBucketName", ParamSpec::any("outputs-copied"))
      .with("outputPrefix", ParamSpec::any("copied"))
  }

  fn overrides(value: serde_json::Value) -> Parameters {
    value.as_object().cloned().unwrap()
  }

  #[test]
  fn test_empty_overrides_yield_defaults() {
    let schema = schema();
    assert_eq!(resolve_parameters(&schema, &Parameters::new()), schema.defaults());
  }

  #[test]
  fn test_overrides_win_and_defaults_fill_the_rest() {
    let resolved = resolve_parameters(&schema(), &overrides(json!({ "outputPrefix": "mine" })));

    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved["outputPrefix"], json!("mine"));
    assert_eq!(resolved["outputBucketName"], json!("outputs-copied"));
  }

  #[test]
  fn test_falsy_override_is_kept() {
    let resolved = resolve_parameters(&schema(), &overrides(json!({ "outputPrefix": false })));
    assert_eq!(resolved["outputPrefix"], json!(false));
  }

  #[test]
  fn test_resolution_does_not_touch_inputs() {
    let schema = schema();
    let caller = overrides(json!({ "outputPrefix": "mine" }));

    let mut first = resolve_parameters(&schema, &caller);
    first.insert("outputPrefix".to_string(), json!("mutated"));
    let second = resolve_parameters(&schema, &caller);

    assert_eq!(second["outputPrefix"], json!("mine"));
    assert_eq!(schema.defaults()["outputPrefix"], json!("copied"));
  }

  #[test]
  fn test_resolver_by_name() {
    let registry = FunctionRegistry::builder()
      .register("copyImage", schema(), Noop)
      .unwrap()
      .build();
    let resolver = ParameterResolver::new(&registry);

    let defaults = resolver.resolve("copyImage", None).unwrap();
    assert_eq!(defaults["outputPrefix"], json!("copied"));

    let err = resolver.resolve("sharpen", None).unwrap_err();
    assert!(matches!(err, PipelineError::UnknownOperation { .. }));
  }
}
