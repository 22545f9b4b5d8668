//! Declarative parameter schemas.
//!
//! A [`ParameterSchema`] lists every option an operation accepts. Each option
//! carries a default value and a validator predicate. Validators are pure: they
//! see only the candidate value, never other parameters or the input object.
//!
//! Nothing checks that a default passes its own validator. Some operations
//! ship defaults that callers are expected to override.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use cloudmaker_config::Parameters;
use serde_json::Value;

type Validator = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A single accepted option: default value plus validator.
#[derive(Clone)]
pub struct ParamSpec {
  default: Value,
  validator: Validator,
}

impl ParamSpec {
  pub fn new(
    default: impl Into<Value>,
    validator: impl Fn(&Value) -> bool + Send + Sync + 'static,
  ) -> Self {
    Self {
      default: default.into(),
      validator: Arc::new(validator),
    }
  }

  /// An option whose values are not constrained.
  pub fn any(default: impl Into<Value>) -> Self {
    Self::new(default, crate::validators::any)
  }

  pub fn default_value(&self) -> &Value {
    &self.default
  }

  pub fn validate(&self, candidate: &Value) -> bool {
    (self.validator)(candidate)
  }
}

impl fmt::Debug for ParamSpec {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ParamSpec")
      .field("default", &self.default)
      .finish_non_exhaustive()
  }
}

/// The full set of options one operation accepts, keyed by option name.
#[derive(Debug, Clone, Default)]
pub struct ParameterSchema {
  specs: BTreeMap<String, ParamSpec>,
}

impl ParameterSchema {
  pub fn new() -> Self {
    Self::default()
  }

  /// Add an option, replacing any previous option with the same name.
  pub fn with(mut self, key: impl Into<String>, spec: ParamSpec) -> Self {
    self.specs.insert(key.into(), spec);
    self
  }

  pub fn get(&self, key: &str) -> Option<&ParamSpec> {
    self.specs.get(key)
  }

  /// Accepted option names, sorted.
  pub fn keys(&self) -> impl Iterator<Item = &str> {
    self.specs.keys().map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamSpec)> {
    self.specs.iter().map(|(k, v)| (k.as_str(), v))
  }

  /// Every option mapped to its default value.
  pub fn defaults(&self) -> Parameters {
    self
      .specs
      .iter()
      .map(|(k, spec)| (k.clone(), spec.default.clone()))
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::validators;
  use serde_json::json;

  fn schema() -> ParameterSchema {
    ParameterSchema::new()
      .with("outputPrefix", ParamSpec::any("copied"))
      .with("sigma", ParamSpec::new(24, validators::positive_number))
  }

  #[test]
  fn test_keys_are_sorted() {
    let binding = schema();
    let keys: Vec<&str> = binding.keys().collect();
    assert_eq!(keys, vec!["outputPrefix", "sigma"]);
  }

  #[test]
  fn test_defaults() {
    let defaults = schema().defaults();
    assert_eq!(defaults["outputPrefix"], json!("copied"));
    assert_eq!(defaults["sigma"], json!(24));
    assert_eq!(defaults.len(), 2);
  }

  #[test]
  fn test_validate_delegates_to_predicate() {
    let schema = schema();
    let sigma = schema.get("sigma").unwrap();
    assert!(sigma.validate(&json!(3.5)));
    assert!(!sigma.validate(&json!(-1)));
    assert!(!sigma.validate(&json!("big")));
    assert!(schema.get("outputPrefix").unwrap().validate(&json!(false)));
  }

  #[test]
  fn test_default_need_not_validate() {
    let spec = ParamSpec::new(json!([]), |v| v.as_array().is_some_and(|a| !a.is_empty()));
    assert!(!spec.validate(spec.default_value()));
  }
}
