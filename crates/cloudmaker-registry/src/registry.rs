use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::RegistryError;
use crate::operation::Operation;
use crate::schema::ParameterSchema;

/// An operation paired with the schema of the parameters it accepts.
#[derive(Clone)]
pub struct RegisteredOperation {
  name: String,
  schema: ParameterSchema,
  operation: Arc<dyn Operation>,
}

impl RegisteredOperation {
  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn schema(&self) -> &ParameterSchema {
    &self.schema
  }

  pub fn operation(&self) -> &Arc<dyn Operation> {
    &self.operation
  }
}

impl fmt::Debug for RegisteredOperation {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RegisteredOperation")
      .field("name", &self.name)
      .field("schema", &self.schema)
      .finish_non_exhaustive()
  }
}

/// Read-only table of named operations.
///
/// Built once through [`FunctionRegistryBuilder`] and shared by reference
/// afterwards. There is no way to add or remove entries from a built registry.
#[derive(Debug, Default)]
pub struct FunctionRegistry {
  operations: HashMap<String, RegisteredOperation>,
}

impl FunctionRegistry {
  pub fn builder() -> FunctionRegistryBuilder {
    FunctionRegistryBuilder::default()
  }

  /// Look up an operation by name.
  pub fn lookup(&self, name: &str) -> Result<&RegisteredOperation, RegistryError> {
    self
      .operations
      .get(name)
      .ok_or_else(|| RegistryError::NotFound {
        name: name.to_string(),
      })
  }

  /// Registered operation names, sorted.
  pub fn names(&self) -> Vec<&str> {
    let mut names: Vec<&str> = self.operations.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
  }
}

/// Collects operations before freezing them into a [`FunctionRegistry`].
#[derive(Default)]
pub struct FunctionRegistryBuilder {
  operations: HashMap<String, RegisteredOperation>,
}

impl FunctionRegistryBuilder {
  /// Register an operation under a unique name.
  pub fn register(
    mut self,
    name: impl Into<String>,
    schema: ParameterSchema,
    operation: impl Operation + 'static,
  ) -> Result<Self, RegistryError> {
    let name = name.into();
    if self.operations.contains_key(&name) {
      return Err(RegistryError::AlreadyRegistered { name });
    }

    self.operations.insert(
      name.clone(),
      RegisteredOperation {
        name,
        schema,
        operation: Arc::new(operation),
      },
    );
    Ok(self)
  }

  pub fn build(self) -> FunctionRegistry {
    FunctionRegistry {
      operations: self.operations,
    }
  }
}
